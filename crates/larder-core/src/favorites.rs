use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, PreconditionError, StorageError};
use crate::storage::KeyValueStore;

/// Key under which the liked recipes are persisted.
pub const LIKES_KEY: &str = "likes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedRecipe {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image_url: String,
}

/// Liked recipes, at most one per id, written through to a [`KeyValueStore`]
/// after every change.
pub struct FavoritesStore<K: KeyValueStore> {
    likes: Vec<LikedRecipe>,
    store: Arc<K>,
}

impl<K: KeyValueStore> FavoritesStore<K> {
    /// An empty collection. Call [`restore`](Self::restore) to load persisted likes.
    pub fn new(store: Arc<K>) -> Self {
        Self {
            likes: Vec::new(),
            store,
        }
    }

    /// Add a like. Fails if `id` is already liked; callers check
    /// [`is_liked`](Self::is_liked) first.
    pub fn add_like(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Result<LikedRecipe, CoreError> {
        let id = id.into();
        if self.is_liked(&id) {
            return Err(PreconditionError::AlreadyLiked(id).into());
        }

        let like = LikedRecipe {
            id,
            title: title.into(),
            author: author.into(),
            image_url: image_url.into(),
        };
        self.likes.push(like.clone());

        if let Err(e) = self.persist() {
            self.likes.pop();
            return Err(e.into());
        }
        Ok(like)
    }

    pub fn delete_like(&mut self, id: &str) -> Result<LikedRecipe, CoreError> {
        let index = self
            .likes
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| PreconditionError::NotLiked(id.to_string()))?;
        let removed = self.likes.remove(index);

        if let Err(e) = self.persist() {
            self.likes.insert(index, removed);
            return Err(e.into());
        }
        Ok(removed)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.likes.iter().any(|l| l.id == id)
    }

    pub fn num_likes(&self) -> usize {
        self.likes.len()
    }

    /// Liked recipes in the order they were liked.
    pub fn likes(&self) -> &[LikedRecipe] {
        &self.likes
    }

    /// Write the whole collection to the store.
    pub fn persist(&self) -> Result<(), StorageError> {
        let value = serde_json::to_string(&self.likes)
            .map_err(|e| StorageError::Database(e.to_string()))?;
        self.store.write(LIKES_KEY, &value)
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Nothing stored yields an empty collection. A corrupt value, whether
    /// unreadable or undecodable, is logged and also yields an empty
    /// collection; only backend failures are returned.
    pub fn restore(&mut self) -> Result<usize, StorageError> {
        let raw = match self.store.read(LIKES_KEY) {
            Ok(raw) => raw,
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!("Discarding unreadable persisted likes: {}", e);
                None
            }
            Err(e) => {
                self.likes.clear();
                return Err(e);
            }
        };

        self.likes = match raw.as_deref().map(str::trim) {
            None | Some("") | Some("null") => Vec::new(),
            Some(value) => match decode_likes(value) {
                Ok(likes) => likes,
                Err(e) => {
                    tracing::warn!("Discarding persisted likes: {}", e);
                    Vec::new()
                }
            },
        };

        tracing::debug!("Restored {} liked recipes", self.likes.len());
        Ok(self.likes.len())
    }
}

/// Decode a persisted likes document, keeping the first entry for any repeated id.
fn decode_likes(value: &str) -> Result<Vec<LikedRecipe>, StorageError> {
    let decoded: Vec<LikedRecipe> =
        serde_json::from_str(value).map_err(|e| StorageError::Corrupt(e.to_string()))?;

    let mut likes: Vec<LikedRecipe> = Vec::with_capacity(decoded.len());
    for like in decoded {
        if likes.iter().any(|l| l.id == like.id) {
            tracing::warn!("Dropping duplicate persisted like {}", like.id);
            continue;
        }
        likes.push(like);
    }
    Ok(likes)
}
