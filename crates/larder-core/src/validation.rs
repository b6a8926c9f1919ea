use crate::error::ValidationError;

const MAX_QUERY_LEN: usize = 256;

/// Validator for user-supplied input.
pub struct Validator;

impl Validator {
    /// Trim a search query. Must be non-empty and at most 256 characters.
    pub fn validate_query(query: &str) -> Result<&str, ValidationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        let len = query.chars().count();
        if len > MAX_QUERY_LEN {
            return Err(ValidationError::QueryTooLong(len));
        }
        Ok(query)
    }

    /// Extract a recipe id from a navigation fragment such as `"#47746"`.
    pub fn validate_recipe_id(fragment: &str) -> Result<&str, ValidationError> {
        let id = fragment.trim().trim_start_matches('#').trim();
        if id.is_empty() {
            return Err(ValidationError::EmptyRecipeId);
        }
        Ok(id)
    }
}
