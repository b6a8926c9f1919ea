//! Line-oriented terminal front end: parses typed commands into events and
//! prints the snapshots the controller hands over.

use larder_core::{ItemId, LikedRecipe, RecipeDetail, ServingsChange, ShoppingListItem};

use crate::events::AppEvent;
use crate::sink::{PresentationSink, Region, SearchPage};

/// Titles longer than this are shortened in result lists.
const TITLE_LIMIT: usize = 17;

pub const HELP: &str = "\
commands:
  search <query>        search the catalog
  page <n>              show another page of results
  open <id>             show a recipe
  more | less           change servings
  add                   add the recipe's ingredients to the shopping list
  del <item-id>         remove a shopping list item
  set <item-id> <qty>   change a shopping list item's quantity
  like                  like or unlike the recipe
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(AppEvent),
    Help,
    Quit,
}

/// Parse one typed line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "search" | "s" => Command::Event(AppEvent::SubmitSearch(rest.to_string())),
        "page" | "p" => {
            let page = rest
                .parse::<usize>()
                .map_err(|_| format!("not a page number: {rest:?}"))?;
            Command::Event(AppEvent::GotoPage(page))
        }
        "open" | "o" => {
            let fragment = (!rest.is_empty()).then(|| rest.to_string());
            Command::Event(AppEvent::Navigate(fragment))
        }
        "more" | "+" => Command::Event(AppEvent::ToggleServings(ServingsChange::Increase)),
        "less" | "-" => Command::Event(AppEvent::ToggleServings(ServingsChange::Decrease)),
        "add" => Command::Event(AppEvent::AddToList),
        "del" => Command::Event(AppEvent::DeleteListItem(parse_item_id(rest)?)),
        "set" => {
            let (id, qty) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: set <item-id> <qty>".to_string())?;
            let quantity = qty.trim().parse::<f64>().unwrap_or(f64::NAN);
            Command::Event(AppEvent::UpdateListItem {
                id: parse_item_id(id)?,
                quantity,
            })
        }
        "like" => Command::Event(AppEvent::ToggleLike),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

fn parse_item_id(raw: &str) -> Result<ItemId, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("not an item id: {raw:?}"))
}

/// Shorten `title` to whole words fitting in `limit` characters, marking the cut with ` ...`.
pub fn limit_recipe_title(title: &str, limit: usize) -> String {
    if title.chars().count() <= limit {
        return title.to_string();
    }
    let mut kept = Vec::new();
    let mut used = 0;
    for word in title.split(' ') {
        used += word.chars().count();
        if used <= limit {
            kept.push(word);
        }
    }
    format!("{} ...", kept.join(" "))
}

/// Render a quantity the way a cook writes it: `2`, `1 1/2`, `0.33`.
pub fn format_quantity(quantity: Option<f64>) -> String {
    let Some(q) = quantity else {
        return String::new();
    };
    if !q.is_finite() {
        return "?".to_string();
    }
    let whole = q.trunc();
    let frac = q - whole;
    if frac.abs() < 1e-9 {
        return format!("{}", whole as i64);
    }
    for den in [2u32, 3, 4, 8] {
        let num = frac * f64::from(den);
        if (num - num.round()).abs() < 1e-9 {
            let num = num.round() as i64;
            return if whole == 0.0 {
                format!("{}/{}", num, den)
            } else {
                format!("{} {}/{}", whole as i64, num, den)
            };
        }
    }
    let text = format!("{:.2}", q);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_results(page: &SearchPage) -> String {
    let mut out = format!(
        "Results for {:?} (page {}/{})\n",
        page.query,
        page.page,
        page.total_pages.max(1)
    );
    if page.results.is_empty() {
        out.push_str("  no recipes found\n");
    }
    for recipe in &page.results {
        let marker = if page.selected.as_deref() == Some(recipe.id.as_str()) {
            '>'
        } else {
            ' '
        };
        out.push_str(&format!(
            "{} [{}] {} - {}\n",
            marker,
            recipe.id,
            limit_recipe_title(&recipe.title, TITLE_LIMIT),
            recipe.publisher
        ));
    }
    let mut nav = Vec::new();
    if let Some(prev) = page.affordances.prev {
        nav.push(format!("< page {prev}"));
    }
    if let Some(next) = page.affordances.next {
        nav.push(format!("page {next} >"));
    }
    if !nav.is_empty() {
        out.push_str(&format!("  {}\n", nav.join(" | ")));
    }
    out
}

pub fn format_ingredients(recipe: &RecipeDetail) -> String {
    let mut out = String::new();
    for line in &recipe.ingredients {
        let mut parts = Vec::new();
        let qty = format_quantity(line.quantity);
        if !qty.is_empty() {
            parts.push(qty);
        }
        if let Some(unit) = &line.unit {
            parts.push(unit.clone());
        }
        parts.push(line.name.clone());
        out.push_str(&format!("  - {}\n", parts.join(" ")));
    }
    out
}

pub fn format_recipe(recipe: &RecipeDetail, liked: bool) -> String {
    format!(
        "{} {}\nby {} | {} min | {} servings\n{}source: {}\n",
        if liked { "[liked]" } else { "[ ]" },
        recipe.title,
        recipe.author,
        recipe.prep_time_minutes,
        recipe.servings,
        format_ingredients(recipe),
        recipe.source_url
    )
}

pub fn format_list_item(item: &ShoppingListItem) -> String {
    let mut parts = Vec::new();
    let qty = format_quantity(item.quantity);
    if !qty.is_empty() {
        parts.push(qty);
    }
    if let Some(unit) = &item.unit {
        parts.push(unit.clone());
    }
    parts.push(item.name.clone());
    format!("list + {} [{}]", parts.join(" "), item.id)
}

/// Presentation sink that prints to stdout.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationSink for TerminalSink {
    fn show_loader(&self, region: Region) {
        match region {
            Region::Search => println!("searching..."),
            Region::Recipe => println!("loading recipe..."),
        }
    }

    fn clear_loader(&self, _region: Region) {}

    fn clear_results(&self) {}

    fn render_results(&self, page: &SearchPage) {
        print!("{}", format_results(page));
    }

    fn highlight_selected(&self, id: &str) {
        println!("selected {id}");
    }

    fn clear_recipe(&self) {}

    fn render_recipe(&self, recipe: &RecipeDetail, liked: bool) {
        print!("{}", format_recipe(recipe, liked));
    }

    fn update_servings(&self, recipe: &RecipeDetail) {
        println!("{} servings", recipe.servings);
        print!("{}", format_ingredients(recipe));
    }

    fn render_list_item(&self, item: &ShoppingListItem) {
        println!("{}", format_list_item(item));
    }

    fn delete_list_item(&self, id: ItemId) {
        println!("list - [{id}]");
    }

    fn toggle_like_button(&self, liked: bool) {
        println!("{}", if liked { "liked" } else { "unliked" });
    }

    fn render_like(&self, like: &LikedRecipe) {
        println!(
            "likes + [{}] {} - {}",
            like.id,
            limit_recipe_title(&like.title, TITLE_LIMIT),
            like.author
        );
    }

    fn delete_like(&self, id: &str) {
        println!("likes - [{id}]");
    }

    fn toggle_like_menu(&self, num_likes: usize) {
        if num_likes > 0 {
            println!("{num_likes} liked recipe(s)");
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
