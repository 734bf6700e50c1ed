use std::fmt::Write;

use crate::model::{Ingredient, Pagination, Recipe, SearchResult};
use crate::views::{
    AddRecipeView, BookmarksView, Navigator, PaginationView, RecipeView, ResultsView, View,
};

const RECIPE_ERROR: &str = "We could not find that recipe. Please try another one!";
const RESULTS_ERROR: &str = "No recipes found for your query! Please try again ;)";
const BOOKMARKS_EMPTY: &str = "No bookmarks yet. Find a nice recipe and bookmark it :)";
const UPLOAD_SUCCESS: &str = "Recipe was successfully uploaded :)";

pub struct TerminalRecipeView;

impl View for TerminalRecipeView {
    fn render_spinner(&mut self) {
        println!("Loading recipe...");
    }

    fn render_error(&mut self, message: Option<&str>) {
        println!("! {}", message.unwrap_or(RECIPE_ERROR));
    }
}

impl RecipeView for TerminalRecipeView {
    fn render(&mut self, recipe: &Recipe) {
        print!("{}", format_recipe(recipe));
    }
}

pub struct TerminalResultsView;

impl View for TerminalResultsView {
    fn render_spinner(&mut self) {
        println!("Searching...");
    }

    fn render_error(&mut self, message: Option<&str>) {
        println!("! {}", message.unwrap_or(RESULTS_ERROR));
    }
}

impl ResultsView for TerminalResultsView {
    fn render(&mut self, results: &[SearchResult], active_id: Option<&str>) {
        if results.is_empty() {
            self.render_error(None);
            return;
        }
        for result in results {
            println!("{}", format_preview(result, active_id));
        }
    }

    // Rows are not reprinted on selection
    fn update(&mut self, _results: &[SearchResult], _active_id: Option<&str>) {}
}

pub struct TerminalPaginationView;

impl PaginationView for TerminalPaginationView {
    fn render(&mut self, pagination: &Pagination) {
        if let Some(line) = format_pagination(pagination) {
            println!("{}", line);
        }
    }
}

pub struct TerminalBookmarksView;

impl View for TerminalBookmarksView {
    fn render_spinner(&mut self) {}

    fn render_error(&mut self, message: Option<&str>) {
        println!("! {}", message.unwrap_or(BOOKMARKS_EMPTY));
    }
}

impl BookmarksView for TerminalBookmarksView {
    fn render(&mut self, bookmarks: &[Recipe], active_id: Option<&str>) {
        if bookmarks.is_empty() {
            self.render_error(None);
            return;
        }
        println!("Bookmarks:");
        for recipe in bookmarks {
            println!("{}", format_preview(&SearchResult::from(recipe), active_id));
        }
    }

    fn update(&mut self, _bookmarks: &[Recipe], _active_id: Option<&str>) {}
}

#[derive(Debug, Default)]
pub struct TerminalAddRecipeView {
    open: bool,
}

impl View for TerminalAddRecipeView {
    fn render_spinner(&mut self) {
        println!("Uploading recipe...");
    }

    fn render_error(&mut self, message: Option<&str>) {
        println!("! {}", message.unwrap_or("Upload failed"));
    }
}

impl AddRecipeView for TerminalAddRecipeView {
    fn render_message(&mut self, message: Option<&str>) {
        println!("{}", message.unwrap_or(UPLOAD_SUCCESS));
    }

    fn open_window(&mut self) {
        self.open = true;
        println!("Upload a recipe with: upload <form.json>");
    }

    fn close_window(&mut self) {
        if self.open {
            self.open = false;
            println!("(upload form closed)");
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Remembers the location instead of a URL hash
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    current: Option<String>,
}

impl TerminalNavigator {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl Navigator for TerminalNavigator {
    fn push_location(&mut self, id: &str) {
        self.current = Some(id.to_string());
        println!("#{}", id);
    }
}

fn format_preview(result: &SearchResult, active_id: Option<&str>) -> String {
    let marker = if active_id == Some(result.id.as_str()) {
        '>'
    } else {
        ' '
    };
    let user = if result.key.is_some() { " [yours]" } else { "" };
    format!(
        "{} {}  {} ({}){}",
        marker, result.id, result.title, result.publisher, user
    )
}

fn format_pagination(pagination: &Pagination) -> Option<String> {
    if pagination.num_pages <= 1 {
        return None;
    }
    let mut line = String::new();
    if let Some(prev) = pagination.prev_page() {
        let _ = write!(line, "<- Page {}   ", prev);
    }
    let _ = write!(
        line,
        "[{}/{}]",
        pagination.current_page, pagination.num_pages
    );
    if let Some(next) = pagination.next_page() {
        let _ = write!(line, "   Page {} ->", next);
    }
    Some(line)
}

/// Multi-line detail rendering of a recipe
pub fn format_recipe(recipe: &Recipe) -> String {
    let mut out = String::new();
    let bookmark = if recipe.bookmarked { " *" } else { "" };
    let _ = writeln!(out, "== {}{} ==", recipe.title.to_uppercase(), bookmark);
    let _ = writeln!(
        out,
        "{} minutes | {} servings",
        recipe.cooking_time, recipe.servings
    );
    let _ = writeln!(out, "Ingredients:");
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  - {}", format_ingredient(ingredient));
    }
    let _ = writeln!(out, "By {}: {}", recipe.publisher, recipe.source_url);
    out
}

fn format_ingredient(ingredient: &Ingredient) -> String {
    let mut parts = Vec::new();
    if let Some(quantity) = ingredient.quantity {
        parts.push(format_quantity(quantity));
    }
    if !ingredient.unit.is_empty() {
        parts.push(ingredient.unit.clone());
    }
    parts.push(ingredient.description.clone());
    parts.join(" ")
}

/// Render a quantity as a mixed fraction when it is close to one with a small
/// denominator (0.5 -> "1/2", 1.25 -> "1 1/4"), otherwise as a decimal.
pub fn format_quantity(quantity: f64) -> String {
    let whole = quantity.trunc();
    let frac = quantity - whole;
    if frac.abs() < 1e-6 {
        return format!("{}", whole as i64);
    }

    for denominator in 2..=8u32 {
        let numerator = frac * f64::from(denominator);
        if (numerator - numerator.round()).abs() < 0.01 {
            let numerator = numerator.round() as i64;
            if numerator == 0 {
                return format!("{}", whole as i64);
            }
            if numerator == i64::from(denominator) {
                return format!("{}", whole as i64 + 1);
            }
            return if whole == 0.0 {
                format!("{}/{}", numerator, denominator)
            } else {
                format!("{} {}/{}", whole as i64, numerator, denominator)
            };
        }
    }

    let decimal = format!("{:.2}", quantity);
    decimal.trim_end_matches('0').trim_end_matches('.').to_string()
}
