mod terminal;

pub use terminal::{
    TerminalAddRecipeView, TerminalBookmarksView, TerminalNavigator, TerminalPaginationView,
    TerminalRecipeView, TerminalResultsView,
};

use crate::model::{Pagination, Recipe, SearchResult};

/// Behaviour shared by every view that can be busy or show a failure
pub trait View {
    fn render_spinner(&mut self);

    /// Show `message`, or the view's default error text when `None`
    fn render_error(&mut self, message: Option<&str>);
}

/// Detail view of the current recipe
pub trait RecipeView: View {
    fn render(&mut self, recipe: &Recipe);

    /// Re-render after an in-place change (servings, bookmark flag)
    fn update(&mut self, recipe: &Recipe) {
        self.render(recipe);
    }
}

/// One page of search results; `active_id` marks the recipe on display
pub trait ResultsView: View {
    fn render(&mut self, results: &[SearchResult], active_id: Option<&str>);

    fn update(&mut self, results: &[SearchResult], active_id: Option<&str>) {
        self.render(results, active_id);
    }
}

pub trait PaginationView {
    fn render(&mut self, pagination: &Pagination);
}

/// Saved recipes; `active_id` marks the recipe on display
pub trait BookmarksView: View {
    fn render(&mut self, bookmarks: &[Recipe], active_id: Option<&str>);

    fn update(&mut self, bookmarks: &[Recipe], active_id: Option<&str>) {
        self.render(bookmarks, active_id);
    }
}

/// The add-recipe form window
pub trait AddRecipeView: View {
    /// Show a success message, or the default one when `None`
    fn render_message(&mut self, message: Option<&str>);

    /// Show a fresh, empty form
    fn open_window(&mut self);

    fn close_window(&mut self);

    fn is_open(&self) -> bool;
}

/// Addressable location of the recipe on display
pub trait Navigator {
    fn push_location(&mut self, id: &str);
}

/// Every view the controller renders into
pub struct Views {
    pub recipe: Box<dyn RecipeView + Send>,
    pub results: Box<dyn ResultsView + Send>,
    pub pagination: Box<dyn PaginationView + Send>,
    pub bookmarks: Box<dyn BookmarksView + Send>,
    pub add_recipe: Box<dyn AddRecipeView + Send>,
    pub navigator: Box<dyn Navigator + Send>,
}

impl Views {
    /// Plain-text views writing to stdout
    pub fn terminal() -> Self {
        Views {
            recipe: Box::new(TerminalRecipeView),
            results: Box::new(TerminalResultsView),
            pagination: Box::new(TerminalPaginationView),
            bookmarks: Box::new(TerminalBookmarksView),
            add_recipe: Box::new(TerminalAddRecipeView::default()),
            navigator: Box::new(TerminalNavigator::default()),
        }
    }
}
