use crate::controller::Event;

/// A parsed line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Open(String),
    Page(usize),
    NextPage,
    PrevPage,
    Servings(u32),
    Bookmark,
    Bookmarks,
    New,
    /// Path to a JSON file holding the add-recipe form
    Upload(String),
    Close,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  search <query>     search recipes
  open <id>          show a recipe
  page <n>           jump to a results page
  next | prev        move between results pages
  servings <n>       rescale the current recipe
  bookmark           bookmark / un-bookmark the current recipe
  bookmarks          list bookmarks
  new                open the add-recipe form
  upload <file>      upload a recipe form (JSON)
  close              close the add-recipe form
  help               show this help
  quit               exit";

impl Command {
    /// Parse a line; `Err` carries a message for the user
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "search" | "s" => Command::Search(required(rest, "search <query>")?),
            "open" | "o" => Command::Open(required(rest, "open <id>")?),
            "page" | "p" => Command::Page(number(rest, "page <n>")?),
            "next" | "n" => Command::NextPage,
            "prev" => Command::PrevPage,
            "servings" => Command::Servings(number(rest, "servings <n>")?),
            "bookmark" | "b" => Command::Bookmark,
            "bookmarks" => Command::Bookmarks,
            "new" => Command::New,
            "upload" => Command::Upload(required(rest, "upload <file>")?),
            "close" => Command::Close,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };
        Ok(Some(command))
    }

    /// Commands that map directly onto a controller event
    pub fn into_event(self) -> Option<Event> {
        match self {
            Command::Search(query) => Some(Event::SearchSubmitted(query)),
            Command::Open(id) => Some(Event::RecipeSelected(id)),
            Command::Page(page) => Some(Event::PageRequested(page)),
            Command::NextPage => Some(Event::NextPageRequested),
            Command::PrevPage => Some(Event::PrevPageRequested),
            Command::Servings(servings) => Some(Event::ServingsChanged(servings)),
            Command::Bookmark => Some(Event::BookmarkToggled),
            Command::Bookmarks => Some(Event::BookmarksRequested),
            Command::New => Some(Event::AddRecipeOpened),
            Command::Close => Some(Event::AddRecipeDismissed),
            Command::Quit => Some(Event::Shutdown),
            Command::Upload(_) | Command::Help => None,
        }
    }
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest.to_string())
    }
}

fn number<T: std::str::FromStr>(rest: &str, usage: &str) -> Result<T, String> {
    rest.parse().map_err(|_| format!("Usage: {}", usage))
}
