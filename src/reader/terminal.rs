//! Line-oriented terminal front end for a [`BrowsingSession`].
//!
//! Shows one article at a time and reads single-line commands from stdin.
//! Load failures are rendered inline and never end the session.
//!
//! # Commands
//!
//! | Command | Action |
//! |---------|--------|
//! | `n`, `next`, empty line | next article |
//! | `p`, `prev` | previous article |
//! | `g <page>`, `page <page>` | jump to a page |
//! | `first` | jump to page 1 |
//! | `s <term>`, `search <term>` | search (empty term clears) |
//! | `c <name>`, `category <name>` | browse a category |
//! | `f`, `fav` | save or unsave the current article |
//! | `favs`, `favorites` | list saved articles |
//! | `h`, `help` | show commands |
//! | `q`, `quit` | exit |

use std::error::Error;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, BufReader, stdin};
use tracing::{debug, warn};

use crate::models::Favorite;
use crate::utils::{format_published_date, upcase};

use super::cache::ActiveQuery;
use super::favorites::{FavoritesStore, KeyValueStore};
use super::session::{BrowsingSession, CATEGORIES, Navigation};
use super::source::PageSource;

const HELP: &str = "\
n / next / <enter>   next article
p / prev             previous article
g <page>             jump to page
first                jump to page 1
s <term>             search (empty clears)
c <category>         browse a category
f                    save / unsave current article
favs                 list saved articles
h                    this help
q                    quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Page(u32),
    Search(String),
    Category(String),
    ToggleFavorite,
    Favorites,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, rest) = s
            .split_once(char::is_whitespace)
            .map(|(head, rest)| (head, rest.trim()))
            .unwrap_or((s, ""));

        match head.to_lowercase().as_str() {
            "" | "n" | "next" => Ok(Command::Next),
            "p" | "prev" => Ok(Command::Prev),
            "first" => Ok(Command::Page(1)),
            "g" | "page" => rest
                .parse::<u32>()
                .ok()
                .filter(|page| *page >= 1)
                .map(Command::Page)
                .ok_or_else(|| format!("Expected a page number, got {rest:?}")),
            "s" | "search" => Ok(Command::Search(rest.to_string())),
            "c" | "category" => {
                let category = rest.to_lowercase();
                if CATEGORIES.contains(&category.as_str()) {
                    Ok(Command::Category(category))
                } else {
                    Err(format!(
                        "Unknown category {rest:?}; choose one of {}",
                        CATEGORIES.join(", ")
                    ))
                }
            }
            "f" | "fav" => Ok(Command::ToggleFavorite),
            "favs" | "favorites" => Ok(Command::Favorites),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command {other:?}; type h for help")),
        }
    }
}

fn query_label(query: &ActiveQuery) -> String {
    match query {
        ActiveQuery::Search(term) => format!("Search \"{term}\""),
        ActiveQuery::Category(category) => upcase(category),
    }
}

/// Render the session's current view.
pub fn render<S: PageSource, K: KeyValueStore>(
    session: &BrowsingSession<S>,
    favorites: &FavoritesStore<K>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n== Philippines News · {} ==", query_label(&session.active_query()));

    if let Some(error) = session.error() {
        let _ = writeln!(out, "! {error}");
        return out;
    }

    let Some(article) = session.current_article() else {
        let _ = writeln!(out, "No articles found. Try a different search or category.");
        return out;
    };

    let _ = writeln!(out, "\n{}", article.title);
    if let Some(description) = &article.description {
        let _ = writeln!(out, "{description}");
    }
    let _ = writeln!(
        out,
        "{} • {}",
        article.source.name,
        format_published_date(&article.published_at)
    );
    let _ = writeln!(out, "{}", article.url);
    let saved = match favorites.is_favorited(&article.url) {
        Ok(true) => "★ Saved".to_string(),
        Ok(false) => "☆ Save (f)".to_string(),
        Err(e) => format!("! {e}"),
    };
    let _ = writeln!(out, "{saved}");

    let pages = session
        .pagination_pages()
        .into_iter()
        .map(|page| {
            if page == session.current_page() {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        out,
        "\n{} {pages} {}   Article {} of {}",
        if session.can_go_previous() { "‹" } else { " " },
        if session.can_go_next() { "›" } else { " " },
        session.article_number(),
        session.total_matches()
    );
    out
}

pub fn render_favorites(favorites: &[Favorite]) -> String {
    if favorites.is_empty() {
        return "No favorites yet. Save articles with f to view them here!\n".to_string();
    }

    let mut out = format!("\n♥ Favorites ({})\n", favorites.len());
    for (i, favorite) in favorites.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} ({})\n     {}",
            i + 1,
            favorite.article.title,
            favorite.article.source.name,
            favorite.url
        );
    }
    out
}

async fn navigate<S: PageSource>(
    session: &mut BrowsingSession<S>,
    command: Command,
) -> Option<Navigation> {
    let result = match command {
        Command::Next => session.next_article().await,
        Command::Prev => session.prev_article().await,
        Command::Page(page) => session.go_to_page(page).await,
        Command::Search(term) => session.set_search(term).await,
        Command::Category(category) => session.set_category(category).await,
        _ => return None,
    };

    // failures are already recorded on the session for rendering
    result.ok()
}

/// Drive the reader until `q` or end of input.
pub async fn run<S: PageSource, K: KeyValueStore>(
    session: &mut BrowsingSession<S>,
    favorites: &mut FavoritesStore<K>,
) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(stdin()).lines();

    if let Err(e) = session.start().await {
        warn!(error = %e, "Initial load failed");
    }
    write!(stdout, "{}", render(session, favorites))?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(stdout, "{message}")?;
                continue;
            }
        };
        debug!(?command, "Command");

        match command {
            Command::Quit => break,
            Command::Help => writeln!(stdout, "{HELP}")?,
            Command::Favorites => match favorites.list() {
                Ok(saved) => write!(stdout, "{}", render_favorites(&saved))?,
                Err(e) => writeln!(stdout, "! {e}")?,
            },
            Command::ToggleFavorite => {
                let Some(article) = session.current_article().cloned() else {
                    writeln!(stdout, "Nothing to save.")?;
                    continue;
                };
                match favorites.toggle(&article) {
                    Ok(true) => writeln!(stdout, "★ Saved \"{}\"", article.title)?,
                    Ok(false) => writeln!(stdout, "Removed \"{}\" from favorites", article.title)?,
                    Err(e) => writeln!(stdout, "! {e}")?,
                }
            }
            navigation => match navigate(session, navigation).await {
                Some(Navigation::AtBoundary) => writeln!(stdout, "No more articles that way.")?,
                Some(Navigation::Unchanged) => writeln!(stdout, "Already showing that.")?,
                _ => write!(stdout, "{}", render(session, favorites))?,
            },
        }
    }

    Ok(())
}
