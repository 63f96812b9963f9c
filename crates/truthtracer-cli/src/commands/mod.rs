pub mod check;
pub mod saved;

use std::path::Path;

use console::{style, Term};
use truthtracer_client::{AnalysisClient, HttpAnalysisClient};
use truthtracer_store::{FileStorage, LocalResultStore, ResultStore};

use crate::config::TruthTracerConfig;
use crate::render::{print_block, print_error, render_history, ARROW};
use crate::routes::Route;

pub use check::{handle_check, SaveMode};
pub use saved::{handle_saved_command, SavedCommands};

pub const SUGGESTED_CLAIMS: [&str; 2] = [
    "The earth is flat.",
    "Coffee is the second most traded commodity after oil.",
];

pub const START_NEW_SEARCH_HINT: &str = "Start a new search: truthtracer check \"<claim>\"";

/// How a command ended, as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
    MissingInput,
    NotFound,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Done => 0,
            Self::Failed => 1,
            Self::MissingInput => 2,
            Self::NotFound => 3,
        }
    }
}

/// Everything a command needs: where results live, who analyses claims, where output goes.
pub struct App {
    pub store: Box<dyn ResultStore>,
    pub client: Box<dyn AnalysisClient>,
    pub term: Term,
    /// Prompts are only shown when stdout is a terminal.
    pub interactive: bool,
}

impl App {
    pub fn new(store: Box<dyn ResultStore>, client: Box<dyn AnalysisClient>) -> Self {
        let term = Term::stdout();
        let interactive = term.is_term();
        Self {
            store,
            client,
            term,
            interactive,
        }
    }

    pub fn from_config(config: &TruthTracerConfig, root: &Path) -> Self {
        let data_dir = config.data_dir(root);
        tracing::debug!(data_dir = %data_dir.display(), api = %config.api.base_url, "opening app");
        let client = match config.api.timeout() {
            Some(timeout) => HttpAnalysisClient::with_timeout(config.api.base_url.clone(), timeout),
            None => HttpAnalysisClient::new(config.api.base_url.clone()),
        };
        Self::new(
            Box::new(LocalResultStore::new(FileStorage::new(data_dir))),
            Box::new(client),
        )
    }
}

pub fn handle_suggest(app: &App) -> Outcome {
    print_block(
        &app.term,
        &format!("{}", style("Try these examples").bold().cyan()),
    );
    for claim in SUGGESTED_CLAIMS {
        print_block(
            &app.term,
            &format!("{}truthtracer check \"{claim}\"", ARROW),
        );
    }
    Outcome::Done
}

/// Dispatch a route the way the matching view would be opened.
pub async fn handle_open(app: &App, raw: &str) -> anyhow::Result<Outcome> {
    let route = match Route::parse(raw) {
        Ok(route) => route,
        Err(e) => {
            tracing::debug!(error = %e, "route did not parse");
            print_error(&app.term, &format!("Page not found: {raw}"), START_NEW_SEARCH_HINT);
            return Ok(Outcome::NotFound);
        }
    };

    match route {
        Route::Home => {
            handle_suggest(app);
            print_block(&app.term, "");
            print_block(&app.term, &render_history(&app.store.list()));
            Ok(Outcome::Done)
        }
        Route::Result { query } => {
            let mode = if app.interactive {
                SaveMode::Ask
            } else {
                SaveMode::Never
            };
            handle_check(app, &query, mode).await
        }
        Route::Saved { id } => Ok(saved::show(app, &id)),
    }
}
