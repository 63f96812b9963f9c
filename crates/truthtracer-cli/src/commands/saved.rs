use anyhow::Result;
use clap::Subcommand;
use dialoguer::{theme::ColorfulTheme, Confirm};

use super::{App, Outcome};
use crate::render::{print_block, print_done, print_error, render_history, render_result};

const LIST_HINT: &str = "Run `truthtracer saved list` to see saved results.";

#[derive(Subcommand)]
pub enum SavedCommands {
    #[command(about = "List saved results, newest first")]
    List,
    #[command(about = "Show one saved result")]
    Show {
        #[arg(help = "Saved result id")]
        id: String,
    },
    #[command(about = "Remove one saved result")]
    Remove {
        #[arg(help = "Saved result id")]
        id: String,
    },
    #[command(about = "Remove every saved result")]
    Clear {
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub fn handle_saved_command(app: &App, cmd: SavedCommands) -> Result<Outcome> {
    match cmd {
        SavedCommands::List => {
            print_block(&app.term, &render_history(&app.store.list()));
            Ok(Outcome::Done)
        }
        SavedCommands::Show { id } => Ok(show(app, &id)),
        SavedCommands::Remove { id } => Ok(remove(app, &id)),
        SavedCommands::Clear { yes } => clear(app, yes),
    }
}

pub(crate) fn show(app: &App, id: &str) -> Outcome {
    let id = id.trim();
    if id.is_empty() {
        print_error(&app.term, "No id provided", LIST_HINT);
        return Outcome::MissingInput;
    }
    match app.store.find_by_id(id) {
        Some(result) => {
            print_block(&app.term, &render_result(&result));
            Outcome::Done
        }
        None => {
            print_error(&app.term, &format!("Saved result not found: {id}"), LIST_HINT);
            Outcome::NotFound
        }
    }
}

fn remove(app: &App, id: &str) -> Outcome {
    let id = id.trim();
    if id.is_empty() {
        print_error(&app.term, "No id provided", LIST_HINT);
        return Outcome::MissingInput;
    }
    if app.store.find_by_id(id).is_none() {
        print_error(&app.term, &format!("Saved result not found: {id}"), LIST_HINT);
        return Outcome::NotFound;
    }
    app.store.remove_by_id(id);
    print_done(&app.term, &format!("Removed {id}"));
    Outcome::Done
}

fn clear(app: &App, yes: bool) -> Result<Outcome> {
    if app.store.is_empty() {
        print_block(&app.term, "No history yet");
        return Ok(Outcome::Done);
    }
    if !yes
        && app.interactive
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Remove all saved results?")
            .default(false)
            .interact()?
    {
        return Ok(Outcome::Done);
    }
    app.store.clear();
    print_done(&app.term, "History cleared");
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_app;
    use truthtracer_client::StubAnalysisClient;
    use truthtracer_schema::FactResult;

    fn seeded_app() -> App {
        let app = test_app(StubAnalysisClient::new());
        for (id, claim) in [("f1", "The sky is blue."), ("f2", "The earth is flat.")] {
            let mut result = FactResult::new(claim);
            result.id = Some(id.into());
            app.store.save(result);
        }
        app
    }

    #[test]
    fn list_succeeds_on_empty_and_seeded_store() {
        let empty = test_app(StubAnalysisClient::new());
        assert_eq!(
            handle_saved_command(&empty, SavedCommands::List).unwrap(),
            Outcome::Done
        );
        assert_eq!(
            handle_saved_command(&seeded_app(), SavedCommands::List).unwrap(),
            Outcome::Done
        );
    }

    #[test]
    fn show_distinguishes_not_found_from_missing_input() {
        let app = seeded_app();
        assert_eq!(show(&app, "f1"), Outcome::Done);
        assert_eq!(show(&app, "nope"), Outcome::NotFound);
        assert_eq!(show(&app, " "), Outcome::MissingInput);
    }

    #[test]
    fn remove_deletes_only_the_named_entry() {
        let app = seeded_app();
        let outcome =
            handle_saved_command(&app, SavedCommands::Remove { id: "f1".into() }).unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert!(app.store.find_by_id("f1").is_none());
        assert!(app.store.find_by_id("f2").is_some());

        let outcome =
            handle_saved_command(&app, SavedCommands::Remove { id: "f1".into() }).unwrap();
        assert_eq!(outcome, Outcome::NotFound);
    }

    #[test]
    fn clear_with_yes_empties_history() {
        let app = seeded_app();
        let outcome = handle_saved_command(&app, SavedCommands::Clear { yes: true }).unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert!(app.store.is_empty());
    }
}
