use anyhow::{anyhow, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use truthtracer_client::{run_analysis, AnalysisRequest};
use truthtracer_schema::FactResult;

use super::{App, Outcome, START_NEW_SEARCH_HINT};
use crate::render::{print_block, print_done, print_error, render_result, LOUPE};

const TRY_AGAIN_HINT: &str = "Check that the analysis service is reachable, then run the same command again.";

/// What to do with a successful analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Always,
    Ask,
    Never,
}

pub async fn handle_check(app: &App, claim: &str, mode: SaveMode) -> Result<Outcome> {
    let claim = claim.trim();
    if claim.is_empty() {
        print_error(&app.term, "No query provided", START_NEW_SEARCH_HINT);
        return Ok(Outcome::MissingInput);
    }

    print_block(
        &app.term,
        &format!("{}{}", LOUPE, style("Analyzing claim...").dim()),
    );

    let mut request = AnalysisRequest::new();
    run_analysis(app.client.as_ref(), &mut request, claim).await?;

    match request.into_outcome() {
        Some(Ok(result)) => {
            print_block(&app.term, "");
            print_block(&app.term, &render_result(&result));
            print_block(&app.term, "");
            offer_save(app, result, mode)?;
            Ok(Outcome::Done)
        }
        Some(Err(e)) if e.is_missing_input() => {
            print_error(&app.term, e.user_message(), START_NEW_SEARCH_HINT);
            Ok(Outcome::MissingInput)
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "analysis failed");
            print_error(&app.term, e.user_message(), TRY_AGAIN_HINT);
            Ok(Outcome::Failed)
        }
        None => Err(anyhow!("analysis request did not finish")),
    }
}

fn offer_save(app: &App, result: FactResult, mode: SaveMode) -> Result<()> {
    let save = match mode {
        SaveMode::Always => true,
        SaveMode::Never => false,
        SaveMode::Ask => Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Save this result?")
            .default(false)
            .interact()?,
    };

    if !save {
        if mode == SaveMode::Never {
            print_block(
                &app.term,
                &format!("{}", style("Run with --save to keep this result.").dim()),
            );
        }
        return Ok(());
    }

    let stored = app.store.save_new(result);
    let id = stored.id.as_deref().unwrap_or_default();
    // The store drops writes it cannot persist; only confirm what reads back.
    if app.store.find_by_id(id).is_some() {
        print_done(&app.term, &format!("Saved as {id}"));
    } else {
        print_block(
            &app.term,
            &format!("{}", style("Local history is unavailable; result not kept.").dim()),
        );
    }
    Ok(())
}
