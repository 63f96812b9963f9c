use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod config;
mod render;
mod routes;

use commands::{
    handle_check, handle_open, handle_saved_command, handle_suggest, App, Outcome, SaveMode,
    SavedCommands,
};
use config::{expand_home, load_config};

#[derive(Parser)]
#[command(name = "truthtracer", version, about = "Check claims against the Truth Tracer analysis service")]
struct Cli {
    #[arg(
        long,
        default_value = "~/.truthtracer",
        help = "Config root directory (contains config.yaml, data/ and logs/)"
    )]
    config_root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Analyze a claim")]
    Check {
        #[arg(help = "Claim to verify")]
        claim: String,
        #[arg(long, help = "Save the result without asking")]
        save: bool,
    },
    #[command(subcommand, about = "Manage saved results")]
    Saved(SavedCommands),
    #[command(about = "Show example claims")]
    Suggest,
    #[command(about = "Open a route such as /facts/result?query=... or /facts/<id>")]
    Open {
        #[arg(help = "Route path")]
        route: String,
    },
    #[command(about = "Validate config file")]
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    cli.config_root = expand_home(&cli.config_root);

    let log_dir = cli.config_root.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "truthtracer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let outcome = run(&cli.config_root, command).await?;
    let code = outcome.exit_code();
    if code != 0 {
        drop(guard);
        std::process::exit(code);
    }
    Ok(())
}

async fn run(config_root: &std::path::Path, command: Commands) -> Result<Outcome> {
    let config = load_config(config_root)?;

    if let Commands::Validate = command {
        let timeout = match config.api.timeout_secs {
            Some(secs) => format!("{secs}s"),
            None => "none".to_string(),
        };
        println!(
            "Config valid. api: {} (timeout {}), data: {}",
            config.api.base_url,
            timeout,
            config.data_dir(config_root).display()
        );
        return Ok(Outcome::Done);
    }

    let app = App::from_config(&config, config_root);
    match command {
        Commands::Check { claim, save } => {
            let mode = if save {
                SaveMode::Always
            } else if app.interactive {
                SaveMode::Ask
            } else {
                SaveMode::Never
            };
            handle_check(&app, &claim, mode).await
        }
        Commands::Saved(cmd) => handle_saved_command(&app, cmd),
        Commands::Suggest => Ok(handle_suggest(&app)),
        Commands::Open { route } => handle_open(&app, &route).await,
        Commands::Validate => Ok(Outcome::Done),
    }
}
