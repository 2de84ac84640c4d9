use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod commands;
mod output;

use backend::create_backend;
use cli::{Cli, Commands};
use output::OutputFormat;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("folio=info".parse()?))
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_flag(cli.json);

    let result = run(&cli, format).await;
    if let Err(e) = &result {
        if let Some(hint) = hint(e.as_ref()) {
            eprintln!("{hint}");
        }
    }
    result
}

async fn run(cli: &Cli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::About { command } => {
            let stores = create_backend(&cli.backend_config).await?;
            commands::about::run(&stores, command, format).await
        }
        Commands::Projects { command } => {
            let stores = create_backend(&cli.backend_config).await?;
            commands::projects::run(&stores, command, format).await
        }
        Commands::Upload(args) => commands::upload::run(args, format).await,
        Commands::Info => {
            let stores = create_backend(&cli.backend_config).await?;
            commands::info::run(&stores, &cli.backend_config, format).await
        }
    }
}

/// An actionable follow-up for errors the user can do something about.
fn hint(err: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    let err = err.downcast_ref::<folio::Error>()?;
    if err.is_partial_order() {
        Some(
            "Some positions were saved and others were not. \
             Run `folio projects list` to see the stored order before moving again.",
        )
    } else if err.is_conflict() {
        Some("That slug is already used by another project. Choose a different slug.")
    } else if err.is_persistence_error() {
        Some("The store rejected the write. The command can be retried.")
    } else {
        None
    }
}
