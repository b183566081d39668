use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use cart_core::{CartWidget, Page};
use clap::{Parser, Subcommand};
use storage::Storage;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod session;

use commands::{report, run_action, Action};
use config::{load_catalog, load_settings, normalize_database_url};

#[derive(Parser, Debug)]
#[command(name = "cart", about = "Shopping cart kept in local storage")]
struct Cli {
    /// SQLite url or path of the local storage database.
    #[arg(long)]
    database_url: Option<String>,
    /// JSON list of product cards for `buy` and `catalog`.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run commands interactively; the coupon lasts for the whole session.
    Session,
    #[command(flatten)]
    Action(Action),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }
    if let Some(catalog) = cli.catalog {
        settings.catalog_path = Some(catalog);
    }

    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url)
        .await
        .with_context(|| format!("failed to open cart storage at '{database_url}'"))?;
    info!(%database_url, "cart storage ready");

    let catalog = match &settings.catalog_path {
        Some(path) => load_catalog(path)?,
        None => Vec::new(),
    };

    let mut widget = CartWidget::mount(storage, Page::cart_page())
        .await?
        .with_popup_duration(Duration::from_millis(settings.popup_ms));

    let mut stdout = io::stdout();
    match cli.command {
        Command::Session => {
            let stdin = BufReader::new(tokio::io::stdin());
            session::run_session(&mut widget, &catalog, stdin, &mut stdout).await?;
        }
        Command::Action(action) => {
            let outcome = run_action(&mut widget, &catalog, action).await?;
            report(&mut stdout, &mut widget, &outcome)?;
        }
    }

    Ok(())
}
