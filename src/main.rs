use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use hn_hash_reader::hn_client::{Endpoints, HackerNewsClient};
use hn_hash_reader::mount::FileMount;
use hn_hash_reader::config::ConfigOverrides;
use hn_hash_reader::{App, Config};

#[derive(Parser)]
#[command(name = "hn_hash_reader")]
#[command(version, about = "Hacker News reader driven by URL fragments")]
struct Cli {
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to ~/.hn_reader/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// File receiving the rendered page. Its directory must exist.
    #[arg(long)]
    mount: Option<PathBuf>,

    #[arg(long)]
    feed_url: Option<String>,

    /// Item URL template, "@id" is replaced by the route id
    #[arg(long)]
    item_url: Option<String>,

    /// Open the mounted page in the browser after the first render
    #[arg(long)]
    open: bool,

    /// Fragments to visit after the initial load, e.g. "#/page/2" or "#/show/42".
    /// Without any, each stdin line is one navigation.
    fragments: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let container = FileMount::open(&config.output.mount).context("Cannot build the UI")?;
    let mount_path = container.path().to_path_buf();

    let client = Arc::new(
        HackerNewsClient::new(&config.api).context("Failed to create HTTP client")?,
    );
    let endpoints = Endpoints::from_config(&config.api);
    let mut app = App::new(Arc::new(container), client.clone(), client, endpoints);

    // Initial load
    navigate(&mut app, "").await;
    if cli.open {
        if let Err(e) = open::that(&mount_path) {
            tracing::warn!(path = %mount_path.display(), error = %e, "failed to open page");
        }
    }

    let mut events = fragment_events(cli.fragments);
    while let Some(fragment) = events.recv().await {
        navigate(&mut app, &fragment).await;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    config.apply_overrides(&ConfigOverrides {
        mount: cli.mount.clone(),
        feed_url: cli.feed_url.clone(),
        item_url: cli.item_url.clone(),
    });
    Ok(config)
}

/// Fragment changes in arrival order: the CLI list if given, stdin otherwise.
fn fragment_events(fragments: Vec<String>) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    if !fragments.is_empty() {
        for fragment in fragments {
            let _ = tx.send(fragment);
        }
        return rx;
    }

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line.trim().to_string()).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "failed reading navigation input");
                    break;
                }
            }
        }
    });
    rx
}

async fn navigate(app: &mut App, fragment: &str) {
    if let Err(e) = app.navigate(fragment).await {
        tracing::error!(fragment, error = %e, "render failed, keeping previous page");
    }
}
