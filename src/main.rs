//! sheetlens - read spreadsheet content out of a page's bootstrap snapshot.
//!
//! Runs the spreadsheet tools against saved pages.

mod cli;
mod page;
mod registry;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sheetlens_config::{Config, ConfigLoader, ConfigValidator, LogFormat, LoggingConfig};
use sheetlens_protocols::extension::{Extension, ExtensionContext};
use sheetlens_protocols::tool::ToolContext;
use sheetlens_snapshot::{parse_a1, to_a1};
use sheetlens_tools_sheets::SheetToolsExtension;

use crate::cli::{A1Action, Cli, Commands, WindowArgs};
use crate::page::FilePage;
use crate::registry::ToolRegistry;

/// Initialize tracing on stderr; `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
    }
}

/// Expand a leading `~` in a user-supplied path.
fn expand(path: &Path) -> PathBuf {
    PathBuf::from(ConfigLoader::expand_path(&path.to_string_lossy()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path.map(expand) {
        Some(path) => ConfigLoader::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => match ConfigLoader::default_path() {
            Some(path) => ConfigLoader::load_or_default(&path)
                .with_context(|| format!("failed to load config {}", path.display())),
            None => Ok(Config::default()),
        },
    }
}

/// Register the sheet tools over saved pages, configured from `config`.
async fn build_registry(
    config: &Config,
    snapshot: Option<PathBuf>,
) -> anyhow::Result<Arc<ToolRegistry>> {
    let registry = Arc::new(ToolRegistry::new());
    let ext_config = serde_json::json!({
        "variable": config.snapshot.variable,
        "companion_marker": config.snapshot.companion_marker,
        "body_child_index": config.snapshot.body_child_index,
        "default_max_rows": config.reader.default_max_rows,
    });

    let mut extension = SheetToolsExtension::new(Arc::new(FilePage::new(snapshot)));
    extension
        .initialize(ExtensionContext::new(ext_config, registry.clone()))
        .await
        .context("failed to initialize spreadsheet tools")?;

    Ok(registry)
}

async fn run_read(
    config: &Config,
    html: &Path,
    snapshot: Option<PathBuf>,
    window: &WindowArgs,
    json: bool,
) -> anyhow::Result<()> {
    let registry = build_registry(config, snapshot.as_deref().map(expand)).await?;

    let page_id = expand(html).display().to_string();
    let result = registry
        .execute(
            "sheets_get_content",
            window.to_params(&page_id),
            ToolContext::new("cli"),
        )
        .await?;

    if !result.success {
        bail!(result.error.unwrap_or_else(|| "unknown error".to_string()));
    }

    match (json, result.structured_output) {
        (true, Some(output)) => println!("{}", serde_json::to_string_pretty(&output)?),
        _ => println!("{}", result.content),
    }
    Ok(())
}

async fn run_tools(config: &Config) -> anyhow::Result<()> {
    let registry = build_registry(config, None).await?;
    println!("{}", serde_json::to_string_pretty(&registry.list())?);
    Ok(())
}

fn run_a1(action: A1Action) -> anyhow::Result<()> {
    match action {
        A1Action::From { row, col } => {
            let a1 = to_a1(row, col).context("row and column must be at least 1")?;
            println!("{}", a1);
        }
        A1Action::Parse { reference } => {
            let (row, col) = parse_a1(&reference)
                .with_context(|| format!("'{}' is not an A1 reference", reference))?;
            println!("row {} col {}", row, col);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    let warnings = ConfigValidator::validate(&config)
        .into_result()
        .context("invalid configuration")?;
    for warning in warnings {
        warn!("{}: {}", warning.path, warning.message);
    }

    match cli.command {
        Commands::Read {
            html,
            snapshot,
            window,
            json,
        } => {
            info!(page = %html.display(), "Reading saved page");
            run_read(&config, &html, snapshot, &window, json).await
        }
        Commands::Tools => run_tools(&config).await,
        Commands::A1 { action } => run_a1(action),
    }
}
