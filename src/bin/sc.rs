use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use streamcat::credits::run_credits;
use streamcat::pipeline::run_titles;
use streamcat::providers::run_provider_mapping;
use streamcat::util::env as env_util;

#[derive(Parser, Debug)]
#[command(name = "sc", version, about = "StreamCat catalog ETL CLI")]
struct Cli {
    /// Directory holding the provider exports (defaults to DATA_DIR, then ".")
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Clean and reconcile the titles exports into final_titles.csv
    Titles,
    /// Build the consolidated person tables from the credits exports
    Credits,
    /// Build the provider-title mapping table only
    Providers,
    /// Full refresh: titles, then providers, then credits
    All,
}

fn main() -> Result<()> {
    env_util::init_env();
    streamcat::tracing::init_tracing("info")?;

    let cli = Cli::parse();
    let dir = cli.dir.unwrap_or_else(env_util::data_dir);

    match cli.command {
        Commands::Titles => titles(&dir),
        Commands::Credits => credits(&dir),
        Commands::Providers => providers(&dir),
        Commands::All => {
            titles(&dir)?;
            providers(&dir)?;
            credits(&dir)
        }
    }
}

fn titles(dir: &Path) -> Result<()> {
    let summary = run_titles(dir).with_context(|| format!("titles run in {}", dir.display()))?;
    info!(summary = %serde_json::to_string(&summary)?, "titles run complete");
    Ok(())
}

fn providers(dir: &Path) -> Result<()> {
    let summary = run_provider_mapping(dir)
        .with_context(|| format!("provider mapping in {}", dir.display()))?;
    info!(summary = %serde_json::to_string(&summary)?, "provider mapping complete");
    Ok(())
}

fn credits(dir: &Path) -> Result<()> {
    let summary = run_credits(dir).with_context(|| format!("credits run in {}", dir.display()))?;
    info!(summary = %serde_json::to_string(&summary)?, "credits run complete");
    Ok(())
}
