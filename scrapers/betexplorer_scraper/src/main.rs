use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use betexplorer_scraper::config::{self, RunConfig, ScrapeMode, ScraperSettings};
use betexplorer_scraper::filter;
use betexplorer_scraper::format;
use betexplorer_scraper::scrape::{self, Scraper};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON run configuration
    #[arg(short, long, default_value = "parameters.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape tournament matches into per-sport CSV files
    Scrape,
    /// Normalize scraped rows into the canonical match table
    Format,
    /// Drop tournaments that fail the data-quality predicates
    Filter,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = RunConfig::load(&cli.config)?;

    match cli.command {
        Commands::Scrape => run_scrape(&config),
        Commands::Format => {
            format::format_all_sports(&config.sports, &config.scrape_dir(), &config.format_dir())
        }
        Commands::Filter => {
            let predicates = config.filter.predicates();
            filter::filter_all_sports(
                &config.sports,
                &config.format_dir(),
                &config.filter_dir(),
                config.filter.policy(),
                &predicates,
            )
        }
    }
}

fn run_scrape(config: &RunConfig) -> Result<()> {
    let scraper = Scraper::new(ScraperSettings::from_env())?;

    let mut paths = match config.url_paths.mode {
        ScrapeMode::Homepage => scraper.homepage_paths(&config.sports)?,
        ScrapeMode::List => config.url_paths.list.clone(),
        ScrapeMode::File => {
            let file = config
                .url_paths
                .file
                .as_deref()
                .context("scraping mode 'file' requires a 'file' entry")?;
            config::read_paths_file(file)?
        }
    };
    paths.sort();
    paths.dedup();

    // paths taken from configuration can have gone stale on the site
    if config.url_paths.mode != ScrapeMode::Homepage {
        scraper.validate_paths(&paths)?;
    }

    let sport_to_matches =
        scraper.scrape_tournaments(&paths, &config.seasons.first, &config.seasons.last);
    scrape::save_scraped_matches(&sport_to_matches, &config.scrape_dir())?;

    Ok(())
}
