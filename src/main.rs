//! # campus-scout CLI
//!
//! Command-line interface to the crawler and scrapers:
//!
//! - `crawl`: depth-bounded site crawl into the page store
//! - `disciplines`: one-shot discipline keyword table scrape
//! - `catalog`: one-shot course catalog scrape
//! - `list`: stored page inspection
//! - `export`: the concatenated corpus for a prompt assembler

mod telemetry;

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::Context;
use campus_scout::catalog::{CatalogConfig, save_catalog, scrape_catalog};
use campus_scout::crawler::{Crawler, CrawlerConfig, Fetcher};
use campus_scout::keywords::scrape_disciplines;
use campus_scout::store::PageStore;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about = "Course-site crawler feeding an LLM course advisor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a site and store extracted page text
    Crawl(CrawlArgs),

    /// Scrape a discipline listing into a keyword table
    Disciplines(DisciplinesArgs),

    /// Scrape a degree listing into a structured course catalog
    Catalog(CatalogArgs),

    /// List stored pages
    List(ListArgs),

    /// Export the stored corpus as plain-text context
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URL to start from
    #[arg(required = true)]
    seed_url: String,

    /// Maximum link depth to follow
    #[arg(short, long, default_value = "2")]
    max_depth: u32,

    /// Pause in milliseconds after each fetched page
    #[arg(long, default_value = "1000")]
    delay: u64,

    /// Fetch timeout in seconds
    #[arg(short, long, default_value = "10")]
    timeout: u64,

    /// Host suffix counting as in-domain (defaults to the seed's host)
    #[arg(long)]
    domain: Option<String>,

    /// Database path
    #[arg(long, default_value = "pages.db")]
    database: PathBuf,
}

#[derive(Args, Debug)]
struct DisciplinesArgs {
    /// Listing page URL
    #[arg(required = true)]
    listing_url: String,

    /// CSS selector for discipline anchors
    #[arg(short, long, default_value = "a")]
    selector: String,

    /// Output file for the keyword mapping
    #[arg(short, long, default_value = "disciplines.json")]
    output: PathBuf,

    /// Fetch timeout in seconds
    #[arg(short, long, default_value = "10")]
    timeout: u64,
}

#[derive(Args, Debug)]
struct CatalogArgs {
    /// Degree listing page URL
    #[arg(required = true)]
    listing_url: String,

    /// Substring a program link must contain
    #[arg(long, default_value = "bachelor-degrees")]
    program_pattern: String,

    /// Comma-separated substrings a plan link must all contain
    #[arg(long, default_value = "bp,auscy")]
    plan_patterns: String,

    /// Output file for the catalog
    #[arg(short, long, default_value = "catalog.json")]
    output: PathBuf,

    /// Fetch timeout in seconds
    #[arg(short, long, default_value = "10")]
    timeout: u64,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Database path
    #[arg(long, default_value = "pages.db")]
    database: PathBuf,

    /// Show page sizes
    #[arg(short, long)]
    details: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Database path
    #[arg(long, default_value = "pages.db")]
    database: PathBuf,

    /// Truncate the context to this many characters
    #[arg(short, long)]
    max_chars: Option<usize>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl(args) => crawl_command(args).await?,
        Commands::Disciplines(args) => disciplines_command(args).await?,
        Commands::Catalog(args) => catalog_command(args).await?,
        Commands::List(args) => list_command(args).await?,
        Commands::Export(args) => export_command(args).await?,
    }

    Ok(())
}

async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    println!("Crawling {}...", args.seed_url);

    let store = PageStore::new_from_path(&args.database.to_string_lossy()).await?;

    let mut builder = CrawlerConfig::builder()
        .max_depth(args.max_depth)
        .delay_ms(args.delay)
        .timeout_secs(args.timeout);
    if let Some(domain) = args.domain {
        builder = builder.domain_suffix(domain);
    }
    let crawler = Crawler::new(builder.build(), store)?;

    // Ctrl-C finishes the in-flight page and stops before the next fetch.
    let stop = crawler.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing current page");
            stop.store(true, Ordering::Relaxed);
        }
    });

    let report = crawler.run(&args.seed_url).await?;

    println!(
        "Visited {} URLs: {} fetched, {} stored, {} failed",
        report.urls_visited, report.pages_fetched, report.pages_stored, report.pages_failed
    );

    Ok(())
}

async fn disciplines_command(args: DisciplinesArgs) -> anyhow::Result<()> {
    let config = CrawlerConfig::builder().timeout_secs(args.timeout).build();
    let fetcher = Fetcher::new(config.timeout(), &config.user_agent)?;

    let table = scrape_disciplines(&fetcher, &args.listing_url, &args.selector).await?;
    table.save(&args.output).await?;

    println!(
        "Saved {} disciplines to {}",
        table.len(),
        args.output.display()
    );

    Ok(())
}

async fn catalog_command(args: CatalogArgs) -> anyhow::Result<()> {
    let config = CrawlerConfig::builder().timeout_secs(args.timeout).build();
    let fetcher = Fetcher::new(config.timeout(), &config.user_agent)?;

    let catalog_config = CatalogConfig {
        program_pattern: args.program_pattern,
        plan_patterns: args
            .plan_patterns
            .split(',')
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .map(String::from)
            .collect(),
    };

    let programs = scrape_catalog(&fetcher, &args.listing_url, &catalog_config).await?;
    save_catalog(&programs, &args.output).await?;

    println!(
        "Saved {} program plans to {}",
        programs.len(),
        args.output.display()
    );

    Ok(())
}

async fn list_command(args: ListArgs) -> anyhow::Result<()> {
    let store = PageStore::new_from_path(&args.database.to_string_lossy()).await?;
    let pages = store.scan_pages().await?;

    println!("Stored pages: {}", pages.len());
    for page in pages {
        if args.details {
            println!("{} ({} chars)", page.url, page.content.chars().count());
        } else {
            println!("{}", page.url);
        }
    }

    Ok(())
}

async fn export_command(args: ExportArgs) -> anyhow::Result<()> {
    let store = PageStore::new_from_path(&args.database.to_string_lossy()).await?;
    let context = store.context_text(args.max_chars).await?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, &context)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Wrote {} chars to {}",
                context.chars().count(),
                path.display()
            );
        }
        None => println!("{}", context),
    }

    Ok(())
}
