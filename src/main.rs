mod competitors;
mod config;
mod db;
mod error;
mod fetch;
mod handlers;
mod models;
mod parser;
mod pipeline;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::InsightsError;
use crate::pipeline::Insights;

#[derive(Parser)]
#[command(name = "brand_insights", about = "Storefront brand insights scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen port (default: $PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Scrape one or more storefronts and print the results as JSON
    Fetch {
        /// Storefront URLs (scheme optional)
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Print a stored brand as JSON
    Show {
        id: i64,
    },
    /// Stored brands, newest first
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show store statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if !dotenv_loaded {
        info!("No .env file found, using process environment");
    }

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = Config::load();

    let result = match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let insights = Insights::new(&config, db::connect(&config.db_path)?)?;
            if config.serpapi_api_key.is_none() {
                warn!("SERPAPI_API_KEY is not set; competitor lookups will fail");
            }
            serve(Arc::new(insights), port).await
        }
        Commands::Fetch { urls } => {
            let insights = Insights::new(&config, db::connect(&config.db_path)?)?;
            fetch_all(&insights, &urls).await
        }
        Commands::Show { id } => {
            let conn = db::connect(&config.db_path)?;
            db::init_schema(&conn)?;
            match db::fetch_brand(&conn, id)? {
                Some(brand) => println!("{}", serde_json::to_string_pretty(&brand)?),
                None => println!("No brand with id {}.", id),
            }
            Ok(())
        }
        Commands::List { limit } => {
            let conn = db::connect(&config.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, limit)?;
            if rows.is_empty() {
                println!("No brands stored. Run 'fetch' first.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<32} | {:>8} | {:>6} | {:>11} | {:<19}",
                "ID", "Brand", "Products", "Emails", "Competitors", "Fetched"
            );
            println!("{}", "-".repeat(96));
            for r in &rows {
                let competitors = r
                    .competitor_count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:>4} | {:<32} | {:>8} | {:>6} | {:>11} | {:<19}",
                    r.id,
                    truncate(&r.name, 32),
                    r.product_count,
                    r.email_count,
                    competitors,
                    r.created_at
                );
            }
            println!("\n{} brands | details: show <id>", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&config.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Brands:           {}", s.total);
            println!("With products:    {}", s.with_products);
            println!("With competitors: {}", s.with_competitors);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn serve(insights: Arc<Insights>, port: u16) -> anyhow::Result<()> {
    let app = handlers::router(insights);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Run the pipeline for each URL in turn. Failures are reported and skipped.
async fn fetch_all(insights: &Insights, urls: &[String]) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut results = Vec::with_capacity(urls.len());
    for url in urls {
        pb.set_message(url.clone());
        results.push((url, insights.fetch_brand_insights(url).await));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut ok = 0usize;
    for (url, result) in results {
        match result {
            Ok(brand) => {
                ok += 1;
                println!("{}", serde_json::to_string_pretty(&brand)?);
            }
            Err(InsightsError::NotAStorefront) => {
                eprintln!("{}: not a storefront", url);
            }
            Err(e) => eprintln!("{}: {}", url, e),
        }
    }
    println!("Fetched {} of {} storefronts.", ok, urls.len());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
