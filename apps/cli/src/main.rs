mod args;
mod render;

use std::time::Duration;

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use heatmap_client::{DashboardClient, LocalCache, RequestHelper};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let cache = LocalCache::new(args.cache.clone());
    let http = RequestHelper::new(&args.server, Duration::from_secs(args.timeout_secs.max(1)))
        .context("Invalid --server")?;
    let client = DashboardClient::new(http, cache.clone());

    match args.command.unwrap_or(Command::Board) {
        Command::Board => {
            let json = args.json;
            let view = client
                .load(|cached| {
                    if !json {
                        print!("{}", render::board(cached));
                        println!("\nRefreshing...\n");
                    }
                })
                .await?;
            if json {
                print_json(&view)?;
            } else {
                print!("{}", render::board(&view));
            }
        }
        Command::Copilot => {
            let view = match client.refresh().await {
                Ok(view) => view,
                Err(e) => client.cached().await.ok_or(e)?,
            };
            if args.json {
                print_json(&view.advice)?;
            } else {
                if view.stale {
                    println!("(based on cached data)");
                }
                print!("{}", render::copilot(&view.advice));
            }
        }
        Command::Status => {
            let status = client.market_status().await?;
            if args.json {
                print_json(&status)?;
            } else {
                println!("{}", render::status_line(&status));
            }
        }
        Command::Search { query } => {
            let results = client.search(&query).await?;
            if args.json {
                print_json(&results)?;
            } else {
                print!("{}", render::search(&results));
            }
        }
        Command::ClearCache => {
            cache.clear()?;
            println!("Removed {}", cache.path().display());
        }
    }
    Ok(())
}
