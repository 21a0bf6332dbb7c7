//! Loads the demo sectors, tickers, lots and cached quotes into the database
//! configured by `HM_DB_PATH`. Safe to run repeatedly.

use heatmap_core::demo::DemoSeeder;
use heatmap_server::{config::Config, init_tracing, open_repositories};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    let repos = open_repositories(&config.db_path)?;

    let seeder = DemoSeeder::new(repos.sectors, repos.tickers, repos.lots, repos.quotes);
    let summary = seeder.seed().await?;

    tracing::info!(
        sectors = summary.sectors,
        tickers = summary.tickers,
        lots_created = summary.lots_created,
        lots_existing = summary.lots_existing,
        quotes = summary.quotes,
        "Demo data ready in {}",
        config.db_path
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
