use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Sector heatmap in the terminal", long_about = None)]
pub struct Args {
    /// Base URL of the heatmap server.
    #[arg(long, env = "HM_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Local cache file used when the server is unreachable.
    #[arg(long, env = "HM_CACHE_PATH", default_value = ".heatmap-cache.json")]
    pub cache: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, env = "HM_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Heatmap grouped by sector (default).
    Board,
    /// Buy/sell/hold, momentum and breakout signals.
    Copilot,
    /// US market session.
    Status,
    /// Search US common stocks.
    Search { query: String },
    /// Delete the local cache file.
    ClearCache,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_board() {
        let args = Args::parse_from(["heatmap", "--server", "http://example.test"]);
        assert_eq!(args.server, "http://example.test");
        assert!(args.command.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_search_with_json() {
        let args = Args::parse_from(["heatmap", "search", "apple", "--json"]);
        assert_eq!(
            args.command,
            Some(Command::Search {
                query: "apple".to_string()
            })
        );
        assert!(args.json);
    }
}
