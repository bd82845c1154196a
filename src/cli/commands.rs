use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "trade-ledger", about = "Personal trade journal service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value = "5001")]
        port: u16,
    },
    /// Add a trade
    Add {
        /// JSON with symbol, direction, entry_low, entry_high, take_profits, stop_loss
        json: String,
    },
    /// List trades, newest first
    Trades {
        #[arg(long, default_value = "1")]
        page: i64,
        #[arg(long, default_value = "4")]
        per_page: i64,
        /// Exact status to filter by (open, success, failed)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one trade
    Show {
        /// Trade ID
        id: i64,
    },
    /// Update status, pnl, notes or closed_at
    Update {
        /// Trade ID
        id: i64,
        /// JSON with any of status, pnl, notes, closed_at
        json: String,
    },
    /// Delete a trade
    Delete {
        /// Trade ID
        id: i64,
    },
    /// Show win/loss statistics
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["trade-ledger", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 5001);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_trades_filters() {
        let cli = Cli::try_parse_from([
            "trade-ledger",
            "trades",
            "--page",
            "2",
            "--per-page",
            "10",
            "--status",
            "failed",
        ])
        .unwrap();
        match cli.command {
            Commands::Trades {
                page,
                per_page,
                status,
            } => {
                assert_eq!(page, 2);
                assert_eq!(per_page, 10);
                assert_eq!(status.as_deref(), Some("failed"));
            }
            _ => panic!("expected trades"),
        }
    }
}
