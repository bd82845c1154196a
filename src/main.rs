use clap::Parser;
use std::sync::Arc;
use trade_ledger::cli::commands::{Cli, Commands};
use trade_ledger::config::Config;
use trade_ledger::domain::values::page::PageRequest;
use trade_ledger::infrastructure::http;
use trade_ledger::logging::init_logging;
use trade_ledger::TradeLedger;
use tracing::Level;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    init_logging(config.log_format, Level::INFO);

    let ledger = match TradeLedger::new(&config) {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("Error initializing trade store: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(ledger, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(ledger: TradeLedger, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Serve { host, port } => {
            http::serve(Arc::new(ledger), &host, port).await?;
        }
        Commands::Add { json } => {
            let payload: serde_json::Value = serde_json::from_str(&json)?;
            let trade = ledger.create(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::Trades {
            page,
            per_page,
            status,
        } => {
            let page = ledger.list(PageRequest::new(page, per_page)?, status).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Show { id } => {
            let trade = ledger.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::Update { id, json } => {
            let payload: serde_json::Value = serde_json::from_str(&json)?;
            let trade = ledger.patch(id, &payload).await?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::Delete { id } => {
            ledger.delete(id).await?;
            println!("Trade {id} deleted");
        }
        Commands::Stats => {
            let stats = ledger.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
