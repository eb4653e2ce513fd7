use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use contractdesk::cli::{Cli, Command, Config};
use contractdesk::console::{self, Console};
use contractdesk::core::{Ledger, db::SqliteStore};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(contractdesk::cli::DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.config();
    init_tracing(&config);

    let store = match SqliteStore::open(&config.db_path).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(db = ?config.db_path, error = %err, "failed to open record store");
            eprintln!("Error creating the database.");
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    };
    let ledger = Ledger::new(store.clone());

    let accepted = match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let mut console = Console::stdio();
            console::run_menu(&ledger, &mut console).await?;
            true
        }
        command => {
            let mut stdout = std::io::stdout();
            contractdesk::cli::execute(&ledger, &command, &mut stdout).await?
        }
    };

    store.close().await?;
    if !accepted {
        std::process::exit(1);
    }
    Ok(())
}
