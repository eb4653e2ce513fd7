use std::{io::Write, path::PathBuf};

use clap::{Parser, Subcommand};

use crate::{
    console::render,
    core::{Clock, Ledger, LedgerResult, db::RecordStore},
};

pub const DEFAULT_DB_FILE: &str = "Projects_and_Contracts.db";
pub const DEFAULT_LOG_FILTER: &str = "contractdesk=warn";

#[derive(Parser, Debug)]
#[command(name = "contractdesk")]
#[command(about = "Track contracts and the projects they are attached to")]
#[command(version)]
pub struct Cli {
    /// SQLite database file holding contracts and projects
    #[arg(long, value_name = "PATH", env = "CONTRACTDESK_DB", default_value = DEFAULT_DB_FILE)]
    pub db: PathBuf,

    /// Log filter directives, written to stderr
    #[arg(long, value_name = "FILTER", env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive menu (the default)
    Shell,
    /// Create a Draft contract
    CreateContract { name: String },
    /// Create a project; needs at least one Active contract
    CreateProject { name: String },
    /// Activate a contract and stamp today's signing date
    Confirm { name: String },
    /// End a contract and release its project
    End { name: String },
    /// Attach an Active contract to a project
    Link { contract: String, project: String },
    /// List all contracts
    Contracts {
        /// Print JSON instead of text lines
        #[arg(long)]
        json: bool,
    },
    /// List all projects
    Projects {
        #[arg(long)]
        json: bool,
    },
}

/// Runtime settings resolved from flags, environment and `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            db_path: self.db.clone(),
            log_filter: self.log.clone(),
        }
    }
}

/// Run one non-interactive command, writing its result lines to `out`.
///
/// Returns `Ok(false)` when the ledger rejected the operation.
pub async fn execute<S, C, W>(ledger: &Ledger<S, C>, command: &Command, out: &mut W) -> anyhow::Result<bool>
where
    S: RecordStore,
    C: Clock,
    W: Write,
{
    let result: LedgerResult<Vec<String>> = match command {
        Command::Shell => anyhow::bail!("the interactive shell is not a one-shot command"),
        Command::CreateContract { name } => ledger
            .create_contract(name)
            .await
            .map(|contract| vec![render::contract_created(&contract)]),
        Command::CreateProject { name } => ledger
            .create_project(name)
            .await
            .map(|project| vec![render::project_created(&project)]),
        Command::Confirm { name } => ledger
            .confirm_contract(name)
            .await
            .map(|contract| vec![render::contract_confirmed(&contract)]),
        Command::End { name } => ledger
            .end_contract(name)
            .await
            .map(|contract| vec![render::contract_ended(&contract)]),
        Command::Link { contract, project } => ledger
            .add_contract_to_project(contract, project)
            .await
            .map(|contract| vec![render::contract_linked(&contract)]),
        Command::Contracts { json: true } => {
            let contracts = ledger.list_contracts().await?;
            Ok(vec![serde_json::to_string_pretty(&contracts)?])
        }
        Command::Contracts { json: false } => ledger
            .list_contracts()
            .await
            .map(|contracts| render::contract_listing(&contracts)),
        Command::Projects { json: true } => {
            let projects = ledger.list_projects().await?;
            Ok(vec![serde_json::to_string_pretty(&projects)?])
        }
        Command::Projects { json: false } => ledger
            .list_projects()
            .await
            .map(|projects| render::project_listing(&projects)),
    };

    match result {
        Ok(lines) => {
            for line in lines {
                writeln!(out, "{line}")?;
            }
            Ok(true)
        }
        Err(err) => match err.rejection() {
            Some(rejection) => {
                writeln!(out, "{rejection}")?;
                Ok(false)
            }
            None => Err(err.into()),
        },
    }
}
