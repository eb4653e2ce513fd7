//! One-line renderings of ledger results, shared by the menu and the
//! one-shot commands.

use time::Date;

use crate::core::{
    LedgerError,
    db::{Contract, Project},
};

pub const NO_CONTRACTS: &str = "No contracts found.";
pub const NO_PROJECTS: &str = "No projects found.";

pub fn contract_created(contract: &Contract) -> String {
    format!("Contract {} created.", contract.name)
}

pub fn project_created(project: &Project) -> String {
    format!("Project {} created.", project.name)
}

pub fn contract_confirmed(contract: &Contract) -> String {
    format!(
        "Contract {} confirmed and signed on {}.",
        contract.name,
        optional_date(contract.signing_date)
    )
}

pub fn contract_ended(contract: &Contract) -> String {
    format!("Contract {} ended.", contract.name)
}

pub fn contract_linked(contract: &Contract) -> String {
    format!(
        "Contract {} added to Project {}.",
        contract.name,
        contract.project_name.as_deref().unwrap_or("")
    )
}

pub fn contract_listing(contracts: &[Contract]) -> Vec<String> {
    if contracts.is_empty() {
        return vec![NO_CONTRACTS.to_string()];
    }
    let mut lines = Vec::with_capacity(contracts.len() + 1);
    lines.push("Contracts:".to_string());
    lines.extend(contracts.iter().map(|contract| {
        format!(
            "- Contract Name: {}, Project Name: {}, Status: {}, Creation Date: {}, Signing Date: {}",
            contract.name,
            contract.project_name.as_deref().unwrap_or(""),
            contract.status,
            contract.creation_date,
            optional_date(contract.signing_date)
        )
    }));
    lines
}

pub fn project_listing(projects: &[Project]) -> Vec<String> {
    if projects.is_empty() {
        return vec![NO_PROJECTS.to_string()];
    }
    let mut lines = Vec::with_capacity(projects.len() + 1);
    lines.push("Projects:".to_string());
    lines.extend(projects.iter().map(|project| {
        format!(
            "- Project Name: {}, Creation Date: {}",
            project.name, project.creation_date
        )
    }));
    lines
}

/// Rejections render as their own message; store failures get an `Error:`
/// prefix with the full cause chain.
pub fn failure(err: &LedgerError) -> String {
    match err {
        LedgerError::Rejected(rejection) => rejection.to_string(),
        LedgerError::Store(source) => format!("Error: {source:#}"),
    }
}

fn optional_date(date: Option<Date>) -> String {
    match date {
        Some(date) => date.to_string(),
        None => "None".to_string(),
    }
}
