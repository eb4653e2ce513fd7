//! Error types for the contract ledger.
//!
//! Business outcomes (`Rejection`) are ordinary results the console renders
//! as one line each; only `LedgerError::Store` signals that the record store
//! itself misbehaved.

use std::fmt;

use thiserror::Error;

use crate::core::db::ContractStatus;

/// Which kind of record a rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Contract,
    Project,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Contract => f.write_str("Contract"),
            RecordKind::Project => f.write_str("Project"),
        }
    }
}

/// A business rule refused the operation. Nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{kind} {name} already exists.")]
    AlreadyExists { kind: RecordKind, name: String },

    #[error("{kind} {name} not found.")]
    NotFound { kind: RecordKind, name: String },

    /// Projects require at least one Active contract in the store.
    #[error("Warning: You cannot create a project without at least one active contract.")]
    PreconditionFailed,

    #[error("Contract {contract} is inactive. Activate it to add to the project.")]
    InactiveContract {
        contract: String,
        status: ContractStatus,
    },

    #[error("Project {project} already has an active contract: {holder}.")]
    ProjectAlreadyLinked { project: String, holder: String },

    #[error("Contract {contract} is already active in Project {project}.")]
    ContractLinkedElsewhere { contract: String, project: String },

    #[error("Name must not be empty.")]
    InvalidName,
}

impl Rejection {
    pub fn not_found(kind: RecordKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn already_exists(kind: RecordKind, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            LedgerError::Rejected(rejection) => Some(rejection),
            LedgerError::Store(_) => None,
        }
    }
}

/// A write was refused by a uniqueness constraint in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreConflict {
    #[error("a contract named {0:?} is already stored")]
    ContractName(String),

    #[error("a project named {0:?} is already stored")]
    ProjectName(String),

    #[error("project {0:?} already holds an active contract")]
    ActiveProject(String),
}
