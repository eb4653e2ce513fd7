mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from contractdesk for tests
pub use contractdesk::core::{
    Ledger, LedgerError, RecordKind, Rejection, StoreConflict,
    db::{Contract, ContractStatus, Project, SqliteStore},
};
