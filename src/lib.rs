pub mod cli;
pub mod console;
pub mod core;

pub use crate::core::{Ledger, LedgerError, Rejection};
