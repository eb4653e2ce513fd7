pub mod clock;
pub mod db;
pub mod error;
pub mod ledger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{LedgerError, RecordKind, Rejection, StoreConflict};
pub use ledger::{Ledger, LedgerResult};
