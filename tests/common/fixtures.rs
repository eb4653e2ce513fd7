use contractdesk::core::{
    FixedClock, Ledger,
    db::{Contract, SqliteStore},
};
use time::{Date, macros::date};

/// The date every test ledger reports as today.
pub const TEST_TODAY: Date = date!(2026 - 10 - 19);

pub type TestLedger = Ledger<SqliteStore, FixedClock>;

/// Opens a SqliteStore on a fresh database file.
/// Returns both the store and the temp directory (which must be kept alive).
pub async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("ledger.db");
    let store = SqliteStore::open(&path)
        .await
        .expect("Failed to open test store");
    (store, dir)
}

/// Creates a ledger over a fresh store with the clock pinned to `TEST_TODAY`.
pub async fn create_test_ledger() -> (TestLedger, tempfile::TempDir) {
    let (store, dir) = create_test_store().await;
    (Ledger::with_clock(store, FixedClock(TEST_TODAY)), dir)
}

/// Creates a contract and confirms it.
pub async fn make_active_contract(ledger: &TestLedger, name: &str) -> Contract {
    ledger
        .create_contract(name)
        .await
        .expect("Failed to create contract");
    ledger
        .confirm_contract(name)
        .await
        .expect("Failed to confirm contract")
}

/// Reads a contract straight from the store, bypassing the ledger.
pub async fn stored_contract(ledger: &TestLedger, name: &str) -> Contract {
    use contractdesk::core::db::ContractRepository;
    ledger
        .store()
        .find_contract(name)
        .await
        .expect("Failed to query contract")
        .expect("Contract should exist")
}
