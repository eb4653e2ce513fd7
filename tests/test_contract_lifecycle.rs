//! Integration tests for the contract status lifecycle.
//!
//! Tests cover:
//! - Creating contracts and the duplicate-name rule
//! - Confirming from every status and the signing date stamp
//! - Ending contracts and releasing their project link
//! - Unknown and blank identifiers
//! - Persistence through close/reopen cycles

mod common;

use assert_matches::assert_matches;
use contractdesk::core::FixedClock;
use time::macros::date;

use common::*;

#[tokio::test]
async fn test_create_contract_starts_in_draft() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;

    let contract = ledger.create_contract("C001").await?;

    assert_eq!(contract.name, "C001");
    assert_eq!(contract.status, ContractStatus::Draft);
    assert_eq!(contract.project_name, None);
    assert_eq!(contract.creation_date, TEST_TODAY);
    assert_eq!(contract.signing_date, None);
    assert!(!ledger.has_active_contracts().await?);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_contract_is_rejected() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;
    ledger.create_contract("C001").await?;

    let result = ledger.create_contract("C001").await;

    assert_matches!(
        result,
        Err(LedgerError::Rejected(Rejection::AlreadyExists {
            kind: RecordKind::Contract,
            ref name,
        })) if name == "C001"
    );
    let contracts = ledger.list_contracts().await?;
    assert_eq!(contracts.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_identifiers_are_verbatim_and_blank_ones_rejected() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;

    // Surrounding spaces are part of the name.
    let padded = ledger.create_contract("C001 ").await?;
    assert_eq!(padded.name, "C001 ");
    let bare = ledger.create_contract("C001").await?;
    assert_eq!(bare.name, "C001");
    assert_matches!(
        ledger.create_contract("C001 ").await,
        Err(LedgerError::Rejected(Rejection::AlreadyExists { ref name, .. })) if name == "C001 "
    );

    assert_matches!(
        ledger.create_contract("   ").await,
        Err(LedgerError::Rejected(Rejection::InvalidName))
    );
    assert_matches!(
        ledger.confirm_contract("").await,
        Err(LedgerError::Rejected(Rejection::InvalidName))
    );
    assert_eq!(ledger.list_contracts().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_confirm_activates_and_stamps_signing_date() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;
    ledger.create_contract("C001").await?;

    let confirmed = ledger.confirm_contract("C001").await?;

    assert_eq!(confirmed.status, ContractStatus::Active);
    assert_eq!(confirmed.signing_date, Some(TEST_TODAY));
    assert!(ledger.has_active_contracts().await?);

    let stored = stored_contract(&ledger, "C001").await;
    assert_eq!(stored.status, ContractStatus::Active);
    assert_eq!(stored.signing_date, Some(TEST_TODAY));
    assert_eq!(stored.creation_date, TEST_TODAY);

    Ok(())
}

#[tokio::test]
async fn test_reconfirm_restamps_signing_date() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;
    make_active_contract(&ledger, "C001").await;

    let later = Ledger::with_clock(ledger.store().clone(), FixedClock(date!(2026 - 11 - 02)));
    let reconfirmed = later.confirm_contract("C001").await?;

    assert_eq!(reconfirmed.status, ContractStatus::Active);
    assert_eq!(reconfirmed.signing_date, Some(date!(2026 - 11 - 02)));
    // Creation date never moves.
    assert_eq!(reconfirmed.creation_date, TEST_TODAY);

    Ok(())
}

#[tokio::test]
async fn test_reconfirm_keeps_project_link() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;
    make_active_contract(&ledger, "C001").await;
    ledger.create_project("P001").await?;
    ledger.add_contract_to_project("C001", "P001").await?;

    let later = Ledger::with_clock(ledger.store().clone(), FixedClock(date!(2026 - 11 - 02)));
    let reconfirmed = later.confirm_contract("C001").await?;

    assert_eq!(reconfirmed.status, ContractStatus::Active);
    assert_eq!(reconfirmed.project_name.as_deref(), Some("P001"));
    assert_eq!(reconfirmed.signing_date, Some(date!(2026 - 11 - 02)));

    let holders: Vec<String> = ledger
        .project_contracts("P001")
        .await?
        .into_iter()
        .map(|contract| contract.name)
        .collect();
    assert_eq!(holders, ["C001"]);

    Ok(())
}

#[tokio::test]
async fn test_ended_contract_can_be_reactivated() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;
    make_active_contract(&ledger, "C001").await;
    ledger.end_contract("C001").await?;

    let reactivated = ledger.confirm_contract("C001").await?;

    assert_eq!(reactivated.status, ContractStatus::Active);
    assert_eq!(reactivated.project_name, None);
    assert_eq!(reactivated.signing_date, Some(TEST_TODAY));

    Ok(())
}

#[tokio::test]
async fn test_end_contract_releases_project() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;
    make_active_contract(&ledger, "C001").await;
    ledger.create_project("P001").await?;
    ledger.add_contract_to_project("C001", "P001").await?;

    let ended = ledger.end_contract("C001").await?;

    assert_eq!(ended.status, ContractStatus::Ended);
    assert_eq!(ended.project_name, None);
    // Signing date survives termination.
    assert_eq!(ended.signing_date, Some(TEST_TODAY));
    assert!(ledger.project_contracts("P001").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_end_contract_from_draft_and_twice() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;
    ledger.create_contract("C001").await?;

    let ended = ledger.end_contract("C001").await?;
    assert_eq!(ended.status, ContractStatus::Ended);
    assert_eq!(ended.signing_date, None);

    let again = ledger.end_contract("C001").await?;
    assert_eq!(again, ended);

    Ok(())
}

#[tokio::test]
async fn test_unknown_contract_is_not_found() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;

    assert_matches!(
        ledger.confirm_contract("C404").await,
        Err(LedgerError::Rejected(Rejection::NotFound {
            kind: RecordKind::Contract,
            ..
        }))
    );
    assert_matches!(
        ledger.end_contract("C404").await,
        Err(LedgerError::Rejected(Rejection::NotFound {
            kind: RecordKind::Contract,
            ..
        }))
    );
    assert!(ledger.list_contracts().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_listing_keeps_insertion_order() -> anyhow::Result<()> {
    let (ledger, _temp_dir) = create_test_ledger().await;
    for name in ["C003", "C001", "C002"] {
        ledger.create_contract(name).await?;
    }

    let names: Vec<String> = ledger
        .list_contracts()
        .await?
        .into_iter()
        .map(|contract| contract.name)
        .collect();
    assert_eq!(names, ["C003", "C001", "C002"]);

    // A second listing re-reads the store.
    ledger.create_contract("C000").await?;
    assert_eq!(ledger.list_contracts().await?.len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_records_persist_after_reopen() -> anyhow::Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let db_path = temp_dir.path().join("persist_test.db");

    // 1. Create records and close the store
    {
        let store = SqliteStore::open(&db_path).await?;
        let ledger = Ledger::with_clock(store.clone(), FixedClock(TEST_TODAY));
        ledger.create_contract("C001").await?;
        ledger.confirm_contract("C001").await?;
        ledger.create_project("P001").await?;
        ledger.add_contract_to_project("C001", "P001").await?;

        store.close().await?;
    }

    // 2. Reopen and verify
    {
        let store = SqliteStore::open(&db_path).await?;
        let ledger = Ledger::with_clock(store, FixedClock(TEST_TODAY));

        let contracts = ledger.list_contracts().await?;
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].name, "C001");
        assert_eq!(contracts[0].status, ContractStatus::Active);
        assert_eq!(contracts[0].project_name.as_deref(), Some("P001"));
        assert_eq!(contracts[0].signing_date, Some(TEST_TODAY));

        let projects: Vec<Project> = ledger.list_projects().await?;
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "P001");
        assert_eq!(projects[0].creation_date, TEST_TODAY);
    }

    Ok(())
}
