//! The contract/project lifecycle engine.
//!
//! A [`Ledger`] owns a record store handle and applies the lifecycle rules:
//! contracts move Draft -> Active -> Ended, projects need an Active contract
//! to exist before they can be created, and a project holds at most one
//! Active contract while a contract is Active-linked to at most one project.
//!
//! Every mutating operation is a read-check-write executed while holding
//! the ledger's write lock, so callers sharing one `Ledger` cannot interleave
//! between a check and the write it guards.

use time::Date;
use tokio::sync::Mutex;

use crate::core::{
    clock::{Clock, SystemClock},
    db::{Contract, ContractStatus, NewContract, NewProject, Project, RecordStore},
    error::{LedgerError, RecordKind, Rejection, StoreConflict},
};

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug)]
pub struct Ledger<S, C = SystemClock> {
    store: S,
    clock: C,
    writes: Mutex<()>,
}

impl<S: RecordStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RecordStore, C: Clock> Ledger<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            writes: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> Date {
        self.clock.today()
    }

    /// Create a Draft contract with no project.
    pub async fn create_contract(&self, name: &str) -> LedgerResult<Contract> {
        let name = identifier(name)?;
        let _write = self.writes.lock().await;

        if self.store.find_contract(name).await?.is_some() {
            return rejected(Rejection::already_exists(RecordKind::Contract, name));
        }
        let new_contract = NewContract {
            name: name.to_string(),
            creation_date: self.clock.today(),
        };
        match self.store.insert_contract(&new_contract).await {
            Ok(contract) => {
                tracing::info!(contract = %contract.name, "contract created");
                Ok(contract)
            }
            Err(err) => Err(self.resolve_conflict(err).await),
        }
    }

    /// Create a project. Refused while no contract is Active.
    pub async fn create_project(&self, name: &str) -> LedgerResult<Project> {
        let name = identifier(name)?;
        let _write = self.writes.lock().await;

        if self.store.count_active_contracts().await? == 0 {
            return rejected(Rejection::PreconditionFailed);
        }
        if self.store.find_project(name).await?.is_some() {
            return rejected(Rejection::already_exists(RecordKind::Project, name));
        }
        let new_project = NewProject {
            name: name.to_string(),
            creation_date: self.clock.today(),
        };
        match self.store.insert_project(&new_project).await {
            Ok(project) => {
                tracing::info!(project = %project.name, "project created");
                Ok(project)
            }
            Err(err) => Err(self.resolve_conflict(err).await),
        }
    }

    /// Mark a contract Active and stamp today's signing date.
    ///
    /// Any status may be confirmed: Draft activates, Active re-stamps the
    /// signing date, Ended re-activates. An existing project link is kept.
    pub async fn confirm_contract(&self, name: &str) -> LedgerResult<Contract> {
        let name = identifier(name)?;
        let _write = self.writes.lock().await;

        let Some(mut contract) = self.store.find_contract(name).await? else {
            return rejected(Rejection::not_found(RecordKind::Contract, name));
        };
        let previous = contract.status;
        contract.status = ContractStatus::Active;
        contract.signing_date = Some(self.clock.today());
        let contract = self.store.update_contract(&contract).await?;
        tracing::info!(
            contract = %contract.name,
            from = %previous,
            "contract confirmed"
        );
        Ok(contract)
    }

    /// End a contract and drop its project link. Ending twice is harmless.
    pub async fn end_contract(&self, name: &str) -> LedgerResult<Contract> {
        let name = identifier(name)?;
        let _write = self.writes.lock().await;

        let Some(mut contract) = self.store.find_contract(name).await? else {
            return rejected(Rejection::not_found(RecordKind::Contract, name));
        };
        let released = contract.project_name.take();
        contract.status = ContractStatus::Ended;
        let contract = self.store.update_contract(&contract).await?;
        tracing::info!(
            contract = %contract.name,
            released_project = released.as_deref().unwrap_or(""),
            "contract ended"
        );
        Ok(contract)
    }

    /// Link an Active contract to a project.
    ///
    /// Checks run in a fixed order so the reported reason is deterministic:
    /// unknown contract, inactive contract, unknown project, project already
    /// held by another Active contract, contract Active-linked elsewhere.
    pub async fn add_contract_to_project(
        &self,
        contract_name: &str,
        project_name: &str,
    ) -> LedgerResult<Contract> {
        let contract_name = identifier(contract_name)?;
        let project_name = identifier(project_name)?;
        let _write = self.writes.lock().await;

        let Some(mut contract) = self.store.find_contract(contract_name).await? else {
            return rejected(Rejection::not_found(RecordKind::Contract, contract_name));
        };
        if !contract.status.is_active() {
            return rejected(Rejection::InactiveContract {
                contract: contract.name,
                status: contract.status,
            });
        }
        if self.store.find_project(project_name).await?.is_none() {
            return rejected(Rejection::not_found(RecordKind::Project, project_name));
        }
        if let Some(holder) = self.store.find_active_holder(project_name).await?
            && holder.name != contract.name
        {
            return rejected(Rejection::ProjectAlreadyLinked {
                project: project_name.to_string(),
                holder: holder.name,
            });
        }
        if let Some(current) = contract.active_project()
            && current != project_name
        {
            return rejected(Rejection::ContractLinkedElsewhere {
                contract: contract.name.clone(),
                project: current.to_string(),
            });
        }

        contract.project_name = Some(project_name.to_string());
        match self.store.update_contract(&contract).await {
            Ok(contract) => {
                tracing::info!(
                    contract = %contract.name,
                    project = project_name,
                    "contract linked to project"
                );
                Ok(contract)
            }
            Err(err) => Err(self.resolve_conflict(err).await),
        }
    }

    /// All contracts in insertion order. Each call re-reads the store.
    pub async fn list_contracts(&self) -> LedgerResult<Vec<Contract>> {
        Ok(self.store.list_contracts().await?)
    }

    /// All projects in insertion order. Each call re-reads the store.
    pub async fn list_projects(&self) -> LedgerResult<Vec<Project>> {
        Ok(self.store.list_projects().await?)
    }

    pub async fn has_active_contracts(&self) -> LedgerResult<bool> {
        Ok(self.store.count_active_contracts().await? > 0)
    }

    /// Contracts currently referencing `project_name`.
    pub async fn project_contracts(&self, project_name: &str) -> LedgerResult<Vec<Contract>> {
        let project_name = identifier(project_name)?;
        if self.store.find_project(project_name).await?.is_none() {
            return rejected(Rejection::not_found(RecordKind::Project, project_name));
        }
        Ok(self.store.contracts_for_project(project_name).await?)
    }

    /// Map a write refused by a store constraint onto the rejection the
    /// engine's own checks would have produced.
    async fn resolve_conflict(&self, err: anyhow::Error) -> LedgerError {
        let conflict = match err.downcast::<StoreConflict>() {
            Ok(conflict) => conflict,
            Err(err) => return LedgerError::Store(err),
        };
        tracing::warn!(%conflict, "write refused by store constraint");
        let rejection = match conflict {
            StoreConflict::ContractName(name) => {
                Rejection::already_exists(RecordKind::Contract, name)
            }
            StoreConflict::ProjectName(name) => Rejection::already_exists(RecordKind::Project, name),
            StoreConflict::ActiveProject(project) => {
                let holder = match self.store.find_active_holder(&project).await {
                    Ok(Some(holder)) => holder.name,
                    Ok(None) => String::new(),
                    Err(err) => return LedgerError::Store(err),
                };
                Rejection::ProjectAlreadyLinked { project, holder }
            }
        };
        rejection.into()
    }
}

fn rejected<T>(rejection: Rejection) -> LedgerResult<T> {
    tracing::debug!(%rejection, "operation rejected");
    Err(rejection.into())
}

/// Names are kept verbatim; one that is empty or all whitespace names nothing.
fn identifier(raw: &str) -> Result<&str, Rejection> {
    if raw.trim().is_empty() {
        tracing::debug!("blank identifier rejected");
        Err(Rejection::InvalidName)
    } else {
        Ok(raw)
    }
}
