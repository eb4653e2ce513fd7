use std::future::Future;

use serde::Serialize;
use time::Date;

use crate::core::db::model::ContractStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    pub name: String,
    pub project_name: Option<String>,
    pub status: ContractStatus,
    pub creation_date: Date,
    pub signing_date: Option<Date>,
    #[serde(skip)]
    pub(super) _guard: (),
}

impl Contract {
    /// Name of the project this contract is actively linked to, if any.
    pub fn active_project(&self) -> Option<&str> {
        if self.status.is_active() {
            self.project_name.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewContract {
    pub name: String,
    pub creation_date: Date,
}

pub trait ContractRepository {
    fn find_contract(
        &self,
        name: &str,
    ) -> impl Future<Output = anyhow::Result<Option<Contract>>> + Send;
    fn insert_contract(
        &self,
        contract: &NewContract,
    ) -> impl Future<Output = anyhow::Result<Contract>> + Send;
    /// Overwrites every mutable column of the stored row with `contract`.
    fn update_contract(
        &self,
        contract: &Contract,
    ) -> impl Future<Output = anyhow::Result<Contract>> + Send;
    fn list_contracts(&self) -> impl Future<Output = anyhow::Result<Vec<Contract>>> + Send;
    fn count_active_contracts(&self) -> impl Future<Output = anyhow::Result<u64>> + Send;
    fn find_active_holder(
        &self,
        project_name: &str,
    ) -> impl Future<Output = anyhow::Result<Option<Contract>>> + Send;
    fn contracts_for_project(
        &self,
        project_name: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<Contract>>> + Send;
}
