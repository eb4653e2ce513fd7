mod contract;
mod model;
mod project;
mod state;

use std::{path::Path, sync::Arc};

use state::StoreState;
use time::Date;

use crate::core::error::StoreConflict;

pub use contract::{Contract, ContractRepository, NewContract};
pub use model::ContractStatus;
pub use project::{NewProject, Project, ProjectRepository};

/// Everything the ledger needs from persistent storage.
pub trait RecordStore: ContractRepository + ProjectRepository + Send + Sync {}

impl<T> RecordStore for T where T: ContractRepository + ProjectRepository + Send + Sync {}

/// Column list for contract queries.
const CONTRACT_COLUMNS: &str = "name, project_name, status, creation_date, signing_date";

const PROJECT_COLUMNS: &str = "name, creation_date";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    state: Arc<StoreState>,
}

impl SqliteStore {
    /// Open (creating if missing) the database file and apply the schema.
    pub async fn open<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(StoreState::new(db_file).await?),
        })
    }

    pub fn db_file(&self) -> &Path {
        self.state.db_file()
    }

    /// Checkpoint and close the underlying pool.
    pub async fn close(&self) -> anyhow::Result<()> {
        self.state.close().await
    }
}

#[derive(sqlx::FromRow)]
struct ContractRecord {
    name: String,
    project_name: Option<String>,
    status: String,
    creation_date: Date,
    signing_date: Option<Date>,
}

impl TryFrom<ContractRecord> for Contract {
    type Error = anyhow::Error;

    fn try_from(record: ContractRecord) -> Result<Self, Self::Error> {
        let status = ContractStatus::try_from(record.status.as_str())?;
        Ok(Contract {
            name: record.name,
            project_name: record.project_name,
            status,
            creation_date: record.creation_date,
            signing_date: record.signing_date,
            _guard: (),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRecord {
    name: String,
    creation_date: Date,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Project {
            name: record.name,
            creation_date: record.creation_date,
            _guard: (),
        }
    }
}

/// Turn a unique-constraint violation into the matching `StoreConflict`,
/// leaving every other failure as is.
fn conflict_or(err: sqlx::Error, conflict: impl FnOnce() -> StoreConflict) -> anyhow::Error {
    let is_unique = err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());
    if is_unique {
        conflict().into()
    } else {
        err.into()
    }
}

impl ContractRepository for SqliteStore {
    async fn find_contract(&self, name: &str) -> anyhow::Result<Option<Contract>> {
        let query = format!("SELECT {CONTRACT_COLUMNS} FROM contract WHERE name = $1");
        sqlx::query_as::<_, ContractRecord>(&query)
            .bind(name)
            .fetch_optional(self.state.pool())
            .await?
            .map(Contract::try_from)
            .transpose()
    }

    async fn insert_contract(&self, contract: &NewContract) -> anyhow::Result<Contract> {
        let query = format!(
            "INSERT INTO contract (name, project_name, status, creation_date, signing_date)
             VALUES ($1, NULL, $2, $3, NULL)
             RETURNING {CONTRACT_COLUMNS}"
        );
        let record = sqlx::query_as::<_, ContractRecord>(&query)
            .bind(&contract.name)
            .bind(ContractStatus::Draft.as_str())
            .bind(contract.creation_date)
            .fetch_one(self.state.pool())
            .await
            .map_err(|err| conflict_or(err, || StoreConflict::ContractName(contract.name.clone())))?;
        Contract::try_from(record)
    }

    async fn update_contract(&self, contract: &Contract) -> anyhow::Result<Contract> {
        let query = format!(
            "UPDATE contract SET
                project_name = $1,
                status = $2,
                signing_date = $3
             WHERE name = $4
             RETURNING {CONTRACT_COLUMNS}"
        );
        let record = sqlx::query_as::<_, ContractRecord>(&query)
            .bind(contract.project_name.as_deref())
            .bind(contract.status.as_str())
            .bind(contract.signing_date)
            .bind(&contract.name)
            .fetch_optional(self.state.pool())
            .await
            .map_err(|err| {
                conflict_or(err, || {
                    StoreConflict::ActiveProject(contract.project_name.clone().unwrap_or_default())
                })
            })?;
        match record {
            Some(record) => Contract::try_from(record),
            None => Err(anyhow::anyhow!("Contract {} not found", contract.name)),
        }
    }

    async fn list_contracts(&self) -> anyhow::Result<Vec<Contract>> {
        let query = format!("SELECT {CONTRACT_COLUMNS} FROM contract ORDER BY rowid ASC");
        sqlx::query_as::<_, ContractRecord>(&query)
            .fetch_all(self.state.pool())
            .await?
            .into_iter()
            .map(Contract::try_from)
            .collect()
    }

    async fn count_active_contracts(&self) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contract WHERE status = $1")
            .bind(ContractStatus::Active.as_str())
            .fetch_one(self.state.pool())
            .await?;
        Ok(u64::try_from(count)?)
    }

    async fn find_active_holder(&self, project_name: &str) -> anyhow::Result<Option<Contract>> {
        let query = format!(
            "SELECT {CONTRACT_COLUMNS} FROM contract
             WHERE project_name = $1 AND status = $2
             ORDER BY rowid ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, ContractRecord>(&query)
            .bind(project_name)
            .bind(ContractStatus::Active.as_str())
            .fetch_optional(self.state.pool())
            .await?
            .map(Contract::try_from)
            .transpose()
    }

    async fn contracts_for_project(&self, project_name: &str) -> anyhow::Result<Vec<Contract>> {
        let query = format!(
            "SELECT {CONTRACT_COLUMNS} FROM contract
             WHERE project_name = $1
             ORDER BY rowid ASC"
        );
        sqlx::query_as::<_, ContractRecord>(&query)
            .bind(project_name)
            .fetch_all(self.state.pool())
            .await?
            .into_iter()
            .map(Contract::try_from)
            .collect()
    }
}

impl ProjectRepository for SqliteStore {
    async fn find_project(&self, name: &str) -> anyhow::Result<Option<Project>> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM project WHERE name = $1");
        Ok(sqlx::query_as::<_, ProjectRecord>(&query)
            .bind(name)
            .fetch_optional(self.state.pool())
            .await?
            .map(Project::from))
    }

    async fn insert_project(&self, project: &NewProject) -> anyhow::Result<Project> {
        let query = format!(
            "INSERT INTO project (name, creation_date) VALUES ($1, $2)
             RETURNING {PROJECT_COLUMNS}"
        );
        let record = sqlx::query_as::<_, ProjectRecord>(&query)
            .bind(&project.name)
            .bind(project.creation_date)
            .fetch_one(self.state.pool())
            .await
            .map_err(|err| conflict_or(err, || StoreConflict::ProjectName(project.name.clone())))?;
        Ok(Project::from(record))
    }

    async fn list_projects(&self) -> anyhow::Result<Vec<Project>> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM project ORDER BY rowid ASC");
        Ok(sqlx::query_as::<_, ProjectRecord>(&query)
            .fetch_all(self.state.pool())
            .await?
            .into_iter()
            .map(Project::from)
            .collect())
    }
}
