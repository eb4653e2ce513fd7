use std::future::Future;

use serde::Serialize;
use time::Date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub name: String,
    pub creation_date: Date,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub creation_date: Date,
}

pub trait ProjectRepository {
    fn find_project(
        &self,
        name: &str,
    ) -> impl Future<Output = anyhow::Result<Option<Project>>> + Send;
    fn insert_project(
        &self,
        project: &NewProject,
    ) -> impl Future<Output = anyhow::Result<Project>> + Send;
    fn list_projects(&self) -> impl Future<Output = anyhow::Result<Vec<Project>>> + Send;
}
