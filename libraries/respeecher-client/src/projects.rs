//! Project operations.

use crate::client::{paths, RespeecherClient};
use crate::error::Result;
use crate::types::{
    CreateProjectRequest, Listing, Project, ProjectFilter, UpdateProjectRequest,
};
use reqwest::Method;
use tracing::debug;

impl RespeecherClient {
    /// List the projects visible to the current user.
    pub async fn fetch_projects(&self, filter: Option<&ProjectFilter>) -> Result<Vec<Project>> {
        let listing: Listing<Project> = match filter {
            Some(filter) => self.get_with_query(paths::PROJECTS, filter).await?,
            None => self.get(paths::PROJECTS).await?,
        };
        let projects = listing.into_items();
        debug!(count = projects.len(), "Fetched projects");
        Ok(projects)
    }

    pub async fn create_project(&self, name: &str) -> Result<Project> {
        let request = CreateProjectRequest {
            name: name.to_string(),
        };
        self.send_json(Method::POST, paths::PROJECTS, &request).await
    }

    /// Rename a project.
    pub async fn update_project(&self, project_id: &str, name: &str) -> Result<Project> {
        let request = UpdateProjectRequest {
            name: name.to_string(),
        };
        let path = format!("{}/{}", paths::PROJECTS, project_id);
        self.send_json(Method::PUT, &path, &request).await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<Project> {
        let path = format!("{}/{}", paths::PROJECTS, project_id);
        self.delete(&path).await
    }
}
