use super::collection_reference::CollectionReference;

/// `projects/{project_id}/databases/{database_id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseName {
    project_id: String,
    database_id: String,
}

impl DatabaseName {
    pub fn new(project_id: impl Into<String>, database_id: impl Into<String>) -> Self {
        DatabaseName {
            project_id: project_id.into(),
            database_id: database_id.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    pub fn name(&self) -> String {
        format!("projects/{}/databases/{}", self.project_id, self.database_id)
    }

    /// Parent of every root collection.
    pub fn documents_root(&self) -> String {
        format!("{}/documents", self.name())
    }

    pub fn collection(&self, id: impl Into<String>) -> CollectionReference {
        CollectionReference::new(self.clone(), id)
    }
}
