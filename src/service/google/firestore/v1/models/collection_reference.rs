use super::{database_name::DatabaseName, document_reference::DocumentReference};

/// A root collection of a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReference {
    database: DatabaseName,
    id: String,
}

impl CollectionReference {
    pub(crate) fn new(database: DatabaseName, id: impl Into<String>) -> Self {
        CollectionReference {
            database,
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn database(&self) -> &DatabaseName {
        &self.database
    }

    pub fn doc(&self, id: impl Into<String>) -> DocumentReference {
        DocumentReference::new(id.into(), self)
    }

    /// Resource name of the parent of every root collection.
    pub fn parent_name(&self) -> String {
        self.database.documents_root()
    }
}
