use super::collection_reference::CollectionReference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReference {
    id: String,
    parent: Box<CollectionReference>,
}

impl DocumentReference {
    pub(crate) fn new(id: impl Into<String>, parent: &CollectionReference) -> Self {
        DocumentReference {
            id: id.into(),
            parent: Box::new(parent.clone()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.parent.id(), self.id)
    }

    /// Full resource name, as used by `GetDocument` and friends.
    pub fn name(&self) -> String {
        format!("{}/{}", self.parent.database().documents_root(), self.path())
    }

    /// Last segment of a document resource name.
    pub fn id_from_name(name: &str) -> &str {
        name.rsplit('/').next().unwrap_or(name)
    }
}
