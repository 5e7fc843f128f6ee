mod collection_reference;
mod database_name;
mod document_reference;

pub use collection_reference::CollectionReference;
pub use database_name::DatabaseName;
pub use document_reference::DocumentReference;
