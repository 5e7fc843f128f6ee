use crate::{
    error::Result,
    operation::{Operation, Response},
};
use async_trait::async_trait;
#[cfg(feature = "mocks")]
use mockall::automock;
use std::path::Path;

/// Capability set of a document-database client.
///
/// A client value starts out unconnected. One of the `init_*` methods opens a
/// session; `close` releases it. Calling an `init_*` method on a connected
/// client releases the current session before opening the new one, and a
/// closed client may be initialized again.
///
/// Every method takes `&mut self`: a client is owned by one caller at a time and
/// is not meant to be shared between tasks. Dropping a client releases its
/// session.
#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait DatabaseClient: Send {
    /// Connects with the service-account key stored at `credentials_path`.
    async fn init_with_service_account(&mut self, credentials_path: &Path) -> Result<()>;

    /// Connects to `project_id` using ambient credentials.
    async fn init_with_project_id(&mut self, project_id: &str) -> Result<()>;

    /// Connects to `http[s]://host[:port]/projects/{project}[/databases/{database}]`.
    async fn init_with_database_url(&mut self, database_url: &str) -> Result<()>;

    /// Runs `operation` against `collection`.
    ///
    /// Fails with `NotFound` when the collection does not exist, unless the
    /// operation is an insert.
    async fn execute(&mut self, collection: &str, operation: Operation) -> Result<Response>;

    /// Ids of the root collections visible to the session.
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Releases the session. Fails with `NotConnected` when none is open.
    async fn close(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;
}
