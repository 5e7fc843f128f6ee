mod evaluate;
mod ordering;

use crate::{
    client::DatabaseClient,
    config::{validate_project_id, ClientConfig, DatabaseUrl},
    error::{Error, Result},
    operation::{validate_collection_name, Operation, Response},
    service::{auth::ServiceAccountKey, google::firestore::v1::models::DatabaseName},
    Document, Timestamp,
};
use async_trait::async_trait;
use std::{collections::BTreeMap, path::Path};
use tracing::{debug, info, warn};

const AUTO_ID_LENGTH: usize = 20;

type Collection = BTreeMap<String, Document>;

/// A [`DatabaseClient`] that keeps its collections in process.
///
/// Queries are evaluated with Firestore's filter and ordering rules, so code
/// written against [`FirestoreClient`](crate::FirestoreClient) can be tested
/// without a server. The stored collections model the server: they survive
/// `close` and a later re-init.
///
/// A single store backs whichever database a session names, so two sessions
/// opened for different projects or database ids see the same collections.
pub struct MemoryClient {
    config: ClientConfig,
    collections: BTreeMap<String, Collection>,
    session: Option<Session>,
    reachable: bool,
}

struct Session {
    database: DatabaseName,
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Releasing in-memory session for {}", self.database.name());
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        MemoryClient::new()
    }
}

impl MemoryClient {
    pub fn new() -> Self {
        MemoryClient::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        MemoryClient {
            config,
            collections: BTreeMap::new(),
            session: None,
            reachable: true,
        }
    }

    /// Seeds `name` with `documents`, replacing documents with the same id.
    pub fn with_collection(
        mut self,
        name: impl Into<String>,
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        let collection = self.collections.entry(name.into()).or_default();
        for document in documents {
            collection.insert(document.id.clone(), document);
        }
        self.collections.retain(|_, collection| !collection.is_empty());
        self
    }

    /// While unreachable, init calls and calls on an open session fail with `Connection`.
    pub fn set_reachable(&mut self, reachable: bool) {
        self.reachable = reachable;
    }

    pub fn database(&self) -> Option<&DatabaseName> {
        self.session.as_ref().map(|session| &session.database)
    }

    /// Drops the open session, if any, before a new one is attempted.
    fn release(&mut self) {
        if self.session.take().is_some() {
            info!("Releasing the open session before connecting again");
        }
    }

    fn open(&mut self, database: DatabaseName) -> Result<()> {
        self.check_reachable()?;
        info!("Opened in-memory session for {}", database.name());
        self.session = Some(Session { database });
        Ok(())
    }

    fn check_reachable(&self) -> Result<()> {
        if self.reachable {
            Ok(())
        } else {
            warn!("In-memory backend is marked unreachable");
            Err(Error::Connection("backend is unreachable".into()))
        }
    }

    /// Fails unless a session is open and the backend is reachable.
    fn ensure_session(&self) -> Result<()> {
        if self.session.is_none() {
            return Err(Error::NotConnected);
        }
        self.check_reachable()
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("collection {}", name)))
    }

    fn insert(
        &mut self,
        collection: &str,
        document_id: Option<String>,
        fields: crate::Fields,
    ) -> Result<Document> {
        let documents = self.collections.entry(collection.to_string()).or_default();
        let id = match document_id {
            Some(id) => id,
            None => loop {
                let id = auto_id();
                if !documents.contains_key(&id) {
                    break id;
                }
            },
        };
        if documents.contains_key(&id) {
            return Err(Error::InvalidOperation(format!(
                "document {}/{} already exists",
                collection, id
            )));
        }
        let now = Timestamp::now();
        let document = Document {
            id: id.clone(),
            fields,
            create_time: Some(now),
            update_time: Some(now),
        };
        documents.insert(id, document.clone());
        Ok(document)
    }
}

/// Firestore-style document id: 20 alphanumeric characters.
fn auto_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(AUTO_ID_LENGTH);
    id
}

#[async_trait]
impl DatabaseClient for MemoryClient {
    async fn init_with_service_account(&mut self, credentials_path: &Path) -> Result<()> {
        info!("Initializing in-memory client with service account {:?}", credentials_path);
        self.release();
        let key = ServiceAccountKey::from_file(credentials_path).await?;
        let database = DatabaseName::new(key.project_id, self.config.database_id.clone());
        self.open(database)
    }

    async fn init_with_project_id(&mut self, project_id: &str) -> Result<()> {
        info!("Initializing in-memory client for project {}", project_id);
        self.release();
        validate_project_id(project_id)?;
        let database = DatabaseName::new(project_id, self.config.database_id.clone());
        self.open(database)
    }

    async fn init_with_database_url(&mut self, database_url: &str) -> Result<()> {
        info!("Initializing in-memory client with database url {}", database_url);
        self.release();
        let url = DatabaseUrl::parse(database_url)?;
        self.open(DatabaseName::new(url.project_id, url.database_id))
    }

    async fn execute(&mut self, collection: &str, operation: Operation) -> Result<Response> {
        self.ensure_session()?;
        validate_collection_name(collection)?;
        operation.validate()?;
        debug!("Executing {} on collection {}", operation.kind(), collection);
        if !operation.creates_collection() && !self.collections.contains_key(collection) {
            return Err(Error::NotFound(format!("collection {}", collection)));
        }

        match operation {
            Operation::Insert {
                document_id,
                fields,
            } => Ok(Response::Written(self.insert(collection, document_id, fields)?)),
            Operation::Get { document_id } => {
                let document = self
                    .collection_mut(collection)?
                    .get(&document_id)
                    .cloned()
                    .ok_or_else(|| {
                        Error::NotFound(format!("document {}/{}", collection, document_id))
                    })?;
                Ok(Response::Document(document))
            }
            Operation::Query(query) => {
                let documents = evaluate::run(self.collection_mut(collection)?.values(), &query);
                Ok(Response::Documents(documents))
            }
            Operation::Update {
                document_id,
                fields,
            } => {
                let document = self
                    .collection_mut(collection)?
                    .get_mut(&document_id)
                    .ok_or_else(|| {
                        Error::NotFound(format!("document {}/{}", collection, document_id))
                    })?;
                document.fields.extend(fields);
                document.update_time = Some(Timestamp::now());
                Ok(Response::Written(document.clone()))
            }
            Operation::Delete { document_id } => {
                let documents = self.collection_mut(collection)?;
                if documents.remove(&document_id).is_none() {
                    debug!("Document {}/{} was already absent", collection, document_id);
                }
                if documents.is_empty() {
                    self.collections.remove(collection);
                }
                Ok(Response::Deleted)
            }
        }
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        self.ensure_session()?;
        Ok(self.collections.keys().cloned().collect())
    }

    async fn close(&mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => {
                info!("Closing in-memory session for {}", session.database.name());
                Ok(())
            }
            None => Err(Error::NotConnected),
        }
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }
}
