pub mod models;

mod convert;
mod field_path;
mod query;

use self::models::{CollectionReference, DatabaseName, DocumentReference};
use crate::{
    client::DatabaseClient,
    config::{validate_project_id, ClientConfig, DatabaseUrl, Scheme},
    error::{Error, Result},
    operation::{validate_collection_name, Operation, Response},
    proto::google::firestore::v1::{
        firestore_client::FirestoreClient as GrpcClient, precondition::ConditionType,
        run_query_request::QueryType, CreateDocumentRequest, DeleteDocumentRequest, Document,
        DocumentMask, GetDocumentRequest, ListCollectionIdsRequest, Precondition, RunQueryRequest,
        RunQueryResponse, StructuredQuery, UpdateDocumentRequest,
    },
    service::{
        auth::{Credentials, ServiceAccountKey},
        create_channel, Target,
    },
    Fields,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use std::path::Path;
use tonic::{metadata::MetadataValue, Request};
use tracing::{debug, info, trace};

/// A [`DatabaseClient`] backed by Cloud Firestore (or its emulator) over gRPC.
pub struct FirestoreClient {
    config: ClientConfig,
    session: Option<Session>,
}

struct Session {
    grpc: GrpcClient,
    credentials: Credentials,
    database: DatabaseName,
    scopes: Vec<String>,
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Releasing Firestore session for {}", self.database.name());
    }
}

impl Default for FirestoreClient {
    fn default() -> Self {
        FirestoreClient::new()
    }
}

impl FirestoreClient {
    /// An unconnected client configured from the environment.
    pub fn new() -> Self {
        FirestoreClient::with_config(ClientConfig::from_env())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        FirestoreClient {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Database of the open session.
    pub fn database(&self) -> Option<&DatabaseName> {
        self.session.as_ref().map(|session| &session.database)
    }

    fn default_target(&self) -> (Target, Option<Credentials>) {
        match self.config.emulator_host {
            Some(ref host) => (Target::plaintext(host), Some(Credentials::Emulator)),
            None => (Target::tls(&self.config.domain), None),
        }
    }

    /// Drops the open session, if any, before a new one is attempted.
    fn release(&mut self) {
        if self.session.take().is_some() {
            info!("Releasing the open session before connecting again");
        }
    }

    async fn open(
        &mut self,
        target: Target,
        credentials: Credentials,
        database: DatabaseName,
    ) -> Result<()> {
        // Fail at init rather than on the first request when credentials are unusable.
        credentials.authorization(&self.config.scopes()).await?;

        let channel = create_channel(&target, &self.config).await?;
        info!(
            "Connected to {} for {} using {:?}",
            target.uri,
            database.name(),
            credentials
        );
        self.session = Some(Session {
            grpc: GrpcClient::new(channel),
            credentials,
            database,
            scopes: self.config.scopes.clone(),
        });
        Ok(())
    }

    fn session(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or(Error::NotConnected)
    }
}

#[async_trait]
impl DatabaseClient for FirestoreClient {
    async fn init_with_service_account(&mut self, credentials_path: &Path) -> Result<()> {
        info!("Initializing Firestore client with service account {:?}", credentials_path);
        self.release();
        let key = ServiceAccountKey::from_file(credentials_path).await?;
        let database = DatabaseName::new(key.project_id.clone(), self.config.database_id.clone());
        let (target, emulator) = self.default_target();
        let credentials = match emulator {
            Some(credentials) => credentials,
            None => Credentials::service_account(&key)?,
        };
        self.open(target, credentials, database).await
    }

    async fn init_with_project_id(&mut self, project_id: &str) -> Result<()> {
        info!("Initializing Firestore client for project {}", project_id);
        self.release();
        validate_project_id(project_id)?;
        let database = DatabaseName::new(project_id, self.config.database_id.clone());
        let (target, emulator) = self.default_target();
        let credentials = match emulator {
            Some(credentials) => credentials,
            None => Credentials::ambient().await?,
        };
        self.open(target, credentials, database).await
    }

    async fn init_with_database_url(&mut self, database_url: &str) -> Result<()> {
        info!("Initializing Firestore client with database url {}", database_url);
        self.release();
        let url = DatabaseUrl::parse(database_url)?;
        let database = DatabaseName::new(url.project_id.clone(), url.database_id.clone());
        let (target, credentials) = match url.scheme {
            Scheme::Http => (Target::plaintext(&url.authority), Credentials::Emulator),
            Scheme::Https => (
                Target {
                    uri: url.endpoint(),
                    tls_domain: Some(url.host().to_string()),
                },
                Credentials::ambient().await?,
            ),
        };
        self.open(target, credentials, database).await
    }

    async fn execute(&mut self, collection: &str, operation: Operation) -> Result<Response> {
        let session = self.session()?;
        validate_collection_name(collection)?;
        operation.validate()?;
        debug!("Executing {} on collection {}", operation.kind(), collection);

        let reference = session.database.collection(collection);
        match operation {
            Operation::Get { document_id } => {
                let document = session.get_document(&reference.doc(document_id)).await?;
                Ok(Response::Document(document))
            }
            Operation::Query(q) => {
                let documents = session
                    .run_query(&reference, query::structured_query(collection, q))
                    .await?;
                if documents.is_empty() && !session.collection_exists(&reference).await? {
                    return Err(Error::NotFound(format!("collection {}", collection)));
                }
                Ok(Response::Documents(documents))
            }
            Operation::Insert {
                document_id,
                fields,
            } => {
                let document = session
                    .create_document(&reference, document_id.unwrap_or_default(), fields)
                    .await?;
                Ok(Response::Written(document))
            }
            Operation::Update {
                document_id,
                fields,
            } => {
                let document = session
                    .update_document(&reference.doc(document_id), fields)
                    .await?;
                Ok(Response::Written(document))
            }
            Operation::Delete { document_id } => {
                if !session.collection_exists(&reference).await? {
                    return Err(Error::NotFound(format!("collection {}", collection)));
                }
                session.delete_document(&reference.doc(document_id)).await?;
                Ok(Response::Deleted)
            }
        }
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let page_size = self.config.page_size;
        let session = self.session()?;
        let parent = session.database.documents_root();

        let mut collection_ids = Vec::new();
        let mut page_token = String::new();
        loop {
            let request = session
                .request(ListCollectionIdsRequest {
                    parent: parent.clone(),
                    page_size,
                    page_token,
                })
                .await?;
            let response = session.grpc.list_collection_ids(request).await?.into_inner();
            trace!("Received {} collection ids", response.collection_ids.len());
            collection_ids.extend(response.collection_ids);
            if response.next_page_token.is_empty() {
                break;
            }
            page_token = response.next_page_token;
        }
        Ok(collection_ids)
    }

    async fn close(&mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => {
                info!("Closing Firestore session for {}", session.database.name());
                Ok(())
            }
            None => Err(Error::NotConnected),
        }
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }
}

/// Wraps `message` in a request carrying the session's auth and routing metadata.
async fn authorized<T>(
    credentials: &Credentials,
    scopes: &[String],
    database: &DatabaseName,
    message: T,
) -> Result<Request<T>> {
    let scopes: Vec<&str> = scopes.iter().map(String::as_str).collect();
    let authorization = credentials.authorization(&scopes).await?;
    let prefix = MetadataValue::try_from(database.name().as_str())?;

    let mut request = Request::new(message);
    request.metadata_mut().insert("authorization", authorization);
    request
        .metadata_mut()
        .insert("google-cloud-resource-prefix", prefix);
    Ok(request)
}

impl Session {
    async fn request<T>(&mut self, message: T) -> Result<Request<T>> {
        authorized(&self.credentials, &self.scopes, &self.database, message).await
    }

    async fn get_document(&mut self, reference: &DocumentReference) -> Result<crate::Document> {
        let request = self
            .request(GetDocumentRequest {
                name: reference.name(),
                ..Default::default()
            })
            .await?;
        let response = self.grpc.get_document(request).await?;
        Ok(convert::document_from_proto(response.into_inner()))
    }

    async fn run_query(
        &mut self,
        reference: &CollectionReference,
        structured_query: StructuredQuery,
    ) -> Result<Vec<crate::Document>> {
        let request = self
            .request(RunQueryRequest {
                parent: reference.parent_name(),
                query_type: Some(QueryType::StructuredQuery(structured_query)),
            })
            .await?;
        let stream = self.grpc.run_query(request).await?.into_inner();
        let responses: Vec<RunQueryResponse> = stream.try_collect().await?;
        Ok(responses
            .into_iter()
            .filter_map(|response| response.document)
            .map(convert::document_from_proto)
            .collect())
    }

    async fn collection_exists(&mut self, reference: &CollectionReference) -> Result<bool> {
        let documents = self
            .run_query(reference, query::probe(reference.id()))
            .await?;
        Ok(!documents.is_empty())
    }

    async fn create_document(
        &mut self,
        reference: &CollectionReference,
        document_id: String,
        fields: Fields,
    ) -> Result<crate::Document> {
        let request = self
            .request(CreateDocumentRequest {
                parent: reference.parent_name(),
                collection_id: reference.id().to_string(),
                document_id,
                document: Some(Document {
                    fields: convert::fields_to_proto(fields),
                    ..Default::default()
                }),
                mask: None,
            })
            .await?;
        let response = self.grpc.create_document(request).await?;
        Ok(convert::document_from_proto(response.into_inner()))
    }

    async fn update_document(
        &mut self,
        reference: &DocumentReference,
        fields: Fields,
    ) -> Result<crate::Document> {
        let mut field_paths: Vec<String> = fields
            .keys()
            .map(|key| field_path::quote_segment(key))
            .collect();
        field_paths.sort();
        let request = self
            .request(UpdateDocumentRequest {
                document: Some(Document {
                    name: reference.name(),
                    fields: convert::fields_to_proto(fields),
                    ..Default::default()
                }),
                update_mask: Some(DocumentMask { field_paths }),
                mask: None,
                current_document: Some(Precondition {
                    condition_type: Some(ConditionType::Exists(true)),
                }),
            })
            .await?;
        let response = self.grpc.update_document(request).await?;
        Ok(convert::document_from_proto(response.into_inner()))
    }

    async fn delete_document(&mut self, reference: &DocumentReference) -> Result<()> {
        let request = self
            .request(DeleteDocumentRequest {
                name: reference.name(),
                current_document: None,
            })
            .await?;
        self.grpc.delete_document(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FirestoreClient;
    use crate::{config::ClientConfig, DatabaseClient, Error, Operation};
    use std::{path::Path, time::Duration};

    fn client() -> FirestoreClient {
        FirestoreClient::with_config(
            ClientConfig::default().with_connect_timeout(Duration::from_millis(500)),
        )
    }

    #[tokio::test]
    async fn requires_a_session() {
        let mut client = client();
        assert!(!client.is_connected());
        assert_eq!(
            client.execute("users", Operation::get("ada")).await,
            Err(Error::NotConnected)
        );
        assert_eq!(client.list_tables().await, Err(Error::NotConnected));
        for _ in 0..100 {
            assert_eq!(client.close().await, Err(Error::NotConnected));
        }
    }

    #[tokio::test]
    async fn init_failures_leave_client_unconnected() {
        let mut client = client();

        let err = client
            .init_with_service_account(Path::new("/nonexistent/key.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)), "{:?}", err);

        let err = client.init_with_project_id("").await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)), "{:?}", err);

        let err = client.init_with_database_url("nonsense").await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)), "{:?}", err);

        let err = client
            .init_with_database_url("http://127.0.0.1:9/projects/demo-project")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connection(_)), "{:?}", err);

        assert!(!client.is_connected());
        assert!(client.database().is_none());
    }
}
