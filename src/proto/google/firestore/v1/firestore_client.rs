use super::{
    CreateDocumentRequest, DeleteDocumentRequest, Document, GetDocumentRequest,
    ListCollectionIdsRequest, ListCollectionIdsResponse, RunQueryRequest, RunQueryResponse,
    UpdateDocumentRequest,
};
use http::uri::PathAndQuery;
use tonic::{
    client::Grpc, codec::ProstCodec, codec::Streaming, transport::Channel, Code, Request, Response,
    Status,
};

/// Client for the subset of `google.firestore.v1.Firestore` this crate needs.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    inner: Grpc<Channel>,
}

macro_rules! unary {
    ($name:ident, $request:ty, $response:ty, $path:literal) => {
        pub async fn $name(
            &mut self,
            request: Request<$request>,
        ) -> Result<Response<$response>, Status> {
            self.ready().await?;
            let codec: ProstCodec<$request, $response> = ProstCodec::default();
            let path = PathAndQuery::from_static($path);
            self.inner.unary(request, path, codec).await
        }
    };
}

impl FirestoreClient {
    pub fn new(channel: Channel) -> Self {
        FirestoreClient {
            inner: Grpc::new(channel),
        }
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::new(Code::Unavailable, format!("Service was not ready: {}", e)))
    }

    unary!(
        get_document,
        GetDocumentRequest,
        Document,
        "/google.firestore.v1.Firestore/GetDocument"
    );
    unary!(
        create_document,
        CreateDocumentRequest,
        Document,
        "/google.firestore.v1.Firestore/CreateDocument"
    );
    unary!(
        update_document,
        UpdateDocumentRequest,
        Document,
        "/google.firestore.v1.Firestore/UpdateDocument"
    );
    unary!(
        delete_document,
        DeleteDocumentRequest,
        (),
        "/google.firestore.v1.Firestore/DeleteDocument"
    );
    unary!(
        list_collection_ids,
        ListCollectionIdsRequest,
        ListCollectionIdsResponse,
        "/google.firestore.v1.Firestore/ListCollectionIds"
    );

    pub async fn run_query(
        &mut self,
        request: Request<RunQueryRequest>,
    ) -> Result<Response<Streaming<RunQueryResponse>>, Status> {
        self.ready().await?;
        let codec: ProstCodec<RunQueryRequest, RunQueryResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static("/google.firestore.v1.Firestore/RunQuery");
        self.inner.server_streaming(request, path, codec).await
    }
}
