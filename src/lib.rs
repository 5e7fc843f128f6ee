//! Async client for Google Cloud Firestore with an in-memory stand-in.
//!
//! Both backends implement [`DatabaseClient`]: a handle is created unconnected,
//! opened with one of the `init_*` methods and released with `close`.

pub mod client;
pub mod config;
pub mod error;
pub mod operation;
pub mod serde_document;
pub mod service;
pub mod value;

mod proto;
mod util;

pub use client::DatabaseClient;
#[cfg(feature = "mocks")]
pub use client::MockDatabaseClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use operation::{Direction, Filter, FilterOp, Operation, OrderBy, Query, Response};
pub use service::google::firestore::v1::{models::DatabaseName, FirestoreClient};
pub use service::memory::MemoryClient;
pub use value::{Document, Fields, GeoPoint, Timestamp, Value};
