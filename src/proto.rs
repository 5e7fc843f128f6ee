//! Protobuf messages and gRPC client stubs for the Google APIs used by this crate.
//!
//! Written against `google/firestore/v1/{document,query,firestore,common}.proto`
//! and `google/type/latlng.proto`, keeping field tags identical to upstream.

pub(crate) mod google;
