pub(crate) mod firestore_client;

use std::collections::HashMap;

/// A Firestore document.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Document {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(map = "string, message", tag = "2")]
    pub fields: HashMap<String, Value>,
    #[prost(message, optional, tag = "3")]
    pub create_time: Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub update_time: Option<::prost_types::Timestamp>,
}

/// A message that can hold any of the supported value types.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Value {
    #[prost(oneof = "value::ValueType", tags = "11, 1, 2, 3, 10, 17, 18, 5, 8, 9, 6")]
    pub value_type: Option<value::ValueType>,
}

pub mod value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum ValueType {
        #[prost(enumeration = "::prost_types::NullValue", tag = "11")]
        NullValue(i32),
        #[prost(bool, tag = "1")]
        BooleanValue(bool),
        #[prost(int64, tag = "2")]
        IntegerValue(i64),
        #[prost(double, tag = "3")]
        DoubleValue(f64),
        #[prost(message, tag = "10")]
        TimestampValue(::prost_types::Timestamp),
        #[prost(string, tag = "17")]
        StringValue(String),
        #[prost(bytes = "vec", tag = "18")]
        BytesValue(Vec<u8>),
        #[prost(string, tag = "5")]
        ReferenceValue(String),
        #[prost(message, tag = "8")]
        GeoPointValue(crate::proto::google::r#type::LatLng),
        #[prost(message, tag = "9")]
        ArrayValue(super::ArrayValue),
        #[prost(message, tag = "6")]
        MapValue(super::MapValue),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ArrayValue {
    #[prost(message, repeated, tag = "1")]
    pub values: Vec<Value>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MapValue {
    #[prost(map = "string, message", tag = "1")]
    pub fields: HashMap<String, Value>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DocumentMask {
    #[prost(string, repeated, tag = "1")]
    pub field_paths: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Precondition {
    #[prost(oneof = "precondition::ConditionType", tags = "1, 2")]
    pub condition_type: Option<precondition::ConditionType>,
}

pub mod precondition {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum ConditionType {
        #[prost(bool, tag = "1")]
        Exists(bool),
        #[prost(message, tag = "2")]
        UpdateTime(::prost_types::Timestamp),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetDocumentRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub mask: Option<DocumentMask>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateDocumentRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(string, tag = "2")]
    pub collection_id: String,
    /// Empty lets the service assign an id.
    #[prost(string, tag = "3")]
    pub document_id: String,
    #[prost(message, optional, tag = "4")]
    pub document: Option<Document>,
    #[prost(message, optional, tag = "5")]
    pub mask: Option<DocumentMask>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateDocumentRequest {
    #[prost(message, optional, tag = "1")]
    pub document: Option<Document>,
    #[prost(message, optional, tag = "2")]
    pub update_mask: Option<DocumentMask>,
    #[prost(message, optional, tag = "3")]
    pub mask: Option<DocumentMask>,
    #[prost(message, optional, tag = "4")]
    pub current_document: Option<Precondition>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteDocumentRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub current_document: Option<Precondition>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunQueryRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(oneof = "run_query_request::QueryType", tags = "2")]
    pub query_type: Option<run_query_request::QueryType>,
}

pub mod run_query_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum QueryType {
        #[prost(message, tag = "2")]
        StructuredQuery(super::StructuredQuery),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunQueryResponse {
    #[prost(message, optional, tag = "1")]
    pub document: Option<Document>,
    #[prost(bytes = "vec", tag = "2")]
    pub transaction: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub read_time: Option<::prost_types::Timestamp>,
    #[prost(int32, tag = "4")]
    pub skipped_results: i32,
    #[prost(bool, tag = "6")]
    pub done: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListCollectionIdsRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(int32, tag = "2")]
    pub page_size: i32,
    #[prost(string, tag = "3")]
    pub page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListCollectionIdsResponse {
    #[prost(string, repeated, tag = "1")]
    pub collection_ids: Vec<String>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

/// A Firestore query.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StructuredQuery {
    #[prost(message, optional, tag = "1")]
    pub select: Option<structured_query::Projection>,
    #[prost(message, repeated, tag = "2")]
    pub from: Vec<structured_query::CollectionSelector>,
    #[prost(message, optional, tag = "3")]
    pub r#where: Option<structured_query::Filter>,
    #[prost(message, repeated, tag = "4")]
    pub order_by: Vec<structured_query::Order>,
    #[prost(int32, tag = "6")]
    pub offset: i32,
    #[prost(message, optional, tag = "5")]
    pub limit: Option<i32>,
}

pub mod structured_query {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CollectionSelector {
        #[prost(string, tag = "2")]
        pub collection_id: String,
        #[prost(bool, tag = "3")]
        pub all_descendants: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Filter {
        #[prost(oneof = "filter::FilterType", tags = "1, 2, 3")]
        pub filter_type: Option<filter::FilterType>,
    }

    pub mod filter {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum FilterType {
            #[prost(message, tag = "1")]
            CompositeFilter(super::CompositeFilter),
            #[prost(message, tag = "2")]
            FieldFilter(super::FieldFilter),
            #[prost(message, tag = "3")]
            UnaryFilter(super::UnaryFilter),
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CompositeFilter {
        #[prost(enumeration = "composite_filter::Operator", tag = "1")]
        pub op: i32,
        #[prost(message, repeated, tag = "2")]
        pub filters: Vec<Filter>,
    }

    pub mod composite_filter {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Operator {
            Unspecified = 0,
            And = 1,
            Or = 2,
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct FieldFilter {
        #[prost(message, optional, tag = "1")]
        pub field: Option<FieldReference>,
        #[prost(enumeration = "field_filter::Operator", tag = "2")]
        pub op: i32,
        #[prost(message, optional, tag = "3")]
        pub value: Option<super::Value>,
    }

    pub mod field_filter {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Operator {
            Unspecified = 0,
            LessThan = 1,
            LessThanOrEqual = 2,
            GreaterThan = 3,
            GreaterThanOrEqual = 4,
            Equal = 5,
            NotEqual = 6,
            ArrayContains = 7,
            In = 8,
            ArrayContainsAny = 9,
            NotIn = 10,
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UnaryFilter {
        #[prost(enumeration = "unary_filter::Operator", tag = "1")]
        pub op: i32,
        #[prost(oneof = "unary_filter::OperandType", tags = "2")]
        pub operand_type: Option<unary_filter::OperandType>,
    }

    pub mod unary_filter {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Operator {
            Unspecified = 0,
            IsNan = 2,
            IsNull = 3,
            IsNotNan = 4,
            IsNotNull = 5,
        }

        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum OperandType {
            #[prost(message, tag = "2")]
            Field(super::FieldReference),
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Order {
        #[prost(message, optional, tag = "1")]
        pub field: Option<FieldReference>,
        #[prost(enumeration = "Direction", tag = "2")]
        pub direction: i32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct FieldReference {
        #[prost(string, tag = "2")]
        pub field_path: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Projection {
        #[prost(message, repeated, tag = "2")]
        pub fields: Vec<FieldReference>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Direction {
        Unspecified = 0,
        Ascending = 1,
        Descending = 2,
    }
}
