use crate::{
    error::{Error, Result},
    serde_document, Document, Fields, Value,
};
use serde::de::DeserializeOwned;

/// Upper bound on the elements of an `in`, `not-in` or `array-contains-any` filter.
pub const MAX_DISJUNCTION_VALUES: usize = 30;
const MAX_ID_BYTES: usize = 1500;

/// What [`DatabaseClient::execute`](crate::DatabaseClient::execute) should do to a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Get {
        document_id: String,
    },
    Query(Query),
    /// Creates a document; the backend assigns an id when `document_id` is `None`.
    Insert {
        document_id: Option<String>,
        fields: Fields,
    },
    /// Merges top-level `fields` into an existing document.
    Update {
        document_id: String,
        fields: Fields,
    },
    Delete {
        document_id: String,
    },
}

impl Operation {
    pub fn get(document_id: impl Into<String>) -> Self {
        Operation::Get {
            document_id: document_id.into(),
        }
    }

    pub fn insert(fields: Fields) -> Self {
        Operation::Insert {
            document_id: None,
            fields,
        }
    }

    pub fn insert_with_id(document_id: impl Into<String>, fields: Fields) -> Self {
        Operation::Insert {
            document_id: Some(document_id.into()),
            fields,
        }
    }

    pub fn update(document_id: impl Into<String>, fields: Fields) -> Self {
        Operation::Update {
            document_id: document_id.into(),
            fields,
        }
    }

    pub fn delete(document_id: impl Into<String>) -> Self {
        Operation::Delete {
            document_id: document_id.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Get { .. } => "get",
            Operation::Query(_) => "query",
            Operation::Insert { .. } => "insert",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
        }
    }

    /// Whether the operation may create the collection it targets.
    pub fn creates_collection(&self) -> bool {
        matches!(self, Operation::Insert { .. })
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Operation::Get { document_id } | Operation::Delete { document_id } => {
                validate_document_id(document_id)
            }
            Operation::Query(query) => query.validate(),
            Operation::Insert {
                document_id,
                fields,
            } => {
                if let Some(id) = document_id {
                    validate_document_id(id)?;
                }
                validate_fields(fields)
            }
            Operation::Update {
                document_id,
                fields,
            } => {
                validate_document_id(document_id)?;
                if fields.is_empty() {
                    return Err(Error::InvalidOperation(
                        "update requires at least one field".into(),
                    ));
                }
                validate_fields(fields)
            }
        }
    }
}

impl From<Query> for Operation {
    fn from(query: Query) -> Self {
        Operation::Query(query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    ArrayContains,
    In,
    ArrayContainsAny,
    NotIn,
    IsNull,
    IsNotNull,
}

impl FilterOp {
    fn takes_array(self) -> bool {
        matches!(self, FilterOp::In | FilterOp::NotIn | FilterOp::ArrayContainsAny)
    }

    /// Range, `!=` and `not-in` filters, which constrain a query's ordering.
    pub(crate) fn is_inequality(self) -> bool {
        matches!(
            self,
            FilterOp::LessThan
                | FilterOp::LessThanOrEqual
                | FilterOp::GreaterThan
                | FilterOp::GreaterThanOrEqual
                | FilterOp::NotEqual
                | FilterOp::NotIn
        )
    }

    pub fn parse(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "<" => FilterOp::LessThan,
            "<=" => FilterOp::LessThanOrEqual,
            ">" => FilterOp::GreaterThan,
            ">=" => FilterOp::GreaterThanOrEqual,
            "==" | "=" => FilterOp::Equal,
            "!=" => FilterOp::NotEqual,
            "array-contains" => FilterOp::ArrayContains,
            "in" => FilterOp::In,
            "array-contains-any" => FilterOp::ArrayContainsAny,
            "not-in" => FilterOp::NotIn,
            "is-null" => FilterOp::IsNull,
            "is-not-null" => FilterOp::IsNotNull,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A conjunction of filters over one collection, with ordering and paging.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Vec<OrderBy>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub select: Option<Vec<String>>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn is_null(self, field: impl Into<String>) -> Self {
        self.filter(field, FilterOp::IsNull, Value::Null)
    }

    pub fn is_not_null(self, field: impl Into<String>) -> Self {
        self.filter(field, FilterOp::IsNotNull, Value::Null)
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn select<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<()> {
        for filter in &self.filters {
            validate_field_path(&filter.field)?;
            if filter.op.takes_array() {
                match filter.value.as_array() {
                    Some(values) if !values.is_empty() && values.len() <= MAX_DISJUNCTION_VALUES => {}
                    _ => {
                        return Err(Error::InvalidOperation(format!(
                            "{:?} filter on {} needs a non-empty array of at most {} values",
                            filter.op, filter.field, MAX_DISJUNCTION_VALUES
                        )))
                    }
                }
            }
        }
        for order in &self.order_by {
            validate_field_path(&order.field)?;
        }
        if let Some(paths) = &self.select {
            for path in paths {
                validate_field_path(path)?;
            }
        }
        let not_filters = self
            .filters
            .iter()
            .filter(|f| matches!(f.op, FilterOp::NotEqual | FilterOp::NotIn))
            .count();
        if not_filters > 1 {
            return Err(Error::InvalidOperation(
                "a query may use at most one != or not-in filter".into(),
            ));
        }
        Ok(())
    }
}

/// Backend response to an executed [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Document(Document),
    Documents(Vec<Document>),
    Written(Document),
    Deleted,
}

impl Response {
    pub fn into_documents(self) -> Vec<Document> {
        match self {
            Response::Document(document) | Response::Written(document) => vec![document],
            Response::Documents(documents) => documents,
            Response::Deleted => Vec::new(),
        }
    }

    pub fn into_document(self) -> Option<Document> {
        match self {
            Response::Document(document) | Response::Written(document) => Some(document),
            Response::Documents(documents) => documents.into_iter().next(),
            Response::Deleted => None,
        }
    }

    /// Deserializes every returned document into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> serde_document::Result<Vec<T>> {
        self.into_documents()
            .into_iter()
            .map(|document| serde_document::from_fields(document.fields))
            .collect()
    }
}

fn validate_id(kind: &str, id: &str) -> Result<()> {
    let invalid = |reason: &str| Err(Error::InvalidOperation(format!("{} {:?} {}", kind, id, reason)));
    if id.is_empty() {
        return invalid("is empty");
    }
    if id.len() > MAX_ID_BYTES {
        return invalid("is longer than 1500 bytes");
    }
    if id.contains('/') {
        return invalid("contains '/'");
    }
    if id == "." || id == ".." {
        return invalid("is reserved");
    }
    if id.len() >= 4 && id.starts_with("__") && id.ends_with("__") {
        return invalid("matches the reserved pattern __.*__");
    }
    Ok(())
}

pub fn validate_collection_name(name: &str) -> Result<()> {
    validate_id("collection name", name)
}

pub fn validate_document_id(id: &str) -> Result<()> {
    validate_id("document id", id)
}

fn validate_field_path(path: &str) -> Result<()> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(Error::InvalidOperation(format!(
            "field path {:?} is empty or has an empty segment",
            path
        )));
    }
    Ok(())
}

fn validate_fields(fields: &Fields) -> Result<()> {
    for (key, value) in fields {
        if key.is_empty() {
            return Err(Error::InvalidOperation("field names must not be empty".into()));
        }
        if let Value::Map(children) = value {
            validate_fields(children)?;
        }
    }
    Ok(())
}
