use serde::de::DeserializeOwned;
use std::{collections::HashMap, fmt::Display, iter::FromIterator};

/// Top-level fields of a document, or the entries of a map value.
pub type Fields = HashMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Timestamp { seconds, nanos }
    }

    pub fn now() -> Self {
        let elapsed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp {
            seconds: elapsed.as_secs() as i64,
            nanos: elapsed.subsec_nanos() as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(Timestamp),
    String(String),
    Bytes(Vec<u8>),
    /// Resource name of another document.
    Reference(String),
    GeoPoint(GeoPoint),
    Array(Vec<Value>),
    Map(Fields),
}

impl Value {
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(values.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Reference(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Timestamps and geo points are exposed to decoders as maps.
    pub(crate) fn into_map(self) -> Option<Fields> {
        match self {
            Value::Map(fields) => Some(fields),
            Value::GeoPoint(point) => Some(HashMap::from_iter(vec![
                ("latitude".to_string(), Value::Double(point.latitude)),
                ("longitude".to_string(), Value::Double(point.longitude)),
            ])),
            Value::Timestamp(timestamp) => Some(HashMap::from_iter(vec![
                ("seconds".to_string(), Value::Integer(timestamp.seconds)),
                ("nanos".to_string(), Value::Integer(timestamp.nanos.into())),
            ])),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::Timestamp(_) => "timestamp",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Reference(_) => "reference",
            Value::GeoPoint(_) => "geo point",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}

/// Resolves a dotted field path such as `address.city` against `fields`.
pub fn lookup<'a>(fields: &'a Fields, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?;
    for segment in segments {
        current = current.as_map()?.get(segment)?;
    }
    Some(current)
}

/// Writes `value` at a dotted field path, creating intermediate maps.
pub(crate) fn insert_path(fields: &mut Fields, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            fields.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = fields
                .entry(head.to_string())
                .or_insert_with(|| Value::Map(Fields::new()));
            if !matches!(entry, Value::Map(_)) {
                *entry = Value::Map(Fields::new());
            }
            if let Value::Map(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{:?}", value),
            Value::Timestamp(value) => write!(f, "Timestamp({}.{:09})", value.seconds, value.nanos),
            Value::String(value) => write!(f, "{:?}", value),
            Value::Bytes(value) => write!(f, "Bytes({:?})", value),
            Value::Reference(value) => write!(f, "Reference({})", value),
            Value::GeoPoint(value) => {
                write!(f, "GeoPoint({}, {})", value.latitude, value.longitude)
            }
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Map(fields) => {
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, fields[key])?;
                }
                write!(f, "}}")
            }
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_from!(
    bool => Boolean,
    i32 => Integer,
    i64 => Integer,
    u32 => Integer,
    f32 => Double,
    f64 => Double,
    String => String,
    &str => String,
    Timestamp => Timestamp,
    GeoPoint => GeoPoint,
    Vec<u8> => Bytes,
    Vec<Value> => Array,
    Fields => Map,
);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A document as returned by a backend: its id within the collection plus its fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
    pub create_time: Option<Timestamp>,
    pub update_time: Option<Timestamp>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Document {
            id: id.into(),
            fields,
            create_time: None,
            update_time: None,
        }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.fields, path)
    }

    /// Deserializes the document fields into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> crate::serde_document::Result<T> {
        crate::serde_document::from_fields(self.fields.clone())
    }
}

/// Builds a [`Fields`] map from `key => value` pairs.
#[macro_export]
macro_rules! fields {
    () => { $crate::Fields::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.insert(::std::string::String::from($key), $crate::Value::from($value)); )+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_nested_paths() {
        let fields = crate::fields! {
            "name" => "ada",
            "address" => Value::map(vec![("city", Value::from("London"))]),
        };
        assert_eq!(lookup(&fields, "name"), Some(&Value::from("ada")));
        assert_eq!(lookup(&fields, "address.city"), Some(&Value::from("London")));
        assert_eq!(lookup(&fields, "address.zip"), None);
        assert_eq!(lookup(&fields, "name.first"), None);
    }

    #[test]
    fn insert_path_creates_intermediate_maps() {
        let mut fields = Fields::new();
        insert_path(&mut fields, "a.b.c", Value::from(1));
        assert_eq!(lookup(&fields, "a.b.c"), Some(&Value::Integer(1)));

        insert_path(&mut fields, "a", Value::from(true));
        insert_path(&mut fields, "a.x", Value::from(2));
        assert_eq!(lookup(&fields, "a.x"), Some(&Value::Integer(2)));
    }

    #[test]
    fn timestamps_and_geo_points_expand_to_maps() {
        let map = Value::Timestamp(Timestamp::new(10, 5)).into_map().unwrap();
        assert_eq!(map["seconds"], Value::Integer(10));
        assert_eq!(map["nanos"], Value::Integer(5));

        let map = Value::GeoPoint(GeoPoint::new(1.5, -2.0)).into_map().unwrap();
        assert_eq!(map["latitude"], Value::Double(1.5));
        assert_eq!(map["longitude"], Value::Double(-2.0));

        assert!(Value::from("x").into_map().is_none());
    }

    #[test]
    fn display_sorts_map_keys() {
        let value = Value::map(vec![("b", Value::from(2)), ("a", Value::Null)]);
        assert_eq!(value.to_string(), "{a: null, b: 2}");
        assert_eq!(
            Value::array(vec![Value::from("x"), Value::from(1.5)]).to_string(),
            "[\"x\", 1.5]"
        );
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Integer(3));
    }
}
