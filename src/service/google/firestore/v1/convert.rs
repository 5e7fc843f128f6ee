use super::models::DocumentReference;
use crate::proto::google::{
    firestore::v1::{self as proto, value::ValueType, ArrayValue, MapValue},
    r#type::LatLng,
};
use crate::{Document, Fields, GeoPoint, Timestamp, Value};
use std::collections::HashMap;

pub(crate) fn value_to_proto(value: Value) -> proto::Value {
    let value_type = match value {
        Value::Null => ValueType::NullValue(prost_types::NullValue::NullValue as i32),
        Value::Boolean(b) => ValueType::BooleanValue(b),
        Value::Integer(i) => ValueType::IntegerValue(i),
        Value::Double(d) => ValueType::DoubleValue(d),
        Value::Timestamp(t) => ValueType::TimestampValue(timestamp_to_proto(t)),
        Value::String(s) => ValueType::StringValue(s),
        Value::Bytes(b) => ValueType::BytesValue(b),
        Value::Reference(r) => ValueType::ReferenceValue(r),
        Value::GeoPoint(p) => ValueType::GeoPointValue(LatLng {
            latitude: p.latitude,
            longitude: p.longitude,
        }),
        Value::Array(values) => ValueType::ArrayValue(ArrayValue {
            values: values.into_iter().map(value_to_proto).collect(),
        }),
        Value::Map(fields) => ValueType::MapValue(MapValue {
            fields: fields_to_proto(fields),
        }),
    };
    proto::Value {
        value_type: Some(value_type),
    }
}

/// A value without a type is read as null.
pub(crate) fn value_from_proto(value: proto::Value) -> Value {
    match value.value_type {
        None | Some(ValueType::NullValue(_)) => Value::Null,
        Some(ValueType::BooleanValue(b)) => Value::Boolean(b),
        Some(ValueType::IntegerValue(i)) => Value::Integer(i),
        Some(ValueType::DoubleValue(d)) => Value::Double(d),
        Some(ValueType::TimestampValue(t)) => Value::Timestamp(timestamp_from_proto(t)),
        Some(ValueType::StringValue(s)) => Value::String(s),
        Some(ValueType::BytesValue(b)) => Value::Bytes(b),
        Some(ValueType::ReferenceValue(r)) => Value::Reference(r),
        Some(ValueType::GeoPointValue(p)) => Value::GeoPoint(GeoPoint::new(p.latitude, p.longitude)),
        Some(ValueType::ArrayValue(array)) => {
            Value::Array(array.values.into_iter().map(value_from_proto).collect())
        }
        Some(ValueType::MapValue(map)) => Value::Map(fields_from_proto(map.fields)),
    }
}

pub(crate) fn fields_to_proto(fields: Fields) -> HashMap<String, proto::Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key, value_to_proto(value)))
        .collect()
}

pub(crate) fn fields_from_proto(fields: HashMap<String, proto::Value>) -> Fields {
    fields
        .into_iter()
        .map(|(key, value)| (key, value_from_proto(value)))
        .collect()
}

pub(crate) fn document_from_proto(document: proto::Document) -> Document {
    Document {
        id: DocumentReference::id_from_name(&document.name).to_string(),
        fields: fields_from_proto(document.fields),
        create_time: document.create_time.map(timestamp_from_proto),
        update_time: document.update_time.map(timestamp_from_proto),
    }
}

fn timestamp_to_proto(timestamp: Timestamp) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: timestamp.seconds,
        nanos: timestamp.nanos,
    }
}

fn timestamp_from_proto(timestamp: prost_types::Timestamp) -> Timestamp {
    Timestamp::new(timestamp.seconds, timestamp.nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    #[test]
    fn nested_values_survive_conversion() {
        let value = Value::map(vec![
            ("name", Value::from("ada")),
            ("born", Value::Timestamp(Timestamp::new(-4_000_000_000, 0))),
            ("home", Value::GeoPoint(GeoPoint::new(51.5, -0.12))),
            ("tags", Value::array(vec![Value::Null, Value::from(1.5)])),
            ("ref", Value::Reference("projects/p/databases/d/documents/a/b".into())),
            ("raw", Value::Bytes(vec![7, 8])),
        ]);
        assert_eq!(value_from_proto(value_to_proto(value.clone())), value);
    }

    #[test]
    fn untyped_value_reads_as_null() {
        assert_eq!(value_from_proto(proto::Value { value_type: None }), Value::Null);
    }

    #[test]
    fn document_id_comes_from_resource_name() {
        let document = proto::Document {
            name: "projects/p/databases/(default)/documents/users/ada".into(),
            fields: fields_to_proto(fields! { "age" => 36 }),
            create_time: Some(prost_types::Timestamp { seconds: 5, nanos: 0 }),
            update_time: None,
        };
        let document = document_from_proto(document);
        assert_eq!(document.id, "ada");
        assert_eq!(document.get("age"), Some(&Value::Integer(36)));
        assert_eq!(document.create_time, Some(Timestamp::new(5, 0)));
    }
}
