//! Decodes document fields into any `serde::Deserialize` type.

mod common;
mod error;

pub use common::TraceKey;
pub use error::{Error, Result};

use crate::{Fields, Value};
use serde::de::{
    self, value::StringDeserializer, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer,
    MapAccess, SeqAccess, VariantAccess, Visitor,
};
use std::convert::TryFrom;

pub fn from_fields<T>(fields: Fields) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::new(TraceKey::Root, Value::Map(fields)))
}

pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::new(TraceKey::Root, value))
}

pub struct Deserializer {
    key: TraceKey,
    value: Value,
}

impl Deserializer {
    fn new(key: TraceKey, value: Value) -> Self {
        Deserializer { key, value }
    }

    fn map_access(key: TraceKey, fields: Fields) -> MapDeserializer {
        let mut entries: Vec<(String, Value)> = fields.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        MapDeserializer {
            key,
            entries: entries.into_iter(),
            pending: None,
        }
    }

    fn integer(&self) -> Result<i64> {
        match self.value {
            Value::Integer(i) => Ok(i),
            _ => Err(Error::ExpectedInteger(self.key.clone(), self.value.clone())),
        }
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident: $t:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                let i = self.integer()?;
                match <$t>::try_from(i) {
                    Ok(n) => visitor.$visit(n),
                    Err(_) => Err(Error::CouldNotConvertNumber(self.key, self.value)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Double(d) => visitor.visit_f64(d),
            Value::String(s) | Value::Reference(s) => visitor.visit_string(s),
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            Value::Array(_) => self.deserialize_seq(visitor),
            Value::Map(_) | Value::Timestamp(_) | Value::GeoPoint(_) => {
                self.deserialize_map(visitor)
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Boolean(b) => visitor.visit_bool(b),
            value => Err(Error::ExpectedBoolean(self.key, value)),
        }
    }

    deserialize_integer!(
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
    );

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Double(d) => visitor.visit_f32(d as f32),
            Value::Integer(i) => visitor.visit_f32(i as f32),
            value => Err(Error::ExpectedDouble(self.key, value)),
        }
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Double(d) => visitor.visit_f64(d),
            Value::Integer(i) => visitor.visit_f64(i as f64),
            value => Err(Error::ExpectedDouble(self.key, value)),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) | Value::Reference(s) => visitor.visit_string(s),
            value => Err(Error::ExpectedString(self.key, value)),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            Value::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            value => Err(Error::ExpectedBytes(self.key, value)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            value => Err(Error::ExpectedNull(self.key, value)),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Array(values) => {
                let mut seq = SeqDeserializer {
                    key: self.key.clone(),
                    values: values.into_iter().enumerate(),
                };
                let result = visitor.visit_seq(&mut seq)?;
                if seq.values.len() > 0 {
                    return Err(Error::ExpectedArrayEnd(self.key));
                }
                Ok(result)
            }
            value => Err(Error::ExpectedArray(self.key, value)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            value @ (Value::Map(_) | Value::Timestamp(_) | Value::GeoPoint(_)) => {
                let fields = value.into_map().unwrap_or_default();
                visitor.visit_map(Deserializer::map_access(self.key, fields))
            }
            value => Err(Error::ExpectedMap(self.key, value)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => {
                let variant: StringDeserializer<Error> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Map(fields) if fields.len() == 1 => {
                let (variant, value) = fields
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::Message("empty enum map".into()))?;
                visitor.visit_enum(EnumDeserializer {
                    key: self.key.child(variant.clone()),
                    variant,
                    value,
                })
            }
            value => Err(Error::ExpectedEnum(self.key, value)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqDeserializer {
    key: TraceKey,
    values: std::iter::Enumerate<std::vec::IntoIter<Value>>,
}

impl<'de> SeqAccess<'de> for &mut SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.values.next() {
            None => Ok(None),
            Some((index, value)) => seed
                .deserialize(Deserializer::new(self.key.index(index), value))
                .map(Some),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len())
    }
}

struct MapDeserializer {
    key: TraceKey,
    entries: std::vec::IntoIter<(String, Value)>,
    pending: Option<(String, Value)>,
}

impl<'de> MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            None => Ok(None),
            Some((key, value)) => {
                self.pending = Some((key.clone(), value));
                let key: StringDeserializer<Error> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some((key, value)) => seed.deserialize(Deserializer::new(self.key.child(key), value)),
            None => Err(Error::Message("value requested before key".into())),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct EnumDeserializer {
    key: TraceKey,
    variant: String,
    value: Value,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = Deserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant: StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(variant)?;
        Ok((variant, Deserializer::new(self.key, self.value)))
    }
}

impl<'de> VariantAccess<'de> for Deserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            value => Err(Error::ExpectedNull(self.key, value)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{from_fields, from_value, Error, TraceKey};
    use crate::{fields, GeoPoint, Timestamp, Value};
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Address {
        city: String,
        zip: Option<u32>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Role {
        Admin,
        Member { since: i64 },
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct User {
        name: String,
        age: u8,
        score: f64,
        active: bool,
        tags: Vec<String>,
        address: Address,
        role: Role,
        #[serde(default)]
        nickname: Option<String>,
    }

    #[test]
    fn decodes_nested_struct() {
        let fields = fields! {
            "name" => "ada",
            "age" => 36,
            "score" => 9,
            "active" => true,
            "tags" => Value::array(vec![Value::from("math"), Value::from("engines")]),
            "address" => Value::map(vec![("city", Value::from("London")), ("zip", Value::Null)]),
            "role" => "Admin",
            "ignored" => Value::Bytes(vec![1, 2]),
        };
        let user: User = from_fields(fields).unwrap();
        assert_eq!(
            user,
            User {
                name: "ada".into(),
                age: 36,
                score: 9.0,
                active: true,
                tags: vec!["math".into(), "engines".into()],
                address: Address {
                    city: "London".into(),
                    zip: None
                },
                role: Role::Admin,
                nickname: None,
            }
        );
    }

    #[test]
    fn decodes_struct_variant_from_single_entry_map() {
        let value = Value::map(vec![(
            "Member",
            Value::map(vec![("since", Value::from(2015))]),
        )]);
        let role: Role = from_value(value).unwrap();
        assert_eq!(role, Role::Member { since: 2015 });
    }

    #[test]
    fn decodes_timestamp_and_geo_point_as_structs() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Seconds {
            seconds: i64,
            nanos: i32,
        }
        #[derive(Deserialize, Debug, PartialEq)]
        struct Point {
            latitude: f64,
            longitude: f64,
        }
        #[derive(Deserialize, Debug, PartialEq)]
        struct Place {
            at: Seconds,
            location: Point,
        }

        let fields = fields! {
            "at" => Timestamp::new(100, 7),
            "location" => GeoPoint::new(35.0, 139.5),
        };
        let place: Place = from_fields(fields).unwrap();
        assert_eq!(place.at, Seconds { seconds: 100, nanos: 7 });
        assert_eq!(
            place.location,
            Point {
                latitude: 35.0,
                longitude: 139.5
            }
        );
    }

    #[test]
    fn decodes_bytes() {
        #[derive(Deserialize)]
        struct Blob {
            #[serde(with = "serde_bytes")]
            data: Vec<u8>,
        }
        let blob: Blob = from_fields(fields! { "data" => vec![0u8, 1, 255] }).unwrap();
        assert_eq!(blob.data, vec![0, 1, 255]);
    }

    #[test]
    fn decodes_map_into_hash_map() {
        let counts: HashMap<String, i64> =
            from_fields(fields! { "a" => 1, "b" => 2 }).unwrap();
        assert_eq!(counts["a"], 1);
        assert_eq!(counts["b"], 2);
    }

    #[test]
    fn reports_path_of_type_mismatch() {
        let fields = fields! {
            "address" => Value::map(vec![("city", Value::from(12))]),
        };
        #[derive(Deserialize, Debug)]
        struct Holder {
            #[allow(dead_code)]
            address: Address,
        }
        let err = from_fields::<Holder>(fields).unwrap_err();
        assert_eq!(
            err,
            Error::ExpectedString(
                TraceKey::Root.child("address").child("city"),
                Value::Integer(12)
            )
        );
        assert_eq!(
            err.to_string(),
            "a string value was expected for /address/city, but it was integer 12"
        );
    }

    #[test]
    fn rejects_out_of_range_integer() {
        #[derive(Deserialize, Debug)]
        struct Small {
            #[allow(dead_code)]
            n: u8,
        }
        let err = from_fields::<Small>(fields! { "n" => 300 }).unwrap_err();
        assert_eq!(
            err,
            Error::CouldNotConvertNumber(TraceKey::Root.child("n"), Value::Integer(300))
        );
    }

    #[test]
    fn rejects_tuple_with_extra_elements() {
        let value = Value::array(vec![Value::from(1), Value::from(2), Value::from(3)]);
        let err = from_value::<(i64, i64)>(value).unwrap_err();
        assert_eq!(err, Error::ExpectedArrayEnd(TraceKey::Root));
    }
}
