use super::TraceKey;
use crate::Value;
use serde::de;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, PartialEq)]
pub enum Error {
    Message(String),

    ExpectedBoolean(TraceKey, Value),
    ExpectedInteger(TraceKey, Value),
    ExpectedDouble(TraceKey, Value),
    ExpectedString(TraceKey, Value),
    ExpectedBytes(TraceKey, Value),
    ExpectedNull(TraceKey, Value),
    ExpectedArray(TraceKey, Value),
    ExpectedMap(TraceKey, Value),
    ExpectedEnum(TraceKey, Value),
    CouldNotConvertNumber(TraceKey, Value),
    ExpectedArrayEnd(TraceKey),
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Error {
    fn expected(f: &mut fmt::Formatter, kind: &str, key: &TraceKey, value: &Value) -> fmt::Result {
        write!(
            f,
            "a {} value was expected for {}, but it was {} {}",
            kind,
            key,
            value.type_name(),
            value
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) => f.write_str(msg),
            Error::ExpectedBoolean(key, value) => Error::expected(f, "boolean", key, value),
            Error::ExpectedInteger(key, value) => Error::expected(f, "integer", key, value),
            Error::ExpectedDouble(key, value) => Error::expected(f, "double", key, value),
            Error::ExpectedString(key, value) => Error::expected(f, "string", key, value),
            Error::ExpectedBytes(key, value) => Error::expected(f, "bytes", key, value),
            Error::ExpectedNull(key, value) => Error::expected(f, "null", key, value),
            Error::ExpectedArray(key, value) => Error::expected(f, "array", key, value),
            Error::ExpectedMap(key, value) => Error::expected(f, "map", key, value),
            Error::ExpectedEnum(key, value) => Error::expected(f, "enum", key, value),
            Error::CouldNotConvertNumber(key, value) => write!(
                f,
                "could not convert {}, the value of {}, to the expected type",
                value, key
            ),
            Error::ExpectedArrayEnd(key) => {
                write!(f, "the length of the array is invalid. key: {}", key)
            }
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}
