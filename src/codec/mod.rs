//! Decoding of raw JSON documents into typed records
//!
//! Field names are matched without regard to case: `playerId`, `PlayerId`,
//! `PLAYERID` and `playerid` all decode to the same field.

pub mod events;
pub mod keys;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use events::{decode_event, decode_events_response, shape_for, PayloadShape};

/// Errors raised while turning a document into a typed record
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("{what} is not valid JSON: {source}")]
    Syntax {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("{what} does not match the expected shape: {source}")]
    Shape {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("{0} is not a JSON object")]
    NotAnObject(&'static str),

    #[error("{0} is not a JSON array")]
    NotAnArray(&'static str),

    #[error("{what} is missing required field `{field}`")]
    MissingField {
        what: &'static str,
        field: &'static str,
    },

    #[error("field `{field}` of {what} has the wrong type")]
    InvalidField {
        what: &'static str,
        field: &'static str,
    },

    #[error("event of type `{tag}` has no data payload")]
    MissingPayload { tag: String },

    #[error("failed to decode `{tag}` payload {raw}: {source}")]
    Payload {
        tag: String,
        raw: String,
        source: serde_json::Error,
    },
}

/// Parse text into a JSON value
pub fn parse(what: &'static str, text: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(text).map_err(|source| DecodeError::Syntax { what, source })
}

/// Deserialize `T` from a value, matching field names regardless of case
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    T::deserialize(keys::Folded(value))
}

/// Decode an already parsed value into `T`
pub fn decode_value<T: DeserializeOwned>(what: &'static str, value: Value) -> Result<T, DecodeError> {
    from_value(value).map_err(|source| DecodeError::Shape { what, source })
}

/// Parse and decode text into `T`
pub fn decode<T: DeserializeOwned>(what: &'static str, text: &str) -> Result<T, DecodeError> {
    decode_value(what, parse(what, text)?)
}

/// Encode a record in the same JSON layout the API uses
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}
