//! Payload codec for request bodies, stored records and responses.

use std::io::Write;

use thiserror::Error;

/// Attribute mapping carried by a resource record.
///
/// Key order is irrelevant to the protocol; `serde_json::Map` keeps keys
/// sorted, which makes the encoded output stable.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Errors raised while decoding a JSON payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload was not valid JSON.
    #[error("payload is not valid JSON: {source}")]
    Syntax {
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The payload was valid JSON but its top level was not an object.
    #[error("payload must be a JSON object, found {found}")]
    NotAnObject {
        /// Kind of value found at the top level.
        found: &'static str,
    },
}

/// Decodes a request body into an attribute mapping.
///
/// # Errors
///
/// Returns [`CodecError::Syntax`] for invalid JSON, including an empty body,
/// and [`CodecError::NotAnObject`] for any other top-level value.
pub fn decode(bytes: &[u8]) -> Result<Attributes, CodecError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|source| CodecError::Syntax { source })?;
    match value {
        serde_json::Value::Object(attributes) => Ok(attributes),
        other => Err(CodecError::NotAnObject {
            found: kind_of(&other),
        }),
    }
}

/// Decodes the content of a backing file.
///
/// A file with no content (or only whitespace) holds an empty record.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_stored(bytes: &[u8]) -> Result<Attributes, CodecError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Attributes::new());
    }
    decode(bytes)
}

/// Serialises attributes into the bytes written to a backing file.
pub fn encode_attributes(attributes: &Attributes) -> Vec<u8> {
    serde_json::Value::Object(attributes.clone())
        .to_string()
        .into_bytes()
}

const fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Result emitted on stdout at the end of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The resulting attributes of `create`, `read`, `update` or `delete`.
    Attributes(Attributes),
    /// The bare boolean answer of `exists`.
    Exists(bool),
}

impl Response {
    /// The empty object returned by `delete` and by reads of empty files.
    pub fn empty() -> Self {
        Self::Attributes(Attributes::new())
    }

    /// Encodes the response as a single newline-terminated line.
    pub fn encode(&self) -> Vec<u8> {
        let mut line = match self {
            Self::Attributes(attributes) => encode_attributes(attributes),
            Self::Exists(true) => b"true".to_vec(),
            Self::Exists(false) => b"false".to_vec(),
        };
        line.push(b'\n');
        line
    }

    /// Writes the encoded response to `out` and flushes it.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the writer.
    pub fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        out.write_all(&self.encode())?;
        out.flush()
    }
}
