//! Failure kinds for schema building, default extraction and verification.
//!
//! Every variant names the location (`FieldPath` rendered as text) where the
//! problem was detected. Nothing here is retryable: inference is
//! deterministic, so a failure is a defect in the type or its annotations.

/// Errors raised by the walker, the union resolver, the default extractor and
/// the round-trip verifier.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("cannot infer a schema for `{type_name}` at {path}: {reason}")]
    SchemaInference {
        path: String,
        type_name: String,
        reason: String,
    },
    #[error("union at {path} declares `{first}` and `{second}` with identical shape")]
    AmbiguousUnionDeclaration {
        path: String,
        first: String,
        second: String,
    },
    #[error("value of type `{found}` at {path} is not a declared member of its union")]
    UnionMemberNotDeclared { path: String, found: String },
    #[error("value of type `{found}` at {path} matches several union members {candidates:?}")]
    AmbiguousUnionMatch {
        path: String,
        found: String,
        candidates: Vec<usize>,
    },
    #[error("prototype provides no value for {path}")]
    MissingPrototypeField { path: String },
    #[error("prototype value at {path} does not fit the schema: expected {expected}, found {found}")]
    PrototypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("default extraction exceeded depth {limit} at {path}")]
    DefaultExtractionDepthExceeded { path: String, limit: usize },
    #[error("round trip changed the value at {path}: wrote {expected}, read back {found}")]
    RoundTripMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors raised by [`crate::codec::BinaryCodec`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("datum does not fit the schema: expected {expected}, found {found}")]
    Mismatch { expected: String, found: String },
    #[error("record `{record}` datum is missing field `{field}`")]
    MissingField { record: String, field: String },
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },
    #[error("varint at byte {offset} does not fit in 64 bits")]
    VarintOverflow { offset: usize },
    #[error("invalid boolean byte {byte:#04x} at byte {offset}")]
    InvalidBool { byte: u8, offset: usize },
    #[error("union index {index} out of range for {members} members")]
    InvalidUnionIndex { index: i64, members: usize },
    #[error("enum index {index} out of range for {symbols} symbols")]
    InvalidEnumIndex { index: i64, symbols: usize },
    #[error("negative length {len} at byte {offset}")]
    NegativeLength { len: i64, offset: usize },
    #[error("string at byte {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
    #[error("{count} trailing bytes after the decoded value")]
    TrailingBytes { count: usize },
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

impl SchemaError {
    pub(crate) fn inference(
        path: &crate::path::FieldPath,
        type_name: &str,
        reason: impl Into<String>,
    ) -> Self {
        SchemaError::SchemaInference {
            path: path.to_string(),
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(
        path: &crate::path::FieldPath,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        SchemaError::PrototypeMismatch {
            path: path.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}
