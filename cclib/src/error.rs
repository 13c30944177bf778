//! Crate-wide error taxonomy (spec §4.7, §7).
//!
//! Every fallible operation in `cclib` returns a `Result<T, Error>`. `Error` pairs a `Kind`
//! with a human-readable message naming the offending field or value, so the facade (§4.11)
//! can surface it verbatim in a JSON `{"error": "..."}` response.

use std::fmt;

/// The taxonomy of things that can go wrong building, parsing or verifying a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    UnexpectedField,
    InvalidValue,
    ValueOverflow,
    TooManyObjects,
    InvalidNumericChar,
    ChecksumMismatch,
    InvalidTxType,
    InvalidBinaryTx,
    BufferOverflow,
    InputEnd,
    UnexpectedChar,
    InvalidChar,
    NotHex,
    NotArray,
    NumValues,
    RequiresBinaryBuffer,
    Unexpected,
    NoKey,
    InsufficientKey,
    LoadingKey,
    NoProof,
    NoExactRepresentation,
    InvalidConfig,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::MissingField => "missing field",
            ErrorKind::UnexpectedField => "unexpected field",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::ValueOverflow => "value overflow",
            ErrorKind::TooManyObjects => "too many objects",
            ErrorKind::InvalidNumericChar => "invalid numeric character",
            ErrorKind::ChecksumMismatch => "checksum mismatch",
            ErrorKind::InvalidTxType => "invalid transaction type",
            ErrorKind::InvalidBinaryTx => "invalid binary transaction",
            ErrorKind::BufferOverflow => "buffer overflow",
            ErrorKind::InputEnd => "unexpected end of input",
            ErrorKind::UnexpectedChar => "unexpected character",
            ErrorKind::InvalidChar => "invalid character",
            ErrorKind::NotHex => "not a hex value",
            ErrorKind::NotArray => "not an array",
            ErrorKind::NumValues => "wrong number of values",
            ErrorKind::RequiresBinaryBuffer => "requires a binary buffer",
            ErrorKind::Unexpected => "unexpected error",
            ErrorKind::NoKey => "no suitable proof key",
            ErrorKind::InsufficientKey => "proof key too small",
            ErrorKind::LoadingKey => "error loading proof key",
            ErrorKind::NoProof => "no proof",
            ErrorKind::NoExactRepresentation => "value has no exact mantissa/exponent representation",
            ErrorKind::InvalidConfig => "invalid configuration",
        };
        write!(f, "{s}")
    }
}

/// A `Kind` plus a message naming the offending field or value (spec §4.7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

/// Shorthand for constructing an [`Error`] at a call site.
macro_rules! err {
    ($kind:expr, $($arg:tt)*) => {
        $crate::error::Error::new($kind, format!($($arg)*))
    };
}

pub(crate) use err;

pub type Result<T> = std::result::Result<T, Error>;
