//! RESP2 value types

use bytes::Bytes;
use std::fmt;

/// A single RESP2 frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple strings: +OK\r\n
    SimpleString(String),

    /// Errors: -ERR message\r\n
    Error(String),

    /// Integers: :42\r\n
    Integer(i64),

    /// Bulk strings: $6\r\nfoobar\r\n (binary-safe)
    BulkString(Bytes),

    /// Null bulk string: $-1\r\n
    Null,

    /// Arrays: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Create a simple string
    pub fn simple(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    /// Create an error
    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    /// Create an integer
    pub fn integer(i: i64) -> Self {
        RespValue::Integer(i)
    }

    /// Create a bulk string
    pub fn bulk(b: impl Into<Bytes>) -> Self {
        RespValue::BulkString(b.into())
    }

    /// Create the null bulk string
    pub fn null() -> Self {
        RespValue::Null
    }

    /// Create an array
    pub fn array(v: Vec<RespValue>) -> Self {
        RespValue::Array(v)
    }

    /// Try to view this value as an array
    pub fn as_array(&self) -> Option<&[RespValue]> {
        match self {
            RespValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Extract the byte payload of a bulk or simple string element.
    ///
    /// Request arrays are bulk strings in practice, but inline clients may
    /// send simple strings; both are accepted as command arguments.
    pub fn as_arg(&self) -> Option<Bytes> {
        match self {
            RespValue::BulkString(b) => Some(b.clone()),
            RespValue::SimpleString(s) => Some(Bytes::copy_from_slice(s.as_bytes())),
            _ => None,
        }
    }

    /// True iff this frame is an error reply
    pub fn is_error(&self) -> bool {
        matches!(self, RespValue::Error(_))
    }
}

impl fmt::Display for RespValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespValue::SimpleString(s) => write!(f, "simple({})", s),
            RespValue::Error(e) => write!(f, "error({})", e),
            RespValue::Integer(i) => write!(f, "int({})", i),
            RespValue::BulkString(b) => write!(f, "bulk({} bytes)", b.len()),
            RespValue::Null => write!(f, "null"),
            RespValue::Array(items) => write!(f, "array({} elements)", items.len()),
        }
    }
}

/// Errors produced while decoding an inbound frame.
///
/// These are never written back to the client; the connection layer decides
/// whether to drop the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum RespError {
    /// Unknown type marker byte
    UnknownType(u8),

    /// Length or count header that is not a decimal integer
    BadHeader(String),

    /// Structurally malformed frame (missing CRLF, bad terminator)
    Malformed(String),

    /// Simple string or integer body is not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for RespError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespError::UnknownType(b) => write!(f, "unknown frame type marker 0x{:02x}", b),
            RespError::BadHeader(s) => write!(f, "bad frame header: {}", s),
            RespError::Malformed(s) => write!(f, "malformed frame: {}", s),
            RespError::InvalidUtf8 => write!(f, "frame body is not valid UTF-8"),
        }
    }
}

impl std::error::Error for RespError {}
