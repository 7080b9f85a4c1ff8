//! RESP2 parser and encoder
//!
//! The parser works incrementally over a `BytesMut` read buffer: it either
//! consumes exactly one complete top-level frame or leaves the buffer
//! untouched and asks for more bytes.

use super::types::{RespError, RespValue};
use bytes::{Buf, BufMut, Bytes, BytesMut};

const CRLF: &[u8] = b"\r\n";

/// Outcome of a decode attempt over a partially filled buffer.
enum FrameError {
    /// More bytes are needed to finish the frame
    Incomplete,
    /// The bytes present cannot form a valid frame
    Bad(RespError),
}

/// Read-only cursor over the buffered bytes.
///
/// Nothing is consumed from the real buffer until a whole top-level frame
/// has been decoded, so a partially received nested array never leaves the
/// stream mid-frame.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    /// Next line without its CRLF terminator, advancing past it.
    fn read_line(&mut self) -> Result<&'a [u8], FrameError> {
        let rest = &self.data[self.pos..];
        match rest.windows(2).position(|w| w == CRLF) {
            Some(at) => {
                self.pos += at + 2;
                Ok(&rest[..at])
            }
            None => Err(FrameError::Incomplete),
        }
    }

    /// Exactly `n` payload bytes followed by CRLF.
    fn read_exact(&mut self, n: usize) -> Result<&'a [u8], FrameError> {
        let rest = &self.data[self.pos..];
        if rest.len() < n + 2 {
            return Err(FrameError::Incomplete);
        }
        if &rest[n..n + 2] != CRLF {
            return Err(FrameError::Bad(RespError::Malformed(
                "missing CRLF after bulk payload".to_string(),
            )));
        }
        self.pos += n + 2;
        Ok(&rest[..n])
    }

    fn read_frame(&mut self) -> Result<RespValue, FrameError> {
        let marker = *self.data.get(self.pos).ok_or(FrameError::Incomplete)?;
        self.pos += 1;

        match marker {
            b'+' => {
                let line = self.read_line()?;
                let body = as_utf8(line)?;
                Ok(RespValue::SimpleString(body.to_string()))
            }
            b'-' => {
                let line = self.read_line()?;
                let body = as_utf8(line)?;
                Ok(RespValue::Error(body.to_string()))
            }
            b':' => {
                let line = self.read_line()?;
                Ok(RespValue::Integer(parse_header(line)?))
            }
            b'$' => {
                let len = parse_header(self.read_line()?)?;
                match len {
                    -1 => Ok(RespValue::Null),
                    n if n < 0 => Err(FrameError::Bad(RespError::BadHeader(format!(
                        "negative bulk length {}",
                        n
                    )))),
                    n => {
                        let payload = self.read_exact(n as usize)?;
                        Ok(RespValue::BulkString(Bytes::copy_from_slice(payload)))
                    }
                }
            }
            b'*' => {
                let count = parse_header(self.read_line()?)?;
                match count {
                    -1 => Ok(RespValue::Null),
                    n if n < 0 => Err(FrameError::Bad(RespError::BadHeader(format!(
                        "negative array count {}",
                        n
                    )))),
                    n => {
                        let mut items = Vec::with_capacity(n as usize);
                        for _ in 0..n {
                            items.push(self.read_frame()?);
                        }
                        Ok(RespValue::Array(items))
                    }
                }
            }
            other => Err(FrameError::Bad(RespError::UnknownType(other))),
        }
    }
}

fn as_utf8(line: &[u8]) -> Result<&str, FrameError> {
    std::str::from_utf8(line).map_err(|_| FrameError::Bad(RespError::InvalidUtf8))
}

fn parse_header(line: &[u8]) -> Result<i64, FrameError> {
    as_utf8(line)?.parse::<i64>().map_err(|_| {
        FrameError::Bad(RespError::BadHeader(
            String::from_utf8_lossy(line).into_owned(),
        ))
    })
}

/// RESP2 parser
pub struct RespParser;

impl RespParser {
    /// Decode one top-level frame from the front of `buf`.
    ///
    /// Returns `Ok(Some(value))` and consumes the frame's bytes when a
    /// complete frame is present, `Ok(None)` when more data is needed, and
    /// `Err` when the stream is malformed.
    pub fn parse(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        if buf.is_empty() {
            return Ok(None);
        }

        let mut cursor = Cursor::new(&buf[..]);
        match cursor.read_frame() {
            Ok(value) => {
                let consumed = cursor.pos;
                buf.advance(consumed);
                Ok(Some(value))
            }
            Err(FrameError::Incomplete) => Ok(None),
            Err(FrameError::Bad(e)) => Err(e),
        }
    }
}

/// RESP2 encoder
pub struct RespEncoder;

impl RespEncoder {
    /// Encode a value into a fresh byte buffer
    pub fn encode(value: &RespValue) -> Bytes {
        let mut buf = BytesMut::new();
        Self::encode_to(&mut buf, value);
        buf.freeze()
    }

    /// Encode a value into an existing buffer
    pub fn encode_to(buf: &mut BytesMut, value: &RespValue) {
        match value {
            RespValue::SimpleString(s) => {
                buf.put_u8(b'+');
                buf.put_slice(s.as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::Error(e) => {
                buf.put_u8(b'-');
                buf.put_slice(e.as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::Integer(i) => {
                buf.put_u8(b':');
                buf.put_slice(i.to_string().as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::BulkString(b) => {
                buf.put_u8(b'$');
                buf.put_slice(b.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                buf.put_slice(b);
                buf.put_slice(CRLF);
            }
            RespValue::Null => {
                buf.put_slice(b"$-1\r\n");
            }
            RespValue::Array(items) => {
                buf.put_u8(b'*');
                buf.put_slice(items.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                for item in items {
                    Self::encode_to(buf, item);
                }
            }
        }
    }
}
