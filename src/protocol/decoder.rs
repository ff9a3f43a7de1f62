//! Reply decoder
//!
//! Reads exactly one reply from a buffered stream. The first byte selects
//! the reply type:
//!
//! ```text
//! +status\r\n
//! -error\r\n
//! :integer\r\n
//! $length\r\n<payload>\r\n     length -1 => nil, nothing follows
//! *count\r\n<count replies>    count -1  => nil array
//! ```

use std::io::BufRead;

use bytes::Bytes;

use super::framing::{expect_crlf, read_exact_payload, read_line_crlf, read_text_line};
use super::reply::{BulkString, Reply, SERVER_ERROR_PREFIX};
use crate::config::StringMode;
use crate::error::{ProtocolError, Result};

/// Largest bulk payload accepted (the server's default proto-max-bulk-len)
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Reply type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReplyType {
    Error = b'-',
    Status = b'+',
    Integer = b':',
    Bulk = b'$',
    Array = b'*',
}

impl ReplyType {
    /// Map a type byte to its reply type
    pub fn from_tag(tag: u8) -> std::result::Result<Self, ProtocolError> {
        match tag {
            b'-' => Ok(ReplyType::Error),
            b'+' => Ok(ReplyType::Status),
            b':' => Ok(ReplyType::Integer),
            b'$' => Ok(ReplyType::Bulk),
            b'*' => Ok(ReplyType::Array),
            other => Err(ProtocolError::UnknownReplyType(other)),
        }
    }
}

/// Decode one reply from `reader`
///
/// Bulk payloads are surfaced as text or bytes according to `mode`.
pub fn decode_reply<R: BufRead>(reader: &mut R, mode: StringMode) -> Result<Reply> {
    let tag = read_exact_payload(reader, 1)?[0];

    match ReplyType::from_tag(tag)? {
        ReplyType::Error => {
            let message = read_text_line(reader)?;
            Ok(Reply::Error(format!("{}{}", SERVER_ERROR_PREFIX, message)))
        }
        ReplyType::Status => Ok(Reply::Status(read_text_line(reader)?)),
        ReplyType::Integer => Ok(Reply::Integer(read_integer_line(reader)?)),
        ReplyType::Bulk => decode_bulk(reader, mode),
        ReplyType::Array => decode_array(reader, mode),
    }
}

fn decode_bulk<R: BufRead>(reader: &mut R, mode: StringMode) -> Result<Reply> {
    let len = read_integer_line(reader)?;
    if len < 0 {
        return Ok(Reply::Bulk(None));
    }
    if len > MAX_BULK_LEN {
        return Err(ProtocolError::BulkTooLarge(len).into());
    }

    let payload = read_exact_payload(reader, len as usize)?;
    // The payload is followed by its own CRLF; leave the stream aligned
    expect_crlf(reader)?;

    let bulk = match mode {
        // Invalid sequences become U+FFFD; the stream is still aligned here
        StringMode::Text => match String::from_utf8(payload) {
            Ok(text) => BulkString::Text(text),
            Err(e) => BulkString::Text(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        },
        StringMode::Binary => BulkString::Binary(Bytes::from(payload)),
    };
    Ok(Reply::Bulk(Some(bulk)))
}

fn decode_array<R: BufRead>(reader: &mut R, mode: StringMode) -> Result<Reply> {
    let count = read_integer_line(reader)?;
    if count < 0 {
        return Ok(Reply::Array(None));
    }

    // Capacity is capped so a hostile count cannot force a huge allocation
    let mut items = Vec::with_capacity((count as usize).min(1024));
    for _ in 0..count {
        items.push(decode_reply(reader, mode)?);
    }
    Ok(Reply::Array(Some(items)))
}

/// Read a line and parse it as a base-10 signed integer
fn read_integer_line<R: BufRead>(reader: &mut R) -> Result<i64> {
    let line = read_line_crlf(reader)?;
    let text = String::from_utf8_lossy(&line).into_owned();
    match text.trim().parse::<i64>() {
        Ok(n) => Ok(n),
        Err(_) => Err(ProtocolError::MalformedInteger(text).into()),
    }
}
