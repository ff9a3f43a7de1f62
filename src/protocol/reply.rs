//! Reply definitions
//!
//! Decoded server replies.

use std::fmt;

use bytes::Bytes;

/// Marker prepended to every decoded `-` reply
pub const SERVER_ERROR_PREFIX: &str = "Server error: ";

/// A bulk payload, surfaced according to the connection's string mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkString {
    Text(String),
    Binary(Bytes),
}

impl BulkString {
    /// Raw payload bytes, whichever mode produced them
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            BulkString::Text(s) => s.as_bytes(),
            BulkString::Binary(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded reply
///
/// `Bulk(None)` and `Array(None)` are the nil values (`$-1` / `*-1` on the
/// wire) and are distinct from an empty payload or an empty array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `-` reply; the message carries [`SERVER_ERROR_PREFIX`]
    Error(String),

    /// `+` reply
    Status(String),

    /// `:` reply
    Integer(i64),

    /// `$` reply
    Bulk(Option<BulkString>),

    /// `*` reply; every element is itself a full reply
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Text bulk reply
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Bulk(Some(BulkString::Text(s.into())))
    }

    /// Binary bulk reply
    pub fn binary(b: impl Into<Bytes>) -> Self {
        Reply::Bulk(Some(BulkString::Binary(b.into())))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Bulk(None) | Reply::Array(None))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Textual content of status, error and text bulk replies
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Status(s) | Reply::Error(s) => Some(s),
            Reply::Bulk(Some(BulkString::Text(s))) => Some(s),
            _ => None,
        }
    }

    /// Payload of a bulk reply in either string mode
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::Bulk(Some(bulk)) => Some(bulk.as_bytes()),
            _ => None,
        }
    }

    /// Elements of a non-nil array reply
    pub fn into_array(self) -> Option<Vec<Reply>> {
        match self {
            Reply::Array(items) => items,
            _ => None,
        }
    }

    /// The error text as the server sent it, without the local prefix
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Reply::Error(msg) => Some(msg.strip_prefix(SERVER_ERROR_PREFIX).unwrap_or(msg)),
            _ => None,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_indented(self, f, 0)
    }
}

// redis-cli style rendering; nested arrays are indented by their prefix width
fn fmt_indented(reply: &Reply, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    match reply {
        Reply::Error(msg) => write!(f, "(error) {}", msg),
        Reply::Status(msg) => write!(f, "{}", msg),
        Reply::Integer(n) => write!(f, "(integer) {}", n),
        Reply::Bulk(None) | Reply::Array(None) => write!(f, "(nil)"),
        Reply::Bulk(Some(BulkString::Text(s))) => write!(f, "{:?}", s),
        Reply::Bulk(Some(BulkString::Binary(b))) => write!(f, "\"{}\"", b.escape_ascii()),
        Reply::Array(Some(items)) if items.is_empty() => write!(f, "(empty array)"),
        Reply::Array(Some(items)) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, "\n{:indent$}", "", indent = indent)?;
                }
                let prefix = format!("{}) ", i + 1);
                write!(f, "{}", prefix)?;
                fmt_indented(item, f, indent + prefix.len())?;
            }
            Ok(())
        }
    }
}
