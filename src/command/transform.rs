//! Reply transforms
//!
//! Post-processing applied to a decoded reply before it reaches the caller.
//! Error replies always pass through untouched: a server error is a value,
//! not a failed call.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ProtocolError, Result};
use crate::protocol::{BulkString, Reply};

/// Post-processing function bound to a command
pub type ReplyTransform = fn(Reply) -> Result<Value>;

/// A post-processed reply
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The reply, unchanged
    Reply(Reply),

    Bool(bool),

    Float(f64),

    /// Ordered strings
    List(Vec<String>),

    /// Unordered members, deduplicated
    Set(BTreeSet<String>),
}

impl Value {
    pub fn as_reply(&self) -> Option<&Reply> {
        match self {
            Value::Reply(reply) => Some(reply),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<Reply> for Value {
    fn from(reply: Reply) -> Self {
        Value::Reply(reply)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Reply(reply) => write!(f, "{}", reply),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Float(x) => write!(f, "{}", x),
            Value::List(items) => write!(f, "{:?}", items),
            Value::Set(members) => write!(f, "{:?}", members),
        }
    }
}

/// Return the reply as is
pub fn identity(reply: Reply) -> Result<Value> {
    Ok(Value::Reply(reply))
}

/// `:1` is true, any other integer false
pub fn int_to_bool(reply: Reply) -> Result<Value> {
    match reply {
        Reply::Integer(n) => Ok(Value::Bool(n == 1)),
        other => Ok(Value::Reply(other)),
    }
}

/// `+OK` is true, any other status false
pub fn status_ok(reply: Reply) -> Result<Value> {
    match reply {
        Reply::Status(s) => Ok(Value::Bool(s == "OK")),
        other => Ok(Value::Reply(other)),
    }
}

/// Split a space-separated bulk reply into its words
///
/// Older servers answer KEYS with a single bulk string of this form; an
/// array reply is flattened the same way.
pub fn split_keys(reply: Reply) -> Result<Value> {
    match reply {
        Reply::Bulk(Some(bulk)) => Ok(Value::List(
            bulk_text(&bulk).split_whitespace().map(str::to_string).collect(),
        )),
        Reply::Bulk(None) => Ok(Value::List(Vec::new())),
        Reply::Array(Some(items)) => Ok(Value::List(items.iter().filter_map(element_text).collect())),
        other => Ok(Value::Reply(other)),
    }
}

/// Collect an array reply into a set of its members
pub fn to_set(reply: Reply) -> Result<Value> {
    match reply {
        Reply::Array(Some(items)) => Ok(Value::Set(items.iter().filter_map(element_text).collect())),
        Reply::Array(None) => Ok(Value::Set(BTreeSet::new())),
        other => Ok(Value::Reply(other)),
    }
}

/// Parse a bulk reply as a floating point score
pub fn to_float(reply: Reply) -> Result<Value> {
    match reply {
        Reply::Bulk(Some(bulk)) => {
            let text = bulk_text(&bulk);
            let score = text
                .trim()
                .parse::<f64>()
                .map_err(|_| ProtocolError::MalformedFloat(text.to_string()))?;
            Ok(Value::Float(score))
        }
        other => Ok(Value::Reply(other)),
    }
}

fn bulk_text(bulk: &BulkString) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bulk.as_bytes())
}

fn element_text(reply: &Reply) -> Option<String> {
    match reply {
        Reply::Bulk(Some(bulk)) => Some(bulk_text(bulk).into_owned()),
        Reply::Status(s) => Some(s.clone()),
        Reply::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}
