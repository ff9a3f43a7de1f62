//! Protocol Module
//!
//! Client side of the Redis wire protocol.
//!
//! ## Request Formats
//! ```text
//! Inline:  NAME arg1 arg2 ...\r\n
//! Bulk:    NAME arg1 ... argN-1 <byteLength>\r\n<payload>\r\n
//! ```
//!
//! ## Reply Formats
//! The first byte selects the reply type:
//! - `+` status line
//! - `-` error line
//! - `:` signed 64-bit integer
//! - `$` length-prefixed bulk payload (`$-1` is nil)
//! - `*` count-prefixed array of replies (`*-1` is nil)

mod framing;
mod reply;
mod decoder;
mod encoder;

pub use framing::{read_line_crlf, read_text_line};
pub use reply::{BulkString, Reply, SERVER_ERROR_PREFIX};
pub use decoder::{decode_reply, ReplyType, MAX_BULK_LEN};
pub use encoder::{encode, encode_bulk, encode_inline, encode_sort, Arg, EncodingStrategy};
