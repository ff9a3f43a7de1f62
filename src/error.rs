//! Error types for redwire
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using RedisError
pub type Result<T> = std::result::Result<T, RedisError>;

/// Unified error type for redwire operations
#[derive(Debug, Error)]
pub enum RedisError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Handshake failed: {0}")]
    Handshake(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid command: {0}")]
    InvalidCommand(#[from] InvalidCommand),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Malformed bytes received from the server.
///
/// Any of these leaves the stream position undefined, so the connection
/// should not be reused afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("unknown reply type byte 0x{0:02x}")]
    UnknownReplyType(u8),

    #[error("malformed integer: {0:?}")]
    MalformedInteger(String),

    #[error("malformed float: {0:?}")]
    MalformedFloat(String),

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("bulk payload not terminated by CRLF")]
    MissingTerminator,

    #[error("bulk length {0} exceeds limit")]
    BulkTooLarge(i64),
}

/// Caller misuse detected before any bytes are written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCommand {
    #[error("encoder only accepts {expected}, got {actual}")]
    WrongCommandName { expected: &'static str, actual: String },

    #[error("unknown SORT option {0:?}")]
    UnknownSortOption(String),

    #[error("SORT option {0} is missing an operand")]
    MissingSortOperand(&'static str),

    #[error("SORT requires a key")]
    MissingSortKey,

    #[error("{0} is a bulk command but no payload was given")]
    MissingPayload(String),

    #[error("{name} takes {expected} argument(s), got {actual}")]
    WrongArity {
        name: String,
        expected: String,
        actual: usize,
    },

    #[error("{name} argument {arg:?} contains a space or line terminator")]
    InvalidInlineArgument { name: String, arg: String },

    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}

