//! # redwire
//!
//! A blocking client for the Redis wire protocol:
//! - Byte-exact request encoders (inline, bulk, SORT composite)
//! - A closed reply decoder over the five reply types
//! - A data-driven command table with per-command reply transforms
//! - Scoped connections that always close on exit
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CommandRegistry::call                       │
//! │          (name -> shape, strategy, transform)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Command Encoder                            │
//! │            (Inline / Bulk / SortComposite)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Connection                               │
//! │          (socket + buffered reader, explicit)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one reply
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Reply Decoder                             │
//! │        (+ - : $ * over CRLF byte framing)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!                 Reply Transform -> Value
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use redwire::{with_connection, Arg, CommandRegistry, ServerSpec};
//!
//! let registry = CommandRegistry::with_builtin_commands();
//! let value = with_connection(&ServerSpec::default(), |conn| {
//!     registry.call(conn, "set", &[Arg::from("greeting"), Arg::from("hello world")])?;
//!     registry.call(conn, "get", &[Arg::from("greeting")])
//! })?;
//! println!("{}", value);
//! # Ok::<(), redwire::RedisError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod command;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{InvalidCommand, ProtocolError, RedisError, Result};
pub use config::{Config, ServerSpec, StringMode};
pub use protocol::{Arg, EncodingStrategy, Reply};
pub use command::{define, CommandDescriptor, CommandRegistry, ParamShape, Value};
pub use network::{with_connection, with_connection_config, Connection};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of redwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
