//! Network Module
//!
//! Connection handling on the client side.
//!
//! ## Model
//! - One blocking write followed by one blocking read per command
//! - No pipelining; a connection is never shared between threads
//! - Connections are passed explicitly; there is no ambient "current" one

mod connection;
mod context;

pub use connection::Connection;
pub use context::{with_connection, with_connection_config};
