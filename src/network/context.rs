//! Scoped connections
//!
//! Opens a connection for the duration of one closure and closes it on
//! every exit path: normal return, an error from the body, or a panic
//! (through `Drop`).

use crate::config::{Config, ServerSpec};
use crate::error::Result;

use super::Connection;

/// Run `body` against a connection to the server described by `spec`
///
/// Fields missing from `spec` fall back to [`Config::default`].
pub fn with_connection<T, F>(spec: &ServerSpec, body: F) -> Result<T>
where
    F: FnOnce(&mut Connection) -> Result<T>,
{
    with_connection_config(&spec.merge_over(&Config::default()), body)
}

/// Run `body` against a connection opened with a complete `config`
pub fn with_connection_config<T, F>(config: &Config, body: F) -> Result<T>
where
    F: FnOnce(&mut Connection) -> Result<T>,
{
    let mut connection = Connection::open(config)?;
    let result = body(&mut connection);
    connection.close();
    result
}
