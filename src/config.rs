//! Configuration for redwire
//!
//! Centralized connection configuration with sensible defaults, plus
//! [`ServerSpec`], a sparse set of overrides merged over a base config.

use std::time::Duration;

/// How bulk payloads surface to the caller.
///
/// Applies to the whole connection, never per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringMode {
    /// Decode bulk payloads as UTF-8 text
    #[default]
    Text,

    /// Keep bulk payloads as raw bytes
    Binary,
}

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Address
    // -------------------------------------------------------------------------
    /// Server host name or IP address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Session Setup
    // -------------------------------------------------------------------------
    /// Password sent with AUTH right after connecting
    pub password: Option<String>,

    /// Database index selected right after connecting
    pub db: u32,

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------
    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Decoding
    // -------------------------------------------------------------------------
    pub string_mode: StringMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
            connect_timeout_ms: 5000,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            string_mode: StringMode::Text,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` as accepted by `ToSocketAddrs`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Read timeout, `None` when unset
    pub fn read_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.read_timeout_ms)
    }

    /// Write timeout, `None` when unset
    pub fn write_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.write_timeout_ms)
    }
}

fn non_zero_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the AUTH password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Set the database index
    pub fn db(mut self, db: u32) -> Self {
        self.config.db = db;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the string mode
    pub fn string_mode(mut self, mode: StringMode) -> Self {
        self.config.string_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Per-call server specification.
///
/// Every field is optional; unset fields fall back to the base config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSpec {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub password: Option<String>,
    pub db: Option<u32>,
    pub connect_timeout_ms: Option<u64>,
    pub read_timeout_ms: Option<u64>,
    pub write_timeout_ms: Option<u64>,
    pub string_mode: Option<StringMode>,
}

impl ServerSpec {
    /// Overlay this spec on `base`
    pub fn merge_over(&self, base: &Config) -> Config {
        Config {
            host: self.host.clone().unwrap_or_else(|| base.host.clone()),
            port: self.port.unwrap_or(base.port),
            password: self.password.clone().or_else(|| base.password.clone()),
            db: self.db.unwrap_or(base.db),
            connect_timeout_ms: self.connect_timeout_ms.unwrap_or(base.connect_timeout_ms),
            read_timeout_ms: self.read_timeout_ms.unwrap_or(base.read_timeout_ms),
            write_timeout_ms: self.write_timeout_ms.unwrap_or(base.write_timeout_ms),
            string_mode: self.string_mode.unwrap_or(base.string_mode),
        }
    }
}
