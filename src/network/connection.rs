//! Connection
//!
//! One socket plus its buffered input, used for strictly alternating
//! request/reply exchanges.

use std::io::{BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use socket2::SockRef;

use crate::config::{Config, StringMode};
use crate::error::{RedisError, Result};
use crate::protocol::{decode_reply, encode_inline, Arg, Reply};

/// A connection to a Redis server
///
/// The stream and its buffered reader live in one `Option`, so the
/// connection is either fully open or fully closed. Every operation on a
/// closed connection fails with [`RedisError::NotConnected`].
pub struct Connection<S: Read + Write = TcpStream> {
    /// Stream wrapped in its input buffer; writes go to the inner stream
    stream: Option<BufReader<S>>,

    /// How bulk payloads are surfaced
    string_mode: StringMode,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream> {
    /// Open a TCP connection and run the session handshake
    ///
    /// Sends `AUTH` when a password is configured and `SELECT` when the
    /// database index is not 0.
    pub fn open(config: &Config) -> Result<Self> {
        let stream = connect_tcp(config)?;
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| config.addr());

        // Disable Nagle's algorithm; every request is a complete message
        stream.set_nodelay(true)?;
        SockRef::from(&stream).set_keepalive(true)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        tracing::debug!("Connected to {}", peer_addr);

        let mut connection = Self {
            stream: Some(BufReader::new(stream)),
            string_mode: config.string_mode,
            peer_addr,
        };
        connection.handshake(config)?;
        Ok(connection)
    }
}

impl<S: Read + Write> Connection<S> {
    /// Wrap an already-open stream
    pub fn from_stream(stream: S, string_mode: StringMode) -> Self {
        Self {
            stream: Some(BufReader::new(stream)),
            string_mode,
            peer_addr: "stream".to_string(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn string_mode(&self) -> StringMode {
        self.string_mode
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// The underlying stream, if still open
    pub fn get_ref(&self) -> Option<&S> {
        self.stream.as_ref().map(BufReader::get_ref)
    }

    /// Write a fully encoded request
    ///
    /// A failed write may have sent part of the request, so the connection
    /// is closed before the error is returned.
    pub fn send(&mut self, request: &[u8]) -> Result<()> {
        let reader = self.stream.as_mut().ok_or(RedisError::NotConnected)?;
        let writer = reader.get_mut();
        if let Err(e) = writer.write_all(request).and_then(|()| writer.flush()) {
            tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
            self.close();
            return Err(e.into());
        }
        tracing::trace!("Sent {} bytes to {}", request.len(), self.peer_addr);
        Ok(())
    }

    /// Read exactly one reply
    ///
    /// A framing or I/O failure leaves the stream position undefined, so
    /// the connection is closed before the error is returned.
    pub fn read_reply(&mut self) -> Result<Reply> {
        let reader = self.stream.as_mut().ok_or(RedisError::NotConnected)?;
        match decode_reply(reader, self.string_mode) {
            Ok(reply) => {
                tracing::trace!("Received from {}: {:?}", self.peer_addr, reply);
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                self.close();
                Err(e)
            }
        }
    }

    /// Send one request and read its reply
    pub fn request(&mut self, request: &[u8]) -> Result<Reply> {
        self.send(request)?;
        self.read_reply()
    }

    /// Close the connection; later calls fail with `NotConnected`
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Closed connection to {}", self.peer_addr);
        }
    }

    fn handshake(&mut self, config: &Config) -> Result<()> {
        if let Some(password) = &config.password {
            self.expect_ok("AUTH", &[Arg::from(password)])?;
        }
        if config.db != 0 {
            self.expect_ok("SELECT", &[Arg::from(config.db)])?;
        }
        Ok(())
    }

    fn expect_ok(&mut self, name: &str, args: &[Arg]) -> Result<()> {
        match self.request(&encode_inline(name, args)?)? {
            Reply::Error(msg) => Err(RedisError::Handshake(format!("{} rejected: {}", name, msg))),
            _ => Ok(()),
        }
    }
}

impl<S: Read + Write> Drop for Connection<S> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Try each resolved address in turn within the connect timeout
fn connect_tcp(config: &Config) -> Result<TcpStream> {
    let addr = config.addr();
    let candidates: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|e| RedisError::Connection(format!("cannot resolve {}: {}", addr, e)))?
        .collect();

    let mut last_error = None;
    for candidate in &candidates {
        let attempt = if config.connect_timeout_ms == 0 {
            TcpStream::connect(candidate)
        } else {
            TcpStream::connect_timeout(candidate, config.connect_timeout())
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", candidate, e);
                last_error = Some(e);
            }
        }
    }

    Err(RedisError::Connection(match last_error {
        Some(e) => format!("cannot connect to {}: {}", addr, e),
        None => format!("{} resolved to no addresses", addr),
    }))
}
