//! Byte framing
//!
//! Line and payload readers shared by every reply type.
//!
//! Lines end at the exact two-byte sequence CR LF. A bare CR or LF is
//! ordinary data: bulk payloads are binary and may contain either byte.

use std::io::{BufRead, Read};

use crate::error::{ProtocolError, Result};

/// Read one line terminated by CR LF, without the terminator
///
/// Fails with `UnexpectedEof` if the stream ends before a CR LF pair.
pub fn read_line_crlf<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();

    loop {
        // Each read_until stops after an LF; the line is complete only if
        // that LF directly follows a CR.
        let n = reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            return Err(ProtocolError::UnexpectedEof.into());
        }
        if line.ends_with(b"\r\n") {
            line.truncate(line.len() - 2);
            return Ok(line);
        }
        if !line.ends_with(b"\n") {
            // read_until returned without an LF: end of stream
            return Err(ProtocolError::UnexpectedEof.into());
        }
    }
}

/// Read one CR LF line and interpret it as UTF-8 text
pub fn read_text_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let line = read_line_crlf(reader)?;
    String::from_utf8(line).map_err(|_| ProtocolError::InvalidUtf8.into())
}

/// Read exactly `len` bytes
///
/// A single read is not guaranteed to fill the buffer, so keep reading
/// until `len` bytes have been accumulated.
pub fn read_exact_payload<R: BufRead>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; len];
    let mut filled = 0;

    while filled < len {
        match reader.read(&mut payload[filled..]) {
            Ok(0) => return Err(ProtocolError::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(payload)
}

/// Consume the CR LF that follows a bulk payload
pub fn expect_crlf<R: BufRead>(reader: &mut R) -> Result<()> {
    let terminator = read_exact_payload(reader, 2)?;
    if terminator != b"\r\n" {
        return Err(ProtocolError::MissingTerminator.into());
    }
    Ok(())
}
