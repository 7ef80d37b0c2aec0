//! Header-framed transport over the engine's stdio.
//!
//! Messages are framed the way LSP frames them:
//! ```text
//! Content-Length: <length>\r\n
//! \r\n
//! <payload>
//! ```
//!
//! The framing layer is generic over the underlying reader/writer so
//! tests exercise the exact production code path over in-memory
//! buffers.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::process::{ChildStdin, ChildStdout};

use super::error::TransportError;

/// The transport used against a spawned engine process.
pub type StdioTransport = FramedTransport<ChildStdout, ChildStdin>;

/// Reads and writes `Content-Length`-framed messages.
pub struct FramedTransport<R: Read, W: Write> {
    reader: BufReader<R>,
    writer: BufWriter<W>,
}

impl<R: Read, W: Write> FramedTransport<R, W> {
    /// Wraps the supplied reader/writer pair.
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer: BufWriter::new(writer),
        }
    }

    /// Sends one framed message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when writing fails.
    pub fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        write!(self.writer, "Content-Length: {}\r\n\r\n", message.len())
            .map_err(TransportError::from)?;
        self.writer.write_all(message)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Receives one framed message, blocking until it is complete.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::MissingContentLength`] when the header
    /// block carries no `Content-Length`, [`TransportError::InvalidHeader`]
    /// for an unparsable length, and [`TransportError::Io`] for I/O
    /// failures including EOF mid-message.
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let content_length = self.read_headers()?;
        let mut content = vec![0u8; content_length];
        self.reader.read_exact(&mut content)?;
        Ok(content)
    }

    /// Consumes the header block and extracts the content length.
    fn read_headers(&mut self) -> Result<usize, TransportError> {
        let mut content_length = None;

        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed while reading headers",
                )));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                // Blank line terminates the header block.
                break;
            }

            if let Some(length) = parse_content_length(trimmed)? {
                content_length = Some(length);
            }
            // Other headers (Content-Type) are ignored.
        }

        content_length.ok_or(TransportError::MissingContentLength)
    }
}

/// Parses one header line, returning the length for `Content-Length`
/// headers and `None` for everything else. Header names match
/// case-insensitively.
fn parse_content_length(line: &str) -> Result<Option<usize>, TransportError> {
    let Some((name, value)) = line.split_once(':') else {
        return Ok(None);
    };
    if !name.trim().eq_ignore_ascii_case("Content-Length") {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| TransportError::InvalidHeader)
}
