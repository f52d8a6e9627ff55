//! Pulls bytes from an [`io::Read`] source and feeds them to a
//! [`RequestParser`] until one request is complete.

use std::io::{self, Read};

use tracing::debug;

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::parser::RequestParser;
use crate::request::Request;

/// Sliding window of unconsumed bytes over one reusable backing vector.
///
/// `buf[start..end]` holds data read but not yet consumed by the parser.
/// Consumed bytes at the front are reclaimed by compaction before the
/// backing vector is grown.
#[derive(Debug)]
pub(crate) struct ReadBuffer {
    buf: Vec<u8>,
    start: usize,
    end: usize,
    limit: Option<usize>,
}

impl ReadBuffer {
    pub(crate) fn new(initial: usize, limit: Option<usize>) -> Self {
        let mut initial = initial.max(1);
        if let Some(limit) = limit {
            initial = initial.min(limit.max(1));
        }
        Self {
            buf: vec![0; initial],
            start: 0,
            end: 0,
            limit,
        }
    }

    /// Unconsumed bytes.
    pub(crate) fn data(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Free space after the window, making room first if there is none.
    ///
    /// The returned slice is never empty.
    pub(crate) fn spare(&mut self) -> Result<&mut [u8], ParseError> {
        if self.end == self.buf.len() {
            if self.start > 0 {
                self.buf.copy_within(self.start..self.end, 0);
                self.end -= self.start;
                self.start = 0;
                debug!(retained = self.end, "compacted read buffer");
            } else {
                self.grow()?;
            }
        }
        Ok(&mut self.buf[self.end..])
    }

    fn grow(&mut self) -> Result<(), ParseError> {
        let current = self.buf.len();
        let mut next = current * 2;
        if let Some(limit) = self.limit {
            if current >= limit {
                return Err(ParseError::BufferLimitExceeded { limit });
            }
            next = next.min(limit);
        }
        debug!(from = current, to = next, "growing read buffer");
        self.buf.resize(next, 0);
        Ok(())
    }

    /// Mark `n` bytes of [`spare`](Self::spare) as filled.
    pub(crate) fn fill(&mut self, n: usize) {
        debug_assert!(self.end + n <= self.buf.len());
        self.end += n;
    }

    /// Drop `n` bytes from the front of the window.
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.end - self.start, "consume({n}) exceeds window");
        self.start = (self.start + n).min(self.end);
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
    }
}

/// Read exactly one HTTP request from `reader` using default settings.
///
/// # Errors
///
/// Returns [`ParseError::IncompleteRequest`] if the source ends early,
/// [`ParseError::Io`] if a read fails, and any parse error the request
/// bytes trigger.
pub fn request_from_reader<R: Read>(reader: R) -> Result<Request, ParseError> {
    request_from_reader_with_config(reader, ParserConfig::default())
}

/// Read exactly one HTTP request from `reader` using `config`.
///
/// Bytes are pulled only until the request is complete. Anything the source
/// would produce after that is left unread, except bytes that arrived in the
/// same read as the end of the request.
///
/// # Errors
///
/// See [`request_from_reader`]. Additionally returns
/// [`ParseError::BufferLimitExceeded`] or [`ParseError::BodyTooLarge`] when
/// the configured caps are hit.
pub fn request_from_reader_with_config<R: Read>(
    mut reader: R,
    config: ParserConfig,
) -> Result<Request, ParseError> {
    let mut buf = ReadBuffer::new(config.initial_buffer_size, config.max_buffer_size);
    let mut parser = RequestParser::with_config(config);

    while !parser.is_done() {
        let n = match reader.read(buf.spare()?) {
            Ok(0) => return Err(ParseError::IncompleteRequest),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        buf.fill(n);

        let consumed = parser.drive(buf.data())?;
        buf.consume(consumed);
    }

    let request = parser.finish()?;
    debug!(
        method = request.method(),
        target = request.target(),
        headers = request.headers().len(),
        body_len = request.body().len(),
        buffer_capacity = buf.capacity(),
        "request complete"
    );
    Ok(request)
}
