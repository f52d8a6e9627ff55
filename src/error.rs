use std::io;

/// Errors that can occur while reading an HTTP request from a byte stream.
///
/// Every variant is fatal to the request in progress: there is no
/// resynchronization, and the partially built request is dropped.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The request line is not `METHOD SP TARGET SP HTTP/VERSION`.
    #[error("malformed request line: {0}")]
    MalformedRequestLine(&'static str),

    /// A header field line could not be parsed.
    #[error("malformed header line: {0}")]
    MalformedHeaderLine(&'static str),

    /// The `Content-Length` value is invalid or the body overran it.
    #[error("body framing error: {0}")]
    BodyFraming(&'static str),

    /// The byte source ended before a complete request was read.
    #[error("incomplete HTTP request")]
    IncompleteRequest,

    /// The state machine was driven past its terminal state.
    #[error("parser misuse: {0}")]
    StateMisuse(&'static str),

    /// Unconsumed request data filled the buffer at its configured cap.
    #[error("buffered request data exceeds {limit} bytes")]
    BufferLimitExceeded {
        /// The configured maximum buffer size.
        limit: usize,
    },

    /// The declared `Content-Length` is larger than the configured cap.
    #[error("declared body of {declared} bytes exceeds maximum of {limit}")]
    BodyTooLarge {
        /// The `Content-Length` the sender declared.
        declared: usize,
        /// The configured maximum body size.
        limit: usize,
    },

    /// Reading from the byte source failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Returns `true` for errors caused by the bytes themselves, as opposed
    /// to the source failing or running dry.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequestLine(_)
                | Self::MalformedHeaderLine(_)
                | Self::BodyFraming(_)
                | Self::BufferLimitExceeded { .. }
                | Self::BodyTooLarge { .. }
        )
    }
}
