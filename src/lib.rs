//! # httpfeed
//!
//! An **incremental HTTP/1.1 request reader** that rebuilds a request from
//! a byte stream arriving in chunks of any size, down to one byte per read.
//!
//! Parsing is line oriented. A [`RequestParser`] state machine consumes the
//! request line, then one header field line at a time, then exactly
//! `Content-Length` body bytes. The stream feeder
//! ([`request_from_reader`]) keeps unconsumed bytes in a growable sliding
//! window and pulls from any [`std::io::Read`] source until the request is
//! complete.
//!
//! Chunked transfer encoding, trailers and obs-fold continuation lines are
//! not supported.
//!
//! ## Quick start: reading from a stream
//!
//! ```rust
//! use httpfeed::request_from_reader;
//!
//! let raw: &[u8] = b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
//! let request = request_from_reader(raw).expect("valid request");
//! assert_eq!(request.method(), "POST");
//! assert_eq!(request.body(), b"hello");
//! ```
//!
//! ## Quick start: incremental parsing
//!
//! ```rust
//! use httpfeed::{ParseState, RequestParser};
//!
//! let mut parser = RequestParser::new();
//!
//! let consumed = parser.drive(b"GET / HTTP/1.1\r\nHo").unwrap();
//! assert_eq!(consumed, 16);
//! assert_eq!(parser.state(), ParseState::ParsingHeaders);
//!
//! // Offer the unconsumed tail again, with more data appended.
//! parser.drive(b"Host: example.com\r\n\r\n").unwrap();
//! let request = parser.finish().unwrap();
//! assert_eq!(request.headers().get("HOST"), Some("example.com"));
//! ```

mod config;
mod error;
mod headers;
mod output;
mod parser;
mod reader;
mod request;
mod request_line;
mod syntax;

// Re-export public API.
pub use config::ParserConfig;
pub use error::ParseError;
pub use headers::Headers;
pub use output::{format_debug, format_headers_only, format_json};
pub use parser::{ParseState, RequestParser};
pub use reader::{request_from_reader, request_from_reader_with_config};
pub use request::Request;
pub use request_line::{RequestLine, parse_request_line};

/// Parse a **complete** HTTP request held in a byte slice.
///
/// The whole slice is handed to a [`RequestParser`] at once, so body bytes
/// past the declared `Content-Length` are always detected. For streaming
/// sources use [`request_from_reader`].
///
/// # Errors
///
/// Returns [`ParseError`] if the data is malformed or incomplete.
pub fn parse_request(data: &[u8]) -> Result<Request, ParseError> {
    parse_request_with_config(data, ParserConfig::default())
}

/// Parse a **complete** HTTP request using a custom [`ParserConfig`].
///
/// # Errors
///
/// Returns [`ParseError`] if the data is malformed, incomplete, or
/// exceeds the configured limits.
pub fn parse_request_with_config(data: &[u8], config: ParserConfig) -> Result<Request, ParseError> {
    let mut parser = RequestParser::with_config(config);
    parser.drive(data)?;
    parser.finish()
}
