use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::headers::Headers;
use crate::request::Request;
use crate::request_line::{RequestLine, parse_request_line};

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

/// Stage of a [`RequestParser`]. States only ever move forward, in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParseState {
    /// Waiting for the request line.
    Initialized,
    /// Reading header field lines.
    ParsingHeaders,
    /// Reading `Content-Length` body bytes.
    ParsingBody,
    /// A complete request has been read.
    Done,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A line-oriented HTTP/1.1 request state machine.
///
/// The parser never buffers input itself: each call looks at the bytes it
/// is given and reports how many it consumed. The caller keeps the rest and
/// offers them again, with more data appended, on the next call.
///
/// # Usage
///
/// ```rust
/// use httpfeed::{ParseState, RequestParser};
///
/// let mut parser = RequestParser::new();
/// let data = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
///
/// let consumed = parser.drive(data).unwrap();
/// assert_eq!(consumed, data.len());
/// assert_eq!(parser.state(), ParseState::Done);
///
/// let request = parser.finish().unwrap();
/// assert_eq!(request.target(), "/");
/// ```
#[derive(Debug)]
pub struct RequestParser {
    state: ParseState,
    config: ParserConfig,
    request_line: Option<RequestLine>,
    headers: Headers,
    body: Vec<u8>,
    body_read: usize,
}

impl RequestParser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a new parser with a custom version allow-list and limits.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            state: ParseState::Initialized,
            config,
            request_line: None,
            headers: Headers::new(),
            body: Vec::new(),
            body_read: 0,
        }
    }

    /// Perform a single state transition over `data`.
    ///
    /// Returns the number of bytes consumed. Zero means the current stage
    /// needs more input before it can make progress.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on malformed input, or
    /// [`ParseError::StateMisuse`] if the parser is already done.
    pub fn advance(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let consumed = match self.state {
            ParseState::Initialized => match parse_request_line(data, &self.config)? {
                Some((line, n)) => {
                    self.request_line = Some(line);
                    self.state = ParseState::ParsingHeaders;
                    n
                }
                None => 0,
            },

            ParseState::ParsingHeaders => {
                let (n, section_end) = self.headers.parse_field_line(data)?;
                if section_end {
                    self.state = ParseState::ParsingBody;
                }
                n
            }

            ParseState::ParsingBody => self.advance_body(data)?,

            ParseState::Done => {
                return Err(ParseError::StateMisuse("advance called after Done"));
            }
        };

        trace!(state = ?self.state, consumed, available = data.len(), "parser step");
        Ok(consumed)
    }

    fn advance_body(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let Some(declared) = self.declared_length()? else {
            if !data.is_empty() {
                debug!(discarded = data.len(), "no content-length; ignoring trailing bytes");
            }
            self.state = ParseState::Done;
            return Ok(data.len());
        };

        self.body.extend_from_slice(data);
        self.body_read += data.len();

        if self.body_read > declared {
            return Err(ParseError::BodyFraming("content-length exceeded"));
        }
        if self.body_read == declared {
            self.state = ParseState::Done;
        }
        Ok(data.len())
    }

    /// The declared `Content-Length`, checked against the body size cap.
    fn declared_length(&self) -> Result<Option<usize>, ParseError> {
        let Some(raw) = self.headers.get("content-length") else {
            return Ok(None);
        };
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::BodyFraming("invalid content-length"));
        }
        let declared: usize = raw
            .parse()
            .map_err(|_| ParseError::BodyFraming("invalid content-length"))?;

        if let Some(limit) = self.config.max_body_size {
            if declared > limit {
                return Err(ParseError::BodyTooLarge { declared, limit });
            }
        }
        Ok(Some(declared))
    }

    /// Run [`advance`](Self::advance) until the request is done or a step
    /// consumes nothing.
    ///
    /// Returns the total number of bytes consumed from the front of `data`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error any step reports.
    pub fn drive(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let mut total = 0;
        while self.state != ParseState::Done {
            let n = self.advance(&data[total..])?;
            total += n;
            if n == 0 {
                break;
            }
        }
        Ok(total)
    }

    // ----- public query / finalization ------------------------------------

    /// Current stage of the parser.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Returns `true` when a complete request has been parsed.
    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// The configuration this parser was built with.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// The request line, once it has been parsed.
    pub fn request_line(&self) -> Option<&RequestLine> {
        self.request_line.as_ref()
    }

    /// Header fields parsed so far.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Body bytes accumulated so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the parser and return the completed [`Request`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::IncompleteRequest`] if the parser has not yet
    /// reached [`ParseState::Done`].
    pub fn finish(self) -> Result<Request, ParseError> {
        if self.state != ParseState::Done {
            return Err(ParseError::IncompleteRequest);
        }
        let request_line = self.request_line.ok_or(ParseError::IncompleteRequest)?;
        Ok(Request::new(request_line, self.headers, self.body))
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------
