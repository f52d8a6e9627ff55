use serde::{Serialize, Serializer};

use crate::headers::Headers;
use crate::request_line::RequestLine;

/// A fully parsed HTTP request.
///
/// Only a finished [`RequestParser`](crate::RequestParser) can build one,
/// and it is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    /// Empty when no `Content-Length` was sent.
    #[serde(serialize_with = "serialize_body")]
    body: Vec<u8>,
}

/// Serialize body bytes as a UTF-8 string (lossy) for JSON output.
fn serialize_body<S: Serializer>(body: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(body))
}

impl Request {
    pub(crate) fn new(request_line: RequestLine, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            request_line,
            headers,
            body,
        }
    }

    /// The parsed request line.
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    /// The request method (e.g. `GET`).
    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    /// The request target (e.g. `/coffee`).
    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// The protocol version without the `HTTP/` prefix (e.g. `1.1`).
    pub fn http_version(&self) -> &str {
        &self.request_line.http_version
    }

    /// The header store.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Return the body as a UTF-8 `&str` if it is valid UTF-8.
    pub fn body_as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Parse the `Content-Length` header, if present and valid.
    pub fn content_length(&self) -> Option<usize> {
        self.headers
            .get("content-length")
            .and_then(|v| v.parse().ok())
    }
}
