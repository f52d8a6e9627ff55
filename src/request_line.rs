use serde::Serialize;
use std::fmt;

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::syntax::{find_crlf, is_tchar};

/// The first line of an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLine {
    /// Request method, always uppercase (e.g. `GET`).
    pub method: String,
    /// Request target, kept verbatim (e.g. `/coffee?size=large`).
    pub target: String,
    /// Protocol version without the `HTTP/` prefix (e.g. `1.1`).
    pub http_version: String,
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} HTTP/{}", self.method, self.target, self.http_version)
    }
}

/// Parse the request line at the front of `data`.
///
/// Returns `Ok(None)` until a full CRLF-terminated line is available.
/// On success, returns the line and the bytes consumed, CRLF included.
///
/// # Errors
///
/// Returns [`ParseError::MalformedRequestLine`] if the line does not have
/// exactly three space-separated parts, the method is not an uppercase
/// token, or the version is not `HTTP/` followed by an allowed version.
pub fn parse_request_line(
    data: &[u8],
    config: &ParserConfig,
) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(idx) = find_crlf(data) else {
        return Ok(None);
    };

    let text = std::str::from_utf8(&data[..idx])
        .map_err(|_| ParseError::MalformedRequestLine("invalid utf-8"))?;
    let line = parse_request_line_text(text, config)?;

    Ok(Some((line, idx + 2)))
}

fn parse_request_line_text(text: &str, config: &ParserConfig) -> Result<RequestLine, ParseError> {
    let parts: Vec<&str> = text.split(' ').collect();
    let [method, target, protocol] = parts[..] else {
        return Err(ParseError::MalformedRequestLine("wrong token count"));
    };

    if method != method.to_uppercase() {
        return Err(ParseError::MalformedRequestLine("method not uppercase"));
    }
    if method.is_empty() || !method.bytes().all(is_tchar) {
        return Err(ParseError::MalformedRequestLine("invalid method"));
    }
    if target.is_empty() {
        return Err(ParseError::MalformedRequestLine("empty request target"));
    }

    let version_parts: Vec<&str> = protocol.split('/').collect();
    let [prefix, version] = version_parts[..] else {
        return Err(ParseError::MalformedRequestLine("bad protocol prefix"));
    };
    if !prefix.eq_ignore_ascii_case("HTTP") {
        return Err(ParseError::MalformedRequestLine("bad protocol prefix"));
    }
    if !config.supports_version(version) {
        return Err(ParseError::MalformedRequestLine("unsupported version"));
    }

    Ok(RequestLine {
        method: method.to_string(),
        target: target.to_string(),
        http_version: version.to_string(),
    })
}
