use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::error::ParseError;
use crate::syntax::{find_crlf, is_tchar};

/// Case-insensitive header field store.
///
/// Names are kept lowercase. A repeated name folds into one entry whose
/// value is every occurrence joined with `", "` in arrival order. The
/// individual values are kept as well and are available from
/// [`Headers::get_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: BTreeMap<String, Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    folded: String,
    values: Vec<String>,
}

impl Headers {
    /// Create an empty header store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single field line from the front of `data`.
    ///
    /// Returns `(consumed, section_end)`:
    ///
    /// * `(0, false)`: no complete line yet; feed more bytes.
    /// * `(2, true)`: the blank line ending the header section.
    /// * `(n, false)`: one field line of `n` bytes (CRLF included) stored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHeaderLine`] when the line has no
    /// colon, whitespace before the colon, a name outside `tchar`, or a
    /// value that is not valid UTF-8.
    pub fn parse_field_line(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(idx) = find_crlf(data) else {
            return Ok((0, false));
        };
        if idx == 0 {
            return Ok((2, true));
        }

        let line = &data[..idx];
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or(ParseError::MalformedHeaderLine("missing colon"))?;
        let (name, value) = (&line[..colon], &line[colon + 1..]);

        if name.last().is_some_and(|&b| b == b' ' || b == b'\t') {
            return Err(ParseError::MalformedHeaderLine("space before colon"));
        }
        if name.is_empty() {
            return Err(ParseError::MalformedHeaderLine("empty field name"));
        }
        if !name.iter().all(|&b| is_tchar(b)) {
            return Err(ParseError::MalformedHeaderLine("invalid character"));
        }

        // tchar is pure ASCII, so the name is valid UTF-8 here.
        let name = String::from_utf8_lossy(name).to_ascii_lowercase();
        let value = std::str::from_utf8(value)
            .map_err(|_| ParseError::MalformedHeaderLine("invalid utf-8"))?
            .trim()
            .to_string();
        self.append(name, value);

        Ok((idx + 2, false))
    }

    /// Store `value` under the already-lowercased `name`, folding repeats.
    fn append(&mut self, name: String, value: String) {
        match self.fields.get_mut(&name) {
            Some(field) => {
                field.folded.push_str(", ");
                field.folded.push_str(&value);
                field.values.push(value);
            }
            None => {
                self.fields.insert(
                    name,
                    Field {
                        folded: value.clone(),
                        values: vec![value],
                    },
                );
            }
        }
    }

    /// Look up the folded value of a header (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(|f| f.folded.as_str())
    }

    /// Every value received for `name` (case-insensitive), in arrival order.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(|f| f.values.as_slice())
    }

    /// Returns `true` if a header named `name` was received.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no headers were received.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(name, folded value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.folded.as_str()))
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_single_header() {
        let mut h = Headers::new();
        let (n, done) = h.parse_field_line(b"Host: localhost:42069\r\n\r\n").unwrap();
        assert_eq!(h.get("host"), Some("localhost:42069"));
        assert_eq!(n, 23);
        assert!(!done);
    }

    #[test]
    fn value_whitespace_trimmed() {
        let mut h = Headers::new();
        let (n, done) = h
            .parse_field_line(b"Host:    localhost:42069    \r\n\r\n")
            .unwrap();
        assert_eq!(h.get("host"), Some("localhost:42069"));
        assert_eq!(n, 30);
        assert!(!done);
    }

    #[test]
    fn invalid_spacing_before_colon() {
        let mut h = Headers::new();
        let err = h
            .parse_field_line(b"      Host : localhost:42069           \r\n\r\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderLine("space before colon")));
        assert!(h.is_empty());
    }

    #[test]
    fn missing_colon() {
        let mut h = Headers::new();
        let err = h.parse_field_line(b"Host localhost\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderLine("missing colon")));
    }

    #[test]
    fn empty_field_name() {
        let mut h = Headers::new();
        let err = h.parse_field_line(b": value\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderLine("empty field name")));
    }

    #[test]
    fn invalid_character_in_name() {
        let mut h = Headers::new();
        let err = h
            .parse_field_line("H©st: localhost:42069\r\n\r\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderLine("invalid character")));

        let err = h.parse_field_line(b"Bad Name: x\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderLine("invalid character")));
    }

    #[test]
    fn adds_to_existing_headers() {
        let mut h = Headers::new();
        h.append("host".into(), "localhost:42069".into());

        let (n, done) = h
            .parse_field_line(b"Content-Type: application/json\r\n\r\n")
            .unwrap();
        assert_eq!(h.get("content-type"), Some("application/json"));
        assert_eq!(h.get("host"), Some("localhost:42069"));
        assert_eq!(n, 32);
        assert!(!done);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn section_end_consumes_crlf() {
        let mut h = Headers::new();
        assert_eq!(h.parse_field_line(b"\r\n").unwrap(), (2, true));
        assert_eq!(h.parse_field_line(b"\r\nbody").unwrap(), (2, true));
    }

    #[test]
    fn need_more_bytes() {
        let mut h = Headers::new();
        assert_eq!(h.parse_field_line(b"Host: local").unwrap(), (0, false));
        assert_eq!(h.parse_field_line(b"Host: localhost\r").unwrap(), (0, false));
        assert_eq!(h.parse_field_line(b"").unwrap(), (0, false));
        assert!(h.is_empty());
    }

    #[test]
    fn repeated_names_fold_in_arrival_order() {
        let mut h = Headers::new();
        h.append("set-person".into(), "lane-loves-go".into());

        let (n, done) = h
            .parse_field_line(b"Set-Person: prime-loves-zig\r\n\r\n")
            .unwrap();
        assert_eq!(h.get("set-person"), Some("lane-loves-go, prime-loves-zig"));
        assert_eq!(n, 29);
        assert!(!done);

        h.parse_field_line(b"SET-PERSON: tj-loves-ocaml\r\n").unwrap();
        assert_eq!(
            h.get("Set-Person"),
            Some("lane-loves-go, prime-loves-zig, tj-loves-ocaml")
        );
        assert_eq!(
            h.get_all("set-person").unwrap(),
            ["lane-loves-go", "prime-loves-zig", "tj-loves-ocaml"]
        );
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut h = Headers::new();
        h.parse_field_line(b"Content-Length: 5\r\n").unwrap();
        assert_eq!(h.get("CONTENT-LENGTH"), Some("5"));
        assert!(h.contains("content-length"));
        assert_eq!(h.get("content-type"), None);
        assert_eq!(h.get_all("content-type"), None);
    }

    #[test]
    fn value_must_be_utf8() {
        let mut h = Headers::new();
        let err = h.parse_field_line(b"X-Custom: hello\x80world\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderLine("invalid utf-8")));
        assert!(h.is_empty());

        h.parse_field_line("X-Name: Zo\u{eb}\r\n".as_bytes()).unwrap();
        assert_eq!(h.get("x-name"), Some("Zo\u{eb}"));
    }

    #[test]
    fn empty_value_is_kept() {
        let mut h = Headers::new();
        h.parse_field_line(b"X-Empty:\r\n").unwrap();
        assert_eq!(h.get("x-empty"), Some(""));
    }

    #[test]
    fn value_keeps_colons() {
        let mut h = Headers::new();
        h.parse_field_line(b"Referer: http://a.example:8080/x\r\n").unwrap();
        assert_eq!(h.get("referer"), Some("http://a.example:8080/x"));
    }

    #[test]
    fn serializes_as_folded_map() {
        let mut h = Headers::new();
        h.parse_field_line(b"Accept: a\r\n").unwrap();
        h.parse_field_line(b"accept: b\r\n").unwrap();
        h.parse_field_line(b"Host: h\r\n").unwrap();
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"accept":"a, b","host":"h"}"#);
    }
}
