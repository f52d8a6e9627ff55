use std::fmt::Write as _;

use crate::request::Request;

/// Serialize a [`Request`] to a JSON string.
///
/// When `pretty` is `true` the output is indented for readability.
pub fn format_json(request: &Request, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(request)
    } else {
        serde_json::to_string(request)
    };
    result.unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Render a [`Request`] in a human-readable debug format.
pub fn format_debug(request: &Request) -> String {
    let mut out = String::with_capacity(256);

    out.push_str("=== HTTP Request ===\n");
    let _ = writeln!(out, "Method:  {}", request.method());
    let _ = writeln!(out, "Target:  {}", request.target());
    let _ = writeln!(out, "Version: {}", request.http_version());

    let _ = writeln!(out, "\n--- Headers ({}) ---", request.headers().len());
    for (name, value) in request.headers().iter() {
        let _ = writeln!(out, "  {name}: {value}");
    }

    if request.body().is_empty() {
        out.push_str("\n--- No Body ---\n");
    } else {
        let _ = writeln!(out, "\n--- Body ({} bytes) ---", request.body().len());
        match request.body_as_str() {
            Some(s) => out.push_str(s),
            None => {
                let _ = write!(out, "<binary data: {} bytes>", request.body().len());
            }
        }
        out.push('\n');
    }

    out.push_str("====================\n");
    out
}

/// Render only the request line and headers (no body).
pub fn format_headers_only(request: &Request) -> String {
    let mut out = String::with_capacity(64 + request.headers().len() * 40);

    let _ = writeln!(out, "{}", request.request_line());
    for (name, value) in request.headers().iter() {
        let _ = writeln!(out, "{name}: {value}");
    }

    out
}
