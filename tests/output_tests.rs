use httpfeed::{format_debug, format_headers_only, format_json, parse_request};

#[test]
fn json_output_compact() {
    let req = parse_request(b"GET /coffee HTTP/1.1\r\nHost: h\r\n\r\n").unwrap();
    let json = format_json(&req, false);
    assert_eq!(
        json,
        r#"{"request_line":{"method":"GET","target":"/coffee","http_version":"1.1"},"headers":{"host":"h"},"body":""}"#
    );
}

#[test]
fn json_output_pretty() {
    let req = parse_request(b"GET /pretty HTTP/1.1\r\nHost: h\r\n\r\n").unwrap();
    let json = format_json(&req, true);
    assert!(json.contains('\n'));
    assert!(json.contains("  \"headers\""));
}

#[test]
fn json_output_with_body_and_folded_headers() {
    let raw = b"POST / HTTP/1.1\r\nAccept: a\r\nAccept: b\r\nContent-Length: 4\r\n\r\ndata";
    let req = parse_request(raw).unwrap();
    let json: serde_json::Value = serde_json::from_str(&format_json(&req, false)).unwrap();
    assert_eq!(json["body"], "data");
    assert_eq!(json["headers"]["accept"], "a, b");
    assert_eq!(json["headers"]["content-length"], "4");
}

#[test]
fn debug_output_contains_sections() {
    let req = parse_request(b"GET /test HTTP/1.1\r\nHost: h\r\n\r\n").unwrap();
    let dbg = format_debug(&req);
    assert!(dbg.contains("=== HTTP Request ==="));
    assert!(dbg.contains("Method:  GET"));
    assert!(dbg.contains("Target:  /test"));
    assert!(dbg.contains("Version: 1.1"));
    assert!(dbg.contains("--- Headers (1) ---"));
    assert!(dbg.contains("  host: h"));
    assert!(dbg.contains("--- No Body ---"));
}

#[test]
fn debug_output_shows_body() {
    let req = parse_request(b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc").unwrap();
    let dbg = format_debug(&req);
    assert!(dbg.contains("--- Body (3 bytes) ---\nabc\n"));
}

#[test]
fn debug_output_binary_body() {
    let req = parse_request(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\n\xFF\xFE").unwrap();
    assert!(format_debug(&req).contains("<binary data: 2 bytes>"));
}

#[test]
fn headers_only_output() {
    let raw = b"GET /path HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n";
    let req = parse_request(raw).unwrap();
    let out = format_headers_only(&req);
    assert_eq!(out, "GET /path HTTP/1.1\naccept: */*\nhost: example.com\n");
}
