use waypoint::http::response::{ResponseFraming, ResponseHead, find_head_end};

#[test]
fn test_find_head_end() {
    let buf = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi";
    assert_eq!(find_head_end(buf), Some(buf.len() - 2));
    assert_eq!(find_head_end(b"HTTP/1.1 200 OK\r\n"), None);
}

#[test]
fn test_parse_content_length() {
    let head = ResponseHead::parse(b"HTTP/1.1 200 OK\r\ncontent-length: 42\r\n\r\n").unwrap();
    assert_eq!(head.status, 200);
    assert_eq!(head.content_length, Some(42));
    assert!(!head.chunked);
    assert_eq!(head.framing(false), ResponseFraming::Length(42));
}

#[test]
fn test_missing_content_length_reads_until_close() {
    let head = ResponseHead::parse(b"HTTP/1.0 200 OK\r\nServer: test\r\n\r\n").unwrap();
    assert_eq!(head.content_length, None);
    assert_eq!(head.framing(false), ResponseFraming::UntilClose);
}

#[test]
fn test_chunked_framing_overrides_content_length() {
    let head = ResponseHead::parse(
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Length: 10\r\n\r\n",
    )
    .unwrap();
    assert!(head.chunked);
    assert_eq!(head.content_length, None);
    assert_eq!(head.framing(false), ResponseFraming::Chunked);
}

#[test]
fn test_transfer_coding_must_end_in_chunked() {
    let cases = vec![
        ("gzip, chunked", ResponseFraming::Chunked),
        ("CHUNKED", ResponseFraming::Chunked),
        ("chunked, gzip", ResponseFraming::UntilClose),
        ("identity", ResponseFraming::UntilClose),
    ];

    for (coding, expected) in cases {
        let raw = format!(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: {}\r\nContent-Length: 4\r\n\r\n",
            coding
        );
        let head = ResponseHead::parse(raw.as_bytes()).unwrap();
        assert_eq!(head.framing(false), expected, "coding {:?}", coding);
    }
}

#[test]
fn test_bodyless_statuses() {
    for status in ["101 Switching Protocols", "204 No Content", "304 Not Modified"] {
        let raw = format!("HTTP/1.1 {}\r\nContent-Length: 5\r\n\r\n", status);
        let head = ResponseHead::parse(raw.as_bytes()).unwrap();
        assert!(!head.is_interim());
        assert_eq!(head.framing(false), ResponseFraming::Length(0));
    }
}

#[test]
fn test_informational_heads_are_interim() {
    for status in ["100 Continue", "102 Processing", "103 Early Hints"] {
        let raw = format!("HTTP/1.1 {}\r\n\r\n", status);
        let head = ResponseHead::parse(raw.as_bytes()).unwrap();
        assert!(head.is_interim(), "{} should be interim", status);
    }

    let head = ResponseHead::parse(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
    assert!(!head.is_interim());
}

#[test]
fn test_head_request_has_no_body() {
    let head = ResponseHead::parse(b"HTTP/1.1 200 OK\r\nContent-Length: 512\r\n\r\n").unwrap();
    assert_eq!(head.framing(true), ResponseFraming::Length(0));
}

#[test]
fn test_unparseable_status_line() {
    assert!(ResponseHead::parse(b"garbage\r\n\r\n").is_none());
    assert!(ResponseHead::parse(b"HTTP/1.1 abc OK\r\n\r\n").is_none());
    assert!(ResponseHead::parse(b"\xff\xfe\r\n\r\n").is_none());
}

#[test]
fn test_malformed_header_lines_are_skipped() {
    let head =
        ResponseHead::parse(b"HTTP/1.1 200 OK\r\nBroken\r\nContent-Length: 3\r\n\r\n").unwrap();
    assert_eq!(head.content_length, Some(3));
}
