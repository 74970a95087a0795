use waypoint::error::ProxyError;
use waypoint::http::request_line::{decode_line, extract_target, request_method};
use waypoint::http::uri::decompose;

#[test]
fn test_extract_target_from_get_line() {
    let line = "GET http://host:8080/path HTTP/1.1";
    assert_eq!(extract_target(line).unwrap(), "http://host:8080/path");
}

#[test]
fn test_extract_target_ignores_line_terminator() {
    let line = "GET http://example.com/index.html HTTP/1.0\r\n";
    assert_eq!(extract_target(line).unwrap(), "http://example.com/index.html");
}

#[test]
fn test_extract_target_single_token_fails() {
    assert!(matches!(
        extract_target("GET\r\n"),
        Err(ProxyError::MalformedRequestLine)
    ));
}

#[test]
fn test_extract_target_two_tokens_fails() {
    assert!(matches!(
        extract_target("GET http://example.com/"),
        Err(ProxyError::MalformedRequestLine)
    ));
}

#[test]
fn test_extract_target_empty_line_fails() {
    assert!(matches!(
        extract_target(""),
        Err(ProxyError::MalformedRequestLine)
    ));
}

#[test]
fn test_extract_target_double_space_yields_empty_target() {
    assert_eq!(extract_target("GET  http://a/ HTTP/1.1").unwrap(), "");
}

#[test]
fn test_request_method() {
    assert_eq!(request_method("HEAD http://a/ HTTP/1.1").unwrap(), "HEAD");
    assert!(request_method("HEAD").is_err());
}

#[test]
fn test_decode_line_rejects_invalid_utf8() {
    assert!(matches!(
        decode_line(b"GET \xff\xfe HTTP/1.1\r\n"),
        Err(ProxyError::MalformedRequestLine)
    ));
    assert_eq!(decode_line(b"GET / HTTP/1.1").unwrap(), "GET / HTTP/1.1");
}

#[test]
fn test_extract_then_decompose_recovers_components() {
    let cases = vec![
        ("example.com", 80, ""),
        ("localhost", 1, "a"),
        ("10.1.2.3", 65535, "deep/nested/path.html"),
        ("cs.cmu.edu", 15213, "search?q=proxy&lang=en"),
        ("xn--bcher-kva.example", 8443, "~user/"),
    ];

    for (host, port, path) in cases {
        let line = format!("GET http://{}:{}/{} HTTP/1.1\r\n", host, port, path);
        let target = decompose(extract_target(&line).unwrap()).unwrap();

        assert_eq!(target.host, host);
        assert_eq!(target.port, port);
        assert_eq!(target.path, path);
    }
}
