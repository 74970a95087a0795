use crate::error::ProxyError;

/// Returns the request target, the second space-delimited token of `line`.
///
/// Tokens are separated by single spaces, so `"GET  http://a/ HTTP/1.1"`
/// yields an empty target. A line without a second space is rejected.
///
/// ```
/// # use waypoint::http::request_line::extract_target;
/// let target = extract_target("GET http://example.com/ HTTP/1.1\r\n").unwrap();
/// assert_eq!(target, "http://example.com/");
/// ```
pub fn extract_target(line: &str) -> Result<&str, ProxyError> {
    let (_, rest) = line.split_once(' ').ok_or(ProxyError::MalformedRequestLine)?;
    let (target, _) = rest.split_once(' ').ok_or(ProxyError::MalformedRequestLine)?;
    Ok(target)
}

/// Returns the method token, everything before the first space.
pub fn request_method(line: &str) -> Result<&str, ProxyError> {
    line.split_once(' ')
        .map(|(method, _)| method)
        .ok_or(ProxyError::MalformedRequestLine)
}

/// Decodes a raw request line read off the wire.
pub fn decode_line(raw: &[u8]) -> Result<&str, ProxyError> {
    std::str::from_utf8(raw).map_err(|_| ProxyError::MalformedRequestLine)
}
