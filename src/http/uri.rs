//! Absolute-URI decomposition.
//!
//! Only the `http://host[:port][/path]` form a forward proxy receives is
//! understood. The scan is deliberately permissive about what follows the
//! port digits and never normalises the path, but the cases that would
//! leave the relay with nothing to connect to (foreign scheme, empty host,
//! unusable port) are reported as typed errors.

use std::fmt;

use crate::error::UriError;

const SCHEME: &str = "http://";
const DEFAULT_PORT: u16 = 80;

/// The origin a request is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Never empty; never contains `/`, `:`, whitespace or control characters.
    pub host: String,
    pub port: u16,
    /// Everything after the first `/` following the scheme. Empty means root.
    pub path: String,
}

impl Target {
    /// `host:port`, suitable for logging and for the connector.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The path as it would appear in an origin-form request line.
    pub fn origin_form(&self) -> String {
        format!("/{}", self.path)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.path)
    }
}

/// Splits `uri` into host, port and path.
///
/// # Example
///
/// ```
/// # use waypoint::http::uri::decompose;
/// let target = decompose("http://example.com:8080/a/b").unwrap();
/// assert_eq!(target.host, "example.com");
/// assert_eq!(target.port, 8080);
/// assert_eq!(target.path, "a/b");
/// ```
pub fn decompose(uri: &str) -> Result<Target, UriError> {
    let has_scheme = uri
        .get(..SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(SCHEME));
    if !has_scheme {
        return Err(UriError::UnsupportedScheme(uri.to_string()));
    }

    let rest = &uri[SCHEME.len()..];

    let host_end = rest.find(is_host_delimiter).unwrap_or(rest.len());
    let host = &rest[..host_end];
    if host.is_empty() {
        return Err(UriError::EmptyHost(uri.to_string()));
    }

    let port = match rest[host_end..].strip_prefix(':') {
        Some(after_colon) => parse_port(after_colon)
            .ok_or_else(|| UriError::InvalidPort(uri.to_string()))?,
        None => DEFAULT_PORT,
    };

    let path = rest
        .find('/')
        .map(|slash| &rest[slash + 1..])
        .unwrap_or_default();

    Ok(Target {
        host: host.to_string(),
        port,
        path: path.to_string(),
    })
}

fn is_host_delimiter(c: char) -> bool {
    c == ':' || c == '/' || c.is_whitespace() || c.is_control()
}

// Leading digits only; whatever follows them is left to the path scan.
fn parse_port(s: &str) -> Option<u16> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse::<u16>().ok().filter(|port| *port != 0)
}
