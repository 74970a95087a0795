//! Error types for the relay pipeline.
//!
//! Every variant is local to a single client connection: the listener logs
//! it, releases both sockets and moves on to the next accept.

use std::io;

use thiserror::Error;

/// Reasons an absolute URI cannot be decomposed into a [`Target`](crate::http::uri::Target).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UriError {
    /// The URI does not start with `http://` (compared case-insensitively).
    #[error("unsupported scheme in uri {0:?}")]
    UnsupportedScheme(String),

    /// The scheme is followed directly by a delimiter or the end of input.
    #[error("uri {0:?} has an empty host")]
    EmptyHost(String),

    /// A `:` follows the host but no valid port in 1..=65535 does.
    #[error("invalid port in uri {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("malformed request line")]
    MalformedRequestLine,

    #[error(transparent)]
    Uri(#[from] UriError),

    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("origin {host}:{port} unreachable: {source}")]
    OriginUnreachable {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}
