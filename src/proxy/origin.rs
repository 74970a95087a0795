//! Outbound connections to origin servers.

use std::io;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::ProxyError;
use crate::http::uri::Target;

/// Opens connections to origins. One attempt per call, never retried.
#[derive(Debug, Clone, Copy, Default)]
pub struct OriginConnector {
    /// Connection timeout duration. `None` waits as long as the OS does.
    connect_timeout: Option<Duration>,
}

impl OriginConnector {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self { connect_timeout }
    }

    pub async fn connect(&self, target: &Target) -> Result<TcpStream, ProxyError> {
        self.connect_to(&target.host, target.port).await
    }

    /// Resolves `host` and connects to `port`.
    ///
    /// DNS failures, refusals and timeouts all surface as
    /// [`ProxyError::OriginUnreachable`].
    pub async fn connect_to(&self, host: &str, port: u16) -> Result<TcpStream, ProxyError> {
        let unreachable_origin = |source: io::Error| ProxyError::OriginUnreachable {
            host: host.to_string(),
            port,
            source,
        };

        let connecting = TcpStream::connect((host, port));
        let stream = match self.connect_timeout {
            Some(limit) => timeout(limit, connecting).await.map_err(|_| {
                unreachable_origin(io::Error::new(io::ErrorKind::TimedOut, "connection timeout"))
            })?,
            None => connecting.await,
        }
        .map_err(&unreachable_origin)?;

        stream.set_nodelay(true)?;

        tracing::trace!(host, port, "Connected to origin");
        Ok(stream)
    }
}
