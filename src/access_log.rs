//! Access log formatting and output.
//!
//! One line per relayed request:
//!
//! ```text
//! Mon 19 Oct 2026 14:03:27 +02:00: 10.0.0.7 http://example.com/index.html 5120
//! ```

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local, TimeZone};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::proxy::relay::Exchange;

const TIME_FORMAT: &str = "%a %d %b %Y %H:%M:%S %Z";

/// Renders a log line for one request.
///
/// `client` is the raw IPv4 address in network byte order, as it sits in a
/// socket address; see [`network_order`]. The timestamp is an input so the
/// same arguments always produce the same line.
pub fn format_log_entry<Tz>(at: &DateTime<Tz>, client: u32, uri: &str, size: u64) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let host = u32::from_be(client);
    let a = host >> 24;
    let b = (host >> 16) & 0xff;
    let c = (host >> 8) & 0xff;
    let d = host & 0xff;

    format!(
        "{}: {}.{}.{}.{} {} {}",
        at.format(TIME_FORMAT),
        a,
        b,
        c,
        d,
        uri,
        size
    )
}

/// The in-memory, network-order representation of `addr`.
pub fn network_order(addr: Ipv4Addr) -> u32 {
    u32::from_ne_bytes(addr.octets())
}

/// Destination for access log lines.
///
/// With a path, lines are appended to that file. Without one they go out as
/// `tracing` events under the `access` target.
pub struct AccessLog {
    file: Option<File>,
}

impl AccessLog {
    pub async fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await
                    .with_context(|| format!("opening access log {}", path.display()))?,
            ),
            None => None,
        };

        Ok(Self { file })
    }

    /// Logs a completed exchange for the client at `peer`.
    pub async fn record(&mut self, peer: SocketAddr, exchange: &Exchange) -> anyhow::Result<()> {
        let v4 = match peer.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(v6) => v6.to_ipv4_mapped(),
        };

        let Some(v4) = v4 else {
            tracing::info!(
                target: "access",
                client = %peer.ip(),
                uri = %exchange.uri,
                bytes = exchange.response_bytes,
                "request completed"
            );
            return Ok(());
        };

        let line = format_log_entry(
            &Local::now(),
            network_order(v4),
            &exchange.uri,
            exchange.response_bytes,
        );
        self.write_line(&line).await
    }

    pub async fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        match &mut self.file {
            Some(file) => {
                file.write_all(line.as_bytes()).await?;
                file.write_all(b"\n").await?;
                file.flush().await.context("flushing access log")?;
            }
            None => tracing::info!(target: "access", "{}", line),
        }
        Ok(())
    }
}
