use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::access_log::AccessLog;
use crate::config::Config;
use crate::proxy::{OriginConnector, Relay};

/// Accepts clients on `cfg.listen_addr` and relays their requests.
///
/// Connections are served one at a time: each relay runs to completion,
/// including its access log entry, before the next accept.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, cfg).await
}

/// Runs the accept loop on an already bound listener.
pub async fn serve(listener: TcpListener, cfg: &Config) -> anyhow::Result<()> {
    let connector = OriginConnector::new(cfg.connect_timeout());
    let mut access_log = AccessLog::open(cfg.access_log.as_deref()).await?;

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Accept failed: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        match Relay::new(socket, connector).run().await {
            Ok(Some(exchange)) => {
                info!(
                    client = %peer,
                    uri = %exchange.uri,
                    bytes = exchange.response_bytes,
                    "Request relayed"
                );
                if let Err(e) = access_log.record(peer, &exchange).await {
                    error!("Access log write failed: {:#}", e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Relay for {} abandoned: {}", peer, e);
            }
        }
    }
}
