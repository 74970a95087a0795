use std::net::Shutdown;

use bytes::BytesMut;
use socket2::SockRef;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::error::ProxyError;
use crate::http::chunked::ChunkedBody;
use crate::http::request_line::{decode_line, extract_target, request_method};
use crate::http::response::{MAX_HEAD_SIZE, ResponseFraming, ResponseHead, find_head_end};
use crate::http::uri::{Target, decompose};
use crate::proxy::origin::OriginConnector;

/// Longest request or header line accepted from a client, terminator included.
pub const MAX_LINE: usize = 8192;

/// Default buffer size for reading the response head
const BUFFER_SIZE: usize = 8192;

/// A request that was relayed to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// The absolute URI from the request line.
    pub uri: String,
    /// Bytes written back to the client, head and body.
    pub response_bytes: u64,
}

/// Phases of one relay; see the diagram in [`crate::http`].
enum RelayState {
    ReadRequestLine,
    ExtractTarget {
        line: Vec<u8>,
    },
    Decompose {
        line: Vec<u8>,
        uri: String,
    },
    ConnectOrigin {
        line: Vec<u8>,
        uri: String,
        target: Target,
    },
    ForwardRequestHeaders {
        line: Vec<u8>,
        uri: String,
        origin: TcpStream,
    },
    ShutdownRequestSide {
        uri: String,
        origin: TcpStream,
    },
    RelayResponse {
        uri: String,
        origin: TcpStream,
    },
    Close(Option<Exchange>),
}

/// Carries one client connection through a single proxied request.
///
/// The request side is relayed line by line up to the blank line ending the
/// header block. The response side is copied as opaque bytes, bounded by
/// its framing. Any failure abandons the request: the client sees its
/// connection close without a response.
pub struct Relay {
    client: BufReader<TcpStream>,
    connector: OriginConnector,
    head_request: bool,
    state: RelayState,
}

impl Relay {
    pub fn new(client: TcpStream, connector: OriginConnector) -> Self {
        Self {
            client: BufReader::new(client),
            connector,
            head_request: false,
            state: RelayState::ReadRequestLine,
        }
    }

    /// Runs the relay to completion and closes the client connection.
    ///
    /// Returns `Ok(None)` when the client disconnected without sending
    /// anything.
    pub async fn run(mut self) -> Result<Option<Exchange>, ProxyError> {
        let outcome = self.drive().await;

        // The peer may already be gone.
        let _ = self.client.get_mut().shutdown().await;

        outcome
    }

    async fn drive(&mut self) -> Result<Option<Exchange>, ProxyError> {
        loop {
            self.state = match std::mem::replace(&mut self.state, RelayState::Close(None)) {
                RelayState::ReadRequestLine => {
                    let mut line = Vec::with_capacity(256);
                    if self.read_client_line(&mut line).await? == 0 {
                        debug!("Client closed before sending a request");
                        RelayState::Close(None)
                    } else {
                        RelayState::ExtractTarget { line }
                    }
                }

                RelayState::ExtractTarget { line } => {
                    let text = decode_line(&line)?;
                    let uri = extract_target(text)?.to_string();
                    self.head_request = request_method(text)?.eq_ignore_ascii_case("HEAD");
                    RelayState::Decompose { line, uri }
                }

                RelayState::Decompose { line, uri } => {
                    let target = decompose(&uri)?;
                    debug!(
                        host = %target.host,
                        port = target.port,
                        path = %target.origin_form(),
                        "Decomposed request target"
                    );
                    RelayState::ConnectOrigin { line, uri, target }
                }

                RelayState::ConnectOrigin { line, uri, target } => {
                    let origin = self.connector.connect(&target).await?;
                    RelayState::ForwardRequestHeaders { line, uri, origin }
                }

                RelayState::ForwardRequestHeaders {
                    line,
                    uri,
                    mut origin,
                } => {
                    self.forward_request_headers(&line, &mut origin).await?;
                    RelayState::ShutdownRequestSide { uri, origin }
                }

                RelayState::ShutdownRequestSide { uri, mut origin } => {
                    origin.shutdown().await?;
                    SockRef::from(self.client.get_ref()).shutdown(Shutdown::Read)?;
                    trace!("Request side half-closed");
                    RelayState::RelayResponse { uri, origin }
                }

                RelayState::RelayResponse { uri, mut origin } => {
                    let response_bytes = self.relay_response(&mut origin).await?;
                    RelayState::Close(Some(Exchange {
                        uri,
                        response_bytes,
                    }))
                }

                RelayState::Close(exchange) => {
                    return Ok(exchange);
                }
            };
        }
    }

    /// Reads one LF-terminated line, appending it to `buf`.
    ///
    /// Returns the number of bytes read; zero means the client closed.
    async fn read_client_line(&mut self, buf: &mut Vec<u8>) -> Result<usize, ProxyError> {
        let n = (&mut self.client)
            .take(MAX_LINE as u64)
            .read_until(b'\n', buf)
            .await?;

        if n == MAX_LINE && !buf.ends_with(b"\n") {
            return Err(ProxyError::LineTooLong { limit: MAX_LINE });
        }

        Ok(n)
    }

    async fn forward_request_headers(
        &mut self,
        request_line: &[u8],
        origin: &mut TcpStream,
    ) -> Result<(), ProxyError> {
        origin.write_all(request_line).await?;

        let mut line = Vec::with_capacity(256);
        loop {
            line.clear();
            let n = self.read_client_line(&mut line).await?;
            if n == 0 {
                debug!("Client closed inside the header block");
                break;
            }

            origin.write_all(&line).await?;

            // Bare CRLF (or LF) ends the header block.
            if n <= 2 {
                break;
            }
        }

        origin.flush().await?;
        Ok(())
    }

    /// Copies the origin's response to the client and returns the byte count.
    async fn relay_response(&mut self, origin: &mut TcpStream) -> Result<u64, ProxyError> {
        let head_request = self.head_request;
        let client = self.client.get_mut();
        let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
        let mut relayed = 0u64;

        // Interim 1xx heads pass straight through; the final head decides
        // the framing of what follows.
        let (head_end, framing) = loop {
            let Some(head_end) = read_head(origin, &mut buffer).await? else {
                // The head never ended: relay whatever arrives until close.
                break (buffer.len(), ResponseFraming::UntilClose);
            };

            let head = ResponseHead::parse(&buffer[..head_end]);
            if head.as_ref().is_some_and(ResponseHead::is_interim) {
                let interim = buffer.split_to(head_end);
                client.write_all(&interim).await?;
                relayed += interim.len() as u64;
                trace!("Interim response relayed");
                continue;
            }

            let framing = head
                .map(|head| head.framing(head_request))
                .unwrap_or(ResponseFraming::UntilClose);
            break (head_end, framing);
        };

        relayed += match framing {
            ResponseFraming::Length(len) => {
                let buffered_body = (buffer.len() - head_end) as u64;
                let sent = head_end + buffered_body.min(len) as usize;
                client.write_all(&buffer[..sent]).await?;

                let remaining = len.saturating_sub(buffered_body);
                let copied = tokio::io::copy(&mut (&mut *origin).take(remaining), client).await?;
                if copied < remaining {
                    debug!(
                        expected = len,
                        missing = remaining - copied,
                        "Origin closed before the declared body was complete"
                    );
                }
                sent as u64 + copied
            }

            ResponseFraming::Chunked => {
                let mut body = ChunkedBody::new();
                let sent = head_end + body.feed(&buffer[head_end..]);
                client.write_all(&buffer[..sent]).await?;
                let mut total = sent as u64;

                let mut chunk = vec![0u8; BUFFER_SIZE];
                while !body.is_done() {
                    let n = origin.read(&mut chunk).await?;
                    if n == 0 {
                        debug!("Origin closed inside a chunked body");
                        break;
                    }
                    let used = body.feed(&chunk[..n]);
                    client.write_all(&chunk[..used]).await?;
                    total += used as u64;
                }
                total
            }

            ResponseFraming::UntilClose => {
                client.write_all(&buffer).await?;
                buffer.len() as u64 + tokio::io::copy(origin, client).await?
            }
        };

        client.flush().await?;
        trace!(bytes = relayed, "Response relayed");
        Ok(relayed)
    }
}

/// Reads from `origin` until `buffer` holds a complete head.
///
/// Returns the offset just past the head, or `None` when the origin closed
/// first or the head outgrew [`MAX_HEAD_SIZE`].
async fn read_head(
    origin: &mut TcpStream,
    buffer: &mut BytesMut,
) -> std::io::Result<Option<usize>> {
    loop {
        if let Some(head_end) = find_head_end(buffer) {
            return Ok(Some(head_end));
        }
        if buffer.len() > MAX_HEAD_SIZE {
            return Ok(None);
        }

        buffer.reserve(BUFFER_SIZE);
        if origin.read_buf(buffer).await? == 0 {
            return Ok(None);
        }
    }
}
