//! HTTP protocol pieces used by the relay.
//!
//! The proxy never builds or rewrites messages; it only reads enough of
//! them to know where to connect and when to stop copying.
//!
//! - **`request_line`**: pulls the method and absolute target out of a request line
//! - **`uri`**: decomposes an `http://` URI into host, port and path
//! - **`response`**: reads status and framing headers from an origin response head
//! - **`chunked`**: finds where a chunked response body ends
//!
//! # Relay State Machine
//!
//! Each client connection goes through one pass of:
//!
//! ```text
//!        ┌─────────────────┐
//!        │ ReadRequestLine │ ← EOF here closes quietly
//!        └───────┬─────────┘
//!                ▼
//!        ┌─────────────────┐     ┌───────────┐     ┌───────────────┐
//!        │  ExtractTarget  │ ──▶ │ Decompose │ ──▶ │ ConnectOrigin │
//!        └─────────────────┘     └───────────┘     └───────┬───────┘
//!                                                          ▼
//!        ┌─────────────────────┐     ┌──────────────────────────┐
//!        │ ShutdownRequestSide │ ◀── │  ForwardRequestHeaders   │
//!        └───────┬─────────────┘     └──────────────────────────┘
//!                ▼
//!        ┌─────────────────┐
//!        │  RelayResponse  │ ← opaque copy, bounded by framing
//!        └───────┬─────────┘
//!                ▼
//!             Close
//! ```
//!
//! Any error jumps straight to `Close`.

pub mod chunked;
pub mod request_line;
pub mod response;
pub mod uri;
