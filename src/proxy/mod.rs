//! Forward proxy functionality
//!
//! This module implements the relay pipeline: connecting to the origin a
//! request names and moving the request and response between the two sockets.

pub mod origin;
pub mod relay;

pub use origin::OriginConnector;
pub use relay::{Exchange, Relay};
