//! REST client for the Flow Access API.
//!
//! [`Client`] exposes one typed method per query (blocks, collections,
//! accounts, transactions, scripts, events) over an injected
//! [`AccessHandler`](handler::AccessHandler). [`handler::HttpHandler`] is the
//! REST implementation; [`network`] holds the preconfigured endpoints.

pub mod cadence;
pub mod client;
pub mod convert;
pub mod error;
pub mod handler;
pub mod network;
#[cfg(test)]
mod test_util;
pub mod types;

pub use client::Client;
pub use error::{ClientError, ConversionError, HandlerError};
pub use network::Network;
pub use tokio_util::sync::CancellationToken;
