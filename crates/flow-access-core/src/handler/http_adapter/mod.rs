//! REST client for the Flow Access API.
//!
//! Implements [`AccessHandler`](super::AccessHandler) over HTTP using
//! `reqwest`: one request per handler call, JSON decoding of the response,
//! and mapping of API error bodies into [`HandlerError`](crate::error::HandlerError).

mod client;
mod connection;
mod protocol;

pub use client::HttpHandler;
