//! Access API transport abstraction.
//!
//! Defines the [`AccessHandler`] trait and provides a REST implementation
//! ([`HttpHandler`]) plus a test double (`mock::MockHandler`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use http_adapter::HttpHandler;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;

/// The Access API operations the [`Client`](crate::Client) needs, one per
/// query kind.
///
/// Identifiers, addresses and heights arrive already string-encoded; results
/// are undecoded wire records. Every method receives the caller's
/// cancellation token untouched and is responsible for honoring it.
///
/// Implementations are shared across tasks and must be safe for concurrent
/// use.
#[async_trait]
pub trait AccessHandler: Send + Sync {
    async fn get_block_by_id(
        &self,
        ctx: &CancellationToken,
        id: &str,
    ) -> Result<models::Block, HandlerError>;

    /// `height` is a decimal height or a finality sentinel (`sealed`, `final`).
    /// Returns every block known at that height.
    async fn get_block_by_height(
        &self,
        ctx: &CancellationToken,
        height: &str,
    ) -> Result<Vec<models::Block>, HandlerError>;

    async fn get_account(
        &self,
        ctx: &CancellationToken,
        address: &str,
        height: &str,
    ) -> Result<models::Account, HandlerError>;

    async fn get_collection(
        &self,
        ctx: &CancellationToken,
        id: &str,
    ) -> Result<models::Collection, HandlerError>;

    /// Returns the base64 encoded JSON-Cadence result.
    async fn execute_script_at_block_height(
        &self,
        ctx: &CancellationToken,
        height: &str,
        script: &str,
        arguments: &[String],
    ) -> Result<String, HandlerError>;

    async fn execute_script_at_block_id(
        &self,
        ctx: &CancellationToken,
        id: &str,
        script: &str,
        arguments: &[String],
    ) -> Result<String, HandlerError>;

    async fn get_transaction(
        &self,
        ctx: &CancellationToken,
        id: &str,
        include_result: bool,
    ) -> Result<models::Transaction, HandlerError>;

    /// Submit an encoded transaction. There is no response payload.
    async fn send_transaction(
        &self,
        ctx: &CancellationToken,
        transaction: &[u8],
    ) -> Result<(), HandlerError>;

    /// Filter by a height range (`start`/`end`) or by `block_ids`, never both.
    async fn get_events(
        &self,
        ctx: &CancellationToken,
        event_type: &str,
        start: Option<&str>,
        end: Option<&str>,
        block_ids: &[String],
    ) -> Result<Vec<models::BlockEvents>, HandlerError>;
}
