//! Typed Access API client.
//!
//! [`Client`] turns typed arguments into the string shapes an
//! [`AccessHandler`] expects, makes exactly one handler call, and converts
//! the wire record it gets back. Errors are returned as soon as they occur.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cadence;
use crate::convert::{self, SEALED_HEIGHT};
use crate::error::{ClientError, ConversionError};
use crate::handler::{models, AccessHandler, HttpHandler};
use crate::network::Network;
use crate::types::{
    Account, Address, Block, BlockEvents, BlockHeader, Collection, ExecutionResult, Identifier,
    Transaction, TransactionResult,
};

/// Flow Access API client.
///
/// Stateless apart from the shared handler, so clones are cheap and
/// concurrent calls are safe whenever the handler is.
#[derive(Clone)]
pub struct Client {
    handler: Arc<dyn AccessHandler>,
}

impl Client {
    pub fn new(handler: Arc<dyn AccessHandler>) -> Self {
        Self { handler }
    }

    /// Build a client over HTTP for one of the preconfigured networks.
    pub fn for_network(network: Network, debug: bool) -> Result<Self, ClientError> {
        let handler = HttpHandler::new(network.api_url(), debug)?;
        Ok(Self::new(Arc::new(handler)))
    }

    /// Client for a local emulator. `debug` logs request and response bodies.
    pub fn default_emulator(debug: bool) -> Result<Self, ClientError> {
        Self::for_network(Network::Emulator, debug)
    }

    pub fn default_testnet() -> Result<Self, ClientError> {
        Self::for_network(Network::Testnet, false)
    }

    pub fn default_mainnet() -> Result<Self, ClientError> {
        Self::for_network(Network::Mainnet, false)
    }

    /// Always fails until a canarynet endpoint is published, see
    /// [`CANARYNET_API`](crate::network::CANARYNET_API).
    pub fn default_canarynet() -> Result<Self, ClientError> {
        Self::for_network(Network::Canarynet, false)
    }

    pub async fn ping(&self, _ctx: &CancellationToken) -> Result<(), ClientError> {
        Err(ClientError::NotImplemented("ping"))
    }

    // ==========================================================================
    // Blocks
    // ==========================================================================

    pub async fn get_block_by_id(
        &self,
        ctx: &CancellationToken,
        id: Identifier,
    ) -> Result<Block, ClientError> {
        let block = self.handler.get_block_by_id(ctx, &id.to_string()).await?;
        Ok(convert::block_from_wire(block)?)
    }

    pub async fn get_block_by_height(
        &self,
        ctx: &CancellationToken,
        height: u64,
    ) -> Result<Block, ClientError> {
        let blocks = self
            .handler
            .get_block_by_height(ctx, &height.to_string())
            .await?;
        first_block(blocks, || format!("block at height {height}"))
    }

    /// Latest sealed block when `is_sealed`, otherwise latest finalized block.
    pub async fn get_latest_block(
        &self,
        ctx: &CancellationToken,
        is_sealed: bool,
    ) -> Result<Block, ClientError> {
        let height = convert::sealed_to_height(is_sealed);
        let blocks = self.handler.get_block_by_height(ctx, height).await?;
        first_block(blocks, || format!("latest {height} block"))
    }

    pub async fn get_latest_block_header(
        &self,
        ctx: &CancellationToken,
        is_sealed: bool,
    ) -> Result<BlockHeader, ClientError> {
        Ok(self.get_latest_block(ctx, is_sealed).await?.header)
    }

    pub async fn get_block_header_by_id(
        &self,
        ctx: &CancellationToken,
        id: Identifier,
    ) -> Result<BlockHeader, ClientError> {
        Ok(self.get_block_by_id(ctx, id).await?.header)
    }

    pub async fn get_block_header_by_height(
        &self,
        ctx: &CancellationToken,
        height: u64,
    ) -> Result<BlockHeader, ClientError> {
        Ok(self.get_block_by_height(ctx, height).await?.header)
    }

    pub async fn get_collection(
        &self,
        ctx: &CancellationToken,
        id: Identifier,
    ) -> Result<Collection, ClientError> {
        let collection = self.handler.get_collection(ctx, &id.to_string()).await?;
        Ok(convert::collection_from_wire(collection)?)
    }

    // ==========================================================================
    // Transactions
    // ==========================================================================

    /// Submit a transaction. Encoding failures are reported before any
    /// request is made.
    pub async fn send_transaction(
        &self,
        ctx: &CancellationToken,
        tx: &Transaction,
    ) -> Result<(), ClientError> {
        let encoded = convert::transaction_to_wire(tx)?;
        self.handler.send_transaction(ctx, &encoded).await?;
        Ok(())
    }

    pub async fn get_transaction(
        &self,
        ctx: &CancellationToken,
        id: Identifier,
    ) -> Result<Transaction, ClientError> {
        let tx = self
            .handler
            .get_transaction(ctx, &id.to_string(), false)
            .await?;
        Ok(convert::transaction_from_wire(tx)?)
    }

    pub async fn get_transaction_result(
        &self,
        ctx: &CancellationToken,
        id: Identifier,
    ) -> Result<TransactionResult, ClientError> {
        let tx = self
            .handler
            .get_transaction(ctx, &id.to_string(), true)
            .await?;
        let result = tx
            .result
            .ok_or_else(|| ConversionError::new("result", "missing from transaction response"))?;
        Ok(convert::transaction_result_from_wire(result)?)
    }

    // ==========================================================================
    // Accounts
    // ==========================================================================

    /// Account state at the latest sealed block.
    pub async fn get_account(
        &self,
        ctx: &CancellationToken,
        address: Address,
    ) -> Result<Account, ClientError> {
        let account = self
            .handler
            .get_account(ctx, &address.to_string(), SEALED_HEIGHT)
            .await?;
        Ok(convert::account_from_wire(account)?)
    }

    pub async fn get_account_at_latest_block(
        &self,
        ctx: &CancellationToken,
        address: Address,
    ) -> Result<Account, ClientError> {
        self.get_account(ctx, address).await
    }

    pub async fn get_account_at_block_height(
        &self,
        ctx: &CancellationToken,
        address: Address,
        height: u64,
    ) -> Result<Account, ClientError> {
        let account = self
            .handler
            .get_account(ctx, &address.to_string(), &height.to_string())
            .await?;
        Ok(convert::account_from_wire(account)?)
    }

    // ==========================================================================
    // Scripts
    // ==========================================================================

    pub async fn execute_script_at_latest_block(
        &self,
        ctx: &CancellationToken,
        script: &[u8],
        arguments: &[cadence::Value],
    ) -> Result<cadence::Value, ClientError> {
        let args = convert::cadence_args_to_wire(arguments)?;
        let result = self
            .handler
            .execute_script_at_block_height(
                ctx,
                SEALED_HEIGHT,
                &convert::script_to_wire(script),
                &args,
            )
            .await?;
        Ok(convert::cadence_value_from_wire(&result)?)
    }

    pub async fn execute_script_at_block_id(
        &self,
        ctx: &CancellationToken,
        id: Identifier,
        script: &[u8],
        arguments: &[cadence::Value],
    ) -> Result<cadence::Value, ClientError> {
        let args = convert::cadence_args_to_wire(arguments)?;
        let result = self
            .handler
            .execute_script_at_block_id(
                ctx,
                &id.to_string(),
                &convert::script_to_wire(script),
                &args,
            )
            .await?;
        Ok(convert::cadence_value_from_wire(&result)?)
    }

    pub async fn execute_script_at_block_height(
        &self,
        ctx: &CancellationToken,
        height: u64,
        script: &[u8],
        arguments: &[cadence::Value],
    ) -> Result<cadence::Value, ClientError> {
        let args = convert::cadence_args_to_wire(arguments)?;
        let result = self
            .handler
            .execute_script_at_block_height(
                ctx,
                &height.to_string(),
                &convert::script_to_wire(script),
                &args,
            )
            .await?;
        Ok(convert::cadence_value_from_wire(&result)?)
    }

    // ==========================================================================
    // Events
    // ==========================================================================

    /// Events of `event_type` in blocks `start_height..=end_height`.
    pub async fn get_events_for_height_range(
        &self,
        ctx: &CancellationToken,
        event_type: &str,
        start_height: u64,
        end_height: u64,
    ) -> Result<Vec<BlockEvents>, ClientError> {
        let (start, end) = (start_height.to_string(), end_height.to_string());
        let events = self
            .handler
            .get_events(ctx, event_type, Some(start.as_str()), Some(end.as_str()), &[])
            .await?;
        Ok(convert::block_events_from_wire(events)?)
    }

    pub async fn get_events_for_block_ids(
        &self,
        ctx: &CancellationToken,
        event_type: &str,
        block_ids: &[Identifier],
    ) -> Result<Vec<BlockEvents>, ClientError> {
        let ids: Vec<String> = block_ids.iter().map(Identifier::to_string).collect();
        let events = self
            .handler
            .get_events(ctx, event_type, None, None, &ids)
            .await?;
        Ok(convert::block_events_from_wire(events)?)
    }

    // ==========================================================================
    // Not Yet Supported
    // ==========================================================================

    pub async fn get_latest_protocol_state_snapshot(
        &self,
        _ctx: &CancellationToken,
    ) -> Result<Vec<u8>, ClientError> {
        Err(ClientError::NotImplemented(
            "get_latest_protocol_state_snapshot",
        ))
    }

    pub async fn get_execution_result_for_block_id(
        &self,
        _ctx: &CancellationToken,
        _block_id: Identifier,
    ) -> Result<ExecutionResult, ClientError> {
        Err(ClientError::NotImplemented(
            "get_execution_result_for_block_id",
        ))
    }
}

/// A height can resolve to several blocks; the first is the canonical one.
/// An empty answer means nothing is known at that height.
fn first_block(
    blocks: Vec<models::Block>,
    describe: impl FnOnce() -> String,
) -> Result<Block, ClientError> {
    let block = blocks
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::NotFound(describe()))?;
    Ok(convert::block_from_wire(block)?)
}
