use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;

use super::models;
use super::AccessHandler;

/// One recorded handler invocation, with the exact string arguments the
/// caller passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetBlockById(String),
    GetBlockByHeight(String),
    GetAccount {
        address: String,
        height: String,
    },
    GetCollection(String),
    ExecuteScriptAtBlockHeight {
        height: String,
        script: String,
        arguments: Vec<String>,
    },
    ExecuteScriptAtBlockId {
        id: String,
        script: String,
        arguments: Vec<String>,
    },
    GetTransaction {
        id: String,
        include_result: bool,
    },
    SendTransaction(Vec<u8>),
    GetEvents {
        event_type: String,
        start: Option<String>,
        end: Option<String>,
        block_ids: Vec<String>,
    },
}

/// A mock Access API handler for testing. Returns canned wire records
/// populated via the builder pattern and records every call.
pub struct MockHandler {
    blocks_by_id: HashMap<String, models::Block>,
    blocks_by_height: HashMap<String, Vec<models::Block>>,
    accounts: HashMap<String, models::Account>,
    collections: HashMap<String, models::Collection>,
    transactions: HashMap<String, models::Transaction>,
    events: Vec<models::BlockEvents>,
    script_result: Option<String>,
    failure: Option<(StatusCode, String)>,
    calls: Mutex<Vec<Call>>,
}

impl MockHandler {
    pub fn builder() -> MockHandlerBuilder {
        MockHandlerBuilder {
            blocks_by_id: HashMap::new(),
            blocks_by_height: HashMap::new(),
            accounts: HashMap::new(),
            collections: HashMap::new(),
            transactions: HashMap::new(),
            events: Vec::new(),
            script_result: None,
            failure: None,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn record(&self, call: Call) -> Result<(), HandlerError> {
        self.calls.lock().expect("mock call log poisoned").push(call);
        match &self.failure {
            Some((status, message)) => Err(HandlerError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn not_found(what: &str) -> HandlerError {
    HandlerError::Status {
        status: StatusCode::NOT_FOUND,
        message: format!("{what} not found"),
    }
}

pub struct MockHandlerBuilder {
    blocks_by_id: HashMap<String, models::Block>,
    blocks_by_height: HashMap<String, Vec<models::Block>>,
    accounts: HashMap<String, models::Account>,
    collections: HashMap<String, models::Collection>,
    transactions: HashMap<String, models::Transaction>,
    events: Vec<models::BlockEvents>,
    script_result: Option<String>,
    failure: Option<(StatusCode, String)>,
}

impl MockHandlerBuilder {
    pub fn with_block(mut self, block: models::Block) -> Self {
        self.blocks_by_id.insert(block.header.id.clone(), block);
        self
    }

    /// Register the sequence returned for a height or finality sentinel.
    pub fn with_blocks_at(mut self, height: &str, blocks: Vec<models::Block>) -> Self {
        self.blocks_by_height.insert(height.to_owned(), blocks);
        self
    }

    pub fn with_account(mut self, account: models::Account) -> Self {
        self.accounts.insert(account.address.clone(), account);
        self
    }

    pub fn with_collection(mut self, collection: models::Collection) -> Self {
        self.collections.insert(collection.id.clone(), collection);
        self
    }

    pub fn with_transaction(mut self, tx: models::Transaction) -> Self {
        self.transactions.insert(tx.id.clone(), tx);
        self
    }

    pub fn with_events(mut self, events: Vec<models::BlockEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn with_script_result(mut self, encoded: &str) -> Self {
        self.script_result = Some(encoded.to_owned());
        self
    }

    /// Make every call fail with the given status after being recorded.
    pub fn failing_with(mut self, status: StatusCode, message: &str) -> Self {
        self.failure = Some((status, message.to_owned()));
        self
    }

    pub fn build(self) -> MockHandler {
        MockHandler {
            blocks_by_id: self.blocks_by_id,
            blocks_by_height: self.blocks_by_height,
            accounts: self.accounts,
            collections: self.collections,
            transactions: self.transactions,
            events: self.events,
            script_result: self.script_result,
            failure: self.failure,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AccessHandler for MockHandler {
    async fn get_block_by_id(
        &self,
        _ctx: &CancellationToken,
        id: &str,
    ) -> Result<models::Block, HandlerError> {
        self.record(Call::GetBlockById(id.to_owned()))?;
        self.blocks_by_id
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("block"))
    }

    async fn get_block_by_height(
        &self,
        _ctx: &CancellationToken,
        height: &str,
    ) -> Result<Vec<models::Block>, HandlerError> {
        self.record(Call::GetBlockByHeight(height.to_owned()))?;
        Ok(self
            .blocks_by_height
            .get(height)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_account(
        &self,
        _ctx: &CancellationToken,
        address: &str,
        height: &str,
    ) -> Result<models::Account, HandlerError> {
        self.record(Call::GetAccount {
            address: address.to_owned(),
            height: height.to_owned(),
        })?;
        self.accounts
            .get(address)
            .cloned()
            .ok_or_else(|| not_found("account"))
    }

    async fn get_collection(
        &self,
        _ctx: &CancellationToken,
        id: &str,
    ) -> Result<models::Collection, HandlerError> {
        self.record(Call::GetCollection(id.to_owned()))?;
        self.collections
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("collection"))
    }

    async fn execute_script_at_block_height(
        &self,
        _ctx: &CancellationToken,
        height: &str,
        script: &str,
        arguments: &[String],
    ) -> Result<String, HandlerError> {
        self.record(Call::ExecuteScriptAtBlockHeight {
            height: height.to_owned(),
            script: script.to_owned(),
            arguments: arguments.to_vec(),
        })?;
        self.script_result
            .clone()
            .ok_or_else(|| not_found("script result"))
    }

    async fn execute_script_at_block_id(
        &self,
        _ctx: &CancellationToken,
        id: &str,
        script: &str,
        arguments: &[String],
    ) -> Result<String, HandlerError> {
        self.record(Call::ExecuteScriptAtBlockId {
            id: id.to_owned(),
            script: script.to_owned(),
            arguments: arguments.to_vec(),
        })?;
        self.script_result
            .clone()
            .ok_or_else(|| not_found("script result"))
    }

    async fn get_transaction(
        &self,
        _ctx: &CancellationToken,
        id: &str,
        include_result: bool,
    ) -> Result<models::Transaction, HandlerError> {
        self.record(Call::GetTransaction {
            id: id.to_owned(),
            include_result,
        })?;
        let mut tx = self
            .transactions
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("transaction"))?;
        if !include_result {
            tx.result = None;
        }
        Ok(tx)
    }

    async fn send_transaction(
        &self,
        _ctx: &CancellationToken,
        transaction: &[u8],
    ) -> Result<(), HandlerError> {
        self.record(Call::SendTransaction(transaction.to_vec()))
    }

    async fn get_events(
        &self,
        _ctx: &CancellationToken,
        event_type: &str,
        start: Option<&str>,
        end: Option<&str>,
        block_ids: &[String],
    ) -> Result<Vec<models::BlockEvents>, HandlerError> {
        self.record(Call::GetEvents {
            event_type: event_type.to_owned(),
            start: start.map(str::to_owned),
            end: end.map(str::to_owned),
            block_ids: block_ids.to_vec(),
        })?;
        Ok(self.events.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[tokio::test]
    async fn failing_with_still_records_the_call() {
        let handler = MockHandler::builder()
            .failing_with(StatusCode::SERVICE_UNAVAILABLE, "down for maintenance")
            .build();

        let err = handler
            .get_collection(&CancellationToken::new(), "abc")
            .await
            .expect_err("configured failure");
        assert!(matches!(err, HandlerError::Status { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(handler.calls(), vec![Call::GetCollection("abc".into())]);
    }

    #[tokio::test]
    async fn get_transaction_strips_result_unless_requested() {
        let tx = wire_transaction(&id_hex(9), true);
        let handler = MockHandler::builder().with_transaction(tx).build();
        let ctx = CancellationToken::new();

        let without = handler
            .get_transaction(&ctx, &id_hex(9), false)
            .await
            .expect("tx exists");
        assert!(without.result.is_none());

        let with = handler
            .get_transaction(&ctx, &id_hex(9), true)
            .await
            .expect("tx exists");
        assert!(with.result.is_some());
    }
}
