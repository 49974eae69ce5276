//! Wire records of the Flow Access REST API.
//!
//! These mirror the JSON documents exactly: 64-bit integers travel as decimal
//! strings and byte payloads as base64. Conversion into domain types lives in
//! [`crate::convert`]. Hypermedia fields (`_links`, `_expandable`) are ignored.

use serde::{Deserialize, Serialize};

// ==============================================================================
// Blocks
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    /// Present only when the request expanded `payload`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<BlockPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub id: String,
    pub parent_id: String,
    pub height: String,
    pub timestamp: String,
    #[serde(default)]
    pub parent_voter_signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPayload {
    #[serde(default)]
    pub collection_guarantees: Vec<CollectionGuarantee>,
    #[serde(default)]
    pub block_seals: Vec<BlockSeal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionGuarantee {
    pub collection_id: String,
    #[serde(default)]
    pub signer_ids: Vec<String>,
    #[serde(default)]
    pub signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockSeal {
    pub block_id: String,
    pub result_id: String,
    #[serde(default)]
    pub final_state: String,
}

// ==============================================================================
// Collections
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    /// Present only when the request expanded `transactions`.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

// ==============================================================================
// Accounts
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub balance: String,
    #[serde(default)]
    pub keys: Vec<AccountPublicKey>,
    /// Contract name to base64 encoded source.
    #[serde(default)]
    pub contracts: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPublicKey {
    pub index: String,
    pub public_key: String,
    pub signing_algorithm: String,
    pub hashing_algorithm: String,
    pub sequence_number: String,
    pub weight: String,
    pub revoked: bool,
}

// ==============================================================================
// Transactions
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub script: String,
    pub arguments: Vec<String>,
    pub reference_block_id: String,
    pub gas_limit: String,
    pub payer: String,
    pub proposal_key: ProposalKey,
    pub authorizers: Vec<String>,
    pub payload_signatures: Vec<TransactionSignature>,
    pub envelope_signatures: Vec<TransactionSignature>,
    /// Present only when the request expanded `result`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TransactionResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalKey {
    pub address: String,
    pub key_index: String,
    pub sequence_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub address: String,
    pub key_index: String,
    pub signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub block_id: String,
    #[serde(default)]
    pub collection_id: String,
    /// `Pending`, `Success`, or `Failure`.
    #[serde(default)]
    pub execution: String,
    pub status: String,
    pub status_code: u32,
    #[serde(default)]
    pub error_message: String,
    pub computation_used: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

// ==============================================================================
// Events & Scripts
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub transaction_id: String,
    pub transaction_index: String,
    pub event_index: String,
    /// Base64 encoded JSON-Cadence payload.
    pub payload: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockEvents {
    pub block_id: String,
    pub block_height: String,
    pub block_timestamp: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Body of `POST /scripts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptRequest<'a> {
    pub script: &'a str,
    pub arguments: &'a [String],
}

/// Error body returned with non-success status codes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}
