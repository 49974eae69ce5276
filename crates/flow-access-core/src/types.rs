//! Domain types returned by the [`Client`](crate::Client).
//!
//! Contains the fixed-width identity types (`Identifier`, `Address`), block
//! and collection records, transactions and their results, accounts and
//! their keys, and emitted events.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cadence;
use crate::error::ConversionError;

// ==============================================================================
// Identifier
// ==============================================================================

/// A 32-byte content identifier (block, collection, transaction, result).
///
/// Encodes as 64 lowercase hex characters without a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier([u8; 32]);

impl Identifier {
    pub const LEN: usize = 32;
    pub const EMPTY: Identifier = Identifier([0; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Identifier {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != Self::LEN * 2 {
            return Err(ConversionError::new(
                "identifier",
                format!("expected {} hex characters, got {}", Self::LEN * 2, s.len()),
            ));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| ConversionError::new("identifier", e))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Identifier {
    type Error = ConversionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

// ==============================================================================
// Address
// ==============================================================================

/// An 8-byte account address.
///
/// `Display` yields 16 hex characters without a prefix; [`Address::to_hex_with_prefix`]
/// adds `0x`. Parsing accepts either form and left-pads short values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 8]);

impl Address {
    pub const LEN: usize = 8;

    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn to_hex_with_prefix(&self) -> String {
        format!("0x{self}")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > Self::LEN * 2 {
            return Err(ConversionError::new(
                "address",
                format!("expected 1 to {} hex characters, got `{s}`", Self::LEN * 2),
            ));
        }
        // Left-pad to an even, full-width string before decoding.
        let padded = format!("{digits:0>16}");
        let mut bytes = [0u8; 8];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|e| ConversionError::new("address", e))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = ConversionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

// ==============================================================================
// Blocks
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub id: Identifier,
    pub parent_id: Identifier,
    pub height: u64,
    pub timestamp: DateTime<Utc>,
}

/// A collection guarantee included in a block payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionGuarantee {
    pub collection_id: Identifier,
    pub signer_ids: Vec<Identifier>,
}

/// A seal for a previously executed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSeal {
    pub block_id: Identifier,
    /// Execution result the seal attests to.
    pub result_id: Identifier,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    pub collection_guarantees: Vec<CollectionGuarantee>,
    pub seals: Vec<BlockSeal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub payload: BlockPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Identifier,
    pub transaction_ids: Vec<Identifier>,
}

// ==============================================================================
// Transactions
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalKey {
    pub address: Address,
    pub key_index: u32,
    pub sequence_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub address: Address,
    pub key_index: u32,
    #[serde(with = "b64")]
    pub signature: Vec<u8>,
}

/// A transaction as submitted to (or fetched from) the network.
///
/// `arguments` hold JSON-Cadence encoded values, see [`cadence::Value::encode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "b64")]
    pub script: Vec<u8>,
    #[serde(with = "b64_vec")]
    pub arguments: Vec<Vec<u8>>,
    pub reference_block_id: Identifier,
    pub gas_limit: u64,
    pub proposal_key: ProposalKey,
    pub payer: Address,
    pub authorizers: Vec<Address>,
    pub payload_signatures: Vec<TransactionSignature>,
    pub envelope_signatures: Vec<TransactionSignature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Unknown,
    Pending,
    Finalized,
    Executed,
    Sealed,
    Expired,
}

impl TransactionStatus {
    pub fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Pending => write!(f, "pending"),
            Self::Finalized => write!(f, "finalized"),
            Self::Executed => write!(f, "executed"),
            Self::Sealed => write!(f, "sealed"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// An event emitted by a transaction. `value` is the decoded payload;
/// `payload` keeps the raw JSON-Cadence bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub transaction_id: Identifier,
    pub transaction_index: u32,
    pub event_index: u32,
    pub value: cadence::Value,
    #[serde(with = "b64")]
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub status: TransactionStatus,
    pub status_code: u32,
    /// `None` when the transaction executed without error.
    pub error_message: Option<String>,
    pub events: Vec<Event>,
    pub block_id: Identifier,
    pub collection_id: Option<Identifier>,
    pub computation_used: u64,
}

/// Result of executing a block. Only used as the return type of the
/// not-yet-supported execution result lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub previous_result_id: Identifier,
    pub block_id: Identifier,
}

// ==============================================================================
// Accounts
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "ECDSA_P256")]
    EcdsaP256,
    #[serde(rename = "ECDSA_secp256k1")]
    EcdsaSecp256k1,
}

impl SignatureAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EcdsaP256 => "ECDSA_P256",
            Self::EcdsaSecp256k1 => "ECDSA_secp256k1",
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ECDSA_P256" => Ok(Self::EcdsaP256),
            "ECDSA_secp256k1" => Ok(Self::EcdsaSecp256k1),
            other => Err(ConversionError::new(
                "signing_algorithm",
                format!("unknown algorithm `{other}`"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA2_256")]
    Sha2_256,
    #[serde(rename = "SHA2_384")]
    Sha2_384,
    #[serde(rename = "SHA3_256")]
    Sha3_256,
    #[serde(rename = "SHA3_384")]
    Sha3_384,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha2_256 => "SHA2_256",
            Self::Sha2_384 => "SHA2_384",
            Self::Sha3_256 => "SHA3_256",
            Self::Sha3_384 => "SHA3_384",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHA2_256" => Ok(Self::Sha2_256),
            "SHA2_384" => Ok(Self::Sha2_384),
            "SHA3_256" => Ok(Self::Sha3_256),
            "SHA3_384" => Ok(Self::Sha3_384),
            other => Err(ConversionError::new(
                "hashing_algorithm",
                format!("unknown algorithm `{other}`"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountKey {
    pub index: u32,
    #[serde(with = "b64")]
    pub public_key: Vec<u8>,
    pub sig_algo: SignatureAlgorithm,
    pub hash_algo: HashAlgorithm,
    pub weight: u32,
    pub sequence_number: u64,
    pub revoked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub balance: u64,
    pub keys: Vec<AccountKey>,
    /// Deployed contract code keyed by contract name.
    #[serde(with = "b64_map")]
    pub contracts: BTreeMap<String, Vec<u8>>,
}

impl Account {
    /// Contract code as text, if the contract exists and is valid UTF-8.
    pub fn contract_source(&self, name: &str) -> Option<&str> {
        self.contracts
            .get(name)
            .and_then(|code| std::str::from_utf8(code).ok())
    }
}

// ==============================================================================
// Events
// ==============================================================================

/// Events of one type emitted within a single block, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEvents {
    pub block_id: Identifier,
    pub height: u64,
    pub timestamp: DateTime<Utc>,
    pub events: Vec<Event>,
}

// ==============================================================================
// Byte Encodings
// ==============================================================================

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

mod b64_vec {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&STANDARD.encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

mod b64_map {
    use std::collections::BTreeMap;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        entries: &BTreeMap<String, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, bytes) in entries {
            map.serialize_entry(name, &STANDARD.encode(bytes))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        BTreeMap::<String, String>::deserialize(deserializer)?
            .into_iter()
            .map(|(name, s)| {
                let bytes = STANDARD.decode(s).map_err(serde::de::Error::custom)?;
                Ok((name, bytes))
            })
            .collect()
    }
}
