//! Conversions between Access API wire records and domain types.
//!
//! All functions are pure. Wire-to-domain conversions consume the wire
//! record; failures name the offending field.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::cadence;
use crate::error::ConversionError;
use crate::handler::models;
use crate::types::{
    Account, AccountKey, Address, Block, BlockEvents, BlockHeader, BlockPayload, BlockSeal,
    Collection, CollectionGuarantee, Event, Identifier, ProposalKey, Transaction,
    TransactionResult, TransactionSignature, TransactionStatus,
};

/// Height sentinel for the latest sealed block.
pub const SEALED_HEIGHT: &str = "sealed";
/// Height sentinel for the latest finalized block.
pub const FINAL_HEIGHT: &str = "final";

pub fn sealed_to_height(is_sealed: bool) -> &'static str {
    if is_sealed {
        SEALED_HEIGHT
    } else {
        FINAL_HEIGHT
    }
}

// ==============================================================================
// Field Parsing
// ==============================================================================

fn parse_u64(field: &str, value: &str) -> Result<u64, ConversionError> {
    value
        .parse()
        .map_err(|e| ConversionError::new(field, format!("`{value}`: {e}")))
}

fn parse_u32(field: &str, value: &str) -> Result<u32, ConversionError> {
    value
        .parse()
        .map_err(|e| ConversionError::new(field, format!("`{value}`: {e}")))
}

fn parse_id(field: &str, value: &str) -> Result<Identifier, ConversionError> {
    value
        .parse()
        .map_err(|e: ConversionError| ConversionError::new(field, e.reason))
}

fn parse_opt_id(field: &str, value: &str) -> Result<Option<Identifier>, ConversionError> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_id(field, value).map(Some)
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConversionError> {
    value
        .parse()
        .map_err(|e: ConversionError| ConversionError::new(field, e.reason))
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ConversionError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ConversionError::new(field, format!("`{value}`: {e}")))
}

fn decode_base64(field: &str, value: &str) -> Result<Vec<u8>, ConversionError> {
    STANDARD
        .decode(value)
        .map_err(|e| ConversionError::new(field, e))
}

// ==============================================================================
// Blocks & Collections
// ==============================================================================

pub fn block_header_from_wire(header: models::BlockHeader) -> Result<BlockHeader, ConversionError> {
    Ok(BlockHeader {
        id: parse_id("header.id", &header.id)?,
        parent_id: parse_id("header.parent_id", &header.parent_id)?,
        height: parse_u64("header.height", &header.height)?,
        timestamp: parse_timestamp("header.timestamp", &header.timestamp)?,
    })
}

pub fn block_payload_from_wire(
    payload: models::BlockPayload,
) -> Result<BlockPayload, ConversionError> {
    let collection_guarantees = payload
        .collection_guarantees
        .into_iter()
        .map(|g| {
            Ok(CollectionGuarantee {
                collection_id: parse_id("collection_guarantees.collection_id", &g.collection_id)?,
                signer_ids: g
                    .signer_ids
                    .iter()
                    .map(|id| parse_id("collection_guarantees.signer_ids", id))
                    .collect::<Result<_, _>>()?,
            })
        })
        .collect::<Result<_, ConversionError>>()?;

    let seals = payload
        .block_seals
        .into_iter()
        .map(|s| {
            Ok(BlockSeal {
                block_id: parse_id("block_seals.block_id", &s.block_id)?,
                result_id: parse_id("block_seals.result_id", &s.result_id)?,
            })
        })
        .collect::<Result<_, ConversionError>>()?;

    Ok(BlockPayload {
        collection_guarantees,
        seals,
    })
}

/// Blocks are always requested with an expanded payload; a block without
/// one is malformed.
pub fn block_from_wire(block: models::Block) -> Result<Block, ConversionError> {
    let payload = block
        .payload
        .ok_or_else(|| ConversionError::new("payload", "missing from block response"))?;
    Ok(Block {
        header: block_header_from_wire(block.header)?,
        payload: block_payload_from_wire(payload)?,
    })
}

pub fn collection_from_wire(collection: models::Collection) -> Result<Collection, ConversionError> {
    let transaction_ids = collection
        .transactions
        .iter()
        .map(|tx| parse_id("transactions.id", &tx.id))
        .collect::<Result<_, _>>()?;
    Ok(Collection {
        id: parse_id("id", &collection.id)?,
        transaction_ids,
    })
}

// ==============================================================================
// Accounts
// ==============================================================================

pub fn account_from_wire(account: models::Account) -> Result<Account, ConversionError> {
    let keys = account
        .keys
        .into_iter()
        .map(account_key_from_wire)
        .collect::<Result<_, _>>()?;

    let contracts = account
        .contracts
        .into_iter()
        .map(|(name, code)| {
            let bytes = decode_base64(&format!("contracts.{name}"), &code)?;
            Ok((name, bytes))
        })
        .collect::<Result<_, ConversionError>>()?;

    Ok(Account {
        address: parse_address("address", &account.address)?,
        balance: parse_u64("balance", &account.balance)?,
        keys,
        contracts,
    })
}

fn account_key_from_wire(key: models::AccountPublicKey) -> Result<AccountKey, ConversionError> {
    let public_key = key.public_key.strip_prefix("0x").unwrap_or(&key.public_key);
    Ok(AccountKey {
        index: parse_u32("keys.index", &key.index)?,
        public_key: hex::decode(public_key)
            .map_err(|e| ConversionError::new("keys.public_key", e))?,
        sig_algo: key.signing_algorithm.parse()?,
        hash_algo: key.hashing_algorithm.parse()?,
        weight: parse_u32("keys.weight", &key.weight)?,
        sequence_number: parse_u64("keys.sequence_number", &key.sequence_number)?,
        revoked: key.revoked,
    })
}

// ==============================================================================
// Transactions
// ==============================================================================

fn signature_from_wire(
    field: &str,
    sig: &models::TransactionSignature,
) -> Result<TransactionSignature, ConversionError> {
    Ok(TransactionSignature {
        address: parse_address(&format!("{field}.address"), &sig.address)?,
        key_index: parse_u32(&format!("{field}.key_index"), &sig.key_index)?,
        signature: decode_base64(&format!("{field}.signature"), &sig.signature)?,
    })
}

fn signature_to_wire(sig: &TransactionSignature) -> models::TransactionSignature {
    models::TransactionSignature {
        address: sig.address.to_string(),
        key_index: sig.key_index.to_string(),
        signature: STANDARD.encode(&sig.signature),
    }
}

pub fn transaction_from_wire(tx: models::Transaction) -> Result<Transaction, ConversionError> {
    let arguments = tx
        .arguments
        .iter()
        .map(|arg| decode_base64("arguments", arg))
        .collect::<Result<_, _>>()?;
    let authorizers = tx
        .authorizers
        .iter()
        .map(|a| parse_address("authorizers", a))
        .collect::<Result<_, _>>()?;
    let payload_signatures = tx
        .payload_signatures
        .iter()
        .map(|s| signature_from_wire("payload_signatures", s))
        .collect::<Result<_, _>>()?;
    let envelope_signatures = tx
        .envelope_signatures
        .iter()
        .map(|s| signature_from_wire("envelope_signatures", s))
        .collect::<Result<_, _>>()?;

    Ok(Transaction {
        script: decode_base64("script", &tx.script)?,
        arguments,
        reference_block_id: parse_id("reference_block_id", &tx.reference_block_id)?,
        gas_limit: parse_u64("gas_limit", &tx.gas_limit)?,
        proposal_key: ProposalKey {
            address: parse_address("proposal_key.address", &tx.proposal_key.address)?,
            key_index: parse_u32("proposal_key.key_index", &tx.proposal_key.key_index)?,
            sequence_number: parse_u64(
                "proposal_key.sequence_number",
                &tx.proposal_key.sequence_number,
            )?,
        },
        payer: parse_address("payer", &tx.payer)?,
        authorizers,
        payload_signatures,
        envelope_signatures,
    })
}

/// Encode a transaction as the JSON body of `POST /transactions`.
///
/// Each argument must already be a JSON-Cadence document.
pub fn transaction_to_wire(tx: &Transaction) -> Result<Vec<u8>, ConversionError> {
    for (i, arg) in tx.arguments.iter().enumerate() {
        serde_json::from_slice::<serde_json::Value>(arg)
            .map_err(|e| ConversionError::new(format!("arguments[{i}]"), e))?;
    }

    let wire = models::Transaction {
        id: String::new(),
        script: STANDARD.encode(&tx.script),
        arguments: tx.arguments.iter().map(|a| STANDARD.encode(a)).collect(),
        reference_block_id: tx.reference_block_id.to_string(),
        gas_limit: tx.gas_limit.to_string(),
        payer: tx.payer.to_string(),
        proposal_key: models::ProposalKey {
            address: tx.proposal_key.address.to_string(),
            key_index: tx.proposal_key.key_index.to_string(),
            sequence_number: tx.proposal_key.sequence_number.to_string(),
        },
        authorizers: tx.authorizers.iter().map(Address::to_string).collect(),
        payload_signatures: tx.payload_signatures.iter().map(signature_to_wire).collect(),
        envelope_signatures: tx.envelope_signatures.iter().map(signature_to_wire).collect(),
        result: None,
    };
    serde_json::to_vec(&wire).map_err(|e| ConversionError::new("transaction", e))
}

fn status_from_wire(status: &str) -> Result<TransactionStatus, ConversionError> {
    match status {
        "" | "Unknown" => Ok(TransactionStatus::Unknown),
        "Pending" => Ok(TransactionStatus::Pending),
        "Finalized" => Ok(TransactionStatus::Finalized),
        "Executed" => Ok(TransactionStatus::Executed),
        "Sealed" => Ok(TransactionStatus::Sealed),
        "Expired" => Ok(TransactionStatus::Expired),
        other => Err(ConversionError::new(
            "status",
            format!("unknown transaction status `{other}`"),
        )),
    }
}

pub fn transaction_result_from_wire(
    result: models::TransactionResult,
) -> Result<TransactionResult, ConversionError> {
    let events = result
        .events
        .into_iter()
        .map(event_from_wire)
        .collect::<Result<_, _>>()?;

    Ok(TransactionResult {
        status: status_from_wire(&result.status)?,
        status_code: result.status_code,
        error_message: Some(result.error_message).filter(|m| !m.is_empty()),
        events,
        block_id: parse_id("block_id", &result.block_id)?,
        collection_id: parse_opt_id("collection_id", &result.collection_id)?,
        computation_used: parse_u64("computation_used", &result.computation_used)?,
    })
}

// ==============================================================================
// Events
// ==============================================================================

pub fn event_from_wire(event: models::Event) -> Result<Event, ConversionError> {
    let payload = decode_base64("events.payload", &event.payload)?;
    let value = cadence::Value::decode(&payload)
        .map_err(|e| ConversionError::new("events.payload", e))?;

    Ok(Event {
        event_type: event.event_type,
        transaction_id: parse_id("events.transaction_id", &event.transaction_id)?,
        transaction_index: parse_u32("events.transaction_index", &event.transaction_index)?,
        event_index: parse_u32("events.event_index", &event.event_index)?,
        value,
        payload,
    })
}

pub fn block_events_from_wire(
    events: Vec<models::BlockEvents>,
) -> Result<Vec<BlockEvents>, ConversionError> {
    events
        .into_iter()
        .map(|block| {
            Ok(BlockEvents {
                block_id: parse_id("block_id", &block.block_id)?,
                height: parse_u64("block_height", &block.block_height)?,
                timestamp: parse_timestamp("block_timestamp", &block.block_timestamp)?,
                events: block
                    .events
                    .into_iter()
                    .map(event_from_wire)
                    .collect::<Result<_, _>>()?,
            })
        })
        .collect()
}

// ==============================================================================
// Scripts
// ==============================================================================

pub fn script_to_wire(script: &[u8]) -> String {
    STANDARD.encode(script)
}

/// Encode script arguments as base64 JSON-Cadence strings. Fails on the
/// first argument that does not encode.
pub fn cadence_args_to_wire(arguments: &[cadence::Value]) -> Result<Vec<String>, ConversionError> {
    arguments
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            arg.encode()
                .map(|bytes| STANDARD.encode(bytes))
                .map_err(|e| ConversionError::new(format!("arguments[{i}]"), e))
        })
        .collect()
}

pub fn cadence_value_from_wire(encoded: &str) -> Result<cadence::Value, ConversionError> {
    let bytes = decode_base64("script result", encoded)?;
    cadence::Value::decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn sealed_sentinels() {
        assert_eq!(sealed_to_height(true), "sealed");
        assert_eq!(sealed_to_height(false), "final");
    }

    #[test]
    fn block_converts_header_and_payload() {
        let block = block_from_wire(wire_block(3, 120)).expect("valid block");
        assert_eq!(block.header.id, identifier(3));
        assert_eq!(block.header.parent_id, identifier(2));
        assert_eq!(block.header.height, 120);
        assert_eq!(block.header.timestamp.to_rfc3339(), "2022-03-01T12:00:00+00:00");
        assert_eq!(block.payload.collection_guarantees.len(), 1);
        assert_eq!(
            block.payload.collection_guarantees[0].collection_id,
            identifier(0xc0)
        );
        assert_eq!(block.payload.seals[0].result_id, identifier(0x5e));
    }

    #[test]
    fn block_with_bad_height_names_field() {
        let mut wire = wire_block(3, 120);
        wire.header.height = "12x".into();
        let err = block_from_wire(wire).expect_err("height must be numeric");
        assert_eq!(err.field, "header.height");
    }

    #[test]
    fn block_without_payload_is_rejected() {
        let mut wire = wire_block(3, 120);
        wire.payload = None;
        let err = block_from_wire(wire).expect_err("payload required");
        assert_eq!(err.field, "payload");
    }

    #[test]
    fn collection_lists_transaction_ids() {
        let wire = models::Collection {
            id: id_hex(1),
            transactions: vec![wire_transaction(&id_hex(7), false)],
        };
        let collection = collection_from_wire(wire).expect("valid collection");
        assert_eq!(collection.id, identifier(1));
        assert_eq!(collection.transaction_ids, vec![identifier(7)]);
    }

    #[test]
    fn collection_with_malformed_id_is_rejected() {
        let wire = models::Collection {
            id: "not-an-id".into(),
            transactions: Vec::new(),
        };
        let err = collection_from_wire(wire).expect_err("bad collection id");
        assert_eq!(err.field, "id");
    }

    #[test]
    fn account_decodes_keys_and_contracts() {
        let account = account_from_wire(wire_account(ADDRESS)).expect("valid account");
        assert_eq!(account.address.to_string(), ADDRESS);
        assert_eq!(account.balance, 100_000);
        assert_eq!(account.keys.len(), 1);
        assert_eq!(account.keys[0].public_key, vec![0xab; 64]);
        assert_eq!(account.keys[0].weight, 1000);
        assert_eq!(
            account.contracts.get("Hello").map(Vec::as_slice),
            Some(b"access(all) contract Hello {}".as_slice())
        );
        assert_eq!(
            account.contract_source("Hello"),
            Some("access(all) contract Hello {}")
        );
    }

    #[test]
    fn account_keeps_non_utf8_contract_code() {
        let mut wire = wire_account(ADDRESS);
        wire.contracts
            .insert("Blob".into(), STANDARD.encode([0xff, 0xfe, 0x00]));
        let account = account_from_wire(wire).expect("binary contract code is valid");
        assert_eq!(account.contracts["Blob"], vec![0xff, 0xfe, 0x00]);
        assert_eq!(account.contract_source("Blob"), None);
    }

    #[test]
    fn account_with_unknown_algorithm_is_rejected() {
        let mut wire = wire_account(ADDRESS);
        wire.keys[0].signing_algorithm = "RSA".into();
        let err = account_from_wire(wire).expect_err("unknown algorithm");
        assert_eq!(err.field, "signing_algorithm");
    }

    #[test]
    fn transaction_result_maps_status_and_error() {
        let mut wire = wire_transaction(&id_hex(4), true)
            .result
            .expect("fixture has result");
        wire.error_message = "[Error Code: 1101] cadence runtime error".into();
        wire.status_code = 1;

        let result = transaction_result_from_wire(wire).expect("valid result");
        assert_eq!(result.status, TransactionStatus::Sealed);
        assert_eq!(result.status_code, 1);
        assert_eq!(
            result.error_message.as_deref(),
            Some("[Error Code: 1101] cadence runtime error")
        );
        assert_eq!(result.collection_id, None);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].event_type, EVENT_TYPE);
    }

    #[test]
    fn transaction_result_rejects_unknown_status() {
        let mut wire = wire_transaction(&id_hex(4), true)
            .result
            .expect("fixture has result");
        wire.status = "Exploded".into();
        assert!(transaction_result_from_wire(wire).is_err());
    }

    #[test]
    fn transaction_to_wire_encodes_strings_and_base64() {
        let tx = domain_transaction();
        let bytes = transaction_to_wire(&tx).expect("valid transaction");
        let wire: models::Transaction = serde_json::from_slice(&bytes).expect("json body");

        assert_eq!(wire.gas_limit, "9999");
        assert_eq!(wire.payer, ADDRESS);
        assert_eq!(wire.script, STANDARD.encode(b"transaction {}"));
        assert!(wire.result.is_none());
        assert!(!String::from_utf8(bytes).expect("utf8").contains("\"id\""));

        let back = transaction_from_wire(wire).expect("wire converts back");
        assert_eq!(back, tx);
    }

    #[test]
    fn transaction_to_wire_rejects_non_json_arguments() {
        let mut tx = domain_transaction();
        tx.arguments.push(b"not json".to_vec());
        let err = transaction_to_wire(&tx).expect_err("argument must be JSON");
        assert_eq!(err.field, "arguments[1]");
    }

    #[test]
    fn cadence_args_fail_on_first_bad_argument() {
        let args = vec![
            cadence::Value::String("ok".into()),
            cadence::Value::UInt64("-5".into()),
        ];
        let err = cadence_args_to_wire(&args).expect_err("negative UInt64");
        assert_eq!(err.field, "arguments[1]");
    }

    #[test]
    fn cadence_value_from_wire_decodes_base64_json() {
        let encoded = STANDARD.encode(br#"{"type":"Bool","value":true}"#);
        let value = cadence_value_from_wire(&encoded).expect("valid value");
        assert_eq!(value, cadence::Value::Bool(true));
        assert!(cadence_value_from_wire("%%%").is_err());
    }

    #[test]
    fn block_events_keep_order() {
        let converted = block_events_from_wire(vec![wire_block_events(5, 50)])
            .expect("valid events");
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].height, 50);
        assert_eq!(converted[0].block_id, identifier(5));
        let indices: Vec<u32> = converted[0].events.iter().map(|e| e.event_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
