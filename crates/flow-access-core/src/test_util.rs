//! Shared test helpers for `flow-access-core` unit tests.
//!
//! Builders for wire records (`wire_block`, `wire_transaction`, ...) and
//! domain values (`domain_transaction`) so tests across modules share one
//! source of truth for dummy data.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::handler::models;
use crate::types::{Identifier, ProposalKey, Transaction, TransactionSignature};

pub const ADDRESS: &str = "f8d6e0586b0a20c7";
pub const EVENT_TYPE: &str = "A.f8d6e0586b0a20c7.Counter.Incremented";

// ==============================================================================
// Identifier Helpers
// ==============================================================================

/// Hex encoding of an identifier whose first byte is `b` and the rest zero.
pub fn id_hex(b: u8) -> String {
    identifier(b).to_string()
}

pub fn identifier(b: u8) -> Identifier {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Identifier::from_bytes(bytes)
}

// ==============================================================================
// Wire Record Builders
// ==============================================================================

/// A block whose parent is `id_byte - 1`, with one guarantee and one seal.
pub fn wire_block(id_byte: u8, height: u64) -> models::Block {
    models::Block {
        header: models::BlockHeader {
            id: id_hex(id_byte),
            parent_id: id_hex(id_byte.wrapping_sub(1)),
            height: height.to_string(),
            timestamp: "2022-03-01T12:00:00Z".into(),
            parent_voter_signature: String::new(),
        },
        payload: Some(models::BlockPayload {
            collection_guarantees: vec![models::CollectionGuarantee {
                collection_id: id_hex(0xc0),
                signer_ids: vec![id_hex(0x51)],
                signature: String::new(),
            }],
            block_seals: vec![models::BlockSeal {
                block_id: id_hex(id_byte.wrapping_sub(2)),
                result_id: id_hex(0x5e),
                final_state: String::new(),
            }],
        }),
        execution_result: None,
    }
}

pub fn wire_event(event_index: u32) -> models::Event {
    let payload = format!(
        r#"{{"type":"Event","value":{{"id":"{EVENT_TYPE}","fields":[{{"name":"count","value":{{"type":"Int","value":"{event_index}"}}}}]}}}}"#
    );
    models::Event {
        event_type: EVENT_TYPE.into(),
        transaction_id: id_hex(0x7a),
        transaction_index: "0".into(),
        event_index: event_index.to_string(),
        payload: STANDARD.encode(payload),
    }
}

pub fn wire_transaction(id: &str, with_result: bool) -> models::Transaction {
    models::Transaction {
        id: id.to_owned(),
        script: STANDARD.encode("transaction {}"),
        arguments: vec![STANDARD.encode(r#"{"type":"String","value":"hi"}"#)],
        reference_block_id: id_hex(1),
        gas_limit: "9999".into(),
        payer: ADDRESS.into(),
        proposal_key: models::ProposalKey {
            address: ADDRESS.into(),
            key_index: "0".into(),
            sequence_number: "3".into(),
        },
        authorizers: vec![ADDRESS.into()],
        payload_signatures: Vec::new(),
        envelope_signatures: vec![models::TransactionSignature {
            address: ADDRESS.into(),
            key_index: "0".into(),
            signature: STANDARD.encode([7u8; 64]),
        }],
        result: with_result.then(|| models::TransactionResult {
            block_id: id_hex(2),
            collection_id: String::new(),
            execution: "Success".into(),
            status: "Sealed".into(),
            status_code: 0,
            error_message: String::new(),
            computation_used: "42".into(),
            events: vec![wire_event(0)],
        }),
    }
}

pub fn wire_account(address: &str) -> models::Account {
    let mut contracts = BTreeMap::new();
    contracts.insert(
        "Hello".to_owned(),
        STANDARD.encode("access(all) contract Hello {}"),
    );
    models::Account {
        address: address.to_owned(),
        balance: "100000".into(),
        keys: vec![models::AccountPublicKey {
            index: "0".into(),
            public_key: hex::encode([0xab; 64]),
            signing_algorithm: "ECDSA_P256".into(),
            hashing_algorithm: "SHA3_256".into(),
            sequence_number: "3".into(),
            weight: "1000".into(),
            revoked: false,
        }],
        contracts,
    }
}

pub fn wire_block_events(id_byte: u8, height: u64) -> models::BlockEvents {
    models::BlockEvents {
        block_id: id_hex(id_byte),
        block_height: height.to_string(),
        block_timestamp: "2022-03-01T12:00:00Z".into(),
        events: vec![wire_event(0), wire_event(1)],
    }
}

// ==============================================================================
// Domain Builders
// ==============================================================================

pub fn domain_transaction() -> Transaction {
    let address = ADDRESS.parse().expect("fixture address parses");
    Transaction {
        script: b"transaction {}".to_vec(),
        arguments: vec![br#"{"type":"String","value":"hi"}"#.to_vec()],
        reference_block_id: identifier(1),
        gas_limit: 9999,
        proposal_key: ProposalKey {
            address,
            key_index: 0,
            sequence_number: 3,
        },
        payer: address,
        authorizers: vec![address],
        payload_signatures: Vec::new(),
        envelope_signatures: vec![TransactionSignature {
            address,
            key_index: 0,
            signature: vec![7; 64],
        }],
    }
}
