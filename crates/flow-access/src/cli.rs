use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flow_access_core::types::{Address, Identifier};
use flow_access_core::Network;

/// Query the Flow Access REST API from the command line.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Preconfigured network to talk to.
    #[arg(long, default_value = "emulator", env = "FLOW_NETWORK")]
    pub network: Network,

    /// Access API base URL; overrides `--network`.
    #[arg(long, env = "FLOW_ACCESS_API_URL")]
    pub api_url: Option<String>,

    /// Log request and response bodies.
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a block by id or height; the latest block when neither is given.
    Block {
        #[arg(long, conflicts_with = "height")]
        id: Option<Identifier>,

        #[arg(long)]
        height: Option<u64>,

        /// Fetch the latest block; also the behavior when no selector is given.
        #[arg(long, conflicts_with_all = ["id", "height"])]
        latest: bool,

        /// With no id or height, use the latest sealed block instead of the
        /// latest finalized one.
        #[arg(long)]
        sealed: bool,

        /// Print only the block header.
        #[arg(long)]
        header_only: bool,
    },

    /// Fetch the transaction ids of a collection.
    Collection { id: Identifier },

    /// Fetch an account at the latest sealed block or a given height.
    Account {
        address: Address,

        #[arg(long)]
        height: Option<u64>,
    },

    /// Fetch a transaction body.
    Transaction { id: Identifier },

    /// Fetch the execution result of a transaction.
    TransactionResult { id: Identifier },

    /// Execute a read-only Cadence script.
    Script {
        /// Path to the script source.
        file: PathBuf,

        /// JSON-Cadence encoded argument (repeatable, in order).
        #[arg(long = "arg")]
        args: Vec<String>,

        #[arg(long, conflicts_with = "block_id")]
        height: Option<u64>,

        #[arg(long)]
        block_id: Option<Identifier>,
    },

    /// Fetch events of one type by height range or by block ids.
    Events {
        /// Fully qualified event type, e.g. `A.0b2a3299cc857e29.TopShot.Deposit`.
        event_type: String,

        #[arg(long, requires = "end", conflicts_with = "block_ids")]
        start: Option<u64>,

        #[arg(long, requires = "start")]
        end: Option<u64>,

        /// Block id to search (repeatable).
        #[arg(long = "block-id")]
        block_ids: Vec<Identifier>,
    },
}
