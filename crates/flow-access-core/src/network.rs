//! Preconfigured Access API endpoints.

use std::fmt;
use std::str::FromStr;

/// Local emulator REST endpoint.
pub const EMULATOR_API: &str = "http://127.0.0.1:8888/v1";
pub const TESTNET_API: &str = "https://rest-testnet.onflow.org/v1/";
pub const MAINNET_API: &str = "https://rest-mainnet.onflow.org/v1/";
/// No public REST endpoint is published for canarynet yet, so building a
/// canarynet client fails with an invalid URL error.
pub const CANARYNET_API: &str = "";

/// A named Flow network with a known Access API endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Network {
    #[default]
    Emulator,
    Testnet,
    Mainnet,
    Canarynet,
}

impl Network {
    pub fn api_url(&self) -> &'static str {
        match self {
            Network::Emulator => EMULATOR_API,
            Network::Testnet => TESTNET_API,
            Network::Mainnet => MAINNET_API,
            Network::Canarynet => CANARYNET_API,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Emulator => "emulator",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Canarynet => "canarynet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emulator" | "local" => Ok(Network::Emulator),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            "canarynet" | "canary" => Ok(Network::Canarynet),
            other => Err(format!(
                "unknown network `{other}`; expected emulator, testnet, mainnet, or canarynet"
            )),
        }
    }
}
