// src/config.rs
use crate::error::{Result, StakeError};
use crate::utils::parse_address;
use ethers::types::{Address, U256};
use ethers::utils::parse_units;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x139e546cc649643366b567d2e71b0ba91360df9d";
pub const DEFAULT_GAS_LIMIT: u64 = 2_000_000;
pub const DEFAULT_GAS_PRICE_GWEI: &str = "20";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// ABI of the deployed staking contract, used when `STAKE_ABI_PATH` is not set.
pub fn bundled_abi() -> &'static str {
    include_str!("../abi/b2stake_abi.json")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPrice {
    /// Price in wei, attached to every transaction unchanged.
    Fixed(U256),
    /// Ask the node (`eth_gasPrice`) right before signing.
    Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
    pub gas_limit: U256,
    pub gas_price: GasPrice,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            gas_limit: U256::from(DEFAULT_GAS_LIMIT),
            gas_price: GasPrice::Fixed(U256::from(20_000_000_000u64)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub contract_address: Address,
    pub abi_path: Option<PathBuf>,
    pub gas: GasSettings,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = lookup("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let contract_address = lookup("STAKE_CONTRACT_ADDRESS")
            .unwrap_or_else(|| DEFAULT_CONTRACT_ADDRESS.to_string());
        let contract_address = parse_address(&contract_address)
            .map_err(|e| StakeError::Config(format!("STAKE_CONTRACT_ADDRESS: {e}")))?;

        let abi_path = lookup("STAKE_ABI_PATH").map(PathBuf::from);

        let gas_limit = match lookup("GAS_LIMIT") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| StakeError::Config(format!("GAS_LIMIT: {e}")))?,
            None => DEFAULT_GAS_LIMIT,
        };

        let gas_price = match lookup("GAS_PRICE").as_deref() {
            Some("node") if lookup("GAS_PRICE_GWEI").is_some() => {
                return Err(StakeError::Config(
                    "GAS_PRICE=node and GAS_PRICE_GWEI are mutually exclusive".to_string(),
                ));
            }
            Some("node") => GasPrice::Node,
            Some(other) => {
                return Err(StakeError::Config(format!(
                    "GAS_PRICE: unsupported strategy {other}, use GAS_PRICE_GWEI for a fixed price"
                )));
            }
            None => {
                let gwei = lookup("GAS_PRICE_GWEI")
                    .unwrap_or_else(|| DEFAULT_GAS_PRICE_GWEI.to_string());
                let wei: U256 = parse_units(&gwei, "gwei")
                    .map_err(|e| StakeError::Config(format!("GAS_PRICE_GWEI: {e}")))?
                    .into();
                GasPrice::Fixed(wei)
            }
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| StakeError::Config(format!("BIND_ADDR: {e}")))?;

        Ok(Self {
            rpc_url,
            contract_address,
            abi_path,
            gas: GasSettings {
                gas_limit: U256::from(gas_limit),
                gas_price,
            },
            bind_addr,
        })
    }

    /// Contents of the contract interface artifact.
    pub fn read_abi(&self) -> Result<String> {
        match &self.abi_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                StakeError::Artifact(format!("failed to read {}: {e}", path.display()))
            }),
            None => Ok(bundled_abi().to_string()),
        }
    }
}
