// src/contract.rs
use crate::error::{Result, StakeError};
use crate::utils::token_to_json;
use ethers::abi::{Abi, Function, Token, encode};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::to_checksum;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const POOLS: &str = "pools";
pub const USERS: &str = "users";
pub const CALCULATE_REWARD: &str = "calculateReward";
pub const ADD_POOL: &str = "addPool";
pub const STAKE: &str = "stake";

/// Entry points the client dispatches to, with their input arity.
const REQUIRED_FUNCTIONS: [(&str, usize); 5] = [
    (POOLS, 1),
    (USERS, 2),
    (CALCULATE_REWARD, 2),
    (ADD_POOL, 6),
    (STAKE, 2),
];

/// Address and callable surface of the deployed staking contract.
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    address: Address,
    abi: Abi,
}

impl ContractDescriptor {
    /// Load from an interface artifact: either a bare ABI array or a build artifact
    /// carrying the ABI under `abi`.
    pub fn load(address: Address, artifact: &str) -> Result<Self> {
        let abi = match serde_json::from_str::<Abi>(artifact) {
            Ok(abi) => abi,
            Err(bare_err) => {
                let value: serde_json::Value = serde_json::from_str(artifact)
                    .map_err(|e| StakeError::Artifact(format!("invalid JSON: {e}")))?;
                let inner = value.get("abi").cloned().ok_or_else(|| {
                    StakeError::Artifact(format!("not an ABI and no `abi` field: {bare_err}"))
                })?;
                serde_json::from_value::<Abi>(inner)
                    .map_err(|e| StakeError::Artifact(format!("invalid `abi` field: {e}")))?
            }
        };

        for (name, arity) in REQUIRED_FUNCTIONS {
            let function = abi
                .function(name)
                .map_err(|_| StakeError::Artifact(format!("missing function `{name}`")))?;
            if function.inputs.len() != arity {
                return Err(StakeError::Artifact(format!(
                    "`{name}` takes {} inputs, expected {arity}",
                    function.inputs.len()
                )));
            }
        }

        Ok(Self { address, abi })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn checksum_address(&self) -> String {
        to_checksum(&self.address, None)
    }

    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    fn function(&self, name: &str) -> Result<&Function> {
        self.abi
            .function(name)
            .map_err(|e| StakeError::Artifact(format!("{name}: {e}")))
    }

    pub fn encode_call(&self, name: &str, args: &[Token]) -> Result<Bytes> {
        self.function(name)?
            .encode_input(args)
            .map(Bytes::from)
            .map_err(|e| StakeError::Artifact(format!("cannot encode `{name}` arguments: {e}")))
    }

    pub fn decode_record(&self, name: &str, data: &[u8]) -> Result<Record> {
        let function = self.function(name)?;
        if data.is_empty() && !function.outputs.is_empty() {
            return Err(StakeError::Decode(format!(
                "`{name}` returned no data; is the contract deployed at {}?",
                self.checksum_address()
            )));
        }
        let tokens = function
            .decode_output(data)
            .map_err(|e| StakeError::Decode(format!("`{name}` output: {e}")))?;
        // ABI encoding is canonical, so a well-formed payload re-encodes to its own length
        let expected_len = encode(&tokens).len();
        if expected_len != data.len() {
            return Err(StakeError::Decode(format!(
                "`{name}` output is {} bytes, expected {expected_len}",
                data.len()
            )));
        }

        let fields = function
            .outputs
            .iter()
            .zip(tokens)
            .enumerate()
            .map(|(i, (param, token))| {
                let name = if param.name.is_empty() {
                    format!("_{i}")
                } else {
                    param.name.clone()
                };
                (name, token)
            })
            .collect();
        Ok(Record { fields })
    }

    pub fn decode_uint(&self, name: &str, data: &[u8]) -> Result<U256> {
        let record = self.decode_record(name, data)?;
        match record.fields.as_slice() {
            [(_, Token::Uint(value))] => Ok(*value),
            other => Err(StakeError::Decode(format!(
                "`{name}` should return one uint, got {} values",
                other.len()
            ))),
        }
    }
}

/// Ordered tuple returned by a contract getter. Field meaning belongs to the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Token)>,
}

pub type PoolRecord = Record;
pub type UserRecord = Record;

impl Record {
    pub fn fields(&self) -> &[(String, Token)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Token> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, token)| token)
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.fields.into_iter().map(|(_, token)| token).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, token) in &self.fields {
            map.serialize_entry(name, &token_to_json(token))?;
        }
        map.end()
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|(name, token)| format!("{name}={}", token_to_json(token)))
            .collect();
        write!(f, "({})", rendered.join(", "))
    }
}
