// src/utils.rs
use crate::error::{Result, StakeError};
use ethers::abi::Token;
use ethers::types::{Address, U256};
use ethers::utils::to_checksum;
use serde_json::Value;

/// Parse a 20-byte hex address. Lowercase and uppercase input is accepted as-is; mixed case
/// must carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 40 {
        return Err(StakeError::InvalidAddress(format!(
            "{input}: expected 20 bytes, got {} hex characters",
            hex.len()
        )));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StakeError::InvalidAddress(format!("{input}: not hex")));
    }

    let address = hex
        .parse::<Address>()
        .map_err(|e| StakeError::InvalidAddress(format!("{input}: {e}")))?;

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let expected = to_checksum(&address, None);
        if expected[2..] != *hex {
            return Err(StakeError::InvalidAddress(format!(
                "{input}: bad checksum, expected {expected}"
            )));
        }
    }

    Ok(address)
}

/// Canonical EIP-55 form of an address string.
pub fn normalize_address(input: &str) -> Result<String> {
    parse_address(input).map(|address| to_checksum(&address, None))
}

pub fn u256_to_human(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let divisor = U256::exp10(decimals as usize);
    let integer = value / divisor;
    let mut fraction = (value % divisor).to_string();
    let width = decimals as usize;
    while fraction.len() < width {
        fraction.insert(0, '0');
    }
    while fraction.ends_with('0') {
        fraction.pop();
    }
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// JSON rendering of a decoded ABI value. Integers become decimal strings so that 256-bit
/// values survive JSON consumers.
pub fn token_to_json(token: &Token) -> Value {
    match token {
        Token::Address(address) => Value::String(to_checksum(address, None)),
        Token::Uint(value) => Value::String(value.to_string()),
        Token::Int(value) => Value::String(ethers::types::I256::from_raw(*value).to_string()),
        Token::Bool(value) => Value::Bool(*value),
        Token::String(value) => Value::String(value.clone()),
        Token::Bytes(bytes) | Token::FixedBytes(bytes) => {
            Value::String(format!("0x{}", ethers::utils::hex::encode(bytes)))
        }
        Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
            Value::Array(items.iter().map(token_to_json).collect())
        }
    }
}
