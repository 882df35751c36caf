// src/error.rs
use ethers::providers::{JsonRpcError, MiddlewareError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StakeError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Transaction rejected by node (code {code}): {message}")]
    RejectedTransaction { code: i64, message: String },

    #[error("Call reverted: {0}")]
    CallReverted(String),

    #[error("Contract artifact error: {0}")]
    Artifact(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StakeError>;

impl StakeError {
    /// Classify a middleware failure. A JSON-RPC error object means the node answered and
    /// refused; `on_response` decides what that refusal means for the calling operation.
    pub fn from_middleware<E, F>(err: E, on_response: F) -> Self
    where
        E: MiddlewareError,
        F: FnOnce(&JsonRpcError) -> StakeError,
    {
        if let Some(response) = err.as_error_response() {
            on_response(response)
        } else if let Some(serde_err) = err.as_serde_error() {
            StakeError::Decode(serde_err.to_string())
        } else {
            StakeError::Transport(err.to_string())
        }
    }

    pub fn rejected(response: &JsonRpcError) -> Self {
        StakeError::RejectedTransaction {
            code: response.code,
            message: response.message.clone(),
        }
    }

    /// Node-side error on a read. Only an actual EVM revert (code 3 or an
    /// `execution reverted` message) is attributed to the contract.
    pub fn reverted(response: &JsonRpcError) -> Self {
        let is_revert = response.code == 3
            || response
                .message
                .to_ascii_lowercase()
                .starts_with("execution reverted");
        if is_revert {
            StakeError::CallReverted(response.message.clone())
        } else {
            StakeError::node(response)
        }
    }

    /// The node answered with an error that is not about the transaction itself.
    pub fn node(response: &JsonRpcError) -> Self {
        StakeError::Transport(format!(
            "node error {}: {}",
            response.code, response.message
        ))
    }
}
