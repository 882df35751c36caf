// src/lib.rs
pub mod api;
pub mod config;
pub mod contract;
pub mod error;
pub mod logging;
pub mod stake;
pub mod transaction;
pub mod utils;

pub use config::{Config, GasPrice, GasSettings};
pub use contract::{ContractDescriptor, PoolRecord, Record, UserRecord};
pub use error::{Result, StakeError};
pub use stake::{AddPool, StakeClient};
