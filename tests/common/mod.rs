// tests/common/mod.rs
#![allow(dead_code)]

use b2stake_client::config::bundled_abi;
use b2stake_client::{ContractDescriptor, GasSettings, StakeClient};
use ethers::abi::{Token, encode};
use ethers::providers::{JsonRpcError, MockProvider, MockResponse, Provider};
use ethers::types::{Address, Bytes, U256};
use serde::Serialize;
use std::sync::Arc;

pub const CHAIN_ID: u64 = 31337;
pub const CONTRACT: &str = "0x139e546cc649643366b567d2e71b0ba91360df9d";
pub const POOL_ADDRESS: &str = "0xe066173cc99a1ccf4f9e92749ac3aa2d99c73775";
pub const USER_ADDRESS: &str = "0xfe0298bb6015b441aee9e795a5c9913a6836a2e2";
// first account of a local anvil/hardhat node
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub type MockClient = StakeClient<Provider<MockProvider>>;

pub fn value<T: Serialize>(data: T) -> MockResponse {
    MockResponse::Value(serde_json::to_value(data).unwrap())
}

pub fn rpc_error(code: i64, message: &str) -> MockResponse {
    MockResponse::Error(JsonRpcError {
        code,
        message: message.to_string(),
        data: None,
    })
}

/// Queue responses in the order the client will request them. The mock pops from the back.
pub fn respond(mock: &MockProvider, responses: Vec<MockResponse>) {
    for response in responses.into_iter().rev() {
        mock.push_response(response);
    }
}

pub fn descriptor() -> ContractDescriptor {
    ContractDescriptor::load(CONTRACT.parse::<Address>().unwrap(), bundled_abi()).unwrap()
}

pub async fn connect_with(gas: GasSettings) -> (Arc<MockClient>, MockProvider) {
    let (provider, mock) = Provider::mocked();
    respond(&mock, vec![value(U256::from(CHAIN_ID))]);
    let client = StakeClient::connect(Arc::new(provider), descriptor(), gas)
        .await
        .unwrap();
    mock.assert_request("eth_chainId", ()).unwrap();
    (Arc::new(client), mock)
}

pub async fn connect() -> (Arc<MockClient>, MockProvider) {
    connect_with(GasSettings::default()).await
}

pub fn pool_payload(weight: u64) -> Bytes {
    let st_token: Address = POOL_ADDRESS.parse().unwrap();
    let mut values = vec![Token::Address(st_token), Token::Uint(U256::from(weight))];
    values.extend((0..6u64).map(|v| Token::Uint(U256::from(v * 100))));
    Bytes::from(encode(&values))
}

pub fn user_payload(st_amount: u64) -> Bytes {
    Bytes::from(encode(&[
        Token::Uint(U256::from(st_amount)),
        Token::Uint(U256::zero()),
        Token::Uint(U256::from(5u64)),
        Token::Uint(U256::from(17u64)),
    ]))
}

pub fn uint_payload(value: u64) -> Bytes {
    Bytes::from(encode(&[Token::Uint(U256::from(value))]))
}
