// src/stake.rs
use crate::config::{Config, GasPrice, GasSettings};
use crate::contract::{
    ADD_POOL, CALCULATE_REWARD, ContractDescriptor, POOLS, PoolRecord, STAKE, USERS, UserRecord,
};
use crate::error::{Result, StakeError};
use crate::transaction::{CallTransaction, parse_signer, sign};
use crate::utils::{parse_address, u256_to_human};
use ethers::abi::Token;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::Signer;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{BlockId, BlockNumber, Bytes, TransactionRequest, TxHash, U256};
use ethers::utils::to_checksum;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Arguments of the contract's `addPool` entry point.
#[derive(Debug, Clone)]
pub struct AddPool {
    pub pid: u64,
    pub pool_address: String,
    pub weight: U256,
    pub min_deposit: U256,
    pub unstake_lock_blocks: U256,
    pub reward_per_block: U256,
}

/// Read and write access to one deployed staking contract through one node.
pub struct StakeClient<M> {
    provider: Arc<M>,
    contract: ContractDescriptor,
    chain_id: u64,
    gas: GasSettings,
    // held from nonce fetch until the node accepts the transaction
    submit_lock: Mutex<()>,
}

impl StakeClient<Provider<Http>> {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| StakeError::Config(format!("RPC_URL: {e}")))?;
        let contract = ContractDescriptor::load(config.contract_address, &config.read_abi()?)?;
        Self::connect(Arc::new(provider), contract, config.gas).await
    }
}

impl<M: Middleware> StakeClient<M> {
    /// Fetch the chain id, which also proves the node is reachable.
    pub async fn connect(
        provider: Arc<M>,
        contract: ContractDescriptor,
        gas: GasSettings,
    ) -> Result<Self> {
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| StakeError::from_middleware(e, StakeError::node))?;
        let chain_id = u64::try_from(chain_id)
            .map_err(|_| StakeError::Decode(format!("chain id {chain_id} does not fit in u64")))?;

        info!(
            chain_id,
            contract = %contract.checksum_address(),
            gas_limit = %gas.gas_limit,
            "Connected to node"
        );

        Ok(Self {
            provider,
            contract,
            chain_id,
            gas,
            submit_lock: Mutex::new(()),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn contract(&self) -> &ContractDescriptor {
        &self.contract
    }

    pub async fn read_pool(&self, pid: u64) -> Result<PoolRecord> {
        let data = self.call(POOLS, &[Token::Uint(U256::from(pid))]).await?;
        self.contract.decode_record(POOLS, &data)
    }

    pub async fn read_user(&self, address: &str, pid: u64) -> Result<UserRecord> {
        let user = parse_address(address)?;
        let data = self
            .call(USERS, &[Token::Address(user), Token::Uint(U256::from(pid))])
            .await?;
        self.contract.decode_record(USERS, &data)
    }

    pub async fn calculate_reward(&self, pid: u64, address: &str) -> Result<U256> {
        let user = parse_address(address)?;
        let data = self
            .call(
                CALCULATE_REWARD,
                &[Token::Uint(U256::from(pid)), Token::Address(user)],
            )
            .await?;
        self.contract.decode_uint(CALCULATE_REWARD, &data)
    }

    pub async fn submit_add_pool(
        &self,
        pool: &AddPool,
        signer_key: &str,
        from_address: &str,
    ) -> Result<TxHash> {
        let pool_address = parse_address(&pool.pool_address)?;
        let args = [
            Token::Uint(U256::from(pool.pid)),
            Token::Address(pool_address),
            Token::Uint(pool.weight),
            Token::Uint(pool.min_deposit),
            Token::Uint(pool.unstake_lock_blocks),
            Token::Uint(pool.reward_per_block),
        ];
        self.submit(ADD_POOL, &args, signer_key, from_address).await
    }

    pub async fn submit_stake(
        &self,
        pid: u64,
        amount: U256,
        signer_key: &str,
        from_address: &str,
    ) -> Result<TxHash> {
        let args = [Token::Uint(U256::from(pid)), Token::Uint(amount)];
        self.submit(STAKE, &args, signer_key, from_address).await
    }

    async fn call(&self, function: &str, args: &[Token]) -> Result<Bytes> {
        let data = self.contract.encode_call(function, args)?;
        let tx: TypedTransaction = TransactionRequest::new()
            .to(self.contract.address())
            .data(data)
            .into();

        debug!(function, "eth_call");
        self.provider
            .call(&tx, None)
            .await
            .map_err(|e| StakeError::from_middleware(e, StakeError::reverted))
    }

    async fn submit(
        &self,
        function: &str,
        args: &[Token],
        signer_key: &str,
        from_address: &str,
    ) -> Result<TxHash> {
        let from = parse_address(from_address)?;
        let wallet = parse_signer(signer_key, self.chain_id)?;
        if wallet.address() != from {
            return Err(StakeError::Signing(format!(
                "key belongs to {}, not {}",
                to_checksum(&wallet.address(), None),
                to_checksum(&from, None)
            )));
        }
        let data = self.contract.encode_call(function, args)?;

        let _guard = self.submit_lock.lock().await;

        let nonce = self
            .provider
            .get_transaction_count(from, Some(BlockId::Number(BlockNumber::Pending)))
            .await
            .map_err(|e| StakeError::from_middleware(e, StakeError::node))?;

        let gas_price = match self.gas.gas_price {
            GasPrice::Fixed(price) => price,
            GasPrice::Node => self
                .provider
                .get_gas_price()
                .await
                .map_err(|e| StakeError::from_middleware(e, StakeError::node))?,
        };

        let request = CallTransaction {
            to: self.contract.address(),
            from,
            data,
            gas_limit: self.gas.gas_limit,
            gas_price,
            nonce,
            chain_id: self.chain_id,
        }
        .into_request();
        let signed = sign(request, &wallet).await?;

        info!(
            function,
            from = %to_checksum(&from, None),
            %nonce,
            gas_price_gwei = %u256_to_human(gas_price, 9),
            tx_hash = ?signed.hash,
            "Submitting transaction"
        );

        let pending = self
            .provider
            .send_raw_transaction(signed.raw)
            .await
            .map_err(|e| {
                let err = StakeError::from_middleware(e, StakeError::rejected);
                warn!(function, %nonce, error = %err, "Transaction not accepted");
                err
            })?;

        let tx_hash = pending.tx_hash();
        if tx_hash != signed.hash {
            warn!(
                node = ?tx_hash,
                local = ?signed.hash,
                "Node reported a different transaction hash"
            );
        }
        Ok(tx_hash)
    }
}
