// src/transaction.rs
use crate::error::{Result, StakeError};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, TxHash, U256};

/// Raw signed bytes ready for `eth_sendRawTransaction`, and the hash they will be known by.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub raw: Bytes,
    pub hash: TxHash,
}

/// Parse a raw hex private key, bound to `chain_id` for EIP-155 signatures.
pub fn parse_signer(key: &str, chain_id: u64) -> Result<LocalWallet> {
    let key = key.trim();
    let key = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);
    let wallet = key
        .parse::<LocalWallet>()
        .map_err(|e| StakeError::Signing(format!("invalid private key: {e}")))?;
    Ok(wallet.with_chain_id(chain_id))
}

pub struct CallTransaction {
    pub to: Address,
    pub from: Address,
    pub data: Bytes,
    pub gas_limit: U256,
    pub gas_price: U256,
    pub nonce: U256,
    pub chain_id: u64,
}

impl CallTransaction {
    /// Legacy transaction with an explicit gas limit and price.
    pub fn into_request(self) -> TransactionRequest {
        TransactionRequest::new()
            .from(self.from)
            .to(self.to)
            .data(self.data)
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .nonce(self.nonce)
            .chain_id(self.chain_id)
    }
}

pub async fn sign(request: TransactionRequest, wallet: &LocalWallet) -> Result<SignedTransaction> {
    let tx = TypedTransaction::Legacy(request);
    let signature = wallet
        .sign_transaction(&tx)
        .await
        .map_err(|e| StakeError::Signing(e.to_string()))?;
    Ok(SignedTransaction {
        raw: tx.rlp_signed(&signature),
        hash: tx.hash(&signature),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::utils::keccak256;

    // first account of a local anvil/hardhat node
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn call(wallet: &LocalWallet) -> CallTransaction {
        CallTransaction {
            to: Address::repeat_byte(0x13),
            from: wallet.address(),
            data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
            gas_limit: U256::from(2_000_000u64),
            gas_price: U256::from(20_000_000_000u64),
            nonce: U256::from(7u64),
            chain_id: 31337,
        }
    }

    #[test]
    fn parses_key_with_or_without_prefix() {
        let wallet = parse_signer(DEV_KEY, 31337).unwrap();
        assert_eq!(wallet.address(), DEV_ADDRESS.parse::<Address>().unwrap());
        assert_eq!(wallet.chain_id(), 31337);

        let bare = parse_signer(&DEV_KEY[2..], 1).unwrap();
        assert_eq!(bare.address(), wallet.address());
    }

    #[test]
    fn rejects_bad_key_material() {
        assert!(matches!(parse_signer("0x1234", 1), Err(StakeError::Signing(_))));
        assert!(matches!(parse_signer("not a key", 1), Err(StakeError::Signing(_))));
    }

    #[test]
    fn request_carries_fixed_gas_and_nonce() {
        let wallet = parse_signer(DEV_KEY, 31337).unwrap();
        let request = call(&wallet).into_request();
        assert_eq!(request.gas, Some(U256::from(2_000_000u64)));
        assert_eq!(request.gas_price, Some(U256::from(20_000_000_000u64)));
        assert_eq!(request.nonce, Some(U256::from(7u64)));
        assert_eq!(request.from, Some(wallet.address()));
    }

    #[tokio::test]
    async fn signed_hash_is_keccak_of_raw_bytes() {
        let wallet = parse_signer(DEV_KEY, 31337).unwrap();
        let signed = sign(call(&wallet).into_request(), &wallet).await.unwrap();

        assert_eq!(signed.hash, TxHash::from(keccak256(&signed.raw)));
        assert_eq!(format!("{:#x}", signed.hash).len(), 66);
    }

    #[tokio::test]
    async fn signature_is_replay_protected_and_recoverable() {
        let wallet = parse_signer(DEV_KEY, 31337).unwrap();
        let tx = TypedTransaction::Legacy(call(&wallet).into_request());
        let signature = wallet.sign_transaction(&tx).await.unwrap();

        // EIP-155: v = chain_id * 2 + 35 + parity
        assert!(signature.v == 31337 * 2 + 35 || signature.v == 31337 * 2 + 36);
        assert_eq!(signature.recover(tx.sighash()).unwrap(), wallet.address());

        let signed = sign(call(&wallet).into_request(), &wallet).await.unwrap();
        assert_eq!(signed.raw, tx.rlp_signed(&signature));
    }
}
