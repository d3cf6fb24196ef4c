//! Transaction Signer
//!
//! Signs an unsigned transfer with a derived key. Signing is synchronous
//! and deterministic (RFC 6979), so no async runtime is involved.

use ethers_core::types::Address;
use ethers_signers::{LocalWallet, Signer};

use crate::error::{ColdsignError, ColdsignResult};
use crate::utils::crypto::{keccak256, to_checksum_address};
use crate::wallet::DerivedKey;

use super::builder::UnsignedTransaction;

/// Serialized, signed transaction ready for broadcast elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: [u8; 32],
    pub from: Address,
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }

    pub fn from_checksummed(&self) -> String {
        to_checksum_address(self.from.as_bytes())
    }
}

/// Sign `unsigned` for `chain_id` with `key`.
///
/// A chain id that differs from the transaction's own is refused rather
/// than silently overriding either.
pub fn sign_transaction(
    unsigned: &UnsignedTransaction,
    chain_id: u64,
    key: &DerivedKey,
) -> ColdsignResult<SignedTransaction> {
    if unsigned.chain_id != chain_id {
        return Err(ColdsignError::signing_failed(format!(
            "chain id mismatch: transaction has {}, signer asked for {}",
            unsigned.chain_id, chain_id
        )));
    }

    let wallet = LocalWallet::from_bytes(key.secret_bytes())
        .map_err(|e| ColdsignError::signing_failed(format!("invalid signing key: {}", e)))?
        .with_chain_id(chain_id);

    if wallet.address() != key.address() {
        return Err(ColdsignError::signing_failed(
            "signing key does not match derived address",
        ));
    }

    let typed = unsigned.to_typed();
    let signature = wallet
        .sign_transaction_sync(&typed)
        .map_err(|e| ColdsignError::signing_failed(e.to_string()))?;

    let recovered = signature
        .recover(typed.sighash())
        .map_err(|e| ColdsignError::signing_failed(format!("signature does not verify: {}", e)))?;
    if recovered != key.address() {
        return Err(ColdsignError::signing_failed(
            "signature recovers to a different address",
        ));
    }

    let raw = typed.rlp_signed(&signature).to_vec();
    let hash = keccak256(&raw);

    Ok(SignedTransaction {
        raw,
        hash,
        from: recovered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::intent::FromRef;
    use crate::intent::TransactionIntent;
    use crate::tx::build_unsigned_transfer;
    use crate::wallet::derive_eth_key;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn unsigned(chain_id: u64) -> UnsignedTransaction {
        let intent = TransactionIntent {
            version: 1,
            kind: "ETH_SEND".to_string(),
            chain_id,
            from: FromRef::Bip44Index { index: 0 },
            to: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".to_string(),
            value_wei: "1000000000000000000".to_string(),
            nonce: 0,
            max_fee_per_gas_wei: "20000000000".to_string(),
            max_priority_fee_per_gas_wei: "1000000000".to_string(),
            from_address: None,
        };
        build_unsigned_transfer(&intent).unwrap()
    }

    #[test]
    fn test_sign_type2_transfer() {
        let key = derive_eth_key(ABANDON, "", 0).unwrap();
        let signed = sign_transaction(&unsigned(1), 1, &key).unwrap();

        assert_eq!(signed.raw[0], 0x02);
        assert_eq!(signed.from, key.address());
        assert_eq!(signed.hash, keccak256(&signed.raw));
        assert!(signed.raw_hex().starts_with("0x02"));
        assert_eq!(signed.hash_hex().len(), 66);
        assert_eq!(
            signed.from_checksummed(),
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = derive_eth_key(ABANDON, "", 0).unwrap();
        let a = sign_transaction(&unsigned(1), 1, &key).unwrap();
        let b = sign_transaction(&unsigned(1), 1, &key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_chain_id_mismatch() {
        let key = derive_eth_key(ABANDON, "", 0).unwrap();
        let err = sign_transaction(&unsigned(1), 5, &key).unwrap_err();
        assert_eq!(err.code, ErrorCode::SigningFailed);
        assert!(err.message.contains("chain id mismatch"));
    }

    #[test]
    fn test_chain_id_changes_bytes() {
        let key = derive_eth_key(ABANDON, "", 0).unwrap();
        let mainnet = sign_transaction(&unsigned(1), 1, &key).unwrap();
        let sepolia = sign_transaction(&unsigned(11155111), 11155111, &key).unwrap();
        assert_ne!(mainnet.raw, sepolia.raw);
        assert_eq!(mainnet.from, sepolia.from);
    }
}
