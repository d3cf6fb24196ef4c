//! Key Derivation
//!
//! Re-derives the Ethereum signing key for one account index from a BIP39
//! mnemonic and optional passphrase, along `m/44'/60'/0'/0/index`.
//!
//! SECURITY: The seed and every intermediate private key are wiped before
//! return. The final scalar lives in a `Zeroizing` buffer owned by
//! `DerivedKey`.

use std::fmt;

use bip39::{Language, Mnemonic};
use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv};
use bitcoin::secp256k1::Secp256k1;
use bitcoin::Network;
use ethers_core::types::Address;
use zeroize::Zeroizing;

use crate::error::{ColdsignError, ColdsignResult};
use crate::utils::crypto::{public_key_to_address, to_checksum_address};

const PURPOSE: u32 = 44;
const COIN_TYPE_ETH: u32 = 60;
const ACCOUNT: u32 = 0;
const CHANGE_EXTERNAL: u32 = 0;

/// Signing key for one account index. Never serialized; wiped on drop.
pub struct DerivedKey {
    secret: Zeroizing<[u8; 32]>,
    address: Address,
    index: u32,
}

impl DerivedKey {
    /// Raw secp256k1 scalar. Callers must not copy it out of a zeroizing
    /// container.
    pub fn secret_bytes(&self) -> &[u8; 32] {
        &self.secret
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn checksum_address(&self) -> String {
        to_checksum_address(self.address.as_bytes())
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("secret", &"[REDACTED]")
            .field("address", &self.checksum_address())
            .field("index", &self.index)
            .finish()
    }
}

/// `m/44'/60'/0'/0/index`
///
/// Indices at or above 2^31 are refused: they would silently become
/// hardened steps.
pub fn eth_derivation_path(index: u32) -> ColdsignResult<DerivationPath> {
    let leaf = ChildNumber::from_normal_idx(index).map_err(|_| {
        ColdsignError::derivation(format!(
            "account index {} out of range (must be below 2^31)",
            index
        ))
    })?;

    Ok(DerivationPath::from(vec![
        ChildNumber::from_hardened_idx(PURPOSE)?,
        ChildNumber::from_hardened_idx(COIN_TYPE_ETH)?,
        ChildNumber::from_hardened_idx(ACCOUNT)?,
        ChildNumber::from_normal_idx(CHANGE_EXTERNAL)?,
        leaf,
    ]))
}

/// Derive the signing key for `index`.
///
/// The mnemonic is checked against the English word list and its checksum
/// before any key math runs. Same inputs always give the same key.
pub fn derive_eth_key(mnemonic: &str, passphrase: &str, index: u32) -> ColdsignResult<DerivedKey> {
    let path = eth_derivation_path(index)?;
    let mnemonic = Mnemonic::parse_in(Language::English, mnemonic)?;

    let seed = Zeroizing::new(mnemonic.to_seed(passphrase));
    drop(mnemonic);

    let secp = Secp256k1::new();
    let mut master = Xpriv::new_master(Network::Bitcoin, seed.as_ref())?;
    let derived = master.derive_priv(&secp, &path);
    master.private_key.non_secure_erase();
    let mut child = derived?;

    let secret = Zeroizing::new(child.private_key.secret_bytes());
    let public = child.private_key.public_key(&secp).serialize_uncompressed();
    child.private_key.non_secure_erase();

    let address = Address::from(public_key_to_address(&public));

    Ok(DerivedKey {
        secret,
        address,
        index,
    })
}

/// Address for `index`, with the key wiped before return.
pub fn derive_address(mnemonic: &str, passphrase: &str, index: u32) -> ColdsignResult<Address> {
    let key = derive_eth_key(mnemonic, passphrase, index)?;
    Ok(key.address())
}
