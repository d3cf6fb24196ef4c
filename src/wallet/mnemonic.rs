//! Mnemonic generation
//!
//! SECURITY: The entropy and the phrase live in zeroizing buffers; the
//! parsed `Mnemonic` wipes its word indices on drop.

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::ColdsignResult;

/// 256 bits of entropy, 24 words
pub const ENTROPY_BYTES: usize = 32;

/// Generate a fresh 24-word English mnemonic from OS randomness.
pub fn generate_mnemonic() -> ColdsignResult<Zeroizing<String>> {
    let mut entropy = Zeroizing::new([0u8; ENTROPY_BYTES]);
    OsRng.fill_bytes(entropy.as_mut());

    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy.as_ref())?;
    let mut phrase = Zeroizing::new(String::with_capacity(24 * 9));
    for (i, word) in mnemonic.words().enumerate() {
        if i > 0 {
            phrase.push(' ');
        }
        phrase.push_str(word);
    }
    Ok(phrase)
}
