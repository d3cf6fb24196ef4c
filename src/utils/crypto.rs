//! Hashing and address encoding helpers shared by derivation, validation
//! and signing.

use tiny_keccak::{Hasher, Keccak};

/// Keccak256 hash (used for Ethereum addresses and transaction hashes)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Convert raw address bytes to an EIP-55 checksummed address
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() {
            result.push(ch);
        } else if nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}

/// Address of an uncompressed SEC1 public key (65 bytes, leading 0x04).
pub fn public_key_to_address(uncompressed: &[u8; 65]) -> [u8; 20] {
    let hash = keccak256(&uncompressed[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// True when 40 hex chars carry either a single case or a valid EIP-55
/// checksum. Callers strip the `0x` prefix first.
pub fn has_valid_checksum_case(hex_body: &str) -> bool {
    let has_upper = hex_body.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = hex_body.chars().any(|c| c.is_ascii_lowercase());
    if !(has_upper && has_lower) {
        return true;
    }

    match hex::decode(hex_body) {
        Ok(bytes) => to_checksum_address(&bytes)[2..] == *hex_body,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_checksum_address_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let bytes = hex::decode(&expected[2..]).unwrap();
            assert_eq!(to_checksum_address(&bytes), expected);
        }
    }

    #[test]
    fn test_checksum_case_acceptance() {
        assert!(has_valid_checksum_case("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(has_valid_checksum_case("5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"));
        assert!(has_valid_checksum_case("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!has_valid_checksum_case("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));
    }
}
