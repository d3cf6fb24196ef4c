//! Address parsing for intent fields

use ethers_core::types::Address;

use crate::error::{ColdsignError, ColdsignResult, ErrorCode};
use crate::utils::crypto::{has_valid_checksum_case, to_checksum_address};

/// Parse a hex address: optional `0x`/`0X`, exactly 40 hex chars, and a
/// correct EIP-55 checksum when mixed case is used.
pub fn parse_address(field: &str, s: &str) -> ColdsignResult<Address> {
    let body = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColdsignError::invalid_address(
            field,
            format!("not a 20-byte hex address: {:?}", s),
        ));
    }
    if !has_valid_checksum_case(body) {
        return Err(ColdsignError::invalid_address(
            field,
            format!("bad EIP-55 checksum: {}", s),
        ));
    }

    let bytes = hex::decode(body)?;
    Ok(Address::from_slice(&bytes))
}

/// `parse_address` that also refuses the all-zero address.
pub fn parse_nonzero_address(field: &str, s: &str) -> ColdsignResult<Address> {
    let address = parse_address(field, s)?;
    if address.is_zero() {
        return Err(ColdsignError::new(
            ErrorCode::ZeroAddress,
            format!("{}: address must not be the zero address", field),
        ));
    }
    Ok(address)
}

/// Checksummed `0x` form for display
pub fn checksummed(address: &Address) -> String {
    to_checksum_address(address.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        let expected = parse_address("to", "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        for s in [
            "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "0X5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        ] {
            assert_eq!(parse_address("to", s).unwrap(), expected, "{s}");
        }
        assert_eq!(checksummed(&expected), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in [
            "",
            "0x",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed00",
            "0xzaaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            " 0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
        ] {
            let err = parse_address("to", s).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidAddress, "{s:?}");
            assert!(err.message.starts_with("to:"));
        }
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let err = parse_address("to", "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").unwrap_err();
        assert!(err.message.contains("checksum"));
    }

    #[test]
    fn test_zero_address_rejected() {
        let err = parse_nonzero_address("to", "0x0000000000000000000000000000000000000000").unwrap_err();
        assert_eq!(err.code, ErrorCode::ZeroAddress);
        assert!(parse_address("to", "0x0000000000000000000000000000000000000000").is_ok());
    }
}
