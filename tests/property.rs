use coldsign::intent::{decode_envelope, encode_envelope, parse_wei};
use coldsign::utils::crypto::{has_valid_checksum_case, keccak256, to_checksum_address};
use coldsign::wallet::derive_eth_key;
use proptest::prelude::*;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

proptest! {
    #[test]
    fn checksum_addresses_roundtrip(bytes in prop::array::uniform20(any::<u8>())) {
        let checksummed = to_checksum_address(&bytes);
        prop_assert!(checksummed.starts_with("0x"));

        let tail = checksummed.trim_start_matches("0x");
        let lower_expected = hex::encode(bytes);
        prop_assert_eq!(tail.to_ascii_lowercase(), lower_expected.clone());
        prop_assert!(has_valid_checksum_case(tail));

        let hash = keccak256(lower_expected.as_bytes());
        let mut expected = String::from("0x");
        for (i, ch) in lower_expected.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if ch.is_ascii_digit() || nibble < 8 {
                expected.push(ch);
            } else {
                expected.push(ch.to_ascii_uppercase());
            }
        }
        prop_assert_eq!(checksummed, expected);
    }

    #[test]
    fn digit_strings_parse_and_roundtrip(digits in "[0-9]{1,120}") {
        let amount = parse_wei(&digits).expect("digits parse");
        let canonical = digits.trim_start_matches('0');
        let canonical = if canonical.is_empty() { "0" } else { canonical };
        prop_assert_eq!(amount.as_str(), canonical);
        prop_assert_eq!(parse_wei(amount.as_str()).unwrap(), amount);
    }

    #[test]
    fn signed_or_junk_rejected(digits in "[0-9]{0,30}", junk in "[^0-9]") {
        let negative = format!("-{}", digits);
        let positive = format!("+{}", digits);
        let trailing = format!("{}{}", digits, junk);
        let leading = format!("{}{}", junk, digits);
        for input in [&negative, &positive, &trailing, &leading] {
            prop_assert!(parse_wei(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn raw_json_envelope_idempotent(value in "[a-z0-9]{0,40}", nonce in any::<u64>()) {
        let json = format!(r#"{{"kind":"ETH_SEND","note":"{}","nonce":{}}}"#, value, nonce);
        let once = decode_envelope(&json).unwrap();
        prop_assert_eq!(&once, &json.as_bytes().to_vec());
        let twice = decode_envelope(std::str::from_utf8(&once).unwrap()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn envelope_roundtrip(payload in prop::collection::vec(any::<u8>(), 0..256)) {
        let envelope = encode_envelope(&payload);
        prop_assert!(!envelope.contains('='));
        prop_assert_eq!(decode_envelope(&envelope).unwrap(), payload);
    }
}

proptest! {
    // Each case runs PBKDF2 with 2048 rounds twice.
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn derivation_is_pure(index in 0u32..(1 << 31)) {
        let a = derive_eth_key(ABANDON, "", index).unwrap();
        let b = derive_eth_key(ABANDON, "", index).unwrap();
        prop_assert_eq!(a.secret_bytes(), b.secret_bytes());
        prop_assert_eq!(a.address(), b.address());
    }
}
