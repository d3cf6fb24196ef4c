//! Intent transport envelope
//!
//! An intent travels either as raw JSON (file, pipe) or as
//! `coldintent:v1:<base64url(json)>` without padding, which fits a QR code.
//! Scanners sometimes wrap the payload in literal double quotes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::error::{ColdsignError, ColdsignResult};

/// Versioned envelope prefix
pub const ENVELOPE_PREFIX_V1: &str = "coldintent:v1:";

/// Return the canonical intent bytes carried by `input`.
///
/// Raw JSON comes back unchanged apart from surrounding whitespace and one
/// pair of quotes; no JSON validation happens here.
pub fn decode_envelope(input: &str) -> ColdsignResult<Vec<u8>> {
    let s = strip_transport_noise(input);

    match s.strip_prefix(ENVELOPE_PREFIX_V1) {
        Some(encoded) => {
            let decoded = URL_SAFE_NO_PAD.decode(encoded.trim())?;
            Ok(decoded)
        }
        None => Ok(s.as_bytes().to_vec()),
    }
}

/// Wrap intent JSON into a `coldintent:v1:` envelope.
pub fn encode_envelope(json: &[u8]) -> String {
    format!("{}{}", ENVELOPE_PREFIX_V1, URL_SAFE_NO_PAD.encode(json))
}

fn strip_transport_noise(input: &str) -> &str {
    let trimmed = input.trim();
    match trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const JSON: &str = r#"{"version":1,"kind":"ETH_SEND"}"#;

    #[test]
    fn test_raw_json_passthrough() {
        assert_eq!(decode_envelope(JSON).unwrap(), JSON.as_bytes());
        assert_eq!(decode_envelope(&format!("  {}\n", JSON)).unwrap(), JSON.as_bytes());
    }

    #[test]
    fn test_raw_json_idempotent() {
        let once = decode_envelope(JSON).unwrap();
        let twice = decode_envelope(std::str::from_utf8(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_envelope_roundtrip() {
        let envelope = encode_envelope(JSON.as_bytes());
        assert!(envelope.starts_with(ENVELOPE_PREFIX_V1));
        assert!(!envelope.contains('='));
        assert_eq!(decode_envelope(&envelope).unwrap(), JSON.as_bytes());
    }

    #[test]
    fn test_quoted_envelope_from_scanner() {
        let envelope = format!("\"{}\"\n", encode_envelope(JSON.as_bytes()));
        assert_eq!(decode_envelope(&envelope).unwrap(), JSON.as_bytes());
    }

    #[test]
    fn test_malformed_base64() {
        let err = decode_envelope("coldintent:v1:***not-base64***").unwrap_err();
        assert_eq!(err.code, ErrorCode::EnvelopeDecode);
    }

    #[test]
    fn test_padded_base64_rejected() {
        let padded = format!(
            "{}{}",
            ENVELOPE_PREFIX_V1,
            base64::engine::general_purpose::URL_SAFE.encode(b"{}")
        );
        assert!(padded.ends_with('='));
        assert!(decode_envelope(&padded).is_err());
    }

    #[test]
    fn test_other_prefix_is_raw() {
        let input = "coldintent:v2:abc";
        assert_eq!(decode_envelope(input).unwrap(), input.as_bytes());
    }
}
