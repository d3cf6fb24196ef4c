//! Unified error types for coldsign
//!
//! Every pipeline stage fails closed through `ColdsignError`. Messages name
//! the offending field or check and never carry mnemonic, passphrase or key
//! material.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all signing operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColdsignError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ColdsignError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn envelope(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::EnvelopeDecode, msg)
    }

    /// A field failed its type or format constraint.
    pub fn invalid_field(field: &str, msg: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidField, format!("{}: {}", field, msg))
    }

    pub fn invalid_address(field: &str, msg: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidAddress, format!("{}: {}", field, msg))
    }

    pub fn invalid_amount(field: &str, msg: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidAmount, format!("{}: {}", field, msg))
    }

    pub fn policy(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::PolicyViolation, msg)
    }

    pub fn address_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::AddressMismatch, msg)
    }

    pub fn missing_sender(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingExpectedSender, msg)
    }

    pub fn derivation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DerivationFailed, msg)
    }

    pub fn build_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTransaction, msg)
    }

    pub fn signing_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SigningFailed, msg)
    }

    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::TerminalError, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    /// Errors that describe bad input rather than a failed key operation.
    /// The operator can fix the intent or policy and retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::EnvelopeDecode
                | ErrorCode::JsonError
                | ErrorCode::InvalidField
                | ErrorCode::UnsupportedVersion
                | ErrorCode::UnsupportedKind
                | ErrorCode::UnsupportedFromType
                | ErrorCode::InvalidAddress
                | ErrorCode::ZeroAddress
                | ErrorCode::InvalidAmount
                | ErrorCode::PolicyViolation
                | ErrorCode::MissingExpectedSender
                | ErrorCode::ConfigError
        )
    }
}

impl fmt::Display for ColdsignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ColdsignError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Malformed input
    EnvelopeDecode,
    JsonError,
    InvalidField,
    HexError,
    ParseError,

    // Semantic rejection
    UnsupportedVersion,
    UnsupportedKind,
    UnsupportedFromType,
    InvalidAddress,
    ZeroAddress,
    InvalidAmount,

    // Policy
    PolicyViolation,
    ConfigError,

    // Authentication
    MissingExpectedSender,
    AddressMismatch,

    // Key material
    InvalidMnemonic,
    DerivationFailed,

    // Transaction
    InvalidTransaction,
    SigningFailed,

    // Operator I/O
    TerminalError,
    Io,
}

/// Result type alias for signing operations
pub type ColdsignResult<T> = Result<T, ColdsignError>;

// Conversions from common error types

impl From<serde_json::Error> for ColdsignError {
    fn from(e: serde_json::Error) -> Self {
        ColdsignError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for ColdsignError {
    fn from(e: hex::FromHexError) -> Self {
        ColdsignError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for ColdsignError {
    fn from(e: std::io::Error) -> Self {
        ColdsignError::new(ErrorCode::Io, e.to_string())
    }
}

impl From<base64::DecodeError> for ColdsignError {
    fn from(e: base64::DecodeError) -> Self {
        ColdsignError::envelope(format!("invalid envelope base64url: {}", e))
    }
}

impl From<bitcoin::bip32::Error> for ColdsignError {
    fn from(e: bitcoin::bip32::Error) -> Self {
        ColdsignError::derivation(format!("BIP32 error: {}", e))
    }
}

impl From<bip39::Error> for ColdsignError {
    // bip39 errors describe word positions and checksums, never the words.
    fn from(e: bip39::Error) -> Self {
        ColdsignError::new(ErrorCode::InvalidMnemonic, format!("invalid mnemonic: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = ColdsignError::policy("maxFeePerGas exceeds policy limit")
            .with_details("limit: 200000000000");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("policy_violation"));
        assert!(json.contains("maxFeePerGas"));
    }

    #[test]
    fn test_display_includes_code_and_details() {
        let err = ColdsignError::invalid_field("to", "expected hex").with_details("got 3 chars");
        assert_eq!(err.to_string(), "[InvalidField] to: expected hex (got 3 chars)");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ColdsignError::policy("x").is_retryable());
        assert!(ColdsignError::envelope("x").is_retryable());
        assert!(!ColdsignError::address_mismatch("x").is_retryable());
        assert!(!ColdsignError::signing_failed("x").is_retryable());
    }
}
