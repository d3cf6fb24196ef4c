//! Intent Type Definitions

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

use crate::error::{ColdsignError, ColdsignResult};

use super::address::parse_nonzero_address;
use super::amount::{parse_wei, WeiAmount};

/// The one supported intent schema version
pub const INTENT_VERSION: u64 = 1;

/// The one supported intent kind: a native-currency transfer
pub const KIND_ETH_SEND: &str = "ETH_SEND";

/// Tag of the index-based sender reference
pub const FROM_TYPE_BIP44_INDEX: &str = "bip44_index";

/// How the intent names its sender. Never a raw address or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum FromRef {
    /// Account index under `m/44'/60'/0'/0`
    #[serde(rename = "bip44_index")]
    Bip44Index { index: u32 },
}

impl FromRef {
    pub fn index(&self) -> u32 {
        match self {
            FromRef::Bip44Index { index } => *index,
        }
    }
}

/// Untrusted transfer request, as decoded from the envelope.
///
/// Numeric fields stay as the strings the author wrote; `validate` proves
/// they parse, and the transaction builder parses them again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransactionIntent {
    #[serde(alias = "v")]
    pub version: u64,
    pub kind: String,
    pub chain_id: u64,
    pub from: FromRef,
    pub to: String,
    pub value_wei: String,
    pub nonce: u64,
    pub max_fee_per_gas_wei: String,
    pub max_priority_fee_per_gas_wei: String,
    /// Expected sender address for `from`, checked against the derived key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
}

impl TransactionIntent {
    /// Semantic checks on an intent whose version and kind already matched.
    pub fn validate(&self) -> ColdsignResult<()> {
        parse_nonzero_address("to", &self.to)?;
        if let Some(ref from) = self.from_address {
            parse_nonzero_address("fromAddress", from)?;
        }

        self.value()?;
        self.max_fee_per_gas()?;
        self.max_priority_fee_per_gas()?;
        Ok(())
    }

    pub fn to_address(&self) -> ColdsignResult<Address> {
        parse_nonzero_address("to", &self.to)
    }

    /// The sender the intent claims, if it carries one.
    pub fn claimed_sender(&self) -> ColdsignResult<Option<Address>> {
        self.from_address
            .as_deref()
            .map(|s| parse_nonzero_address("fromAddress", s))
            .transpose()
    }

    pub fn value(&self) -> ColdsignResult<WeiAmount> {
        amount_field("valueWei", &self.value_wei)
    }

    pub fn max_fee_per_gas(&self) -> ColdsignResult<WeiAmount> {
        amount_field("maxFeePerGasWei", &self.max_fee_per_gas_wei)
    }

    pub fn max_priority_fee_per_gas(&self) -> ColdsignResult<WeiAmount> {
        amount_field("maxPriorityFeePerGasWei", &self.max_priority_fee_per_gas_wei)
    }

    pub fn account_index(&self) -> u32 {
        self.from.index()
    }
}

fn amount_field(field: &str, s: &str) -> ColdsignResult<WeiAmount> {
    parse_wei(s).map_err(|e| ColdsignError::invalid_amount(field, e))
}
