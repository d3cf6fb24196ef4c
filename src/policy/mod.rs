//! Transaction Policy
//!
//! Operator-configured ceilings an intent must satisfy before any secret is
//! requested:
//! - Allowed chain ids
//! - Max fee-per-gas and max priority-fee-per-gas
//! - Max transferred value
//!
//! The built-in defaults are conservative (mainnet only, 200 gwei fee cap,
//! 10 gwei tip, 1000 ETH). A JSON policy file may override any of them.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ColdsignError, ColdsignResult};
use crate::intent::{parse_wei, TransactionIntent, WeiAmount};
use crate::log_debug;

/// Policy ceilings for one signing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub allowed_chain_ids: BTreeSet<u64>,
    pub max_fee_per_gas_wei: WeiAmount,
    pub max_priority_fee_per_gas_wei: WeiAmount,
    pub max_value_wei: WeiAmount,
}

/// Why an intent was refused. Limits and actual values are in wei.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("chainId {0} not allowed by policy")]
    ChainNotAllowed(u64),

    #[error("maxFeePerGas {actual} exceeds policy limit {limit}")]
    FeeCapExceeded { actual: WeiAmount, limit: WeiAmount },

    #[error("maxPriorityFeePerGas {actual} exceeds policy limit {limit}")]
    PriorityFeeCapExceeded { actual: WeiAmount, limit: WeiAmount },

    #[error("value {actual} exceeds policy limit {limit}")]
    ValueExceeded { actual: WeiAmount, limit: WeiAmount },

    #[error("maxPriorityFeePerGas {priority} exceeds maxFeePerGas {fee_cap}")]
    PriorityFeeExceedsFeeCap {
        priority: WeiAmount,
        fee_cap: WeiAmount,
    },

    #[error("{field} is not a valid amount: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl From<PolicyViolation> for ColdsignError {
    fn from(v: PolicyViolation) -> Self {
        let details = match &v {
            PolicyViolation::ChainNotAllowed(_) => "chain",
            PolicyViolation::FeeCapExceeded { .. } => "fee_cap",
            PolicyViolation::PriorityFeeCapExceeded { .. } => "priority_fee_cap",
            PolicyViolation::ValueExceeded { .. } => "value",
            PolicyViolation::PriorityFeeExceedsFeeCap { .. } => "fee_ordering",
            PolicyViolation::Malformed { .. } => "malformed",
        };
        ColdsignError::policy(v.to_string()).with_details(details)
    }
}

impl Policy {
    /// Mainnet only, 200 gwei fee cap, 10 gwei tip, 1000 ETH per transfer.
    pub fn conservative() -> Self {
        Self {
            allowed_chain_ids: BTreeSet::from([1]),
            max_fee_per_gas_wei: WeiAmount::from_units(200, 9),
            max_priority_fee_per_gas_wei: WeiAmount::from_units(10, 9),
            max_value_wei: WeiAmount::from_units(1000, 18),
        }
    }

    /// Overlay a parsed config on the defaults.
    pub fn from_config(config: PolicyConfig) -> ColdsignResult<Self> {
        let mut policy = Self::conservative();

        if let Some(ids) = config.allowed_chain_ids {
            if ids.is_empty() {
                return Err(ColdsignError::config(
                    "allowedChainIds: at least one chain id is required",
                ));
            }
            policy.allowed_chain_ids = ids.into_iter().collect();
        }
        if let Some(s) = config.max_fee_per_gas_wei {
            policy.max_fee_per_gas_wei = config_amount("maxFeePerGasWei", &s)?;
        }
        if let Some(s) = config.max_priority_fee_per_gas_wei {
            policy.max_priority_fee_per_gas_wei = config_amount("maxPriorityFeePerGasWei", &s)?;
        }
        if let Some(s) = config.max_value_wei {
            policy.max_value_wei = config_amount("maxValueWei", &s)?;
        }

        Ok(policy)
    }

    /// Read a JSON policy file.
    pub fn load(path: &Path) -> ColdsignResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ColdsignError::config(format!("cannot read policy file {}: {}", path.display(), e))
        })?;
        let config: PolicyConfig = serde_json::from_str(&text).map_err(|e| {
            ColdsignError::config(format!("invalid policy file {}: {}", path.display(), e))
        })?;

        log_debug!("policy", "Loaded policy file", file = path.display());
        Self::from_config(config)
    }

    /// Check an intent against the ceilings. The first failing check wins:
    /// chain, fee cap, priority fee cap, value, then fee ordering.
    pub fn enforce(&self, intent: &TransactionIntent) -> Result<(), PolicyViolation> {
        if !self.allowed_chain_ids.contains(&intent.chain_id) {
            return Err(PolicyViolation::ChainNotAllowed(intent.chain_id));
        }

        let fee_cap = intent_amount("maxFeePerGasWei", &intent.max_fee_per_gas_wei)?;
        if fee_cap > self.max_fee_per_gas_wei {
            return Err(PolicyViolation::FeeCapExceeded {
                actual: fee_cap,
                limit: self.max_fee_per_gas_wei.clone(),
            });
        }

        let priority = intent_amount("maxPriorityFeePerGasWei", &intent.max_priority_fee_per_gas_wei)?;
        if priority > self.max_priority_fee_per_gas_wei {
            return Err(PolicyViolation::PriorityFeeCapExceeded {
                actual: priority,
                limit: self.max_priority_fee_per_gas_wei.clone(),
            });
        }

        let value = intent_amount("valueWei", &intent.value_wei)?;
        if value > self.max_value_wei {
            return Err(PolicyViolation::ValueExceeded {
                actual: value,
                limit: self.max_value_wei.clone(),
            });
        }

        // A tip above the fee cap can never be paid in full.
        if priority > fee_cap {
            return Err(PolicyViolation::PriorityFeeExceedsFeeCap { priority, fee_cap });
        }

        Ok(())
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::conservative()
    }
}

/// On-disk policy document. Absent fields keep their default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub allowed_chain_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub max_fee_per_gas_wei: Option<String>,
    #[serde(default)]
    pub max_priority_fee_per_gas_wei: Option<String>,
    #[serde(default)]
    pub max_value_wei: Option<String>,
}

fn config_amount(field: &str, s: &str) -> ColdsignResult<WeiAmount> {
    parse_wei(s).map_err(|e| ColdsignError::config(format!("{}: {}", field, e)))
}

fn intent_amount(field: &'static str, s: &str) -> Result<WeiAmount, PolicyViolation> {
    parse_wei(s).map_err(|e| PolicyViolation::Malformed {
        field,
        reason: e.to_string(),
    })
}
