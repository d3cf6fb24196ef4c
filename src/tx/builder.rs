//! Transaction Builder
//!
//! Turns a validated intent into an unsigned EIP-1559 transfer. Every
//! numeric field is parsed again here; nothing is looked up on a network.

use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, Eip1559TransactionRequest, U256};

use crate::error::{ColdsignError, ColdsignResult};
use crate::intent::{parse_nonzero_address, parse_wei, TransactionIntent};
use crate::utils::format::TRANSFER_GAS;

/// Unsigned type-2 native transfer: fixed gas, empty data, empty access list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

impl UnsignedTransaction {
    /// The `ethers_core` form that gets hashed and signed.
    pub fn to_typed(&self) -> TypedTransaction {
        let request = Eip1559TransactionRequest::new()
            .to(self.to)
            .value(self.value)
            .gas(self.gas_limit)
            .max_fee_per_gas(self.max_fee_per_gas)
            .max_priority_fee_per_gas(self.max_priority_fee_per_gas)
            .nonce(self.nonce)
            .chain_id(self.chain_id)
            .data(Bytes::default());

        TypedTransaction::Eip1559(request)
    }
}

/// Build the unsigned transfer for `intent`.
pub fn build_unsigned_transfer(intent: &TransactionIntent) -> ColdsignResult<UnsignedTransaction> {
    let to = parse_nonzero_address("to", &intent.to)?;

    Ok(UnsignedTransaction {
        chain_id: intent.chain_id,
        nonce: intent.nonce,
        to,
        value: word("valueWei", &intent.value_wei)?,
        gas_limit: TRANSFER_GAS,
        max_fee_per_gas: word("maxFeePerGasWei", &intent.max_fee_per_gas_wei)?,
        max_priority_fee_per_gas: word(
            "maxPriorityFeePerGasWei",
            &intent.max_priority_fee_per_gas_wei,
        )?,
    })
}

fn word(field: &str, s: &str) -> ColdsignResult<U256> {
    let amount = parse_wei(s).map_err(|e| ColdsignError::invalid_amount(field, e))?;
    amount
        .to_u256()
        .map_err(|e| ColdsignError::build_failed(format!("{}: {}", field, e)))
}
