//! Signed transaction decoder
//!
//! Offline inspection of a signed raw transaction: field dump, sender
//! recovery and the checks a plain transfer must pass. Used to verify what
//! the signer produced before the bytes leave the machine.

use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, U256};
use ethers_core::utils::rlp;

use crate::error::{ColdsignError, ColdsignResult, ErrorCode};
use crate::utils::crypto::{keccak256, to_checksum_address};
use crate::utils::format::TRANSFER_GAS;

/// Decoded view of a signed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub tx_type: u8,
    pub hash: [u8; 32],
    pub chain_id: u64,
    pub from: Address,
    /// `None` for contract creation
    pub to: Option<Address>,
    pub nonce: U256,
    pub value: U256,
    pub gas_limit: U256,
    /// Type 2 only
    pub max_fee_per_gas: Option<U256>,
    /// Type 2 only
    pub max_priority_fee_per_gas: Option<U256>,
    /// Legacy and type 1 only
    pub gas_price: Option<U256>,
    pub data: Vec<u8>,
    /// Re-encoding the decoded transaction gives back the input bytes.
    pub roundtrip_equal: bool,
}

/// Checks a plain native transfer must pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickChecks {
    pub is_type2: bool,
    pub gas_is_transfer: bool,
    pub data_empty: bool,
    /// `None` when there is no recipient at all
    pub to_nonzero: Option<bool>,
    pub roundtrip_equal: bool,
}

impl QuickChecks {
    pub fn all_pass(&self) -> bool {
        self.is_type2
            && self.gas_is_transfer
            && self.data_empty
            && self.to_nonzero == Some(true)
            && self.roundtrip_equal
    }
}

impl DecodedTransaction {
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }

    pub fn quick_checks(&self) -> QuickChecks {
        QuickChecks {
            is_type2: self.tx_type == 2,
            gas_is_transfer: self.gas_limit == U256::from(TRANSFER_GAS),
            data_empty: self.data.is_empty(),
            to_nonzero: self.to.map(|to| !to.is_zero()),
            roundtrip_equal: self.roundtrip_equal,
        }
    }

    /// Human-readable dump, one `Key: value` per line.
    pub fn render(&self) -> String {
        let mut lines = vec![
            "---- DECODED TX ----".to_string(),
            format!("Type: {}", self.tx_type),
            format!("Hash: {}", self.hash_hex()),
            format!("ChainID: {}", self.chain_id),
            format!("From: {}", to_checksum_address(self.from.as_bytes())),
        ];
        match self.to {
            Some(to) => lines.push(format!("To: {}", to_checksum_address(to.as_bytes()))),
            None => lines.push("To: <contract creation>".to_string()),
        }
        lines.push(format!("Nonce: {}", self.nonce));
        lines.push(format!("ValueWei: {}", self.value));
        lines.push(format!("GasLimit: {}", self.gas_limit));
        if let (Some(fee_cap), Some(tip)) = (self.max_fee_per_gas, self.max_priority_fee_per_gas) {
            lines.push(format!("MaxFeePerGasWei: {}", fee_cap));
            lines.push(format!("MaxPriorityFeePerGasWei: {}", tip));
        }
        if let Some(price) = self.gas_price {
            lines.push(format!("GasPriceWei: {}", price));
        }
        lines.push(format!("DataLen: {}", self.data.len()));
        if !self.data.is_empty() {
            let n = self.data.len().min(32);
            lines.push(format!("DataPrefix: 0x{}", hex::encode(&self.data[..n])));
        }

        let checks = self.quick_checks();
        lines.push("---- QUICK CHECKS ----".to_string());
        lines.push(format!("Type == 2: {}", checks.is_type2));
        lines.push(format!("Gas == {}: {}", TRANSFER_GAS, checks.gas_is_transfer));
        lines.push(format!("Data empty: {}", checks.data_empty));
        if let Some(nonzero) = checks.to_nonzero {
            lines.push(format!("To != 0x0: {}", nonzero));
        }
        lines.push(format!("Roundtrip equal: {}", checks.roundtrip_equal));
        lines.join("\n")
    }
}

/// Parse `0x`-prefixed (or bare) hex, tolerating surrounding whitespace
/// and one pair of JSON quotes.
pub fn parse_raw_hex(input: &str) -> ColdsignResult<Vec<u8>> {
    let s = input.trim();
    let s = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
        .trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if s.is_empty() {
        return Err(ColdsignError::parse_error("empty raw transaction"));
    }
    Ok(hex::decode(s)?)
}

/// Decode signed raw bytes and recover the sender.
pub fn decode_signed_transaction(raw: &[u8]) -> ColdsignResult<DecodedTransaction> {
    let first = *raw
        .first()
        .ok_or_else(|| invalid("empty raw transaction"))?;
    // Typed envelopes start with a type byte below 0x7f; legacy ones with an RLP list header.
    let tx_type = if first <= 0x7f { first } else { 0 };

    let (typed, signature) = TypedTransaction::decode_signed(&rlp::Rlp::new(raw))
        .map_err(|e| invalid(format!("tx decode: {}", e)))?;

    let from = signature
        .recover(typed.sighash())
        .map_err(|e| invalid(format!("recover sender: {}", e)))?;

    let reencoded = typed.rlp_signed(&signature);
    let roundtrip_equal = reencoded.to_vec() == raw;

    let (max_fee_per_gas, max_priority_fee_per_gas, gas_price) = match typed {
        TypedTransaction::Eip1559(ref req) => (req.max_fee_per_gas, req.max_priority_fee_per_gas, None),
        TypedTransaction::Eip2930(ref req) => (None, None, req.tx.gas_price),
        TypedTransaction::Legacy(ref req) => (None, None, req.gas_price),
        #[allow(unreachable_patterns)]
        _ => (None, None, None),
    };

    Ok(DecodedTransaction {
        tx_type,
        hash: keccak256(raw),
        chain_id: typed.chain_id().map(|c| c.as_u64()).unwrap_or_default(),
        from,
        to: typed.to_addr().copied(),
        nonce: typed.nonce().copied().unwrap_or_default(),
        value: typed.value().copied().unwrap_or_default(),
        gas_limit: typed.gas().copied().unwrap_or_default(),
        max_fee_per_gas,
        max_priority_fee_per_gas,
        gas_price,
        data: typed.data().map(|d| d.to_vec()).unwrap_or_default(),
        roundtrip_equal,
    })
}

fn invalid(msg: impl Into<String>) -> ColdsignError {
    ColdsignError::new(ErrorCode::InvalidTransaction, msg)
}
