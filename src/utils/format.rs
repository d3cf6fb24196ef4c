//! Wei formatting for the operator review screen.

use ethers_core::types::U256;

use crate::intent::WeiAmount;

/// Gas used by a plain value transfer; the worst-case fee is this times the fee-cap.
pub const TRANSFER_GAS: u64 = 21_000;

/// Formats `wei / 10^exp` with `decimals` fractional digits, rounding half up.
///
/// Values too large for the intermediate 256-bit product fall back to the
/// raw wei digits with a `wei` suffix.
pub fn format_units(wei: &WeiAmount, exp: usize, decimals: usize) -> String {
    match scaled_units(wei, exp, decimals) {
        Some(s) => s,
        None => format!("{} wei", wei),
    }
}

fn scaled_units(wei: &WeiAmount, exp: usize, decimals: usize) -> Option<String> {
    let value = wei.to_u256().ok()?;
    let scaled = value.checked_mul(U256::exp10(decimals))?;
    let divisor = U256::exp10(exp);
    let mut quotient = scaled / divisor;
    let remainder = scaled % divisor;
    if remainder.checked_mul(U256::from(2))? >= divisor {
        quotient = quotient.checked_add(U256::one())?;
    }

    let digits = quotient.to_string();
    if decimals == 0 {
        return Some(digits);
    }
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    Some(format!("{}.{}", int_part, frac_part))
}

/// ETH with full 18-digit precision
pub fn format_eth(wei: &WeiAmount) -> String {
    format_units(wei, 18, 18)
}

/// ETH rounded to 6 digits, for fee summaries
pub fn format_eth6(wei: &WeiAmount) -> String {
    format_units(wei, 18, 6)
}

/// Gwei rounded to 2 digits
pub fn format_gwei(wei: &WeiAmount) -> String {
    format_units(wei, 9, 2)
}

/// Worst-case fee of a plain transfer: 21000 gas at the full fee-cap.
pub fn worst_case_fee(max_fee_per_gas: &WeiAmount) -> Option<WeiAmount> {
    let fee_cap = max_fee_per_gas.to_u256().ok()?;
    let total = fee_cap.checked_mul(U256::from(TRANSFER_GAS))?;
    total.to_string().parse().ok()
}

/// Separator line of `=` with optional centered text, 51 columns wide.
pub fn separator(text: &str) -> String {
    const WIDTH: usize = 51;
    if text.is_empty() {
        return "=".repeat(WIDTH);
    }

    let text_len = text.chars().count();
    if text_len + 2 > WIDTH {
        return format!("= {} =", text);
    }
    let padding = WIDTH - text_len - 2;
    let left = padding / 2;
    format!("{} {} {}", "=".repeat(left), text, "=".repeat(padding - left))
}
