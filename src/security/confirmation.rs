//! Confirmation Gate
//!
//! Human-in-the-loop check before any key material is requested. The
//! operator retypes a fragment of the destination address on the
//! controlling terminal. A wrong answer cancels the run; it is not an error.

use ethers_core::types::Address;

use crate::error::ColdsignResult;
use crate::utils::crypto::to_checksum_address;
use crate::utils::format::separator;
use crate::utils::tty::Terminal;

use super::secure_memory::secure_compare;

/// Hex chars taken from each end of the destination
const FRAGMENT_LEN: usize = 4;

/// Operator's answer at the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Rejected,
}

/// Confirmation code bound to one destination address
#[derive(Debug, Clone)]
pub struct ConfirmationGate {
    destination: String,
    code: String,
}

impl ConfirmationGate {
    /// Code is the first and last four hex chars of the destination,
    /// lowercased: `0xAb12...Cd34` gives `"ab12 cd34"`.
    pub fn for_destination(to: &Address) -> Self {
        let destination = to_checksum_address(to.as_bytes());
        let body = destination[2..].to_ascii_lowercase();
        let code = format!(
            "{} {}",
            &body[..FRAGMENT_LEN],
            &body[body.len() - FRAGMENT_LEN..]
        );
        Self { destination, code }
    }

    /// Build a gate around an explicit code.
    pub fn with_code(destination: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            code: code.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Case-folded, whitespace-insensitive comparison against the code.
    pub fn matches(&self, response: &str) -> bool {
        let expected = normalize_response(&self.code);
        let got = normalize_response(response);
        secure_compare(expected.as_bytes(), got.as_bytes())
    }

    /// Show the code once and read the answer from `terminal`.
    pub fn confirm(&self, terminal: &mut dyn Terminal) -> ColdsignResult<Confirmation> {
        terminal.show("")?;
        terminal.show(&separator("CONFIRM SIGNING"))?;
        terminal.show("Destination address:")?;
        terminal.show(&self.destination)?;
        terminal.show("")?;
        terminal.show("Re-type the destination address fragment exactly as shown:")?;
        terminal.show(&self.code)?;

        let response = terminal.read_line("> ")?;
        if self.matches(&response) {
            Ok(Confirmation::Confirmed)
        } else {
            Ok(Confirmation::Rejected)
        }
    }
}

fn normalize_response(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
