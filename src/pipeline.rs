//! Signing Pipeline
//!
//! Envelope → intent validation → review → policy → expected sender →
//! confirmation gate → secrets → derivation → address check → build → sign.
//!
//! Nothing asks for a secret until validation, policy and the operator's
//! confirmation have all passed. Secrets are dropped (and wiped) before
//! this module returns, whichever way it returns.

use ethers_core::types::Address;
use secrecy::ExposeSecret;

use crate::error::{ColdsignError, ColdsignResult};
use crate::intent::{checksummed, decode_envelope, parse_intent, parse_nonzero_address, TransactionIntent};
use crate::policy::Policy;
use crate::security::{Confirmation, ConfirmationGate};
use crate::tx::{build_unsigned_transfer, sign_transaction, SignedTransaction};
use crate::utils::format::{format_eth, format_eth6, format_gwei, separator, worst_case_fee};
use crate::utils::tty::Terminal;
use crate::wallet::{derive_eth_key, DerivedKey};
use crate::{log_debug, log_info, log_warn};

pub const MNEMONIC_PROMPT: &str = "ENTER MNEMONIC (space-separated BIP-39 words; hidden)";
pub const PASSPHRASE_PROMPT: &str = "ENTER PASSPHRASE (optional; hidden)";

/// Process exit statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Failure = 1,
    /// Usage error, or reviewed without `--sign`
    NotSigned = 2,
    /// Operator did not confirm
    Canceled = 3,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// How a run ended, when it did not fail
#[derive(Debug)]
pub enum SignOutcome {
    Signed(SignedTransaction),
    /// Reviewed and policy-checked, but signing was not authorized.
    ReviewOnly,
    /// The confirmation gate was not passed.
    Canceled,
}

impl SignOutcome {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            SignOutcome::Signed(_) => ExitStatus::Success,
            SignOutcome::ReviewOnly => ExitStatus::NotSigned,
            SignOutcome::Canceled => ExitStatus::Canceled,
        }
    }
}

/// One signing run
#[derive(Debug, Clone, Default)]
pub struct SignRequest<'a> {
    /// Raw JSON or a `coldintent:v1:` envelope
    pub input: &'a str,
    /// Without this the run stops after review and policy.
    pub authorize: bool,
    /// Skip the confirmation gate.
    pub skip_confirmation: bool,
    /// Out-of-band expected sender, compared with the intent's `fromAddress`.
    pub expected_sender: Option<&'a str>,
}

/// Run the pipeline for one intent.
pub fn run(
    policy: &Policy,
    request: &SignRequest<'_>,
    terminal: &mut dyn Terminal,
) -> ColdsignResult<SignOutcome> {
    let bytes = decode_envelope(request.input)?;
    let intent = parse_intent(&bytes)?;
    log_info!(
        "pipeline",
        "Intent validated",
        chain_id = intent.chain_id,
        nonce = intent.nonce,
        destination = intent.to
    );

    show_review(&intent, request.expected_sender, terminal)?;

    if let Err(violation) = policy.enforce(&intent) {
        log_warn!("pipeline", "Policy rejected intent", reason = violation);
        return Err(violation.into());
    }
    terminal.show("Policy check: OK")?;

    if !request.authorize {
        terminal.show("NOT SIGNED: pass --sign to authorize signing")?;
        return Ok(SignOutcome::ReviewOnly);
    }

    let expected = resolve_expected_sender(&intent, request.expected_sender)?;

    if request.skip_confirmation {
        log_warn!("pipeline", "Confirmation gate skipped");
    } else {
        let gate = ConfirmationGate::for_destination(&intent.to_address()?);
        if gate.confirm(terminal)? == Confirmation::Rejected {
            terminal.show("Canceled.")?;
            log_info!("pipeline", "Canceled at confirmation gate");
            return Ok(SignOutcome::Canceled);
        }
    }

    let key = read_secrets_and_derive(intent.account_index(), terminal)?;

    if key.address() != expected {
        return Err(ColdsignError::address_mismatch(format!(
            "derived address {} for index {} does not match expected sender {}",
            key.checksum_address(),
            key.index(),
            checksummed(&expected)
        )));
    }
    terminal.show(&format!("From address verified: {}", key.checksum_address()))?;

    let unsigned = build_unsigned_transfer(&intent)?;
    let signed = sign_transaction(&unsigned, intent.chain_id, &key)?;
    log_info!("pipeline", "Transaction signed", tx_hash = signed.hash_hex());

    Ok(SignOutcome::Signed(signed))
}

/// The sender the derived key must match: the intent's `fromAddress`, the
/// operator's out-of-band address, or both when they agree.
pub fn resolve_expected_sender(
    intent: &TransactionIntent,
    out_of_band: Option<&str>,
) -> ColdsignResult<Address> {
    let claimed = intent.claimed_sender()?;
    let operator = out_of_band
        .map(|s| parse_nonzero_address("--expect-from", s.trim()))
        .transpose()?;

    match (claimed, operator) {
        (Some(a), Some(b)) if a != b => Err(ColdsignError::address_mismatch(format!(
            "intent fromAddress {} differs from --expect-from {}",
            checksummed(&a),
            checksummed(&b)
        ))),
        (Some(a), _) | (None, Some(a)) => Ok(a),
        (None, None) => Err(ColdsignError::missing_sender(
            "no expected sender: set fromAddress in the intent or pass --expect-from",
        )),
    }
}

/// Prompt for mnemonic and passphrase and derive the key for `index`.
/// Both secrets are wiped when this returns.
pub fn read_secrets_and_derive(
    index: u32,
    terminal: &mut dyn Terminal,
) -> ColdsignResult<DerivedKey> {
    let mnemonic = terminal.read_secret(MNEMONIC_PROMPT, false)?;
    let passphrase = terminal.read_secret(PASSPHRASE_PROMPT, true)?;
    log_debug!(
        "pipeline",
        "Secrets read",
        word_count = mnemonic.expose_secret().split(' ').count(),
        index = index
    );

    derive_eth_key(mnemonic.expose_secret(), passphrase.expose_secret(), index)
}

fn show_review(
    intent: &TransactionIntent,
    out_of_band: Option<&str>,
    terminal: &mut dyn Terminal,
) -> ColdsignResult<()> {
    let value = intent.value()?;
    let fee_cap = intent.max_fee_per_gas()?;
    let tip = intent.max_priority_fee_per_gas()?;

    let from = match (intent.from_address.as_deref(), out_of_band) {
        (Some(addr), _) | (None, Some(addr)) => addr.to_string(),
        (None, None) => "<not given>".to_string(),
    };
    let worst = match worst_case_fee(&fee_cap) {
        Some(fee) => format!("~{} ETH worst-case", format_eth6(&fee)),
        None => "out of range".to_string(),
    };

    terminal.show("")?;
    terminal.show(&separator("SIGNING REVIEW (ETH_SEND)"))?;
    terminal.show(&format!("Chain:   {}", intent.chain_id))?;
    terminal.show(&format!("From:    {} (index {})", from, intent.account_index()))?;
    terminal.show(&format!("To:      {}", checksummed(&intent.to_address()?)))?;
    terminal.show(&format!("Nonce:   {}", intent.nonce))?;
    terminal.show(&format!("Amount:  {} ETH  ({} wei)", format_eth(&value), value))?;
    terminal.show(&format!(
        "Fees:    max={} gwei, tip={} gwei",
        format_gwei(&fee_cap),
        format_gwei(&tip)
    ))?;
    terminal.show(&format!("Fee cap: {}", worst))?;
    terminal.show(&separator(""))?;
    Ok(())
}
