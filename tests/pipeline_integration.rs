//! Pipeline Integration Tests
//!
//! End-to-end signing runs through a scripted terminal:
//! - Envelope and raw JSON transport
//! - Policy rejection before any prompt
//! - Confirmation gate normalization
//! - Sender mismatch before build
//! - Decode of the signed output

use coldsign::intent::encode_envelope;
use coldsign::pipeline::{self, ExitStatus, SignOutcome, SignRequest};
use coldsign::security::ConfirmationGate;
use coldsign::tx::decode_signed_transaction;
use coldsign::{ErrorCode, Policy, PolicyConfig, ScriptedTerminal};

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const ABANDON_ADDR: &str = "0x9858EfFD232B4033E47d90003D41EC34EcaEda94";
const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

// MARK: - Helpers

fn intent(chain_id: u64, max_fee: &str, from_address: Option<&str>) -> String {
    let mut v = serde_json::json!({
        "version": 1,
        "kind": "ETH_SEND",
        "chainId": chain_id,
        "from": { "type": "bip44_index", "index": 0 },
        "to": VITALIK,
        "valueWei": "1000000000000000000",
        "nonce": 0,
        "maxFeePerGasWei": max_fee,
        "maxPriorityFeePerGasWei": "1000000000"
    });
    if let Some(addr) = from_address {
        v["fromAddress"] = serde_json::json!(addr);
    }
    v.to_string()
}

fn signing(input: &str) -> SignRequest<'_> {
    SignRequest {
        input,
        authorize: true,
        ..Default::default()
    }
}

// MARK: - Scenarios

#[test]
fn scenario_a_envelope_signs() {
    let envelope = encode_envelope(intent(1, "20000000000", Some(ABANDON_ADDR)).as_bytes());
    let quoted = format!("\"{}\"\n", envelope);

    let mut term = ScriptedTerminal::new(["d8da 6045", ABANDON, ""]);
    let outcome = pipeline::run(&Policy::default(), &signing(&quoted), &mut term).unwrap();
    assert_eq!(outcome.exit_status(), ExitStatus::Success);

    let signed = match outcome {
        SignOutcome::Signed(signed) => signed,
        other => panic!("expected a signature, got {:?}", other),
    };
    assert_eq!(signed.from_checksummed(), ABANDON_ADDR);

    let decoded = decode_signed_transaction(&signed.raw).unwrap();
    assert!(decoded.roundtrip_equal);
    assert!(decoded.quick_checks().all_pass());
    assert_eq!(decoded.hash, signed.hash);
    assert_eq!(decoded.from, signed.from);
}

#[test]
fn scenario_b_fee_cap_rejected_before_prompts() {
    let json = intent(1, "300000000000", Some(ABANDON_ADDR));
    let mut term = ScriptedTerminal::new(["d8da 6045", ABANDON, ""]);

    let err = pipeline::run(&Policy::default(), &signing(&json), &mut term).unwrap_err();
    assert_eq!(err.code, ErrorCode::PolicyViolation);
    assert!(err.message.contains("maxFeePerGas"));
    assert!(term.prompts.is_empty());
}

#[test]
fn scenario_c_confirmation_normalized() {
    let gate = ConfirmationGate::with_code(VITALIK, "ab12");
    assert!(gate.matches("AB 12"));

    let json = intent(1, "20000000000", Some(ABANDON_ADDR));
    let mut term = ScriptedTerminal::new(["  D8DA6045 ", ABANDON, ""]);
    let outcome = pipeline::run(&Policy::default(), &signing(&json), &mut term).unwrap();
    assert!(matches!(outcome, SignOutcome::Signed(_)));
}

#[test]
fn scenario_d_sender_mismatch() {
    let json = intent(1, "20000000000", Some(VITALIK));
    let mut term = ScriptedTerminal::new(["d8da 6045", ABANDON, ""]);

    let err = pipeline::run(&Policy::default(), &signing(&json), &mut term).unwrap_err();
    assert_eq!(err.code, ErrorCode::AddressMismatch);
    assert!(err.message.contains(ABANDON_ADDR));
    assert!(!err.message.contains("abandon "));
    assert_eq!(term.remaining(), 0);
}

// MARK: - Policy and sender sources

#[test]
fn non_mainnet_rejected_by_default() {
    let json = intent(11155111, "20000000000", Some(ABANDON_ADDR));
    let mut term = ScriptedTerminal::new(Vec::<String>::new());
    let err = pipeline::run(&Policy::default(), &signing(&json), &mut term).unwrap_err();
    assert_eq!(err.code, ErrorCode::PolicyViolation);
    assert_eq!(err.details.as_deref(), Some("chain"));
}

#[test]
fn configured_policy_allows_testnet() {
    let config = PolicyConfig {
        allowed_chain_ids: Some(vec![11155111]),
        ..Default::default()
    };
    let policy = Policy::from_config(config).unwrap();
    let json = intent(11155111, "20000000000", None);

    let request = SignRequest {
        input: &json,
        authorize: true,
        skip_confirmation: true,
        expected_sender: Some(ABANDON_ADDR),
    };
    let mut term = ScriptedTerminal::new([ABANDON, ""]);
    let outcome = pipeline::run(&policy, &request, &mut term).unwrap();

    match outcome {
        SignOutcome::Signed(signed) => {
            let decoded = decode_signed_transaction(&signed.raw).unwrap();
            assert_eq!(decoded.chain_id, 11155111);
        }
        other => panic!("expected a signature, got {:?}", other),
    }
}

#[test]
fn passphrase_changes_sender() {
    let json = intent(1, "20000000000", Some(ABANDON_ADDR));
    let request = SignRequest {
        input: &json,
        authorize: true,
        skip_confirmation: true,
        ..Default::default()
    };
    let mut term = ScriptedTerminal::new([ABANDON, "trezor"]);
    let err = pipeline::run(&Policy::default(), &request, &mut term).unwrap_err();
    assert_eq!(err.code, ErrorCode::AddressMismatch);
}

#[test]
fn messy_mnemonic_input_still_derives() {
    let json = intent(1, "20000000000", Some(ABANDON_ADDR));
    let request = SignRequest {
        input: &json,
        authorize: true,
        skip_confirmation: true,
        ..Default::default()
    };
    let messy = format!("  {}  ", ABANDON.to_uppercase().replace(' ', " \t "));
    let mut term = ScriptedTerminal::new([messy.as_str(), "   "]);
    let outcome = pipeline::run(&Policy::default(), &request, &mut term).unwrap();
    assert!(matches!(outcome, SignOutcome::Signed(_)));
}

#[test]
fn invalid_mnemonic_fails_closed() {
    let json = intent(1, "20000000000", Some(ABANDON_ADDR));
    let request = SignRequest {
        input: &json,
        authorize: true,
        skip_confirmation: true,
        ..Default::default()
    };
    let mut term = ScriptedTerminal::new(["abandon abandon abandon", ""]);
    let err = pipeline::run(&Policy::default(), &request, &mut term).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidMnemonic);
    assert!(!err.to_string().contains("abandon abandon"));
}
