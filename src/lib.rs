//! Coldsign Core Library
//!
//! Offline signer for native-currency transfers on EVM chains. An untrusted
//! transaction *intent* is checked against a strict schema and an operator
//! policy, confirmed by the operator, then signed with a key re-derived
//! from a BIP39 mnemonic typed at the controlling terminal.
//!
//! # Architecture
//!
//! This crate provides:
//! - **intent**: Transport envelope, intent schema and validation
//! - **policy**: Chain, fee and value ceilings
//! - **security**: Confirmation gate and secret containers
//! - **wallet**: BIP32/39/44 key derivation
//! - **tx**: EIP-1559 building, signing and offline decoding
//! - **pipeline**: The ordered signing run tying these together
//!
//! # Security
//!
//! This crate uses `zeroize` and `secrecy` to clear mnemonics, passphrases,
//! seeds and private keys when they go out of scope, on error paths too.
//! Nothing here touches the network.
//!
//! # Example
//!
//! ```rust,ignore
//! use coldsign::{pipeline, Policy, SignRequest, TtyTerminal};
//!
//! let request = SignRequest { input: &envelope, authorize: true, ..Default::default() };
//! let outcome = pipeline::run(&Policy::default(), &request, &mut TtyTerminal::new())?;
//! ```

pub mod error;
pub mod intent;
pub mod pipeline;
pub mod policy;
pub mod security;
pub mod tx;
pub mod utils;
pub mod wallet;

pub use error::{ColdsignError, ColdsignResult, ErrorCode};
pub use intent::{decode_envelope, encode_envelope, parse_intent, TransactionIntent, WeiAmount};
pub use pipeline::{ExitStatus, SignOutcome, SignRequest};
pub use policy::{Policy, PolicyConfig, PolicyViolation};
pub use tx::{decode_signed_transaction, SignedTransaction, UnsignedTransaction};
pub use utils::tty::{ScriptedTerminal, Terminal, TtyTerminal};
pub use wallet::{derive_address, derive_eth_key, DerivedKey};
