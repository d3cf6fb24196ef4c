//! Security Module
//!
//! Controls that stand between a validated intent and the key:
//! - Secure memory for mnemonics, passphrases and comparisons
//! - The confirmation gate the operator must pass before secrets are read

pub mod confirmation;
pub mod secure_memory;

pub use confirmation::*;
pub use secure_memory::*;
