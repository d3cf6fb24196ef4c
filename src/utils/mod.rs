//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod crypto;
pub mod format;
pub mod logging;
pub mod tty;

pub use crypto::*;
