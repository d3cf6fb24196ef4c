//! Transaction Module
//!
//! Handles transaction building, signing, and offline decoding of signed
//! output. Broadcasting is deliberately absent: signed bytes leave the
//! machine by other means.

mod builder;
mod decoder;
mod signer;

pub use builder::*;
pub use decoder::*;
pub use signer::*;
