mod derivation;
mod mnemonic;

pub use derivation::*;
pub use mnemonic::*;
