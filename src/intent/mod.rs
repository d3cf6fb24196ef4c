//! Transaction Intents
//!
//! Untrusted transfer requests: transport envelope, typed schema, and the
//! strict validation every intent passes before policy sees it.
//!
//! ```rust,ignore
//! use coldsign::intent;
//!
//! let json = intent::decode_envelope(scanned)?;
//! let intent = intent::parse_intent(&json)?;
//! ```

pub mod address;
pub mod amount;
pub mod envelope;
pub mod types;
pub mod validation;

pub use address::*;
pub use amount::*;
pub use envelope::*;
pub use types::*;
pub use validation::*;
