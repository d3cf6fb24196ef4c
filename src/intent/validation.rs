//! Intent Validation
//!
//! Parsing is staged so that the version and kind tags are matched before
//! any other field is read, and the sender reference tag before the typed
//! structure is built. Any failure names the field; no partial intent is
//! ever returned.

use serde_json::{Map, Value};

use crate::error::{ColdsignError, ColdsignResult, ErrorCode};

use super::types::{TransactionIntent, FROM_TYPE_BIP44_INDEX, INTENT_VERSION, KIND_ETH_SEND};

const FROM_FIELDS: [&str; 2] = ["type", "index"];

/// Parse canonical intent bytes into a validated `TransactionIntent`.
pub fn parse_intent(bytes: &[u8]) -> ColdsignResult<TransactionIntent> {
    let value: Value = serde_json::from_slice(bytes)?;
    let object = value
        .as_object()
        .ok_or_else(|| ColdsignError::invalid_field("intent", "expected a JSON object"))?;

    check_header(object)?;
    check_from_type(object)?;

    let intent: TransactionIntent = serde_json::from_value(value)
        .map_err(|e| ColdsignError::invalid_field("intent", e))?;
    intent.validate()?;
    Ok(intent)
}

fn check_header(object: &Map<String, Value>) -> ColdsignResult<()> {
    let version = match (object.get("version"), object.get("v")) {
        (Some(_), Some(_)) => {
            return Err(ColdsignError::invalid_field(
                "version",
                "both `version` and `v` present",
            ))
        }
        (Some(v), None) | (None, Some(v)) => v,
        (None, None) => return Err(ColdsignError::invalid_field("version", "missing")),
    };
    match version.as_u64() {
        Some(INTENT_VERSION) => {}
        Some(other) => {
            return Err(ColdsignError::new(
                ErrorCode::UnsupportedVersion,
                format!("unsupported intent version: {}", other),
            ))
        }
        None => {
            return Err(ColdsignError::new(
                ErrorCode::UnsupportedVersion,
                format!("unsupported intent version: {}", version),
            ))
        }
    }

    match object.get("kind").map(|k| k.as_str()) {
        Some(Some(KIND_ETH_SEND)) => Ok(()),
        Some(Some(other)) => Err(ColdsignError::new(
            ErrorCode::UnsupportedKind,
            format!("unsupported intent kind: {}", other),
        )),
        Some(None) => Err(ColdsignError::invalid_field("kind", "expected a string")),
        None => Err(ColdsignError::invalid_field("kind", "missing")),
    }
}

fn check_from_type(object: &Map<String, Value>) -> ColdsignResult<()> {
    let from = object
        .get("from")
        .ok_or_else(|| ColdsignError::invalid_field("from", "missing"))?;
    let tag = from
        .get("type")
        .ok_or_else(|| ColdsignError::invalid_field("from.type", "missing"))?;

    if tag.as_str() != Some(FROM_TYPE_BIP44_INDEX) {
        return Err(ColdsignError::new(
            ErrorCode::UnsupportedFromType,
            format!("unsupported from.type: {}", tag),
        ));
    }

    // A sender reference carries an index only, never key or address material.
    if let Some(extra) = from
        .as_object()
        .and_then(|fields| fields.keys().find(|k| !FROM_FIELDS.contains(&k.as_str())))
    {
        return Err(ColdsignError::invalid_field(
            "from",
            format!("unknown field `{}`", extra),
        ));
    }
    Ok(())
}
