//! Attempt-counter reset for serialized job payloads.
//!
//! Some queue drivers (Redis-style) keep the attempt counter inside the
//! payload itself. Before a failed job is pushed back it must look fresh,
//! so [`reset_attempts`] zeroes that counter and leaves everything else alone.

use serde_json::Value;
use thiserror::Error;

/// The stored payload could not be decoded as JSON.
#[derive(Debug, Error)]
#[error("malformed job payload: {0}")]
pub struct PayloadDecodeError(#[from] serde_json::Error);

/// Name of the attempt counter embedded in queue payloads.
const ATTEMPTS_FIELD: &str = "attempts";

/// Returns `payload` with its `attempts` field set to `0`.
///
/// Payloads without a (non-null) `attempts` field, and payloads that are
/// valid JSON but not objects, come back unchanged byte for byte. Field
/// order of objects is preserved on re-encoding.
pub fn reset_attempts(payload: &str) -> Result<String, PayloadDecodeError> {
    let mut doc: Value = serde_json::from_str(payload)?;

    let Some(attempts) = doc.as_object_mut().and_then(|m| m.get_mut(ATTEMPTS_FIELD)) else {
        return Ok(payload.to_string());
    };
    if attempts.is_null() {
        return Ok(payload.to_string());
    }
    *attempts = Value::from(0);

    Ok(serde_json::to_string(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn attempts_is_zeroed() {
        let out = reset_attempts(r#"{"job":"SendEmail","attempts":4}"#).unwrap();
        assert_eq!(parse(&out)["attempts"], 0);
        assert_eq!(parse(&out)["job"], "SendEmail");
    }

    #[test]
    fn other_fields_survive_in_order() {
        let input = r#"{"uuid":"a1","displayName":"App\\Jobs\\Ship","attempts":"7","data":{"command":"O:8:...","x":[1,2.5,null]},"extra":true}"#;
        let out = reset_attempts(input).unwrap();
        assert_eq!(
            out,
            r#"{"uuid":"a1","displayName":"App\\Jobs\\Ship","attempts":0,"data":{"command":"O:8:...","x":[1,2.5,null]},"extra":true}"#
        );
    }

    #[test]
    fn payload_without_attempts_is_untouched() {
        let input = r#"{ "job": "Ship",  "maxTries": 3 }"#;
        assert_eq!(reset_attempts(input).unwrap(), input);
    }

    #[test]
    fn null_attempts_is_left_alone() {
        let input = r#"{"attempts":null,"job":"Ship"}"#;
        assert_eq!(reset_attempts(input).unwrap(), input);
    }

    #[test]
    fn nested_attempts_is_not_reset() {
        let input = r#"{"data":{"attempts":3}}"#;
        assert_eq!(reset_attempts(input).unwrap(), input);
    }

    #[test]
    fn non_object_json_passes_through() {
        assert_eq!(reset_attempts("[1,2,3]").unwrap(), "[1,2,3]");
        assert_eq!(reset_attempts(r#""plain""#).unwrap(), r#""plain""#);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let err = reset_attempts("{not json").unwrap_err();
        assert!(err.to_string().starts_with("malformed job payload"));
    }
}
