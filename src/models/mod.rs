//! Domain snapshots sent as webhook bodies.
//!
//! Field names follow the frontend's camelCase JSON. Identifiers arrive
//! as strings or integers depending on the backend table, so both are
//! accepted and normalised to `String`.

pub mod appointment;
pub mod enums;
pub mod party;
pub mod receivable;

pub use appointment::Appointment;
pub use enums::{ReceivableStatus, SchedulingStatus, REQUESTED_STATUS};
pub use party::{Company, Patient};
pub use receivable::{Receivable, ReceivablePaymentRequest};

use serde::{Deserialize, Deserializer};

/// Accept `"42"` or `42` for an identifier.
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(s) if !s.trim().is_empty() => Ok(s),
        RawId::Text(_) => Err(serde::de::Error::custom("identifier must not be empty")),
        RawId::Number(n) => Ok(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "flexible_id")]
        id: String,
    }

    #[test]
    fn accepts_string_and_number_ids() {
        let a: Holder = serde_json::from_str(r#"{"id":"ag-1"}"#).unwrap();
        assert_eq!(a.id, "ag-1");
        let b: Holder = serde_json::from_str(r#"{"id":17}"#).unwrap();
        assert_eq!(b.id, "17");
    }

    #[test]
    fn rejects_blank_id() {
        assert!(serde_json::from_str::<Holder>(r#"{"id":"  "}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"id":null}"#).is_err());
    }
}
