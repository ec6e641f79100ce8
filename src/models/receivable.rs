use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::appointment::Appointment;
use super::enums::{ReceivableStatus, REQUESTED_STATUS};
use super::flexible_id;
use super::party::{Company, Patient};
use crate::dispatch::Dispatchable;

/// Account receivable ("conta a receber").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: ReceivableStatus,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payment request body: the receivable plus everything the payment
/// provider needs to bill it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivablePaymentRequest {
    pub receivable: Receivable,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    pub patient: Patient,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    /// Provider-specific keys (installments, billing type, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Dispatchable for ReceivablePaymentRequest {
    fn entity_id(&self) -> String {
        self.receivable.id.clone()
    }

    fn display_name(&self) -> String {
        self.patient.name.clone()
    }

    fn is_already_requested(&self) -> bool {
        self.receivable.status.as_str() == REQUESTED_STATUS
    }
}
