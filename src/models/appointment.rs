use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{SchedulingStatus, REQUESTED_STATUS};
use super::flexible_id;
use super::party::Patient;
use crate::dispatch::Dispatchable;

/// Scheduling record ("agendamento") as shown on the scheduling page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub patient: Patient,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub status: SchedulingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fields this service does not interpret, forwarded to the webhook as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Dispatchable for Appointment {
    fn entity_id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        self.patient.name.clone()
    }

    fn is_already_requested(&self) -> bool {
        self.status.as_str() == REQUESTED_STATUS
    }
}
