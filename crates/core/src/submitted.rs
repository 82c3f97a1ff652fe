//! The server's view of a task, as returned by the listing endpoint.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// A task the backend has accepted and stored.
///
/// Read-only on the client: created server-side at submission time,
/// retrieved in bulk by the task query, never mutated here. Carries
/// every draft field plus the server-assigned identifier and creation
/// timestamp and the submitting technician's identifier.
///
/// String fields other than `_id` default to empty so a sparse row
/// (older schema, optional fields never filled) still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedTask {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Server-assigned creation timestamp; defines the listing order.
    pub created_at: Timestamp,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub machine_name: String,
    #[serde(default)]
    pub machine_manufacturer: String,
    #[serde(default)]
    pub machine_serial_number: String,
    #[serde(default)]
    pub machine_model: String,
    #[serde(default)]
    pub contact_person_name: String,
    #[serde(default)]
    pub contact_person_mobile_number: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    pub ticket_number: String,
    #[serde(default)]
    pub customer_details: String,
    #[serde(default)]
    pub job_started_date_time: String,
    #[serde(default)]
    pub job_closed_date_time: String,
    /// URLs of the uploaded images, in capture order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Identifier of the technician who submitted the task.
    #[serde(default)]
    pub service_man_qcid: String,
}
