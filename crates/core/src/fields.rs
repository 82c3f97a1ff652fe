//! Canonical field names of the task submission endpoint.
//!
//! These are the exact, case-sensitive multipart part names the backend
//! expects. Validation messages and the submission encoder both derive
//! from these constants, so a rename here propagates everywhere.

pub const ORGANIZATION_NAME: &str = "organizationName";
pub const PRODUCT_NAME: &str = "productName";
pub const ADDITIONAL_INFO: &str = "additionalInfo";
pub const REMARKS: &str = "remarks";
pub const MACHINE_NAME: &str = "machineName";
pub const MACHINE_MANUFACTURER: &str = "machineManufacturer";
pub const MACHINE_SERIAL_NUMBER: &str = "machineSerialNumber";
pub const MACHINE_MODEL: &str = "machineModel";
pub const CONTACT_PERSON_NAME: &str = "contactPersonName";
pub const CONTACT_PERSON_MOBILE_NUMBER: &str = "contactPersonMobileNumber";
pub const COMPANY_ADDRESS: &str = "companyAddress";
pub const TICKET_NUMBER: &str = "ticketNumber";
pub const CUSTOMER_DETAILS: &str = "customerDetails";
pub const JOB_STARTED_DATE_TIME: &str = "jobStartedDateTime";
pub const JOB_CLOSED_DATE_TIME: &str = "jobClosedDateTime";

/// Part name used for every captured image in the multipart payload.
/// The backend accepts it repeated, once per frame.
pub const IMAGES: &str = "images";

/// Number of text parts in a submission payload.
pub const TEXT_FIELD_COUNT: usize = 15;
