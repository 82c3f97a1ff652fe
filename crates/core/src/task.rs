//! The in-progress task record: captured frames and form fields.
//!
//! [`TaskDraft`] is owned exclusively by the authoring session. It
//! accumulates text fields and up to [`MAX_IMAGES`] captured frames,
//! and reports everything blocking submission via
//! [`TaskDraft::validate`].

use std::fmt;

use crate::fields;

/// MIME type of every captured frame.
pub const IMAGE_JPEG: &str = "image/jpeg";

/// Upper bound on the number of frames attached to one draft.
pub const MAX_IMAGES: usize = 10;

/// One still frame captured from the device camera.
///
/// The payload is opaque JPEG bytes at the device's native resolution.
/// The ordinal is assigned by the owning [`ImageBuffer`] and kept
/// contiguous across removals; it doubles as the upload filename index
/// (`image{ordinal}.jpg`).
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Raw JPEG bytes.
    pub data: Vec<u8>,
    /// Always [`IMAGE_JPEG`]; carried so the payload layer never has to
    /// guess.
    pub mime_type: &'static str,
    /// Dense position within the buffer, starting at 0.
    pub ordinal: usize,
}

/// Ordered, capacity-bounded sequence of captured frames.
///
/// Order is significant -- it is both the display order and the upload
/// order, and no component downstream is allowed to reorder it.
#[derive(Debug, Clone, Default)]
pub struct ImageBuffer {
    frames: Vec<CapturedImage>,
}

impl ImageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether the buffer has reached [`MAX_IMAGES`].
    pub fn is_full(&self) -> bool {
        self.frames.len() >= MAX_IMAGES
    }

    /// Append a frame at the end of the sequence.
    ///
    /// Returns the assigned ordinal, or `None` (no side effect) when the
    /// buffer is already at capacity.
    pub fn append(&mut self, data: Vec<u8>) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let ordinal = self.frames.len();
        self.frames.push(CapturedImage {
            data,
            mime_type: IMAGE_JPEG,
            ordinal,
        });
        Some(ordinal)
    }

    /// Remove the frame at `index`, shifting later frames down and
    /// renumbering ordinals so they stay contiguous from 0.
    ///
    /// Silently does nothing when `index` is out of range.
    pub fn remove_at(&mut self, index: usize) {
        if index >= self.frames.len() {
            return;
        }
        self.frames.remove(index);
        for (i, frame) in self.frames.iter_mut().enumerate() {
            frame.ordinal = i;
        }
    }

    /// Empty the sequence. Used on draft reset.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// The frames in display/upload order.
    pub fn frames(&self) -> &[CapturedImage] {
        &self.frames
    }
}

/// A constraint blocking submission of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A required text field is empty. Carries the wire field name.
    MissingField(&'static str),
    /// The draft has no captured images.
    NoImages,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingField(name) => write!(f, "{name} is required"),
            Violation::NoImages => write!(f, "Please add at least one image"),
        }
    }
}

/// The mutable record under construction.
///
/// Destroyed on successful submission (replaced by a fresh empty draft
/// via [`reset`](Self::reset)) or on explicit discard.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub organization_name: String,
    pub product_name: String,
    pub additional_info: String,
    pub remarks: String,
    pub machine_name: String,
    pub machine_manufacturer: String,
    pub machine_serial_number: String,
    pub machine_model: String,
    pub contact_person_name: String,
    pub contact_person_mobile_number: String,
    pub company_address: String,
    pub ticket_number: String,
    pub customer_details: String,
    pub job_started_date_time: String,
    pub job_closed_date_time: String,
    pub images: ImageBuffer,
}

impl TaskDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every text field paired with its wire name, in wire order.
    ///
    /// This is the exact part order of the multipart payload.
    pub fn text_fields(&self) -> [(&'static str, &str); fields::TEXT_FIELD_COUNT] {
        [
            (fields::ORGANIZATION_NAME, &self.organization_name),
            (fields::PRODUCT_NAME, &self.product_name),
            (fields::ADDITIONAL_INFO, &self.additional_info),
            (fields::REMARKS, &self.remarks),
            (fields::MACHINE_NAME, &self.machine_name),
            (fields::MACHINE_MANUFACTURER, &self.machine_manufacturer),
            (fields::MACHINE_SERIAL_NUMBER, &self.machine_serial_number),
            (fields::MACHINE_MODEL, &self.machine_model),
            (fields::CONTACT_PERSON_NAME, &self.contact_person_name),
            (
                fields::CONTACT_PERSON_MOBILE_NUMBER,
                &self.contact_person_mobile_number,
            ),
            (fields::COMPANY_ADDRESS, &self.company_address),
            (fields::TICKET_NUMBER, &self.ticket_number),
            (fields::CUSTOMER_DETAILS, &self.customer_details),
            (fields::JOB_STARTED_DATE_TIME, &self.job_started_date_time),
            (fields::JOB_CLOSED_DATE_TIME, &self.job_closed_date_time),
        ]
    }

    /// The fields the operator must fill before submitting.
    ///
    /// Ticket number, customer details and the two job timestamps are
    /// optional; everything else is mandatory.
    fn required_fields(&self) -> [(&'static str, &str); 11] {
        [
            (fields::ORGANIZATION_NAME, &self.organization_name),
            (fields::PRODUCT_NAME, &self.product_name),
            (fields::ADDITIONAL_INFO, &self.additional_info),
            (fields::REMARKS, &self.remarks),
            (fields::MACHINE_NAME, &self.machine_name),
            (fields::MACHINE_MANUFACTURER, &self.machine_manufacturer),
            (fields::MACHINE_SERIAL_NUMBER, &self.machine_serial_number),
            (fields::MACHINE_MODEL, &self.machine_model),
            (fields::CONTACT_PERSON_NAME, &self.contact_person_name),
            (
                fields::CONTACT_PERSON_MOBILE_NUMBER,
                &self.contact_person_mobile_number,
            ),
            (fields::COMPANY_ADDRESS, &self.company_address),
        ]
    }

    /// Collect everything currently blocking submission.
    ///
    /// Returns an empty `Vec` when the draft is submittable. Missing
    /// fields are reported in wire order, followed by [`Violation::NoImages`]
    /// when no frame has been captured, so "the first blocking
    /// condition" is deterministic for the caller.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (name, value) in self.required_fields() {
            if value.is_empty() {
                violations.push(Violation::MissingField(name));
            }
        }

        if self.images.is_empty() {
            violations.push(Violation::NoImages);
        }

        violations
    }

    /// Whether [`validate`](Self::validate) would come back clean.
    pub fn is_submittable(&self) -> bool {
        self.validate().is_empty()
    }

    /// Discard all fields and captured frames, restoring the empty
    /// draft. Invoked after a successful submission and on explicit
    /// operator reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
