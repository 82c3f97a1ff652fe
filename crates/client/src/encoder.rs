//! Draft-to-payload encoding.
//!
//! [`encode`] is a pure transformation from a [`TaskDraft`] to the
//! multipart payload the submission endpoint expects: one named text
//! part per draft field, one `images` binary part per captured frame.
//! The intermediate [`Payload`] keeps the part set inspectable;
//! [`Payload::into_form`] lowers it to the reqwest form actually sent.

use fieldtask_core::fields;
use fieldtask_core::task::TaskDraft;

/// One named text part of the submission payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPart {
    /// Wire field name (one of the [`fields`] constants).
    pub name: &'static str,
    pub value: String,
}

/// One binary image part of the submission payload.
#[derive(Debug, Clone)]
pub struct ImagePart {
    /// Always [`fields::IMAGES`]; the backend accepts the name repeated.
    pub name: &'static str,
    /// `image{ordinal}.jpg`, numbered in buffer order.
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// The encoded multipart payload: text parts in wire order, then image
/// parts in buffer order.
#[derive(Debug, Clone)]
pub struct Payload {
    text_parts: Vec<TextPart>,
    image_parts: Vec<ImagePart>,
}

impl Payload {
    pub fn text_parts(&self) -> &[TextPart] {
        &self.text_parts
    }

    pub fn image_parts(&self) -> &[ImagePart] {
        &self.image_parts
    }

    /// Lower the payload to the multipart form sent over the wire,
    /// preserving part order.
    pub fn into_form(self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for part in self.text_parts {
            form = form.text(part.name, part.value);
        }
        for part in self.image_parts {
            let file = reqwest::multipart::Part::bytes(part.data)
                .file_name(part.file_name)
                .mime_str(part.mime_type)
                .expect("image MIME type constant is always valid");
            form = form.part(part.name, file);
        }
        form
    }
}

/// Encode a draft into its submission payload.
///
/// Pure and side-effect-free: the draft is only read, and the image
/// order observed here is exactly the buffer's append/removal order at
/// the moment of the call.
pub fn encode(draft: &TaskDraft) -> Payload {
    let text_parts = draft
        .text_fields()
        .into_iter()
        .map(|(name, value)| TextPart {
            name,
            value: value.to_string(),
        })
        .collect();

    let image_parts = draft
        .images
        .frames()
        .iter()
        .map(|frame| ImagePart {
            name: fields::IMAGES,
            file_name: format!("image{}.jpg", frame.ordinal),
            mime_type: frame.mime_type,
            data: frame.data.clone(),
        })
        .collect();

    Payload {
        text_parts,
        image_parts,
    }
}
