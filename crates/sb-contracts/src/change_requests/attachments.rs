//! Attachment contract
//!
//! A change request carries at most one supporting document, PDF only,
//! capped at 10 MB.

use sb_core::error::ValidationErrors;
use sb_models::attachment::{AttachmentMeta, MAX_ATTACHMENT_BYTES, MAX_ATTACHMENT_FILES};

use crate::base::{Contract, ValidationResult};

#[derive(Debug, Default)]
pub struct AttachmentContract;

impl AttachmentContract {
    pub fn new() -> Self {
        Self
    }

    /// Check a single file before it is accepted into the draft.
    pub fn validate_file(&self, attachment: &AttachmentMeta, errors: &mut ValidationErrors) {
        if !attachment.is_pdf() {
            errors.add("attachments", "must be a PDF file");
        }
        if attachment.size_bytes > MAX_ATTACHMENT_BYTES {
            errors.add("attachments", "must be 10 MB or smaller");
        }
    }
}

impl Contract<Vec<AttachmentMeta>> for AttachmentContract {
    fn validate(&self, entity: &Vec<AttachmentMeta>) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if entity.len() > MAX_ATTACHMENT_FILES {
            errors.add("attachments", "at most one file may be attached");
        }
        for attachment in entity {
            self.validate_file(attachment, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_small_pdf_passes() {
        let contract = AttachmentContract::new();
        let file = AttachmentMeta::for_upload("change-order.pdf", 1024);
        assert!(contract.validate(&vec![file]).is_ok());
    }

    #[test]
    fn test_non_pdf_rejected() {
        let contract = AttachmentContract::new();
        let file = AttachmentMeta::for_upload("change-order.docx", 1024);
        let errors = contract.validate(&vec![file]).unwrap_err();
        assert!(errors.has_error("attachments"));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let contract = AttachmentContract::new();
        let file = AttachmentMeta::for_upload("change-order.pdf", MAX_ATTACHMENT_BYTES + 1);
        let errors = contract.validate(&vec![file]).unwrap_err();
        assert!(errors.has_error("attachments"));
    }

    #[test]
    fn test_more_than_one_file_rejected() {
        let contract = AttachmentContract::new();
        let files = vec![
            AttachmentMeta::for_upload("a.pdf", 10),
            AttachmentMeta::for_upload("b.pdf", 10),
        ];
        let errors = contract.validate(&files).unwrap_err();
        assert!(errors.has_error("attachments"));
    }
}
