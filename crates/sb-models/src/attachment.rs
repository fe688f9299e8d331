//! Attachment metadata
//!
//! Change requests carry at most one PDF attachment. The file content lives
//! behind the backend's storage; the client only ever sees metadata and
//! resolves storage keys to short-lived URLs on demand.

use sb_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_ATTACHMENT_FILES: usize = 1;
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentMeta {
    pub id: Option<Id>,
    pub file_name: String,
    /// Opaque key resolved to a presigned URL through the backend
    #[serde(rename = "filePath")]
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: u64,
}

impl Identifiable for AttachmentMeta {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl AttachmentMeta {
    /// Metadata for a file picked locally, before upload. The storage key
    /// is generated client-side so retried uploads stay idempotent.
    pub fn for_upload(file_name: impl Into<String>, size_bytes: u64) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            id: None,
            storage_key: format!("change-requests/{}", Uuid::new_v4()),
            file_name,
            content_type,
            size_bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == "application/pdf"
    }
}
