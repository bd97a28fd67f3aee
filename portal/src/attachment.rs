//! Uploaded file carried by a draft until submission.
//!
//! Validation only ever looks at the client-declared metadata; the bytes are
//! forwarded untouched in the multipart body.

#[cfg(test)]
#[path = "attachment_test.rs"]
mod attachment_test;

/// Largest accepted technical sheet, in bytes (3 MB).
pub const MAX_TECHNICAL_SHEET_BYTES: u64 = 3 * 1024 * 1024;

/// A file picked by the user, with its declared metadata.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    /// MIME type as declared by the browser or guessed from the extension.
    pub content_type: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl Attachment {
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self { file_name: file_name.into(), content_type: content_type.into(), size, bytes }
    }

    /// Whether the declared content type names a PDF.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("pdf")
    }

    #[must_use]
    pub fn exceeds(&self, limit: u64) -> bool {
        self.size > limit
    }
}

// Bytes are omitted so drafts stay readable in logs.
impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Guess a MIME type from a file extension, for callers that only have a path.
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
