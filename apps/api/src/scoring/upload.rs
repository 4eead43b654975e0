//! Résumé upload and pre-submission validation.

use bytes::Bytes;
use thiserror::Error;

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

pub const PDF: &str = "application/pdf";
pub const DOC: &str = "application/msword";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Accepted media types and the extension each is inferred from.
const ACCEPTED: [(&str, &str); 3] = [(PDF, "pdf"), (DOC, "doc"), (DOCX, "docx")];

#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    /// Declared media type, if the client sent one.
    pub media_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    #[error("Unsupported file type '{0}'. Please upload a PDF, DOC, or DOCX file.")]
    UnsupportedType(String),

    #[error("File is too large ({size_mb:.2} MB). The maximum size is 5 MB.")]
    TooLarge { size_mb: f64 },

    #[error("The uploaded file is empty.")]
    Empty,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, media_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn size_mb(&self) -> f64 {
        self.size() as f64 / 1024.0 / 1024.0
    }

    /// The declared media type, or one inferred from the file extension when
    /// the client sent none or a generic binary type.
    pub fn effective_media_type(&self) -> Option<String> {
        match self.media_type.as_deref().map(str::trim) {
            Some(declared) if !declared.is_empty() && declared != "application/octet-stream" => {
                Some(declared.to_ascii_lowercase())
            }
            _ => {
                let extension = self.file_name.rsplit_once('.')?.1.to_ascii_lowercase();
                ACCEPTED
                    .iter()
                    .find(|(_, ext)| *ext == extension)
                    .map(|(media, _)| media.to_string())
            }
        }
    }
}

/// Type must be PDF, DOC or DOCX and size must not exceed 5 MiB.
pub fn validate(file: &ResumeFile) -> Result<(), UploadError> {
    let media_type = file.effective_media_type().unwrap_or_default();
    if !ACCEPTED.iter().any(|(accepted, _)| *accepted == media_type) {
        let shown = if media_type.is_empty() {
            file.file_name.clone()
        } else {
            media_type
        };
        return Err(UploadError::UnsupportedType(shown));
    }

    if file.size() == 0 {
        return Err(UploadError::Empty);
    }
    if file.size() > MAX_RESUME_BYTES {
        return Err(UploadError::TooLarge {
            size_mb: file.size_mb(),
        });
    }

    Ok(())
}
