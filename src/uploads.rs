//! Attachment storage for report submissions.

use std::path::Path;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

/// Extensions accepted for report attachments.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx"];

/// Upper bound on one uploaded attachment (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File type not allowed: {0}")]
    DisallowedExtension(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A persisted attachment: where it landed and what the client called it.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Portal path the file is served under (`/uploads/<stored name>`).
    pub file_path: String,
    /// Original client-side filename, kept for display.
    pub file_name: String,
}

/// Whether a filename's extension (the part after the last dot,
/// lowercased) is on the allowlist. No dot means no extension means
/// rejected.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Sanitize a filename — removes path traversal and special characters.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|&c| c != '/' && c != '\\' && c != '\0')
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Remove consecutive dots (path traversal prevention)
    let sanitized = sanitized.replace("..", "");

    let sanitized: String = sanitized.chars().take(100).collect();

    if sanitized.is_empty() {
        "attachment".into()
    } else {
        sanitized
    }
}

/// Persist an uploaded attachment under the uploads directory.
///
/// The stored name is `{patient id}_{timestamp}_{sanitized original}`,
/// unique per patient at one-second granularity.
pub fn store_attachment(
    upload_dir: &Path,
    patient_id: &Uuid,
    original_name: &str,
    bytes: &[u8],
) -> Result<StoredUpload, UploadError> {
    if !allowed_file(original_name) {
        return Err(UploadError::DisallowedExtension(original_name.to_string()));
    }

    std::fs::create_dir_all(upload_dir)?;

    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let stored_name = format!("{}_{}_{}", patient_id, stamp, sanitize_filename(original_name));
    std::fs::write(upload_dir.join(&stored_name), bytes)?;

    Ok(StoredUpload {
        file_path: format!("/uploads/{stored_name}"),
        file_name: original_name.to_string(),
    })
}
