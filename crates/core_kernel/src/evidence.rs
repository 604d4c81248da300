//! Evidence file references and the shared upload constraints
//!
//! The engine never stores file contents; it records references produced by
//! the storage service and checks them against the upload limits.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum number of files per submission
pub const MAX_FILES_PER_SUBMISSION: usize = 5;

/// Maximum size of a single file in bytes (10 MB)
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted file extensions (lowercase)
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "pdf", "docx", "mp4"];

/// A reference to an uploaded evidence file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFile {
    /// Location returned by the storage service
    pub url: String,
    /// Original file name, used for the extension check
    pub file_name: String,
    /// Size in bytes
    pub size_bytes: u64,
}

impl EvidenceFile {
    pub fn new(url: impl Into<String>, file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            url: url.into(),
            file_name: file_name.into(),
            size_bytes,
        }
    }

    /// Returns the lowercase extension, if any
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Validates a batch of evidence files
///
/// # Arguments
///
/// * `files` - The files attached to one submission
/// * `min_files` - Minimum number of files the action requires
pub fn validate_evidence(files: &[EvidenceFile], min_files: usize) -> Result<(), ValidationError> {
    if files.len() < min_files {
        return Err(ValidationError::new(
            "evidence",
            format!("at least {} file(s) required", min_files),
        ));
    }
    if files.len() > MAX_FILES_PER_SUBMISSION {
        return Err(ValidationError::new(
            "evidence",
            format!(
                "at most {} files per submission (got {})",
                MAX_FILES_PER_SUBMISSION,
                files.len()
            ),
        ));
    }

    for file in files {
        if file.url.trim().is_empty() {
            return Err(ValidationError::new("evidence", "file url is empty"));
        }
        if file.size_bytes > MAX_FILE_SIZE_BYTES {
            return Err(ValidationError::new(
                "evidence",
                format!("{} exceeds the 10MB limit", file.file_name),
            ));
        }
        match file.extension() {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => {
                return Err(ValidationError::new(
                    "evidence",
                    format!("{} has an unsupported file type", file.file_name),
                ))
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> EvidenceFile {
        EvidenceFile::new(format!("https://files.example.com/{}", name), name, 2048)
    }

    #[test]
    fn test_accepts_allowed_extensions() {
        let files: Vec<_> = ["a.jpg", "b.JPEG", "c.png", "d.gif", "e.pdf"]
            .iter()
            .map(|n| pdf(n))
            .collect();
        assert!(validate_evidence(&files, 1).is_ok());
    }

    #[test]
    fn test_rejects_too_many_files() {
        let files: Vec<_> = (0..6).map(|i| pdf(&format!("f{}.pdf", i))).collect();
        assert!(validate_evidence(&files, 1).is_err());
    }

    #[test]
    fn test_rejects_oversized_file() {
        let mut file = pdf("big.mp4");
        file.size_bytes = MAX_FILE_SIZE_BYTES + 1;
        assert!(validate_evidence(&[file], 1).is_err());
    }

    #[test]
    fn test_rejects_unknown_extension() {
        assert!(validate_evidence(&[pdf("script.exe")], 1).is_err());
        assert!(validate_evidence(&[pdf("noextension")], 1).is_err());
    }

    #[test]
    fn test_minimum_files() {
        assert!(validate_evidence(&[], 0).is_ok());
        assert!(validate_evidence(&[], 1).is_err());
    }
}
