//! Request and response bodies

pub mod claims;
pub mod compliances;

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::EvidenceFile;

/// An uploaded file reference
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EvidenceFileDto {
    #[validate(url)]
    pub url: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    pub size_bytes: u64,
}

impl From<EvidenceFileDto> for EvidenceFile {
    fn from(dto: EvidenceFileDto) -> Self {
        EvidenceFile::new(dto.url, dto.file_name, dto.size_bytes)
    }
}

pub(crate) fn into_files(files: Vec<EvidenceFileDto>) -> Vec<EvidenceFile> {
    files.into_iter().map(Into::into).collect()
}
