//! Image payload handling
//!
//! Evidence photos and ID scans travel as base64 data URIs inside the
//! record documents; the picker/camera layer hands us raw bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// An encoded image payload ready to embed in a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// MIME type, e.g. "image/jpeg"
    pub content_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl Photo {
    /// Encode raw image bytes
    pub fn from_bytes(content_type: &str, bytes: &[u8]) -> Self {
        Self {
            content_type: content_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Render the payload as a data URI for embedding in a record
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.data)
    }

    /// Decode back to raw bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| Error::media(format!("invalid base64 payload: {}", e)))
    }
}
