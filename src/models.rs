//! Data model for complaints, profiles and reference lists
//!
//! Wire field names follow the deployed database (`type`, `evidencePhoto`,
//! `idImage`, `idstatus`, `createdAt`), so records written by older app
//! builds decode without migration. Every field the store may omit carries
//! a client-side default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::media::Photo;

/// Reply from the classification service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Echo of the submitted message
    pub message: String,
    /// Urgency tag, normalized lowercase ("urgent", "non-urgent", ...)
    pub label: String,
    /// Category string, normalized lowercase
    #[serde(rename = "type")]
    pub kind: String,
}

/// Lifecycle status of a filed complaint
///
/// The client only ever writes `Pending`; later transitions originate from
/// the administrative surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "resolved")]
    Resolved,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in progress",
            ComplaintStatus::Resolved => "resolved",
        };
        f.write_str(s)
    }
}

/// One filed complaint, as persisted under `users/{uid}/userComplaints/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    /// Client-assigned creation-time-derived id, immutable
    pub id: String,
    pub message: String,
    /// Classifier-assigned urgency tag; never user-supplied
    #[serde(default)]
    pub label: String,
    /// Classifier-assigned category; never user-supplied
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Submission time, immutable
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub purok: String,
    #[serde(default)]
    pub status: ComplaintStatus,
    #[serde(rename = "evidencePhoto", default, skip_serializing_if = "Option::is_none")]
    pub evidence_photo: Option<String>,
}

impl ComplaintRecord {
    /// Whether the detail view has a photo section to render
    pub fn has_evidence(&self) -> bool {
        self.evidence_photo.is_some()
    }

    /// Whether the detail view has a category section to render
    pub fn has_kind(&self) -> bool {
        !self.kind.is_empty()
    }
}

/// Predefined complaint categories offered by the submission form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Roads,
    Waste,
    Noise,
    Water,
    Streetlights,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Roads,
        Category::Waste,
        Category::Noise,
        Category::Water,
        Category::Streetlights,
        Category::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Roads => "Roads & Infrastructure",
            Category::Waste => "Waste Management",
            Category::Noise => "Noise Disturbance",
            Category::Water => "Water Supply",
            Category::Streetlights => "Streetlights",
            Category::Other => "Other",
        }
    }

    /// The "custom/other" choice requires a free-text label from the user
    pub fn is_other(&self) -> bool {
        matches!(self, Category::Other)
    }
}

/// Unsubmitted form state for one complaint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintDraft {
    pub category: Option<Category>,
    /// Free-text label, required when `category` is `Other`
    pub custom_category: String,
    pub message: String,
    pub location: String,
    pub contact_number: String,
    /// Defaults to the session's purok when left empty
    pub purok: String,
    pub evidence_photo: Option<Photo>,
}

/// ID-verification review state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdStatus {
    #[default]
    Pending,
    Verified,
    Denied,
}

/// One registered citizen's profile document at `users/{uid}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "number", default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub purok: String,
    #[serde(default)]
    pub age: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Uploaded ID scan awaiting verification
    #[serde(rename = "idImage", default, skip_serializing_if = "Option::is_none")]
    pub id_verification: Option<String>,
    #[serde(default)]
    pub idstatus: IdStatus,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Human-readable membership date ("January 2024"), derived from the
    /// account-creation time
    pub fn member_since(&self) -> Option<String> {
        self.created_at.map(|t| t.format("%B %Y").to_string())
    }
}

/// One barangay official, from the `officials/` reference list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Official {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_wire_format() {
        assert_eq!(
            serde_json::to_value(ComplaintStatus::InProgress).unwrap(),
            json!("in progress")
        );
        let status: ComplaintStatus = serde_json::from_value(json!("pending")).unwrap();
        assert_eq!(status, ComplaintStatus::Pending);
    }

    #[test]
    fn record_tolerates_missing_optional_fields() {
        let record: ComplaintRecord = serde_json::from_value(json!({
            "id": "1700000000000",
            "message": "stray dogs near the plaza",
            "label": "non-urgent",
            "timestamp": "2024-01-15T08:30:00Z"
        }))
        .unwrap();
        assert!(!record.has_evidence());
        assert!(!record.has_kind());
        assert_eq!(record.status, ComplaintStatus::Pending);
    }

    #[test]
    fn profile_defaults_and_member_since() {
        let profile: UserProfile = serde_json::from_value(json!({
            "name": "Juan Dela Cruz",
            "createdAt": "2024-01-10T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(profile.idstatus, IdStatus::Pending);
        assert_eq!(profile.member_since().as_deref(), Some("January 2024"));
        assert!(UserProfile::default().member_since().is_none());
    }
}
