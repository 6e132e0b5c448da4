//! Complaint form validation
//!
//! One pure rule set shared by the live "can submit" indicator and the
//! submission path itself. Violations are collected, never fail-fast, so
//! the form can surface all of them at once.
//!
//! Policy: category, description, location and contact number are required;
//! the "Other" category additionally requires a custom label; photo
//! evidence is optional.

use crate::models::ComplaintDraft;

/// Collect every violation in the draft. Returns an empty vec when the
/// draft is submittable. Never mutates, safe to call on every keystroke.
pub fn violations(draft: &ComplaintDraft) -> Vec<String> {
    let mut found = Vec::new();

    match draft.category {
        None => found.push("Select a category".to_string()),
        Some(category) if category.is_other() && draft.custom_category.trim().is_empty() => {
            found.push("Describe the custom category".to_string());
        }
        Some(_) => {}
    }

    if draft.message.trim().is_empty() {
        found.push("A complaint description is required".to_string());
    }

    if draft.location.trim().is_empty() {
        found.push("Location is required".to_string());
    }

    if draft.contact_number.trim().is_empty() {
        found.push("A contact number is required".to_string());
    }

    found
}

/// Whether the draft passes every rule
pub fn can_submit(draft: &ComplaintDraft) -> bool {
    violations(draft).is_empty()
}
