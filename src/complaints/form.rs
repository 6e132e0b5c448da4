//! Screen-level form state for complaint submission
//!
//! Tracks the draft, the in-flight flag that disables the submit control,
//! and the transient success banner. On failure the draft is left exactly
//! as typed so the user can retry; only a successful submission clears it.

use std::time::{Duration, Instant};

use super::ComplaintsClient;
use crate::error::Result;
use crate::media::Photo;
use crate::models::{Category, ComplaintDraft, ComplaintRecord};
use crate::session::Session;
use crate::validate;

/// How long the success indicator stays up before auto-dismissing
pub const SUCCESS_BANNER_DURATION: Duration = Duration::from_secs(3);

/// Complaint submission form state
#[derive(Debug, Default)]
pub struct ComplaintForm {
    draft: ComplaintDraft,
    busy: bool,
    banner_deadline: Option<Instant>,
    last_error: Option<String>,
}

impl ComplaintForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ComplaintDraft {
        &self.draft
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.draft.category = category;
    }

    pub fn set_custom_category(&mut self, label: &str) {
        self.draft.custom_category = label.to_string();
    }

    pub fn set_message(&mut self, message: &str) {
        self.draft.message = message.to_string();
    }

    pub fn set_location(&mut self, location: &str) {
        self.draft.location = location.to_string();
    }

    pub fn set_contact_number(&mut self, number: &str) {
        self.draft.contact_number = number.to_string();
    }

    pub fn set_purok(&mut self, purok: &str) {
        self.draft.purok = purok.to_string();
    }

    pub fn attach_photo(&mut self, photo: Photo) {
        self.draft.evidence_photo = Some(photo);
    }

    pub fn clear_photo(&mut self) {
        self.draft.evidence_photo = None;
    }

    /// Current violations, recomputed from the draft; drives the live
    /// submit indicator without side effects
    pub fn violations(&self) -> Vec<String> {
        validate::violations(&self.draft)
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.busy && validate::can_submit(&self.draft)
    }

    /// Whether the last observed state had a submission in flight
    ///
    /// [`submit`](Self::submit) borrows the form exclusively for the whole
    /// attempt, so this flag can only be read between attempts. To disable
    /// the submit control while a request is live, watch
    /// [`ComplaintsClient::is_busy`] on another handle instead.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Last submission failure, kept until the next attempt
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the transient success indicator is still visible
    pub fn success_banner_visible(&self) -> bool {
        self.banner_deadline
            .map_or(false, |deadline| Instant::now() < deadline)
    }

    /// Run the submission pipeline for the current draft
    ///
    /// Success clears the form and raises the auto-dismissing banner; any
    /// failure leaves every field untouched for retry.
    pub async fn submit(
        &mut self,
        complaints: &ComplaintsClient,
        session: &Session,
    ) -> Result<ComplaintRecord> {
        self.busy = true;
        self.last_error = None;
        let result = complaints.submit(session, &self.draft).await;
        self.busy = false;

        match &result {
            Ok(_) => {
                self.draft = ComplaintDraft::default();
                self.banner_deadline = Some(Instant::now() + SUCCESS_BANNER_DURATION);
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_submit_tracks_field_changes() {
        let mut form = ComplaintForm::new();
        assert!(!form.can_submit());

        form.set_category(Some(Category::Roads));
        form.set_message("pothole near the chapel");
        form.set_location("Purok 2");
        form.set_contact_number("0917 000 1111");
        assert!(form.can_submit());

        form.set_message("   ");
        assert!(!form.can_submit());
    }

    #[test]
    fn banner_starts_hidden() {
        let form = ComplaintForm::new();
        assert!(!form.success_banner_visible());
    }
}
