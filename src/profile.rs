//! Profile and ID-verification panel
//!
//! Reuses the complaint pipeline's store-write idiom: partial updates of
//! the `users/{uid}` document. Uploading an ID scan resets the review
//! status to `Pending`; verification itself happens on the administrative
//! surface.

use chrono::Utc;
use log::info;
use serde_json::json;
use std::sync::Arc;

use crate::error::Result;
use crate::media::Photo;
use crate::models::UserProfile;
use crate::session::Session;
use crate::store::{RecordStore, StorePath};

/// Client for the signed-in citizen's profile document
pub struct ProfileClient {
    store: Arc<dyn RecordStore>,
}

impl ProfileClient {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Read the profile, defaulting every absent field client-side
    pub async fn get(&self, session: &Session) -> Result<UserProfile> {
        let path = StorePath::user(&session.user_id);
        match self.store.get(&path).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(UserProfile::default()),
        }
    }

    /// Registration-time write of the full profile document
    ///
    /// Stamps the account-creation time when the caller hasn't set one.
    pub async fn create(&self, session: &Session, mut profile: UserProfile) -> Result<()> {
        if profile.created_at.is_none() {
            profile.created_at = Some(Utc::now());
        }
        let path = StorePath::user(&session.user_id);
        self.store.set(&path, serde_json::to_value(&profile)?).await?;
        info!("profile created for {}", session.user_id);
        Ok(())
    }

    /// Replace the avatar image
    pub async fn update_avatar(&self, session: &Session, photo: &Photo) -> Result<()> {
        let path = StorePath::user(&session.user_id);
        self.store
            .update(&path, json!({ "avatar": photo.to_data_uri() }))
            .await
    }

    /// Upload an ID scan for verification, resetting the review status
    pub async fn submit_id_verification(&self, session: &Session, photo: &Photo) -> Result<()> {
        let path = StorePath::user(&session.user_id);
        self.store
            .update(
                &path,
                json!({
                    "idImage": photo.to_data_uri(),
                    "idstatus": "Pending",
                }),
            )
            .await?;
        info!("id verification submitted for {}", session.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdStatus;
    use crate::store::MemoryStore;

    fn client() -> (ProfileClient, Arc<MemoryStore>, Session) {
        let store = Arc::new(MemoryStore::new());
        let client = ProfileClient::new(store.clone());
        (client, store, Session::new("uid-1"))
    }

    #[tokio::test]
    async fn absent_profile_reads_as_defaults() {
        let (client, _store, session) = client();
        let profile = client.get(&session).await.unwrap();
        assert_eq!(profile, UserProfile::default());
    }

    #[tokio::test]
    async fn create_stamps_creation_time() {
        let (client, _store, session) = client();
        client
            .create(&session, UserProfile {
                name: "Juan Dela Cruz".to_string(),
                purok: "1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let profile = client.get(&session).await.unwrap();
        assert_eq!(profile.name, "Juan Dela Cruz");
        assert!(profile.created_at.is_some());
        assert!(profile.member_since().is_some());
    }

    #[tokio::test]
    async fn id_upload_resets_review_status() {
        let (client, _store, session) = client();
        client
            .create(&session, UserProfile::default())
            .await
            .unwrap();

        let scan = Photo::from_bytes("image/jpeg", b"scan");
        client
            .submit_id_verification(&session, &scan)
            .await
            .unwrap();

        let profile = client.get(&session).await.unwrap();
        assert_eq!(profile.idstatus, IdStatus::Pending);
        assert!(profile.id_verification.unwrap().starts_with("data:image/jpeg"));
        // The rest of the document survives the partial update.
        assert!(profile.created_at.is_some());
    }
}
