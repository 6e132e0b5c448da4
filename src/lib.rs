//! Talk2Kap Client Library
//!
//! A Rust client for the Talk2Kap municipal-services backend: complaint
//! filing with urgency classification, a live complaint feed, citizen
//! profiles with ID verification, officials feedback, and the emergency
//! hotline directory.

pub mod classifier;
pub mod complaints;
pub mod config;
pub mod emergency;
pub mod error;
pub mod feedback;
pub mod media;
pub mod models;
pub mod profile;
pub mod session;
pub mod store;
pub mod validate;

use reqwest::Client;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::classifier::ClassifierClient;
use crate::complaints::ComplaintsClient;
use crate::config::{ClientOptions, Config};
use crate::error::{Error, Result};
use crate::feedback::FeedbackClient;
use crate::profile::ProfileClient;
use crate::session::Session;
use crate::store::{RecordStore, RestStore};

/// The main entry point for the Talk2Kap client
pub struct Talk2Kap {
    /// Backend endpoint coordinates
    pub config: Config,
    /// Client options
    pub options: ClientOptions,
    /// HTTP client shared by every service
    pub http_client: Client,
    store: Arc<dyn RecordStore>,
    session: Option<Session>,
    // One guard for every ComplaintsClient this entry point hands out.
    submission_guard: Arc<AtomicBool>,
}

impl Talk2Kap {
    /// Create a new client with default options
    pub fn new(config: Config) -> Self {
        Self::new_with_options(config, ClientOptions::default())
    }

    /// Create a new client with custom options
    pub fn new_with_options(config: Config, options: ClientOptions) -> Self {
        let http_client = Client::new();
        let store = Arc::new(RestStore::new(
            config.database_url.clone(),
            config.api_key.clone(),
            http_client.clone(),
            options.request_timeout,
        ));
        Self {
            config,
            options,
            http_client,
            store,
            session: None,
            submission_guard: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a client over a custom record store implementation
    ///
    /// This is the seam tests use to swap in [`store::MemoryStore`].
    pub fn with_store(
        config: Config,
        options: ClientOptions,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            config,
            options,
            http_client: Client::new(),
            store,
            session: None,
            submission_guard: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach the authenticated session
    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Drop the session; owner-scoped calls fail afterwards
    pub fn sign_out(&mut self) {
        self.session = None;
    }

    /// The current session, or an authentication error when signed out
    ///
    /// Callers surface this as a redirect to sign-in; nothing proceeds
    /// anonymously.
    pub fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| Error::auth("no signed-in user"))
    }

    /// Client for the classification endpoint
    pub fn classifier(&self) -> ClassifierClient {
        ClassifierClient::new(
            self.config.classifier_url.clone(),
            self.http_client.clone(),
            self.options.request_timeout,
        )
    }

    /// Client for filing and following complaints
    ///
    /// Every instance returned here shares one in-flight guard, so a second
    /// submission is rejected no matter which handle issues it.
    pub fn complaints(&self) -> ComplaintsClient {
        ComplaintsClient::with_guard(
            self.classifier(),
            self.store.clone(),
            self.submission_guard.clone(),
        )
    }

    /// Client for the profile / ID-verification panel
    pub fn profile(&self) -> ProfileClient {
        ProfileClient::new(self.store.clone())
    }

    /// Client for officials feedback
    pub fn feedback(&self) -> FeedbackClient {
        FeedbackClient::new(self.store.clone())
    }

    /// The shared record store
    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, Config};
    pub use crate::error::{Error, Result};
    pub use crate::models::{ComplaintDraft, ComplaintRecord, ComplaintStatus};
    pub use crate::session::Session;
    pub use crate::Talk2Kap;
}
