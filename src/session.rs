//! Authenticated session state
//!
//! The session is an explicit value handed to every owner-scoped operation,
//! never ambient state. Sign-up/sign-in and token refresh belong to the
//! external authentication provider; this type only carries what the
//! services need to namespace their reads and writes.

use serde::{Deserialize, Serialize};

/// The signed-in citizen's identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user id assigned by the authentication provider
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Administrative zone the citizen registered under
    pub purok: Option<String>,
    /// Bearer token for store requests, when the deployment enforces rules
    pub access_token: Option<String>,
}

impl Session {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: None,
            name: None,
            purok: None,
            access_token: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_purok(mut self, purok: &str) -> Self {
        self.purok = Some(purok.to_string());
        self
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }
}
