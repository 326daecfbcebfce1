//! Session bookkeeping
//!
//! Credentials and the state of one authenticated session. The login
//! endpoint expects the password concatenated with the one-time code, so
//! that joining lives here rather than in every transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login material for the platform instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// One-time code, when the account requires one
    #[serde(default)]
    pub otp: Option<String>,
}

impl Credentials {
    /// Create credentials without a one-time code.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            otp: None,
        }
    }

    /// Attach a one-time code.
    pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }

    /// The password in the form the login endpoint expects: joined with
    /// the one-time code when one is present.
    pub fn password_with_otp(&self) -> String {
        match &self.otp {
            Some(otp) => format!("{}.{}", self.password, otp),
            None => self.password.clone(),
        }
    }
}

/// State of one authenticated session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Opaque session token issued at login
    pub session_id: String,
    /// Instance host the session is pinned to
    pub instance: String,
    /// When the session was established
    pub established_at: DateTime<Utc>,
    expired: bool,
}

impl SessionState {
    /// Record a freshly-established session.
    pub fn new(session_id: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            instance: instance.into(),
            established_at: Utc::now(),
            expired: false,
        }
    }

    /// Check if the session can still carry requests.
    pub fn is_usable(&self) -> bool {
        !self.expired && !self.session_id.is_empty()
    }

    /// Record a server-side expiry.
    pub fn mark_expired(&mut self) {
        self.expired = true;
    }

    /// Swap in a new session token after re-authenticating.
    pub fn renew(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
        self.established_at = Utc::now();
        self.expired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_without_otp() {
        let creds = Credentials::new("user@gus.com", "hunter2");
        assert_eq!(creds.password_with_otp(), "hunter2");
    }

    #[test]
    fn test_password_with_otp_is_joined() {
        let creds = Credentials::new("user@gus.com", "hunter2").with_otp("123456");
        assert_eq!(creds.password_with_otp(), "hunter2.123456");
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = SessionState::new("00Dabc!token", "na44.example.com");
        assert!(session.is_usable());

        session.mark_expired();
        assert!(!session.is_usable());

        session.renew("00Dabc!fresh");
        assert!(session.is_usable());
        assert_eq!(session.session_id, "00Dabc!fresh");
    }

    #[test]
    fn test_blank_session_is_not_usable() {
        let session = SessionState::new("", "na44.example.com");
        assert!(!session.is_usable());
    }
}
