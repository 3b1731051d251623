use serde::{Deserialize, Serialize};

/// The single teacher account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("talha", "258090")
    }
}

/// Exact match after trimming the submitted values. Stored values are not trimmed.
pub fn authenticate(stored: &Credentials, username: &str, password: &str) -> bool {
    username.trim() == stored.username && password.trim() == stored.password
}

/// Teacher login flag. No token, no expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    logged_in: bool,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Sets the flag when the credentials match and reports whether they did.
    pub fn login(&mut self, stored: &Credentials, username: &str, password: &str) -> bool {
        if !authenticate(stored, username, password) {
            return false;
        }
        self.logged_in = true;
        true
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
    }
}
