use std::fmt;

use marquee_model::AccountId;
use zeroize::Zeroizing;

use super::errors::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Keys under which session secrets are persisted
pub mod keys {
    pub const USER_TOKEN: &str = "userToken";
    pub const SESSION_ID: &str = "userSessionId";
    /// Reserved; nothing writes it, but logout clears it with the others
    pub const REFRESH_TOKEN: &str = "refreshToken";

    pub const ALL: &[&str] = &[USER_TOKEN, SESSION_ID, REFRESH_TOKEN];
}

/// Username and password as typed into the login form
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Form-level checks run before any request is made.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An established session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub request_token: String,
    pub session_id: String,
    pub account_id: AccountId,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("request_token", &"<redacted>")
            .field("session_id", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// What account-scoped requests need: whose lists, under which session
#[derive(Clone, PartialEq, Eq)]
pub struct AccountScope {
    pub account_id: AccountId,
    pub session_id: String,
}

impl fmt::Debug for AccountScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountScope")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}
