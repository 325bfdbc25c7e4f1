//! Hooks the session manager uses to reach the user.

use std::fmt;

use async_trait::async_trait;
use url::Url;

/// Tells the user their session ended and waits for acknowledgement.
#[async_trait]
pub trait ExpiryPrompt: Send + Sync + fmt::Debug {
    async fn session_expired(&self);
}

/// Sends the user to the browser page where a request token is approved.
///
/// Fire-and-forget: a failure is logged and the login stays pending.
pub trait AuthorizationOpener: Send + Sync + fmt::Debug {
    fn open(&self, url: &Url) -> std::io::Result<()>;
}
