//! Session state machine
//!
//! The current state lives in a watch channel so readers never block and
//! screens can subscribe to transitions.

use std::sync::Arc;

use marquee_model::UserProfile;
use tokio::sync::watch;

use super::types::{AccountScope, Session};

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,

    /// A handshake or restore is in flight
    Authenticating,

    /// A request token is waiting for approval in the browser
    AwaitingExternalApproval { request_token: String },

    Authenticated {
        session: Session,
        profile: UserProfile,
    },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn pending_request_token(&self) -> Option<&str> {
        match self {
            SessionState::AwaitingExternalApproval { request_token } => Some(request_token),
            _ => None,
        }
    }

    pub fn account_scope(&self) -> Option<AccountScope> {
        self.session().map(|session| AccountScope {
            account_id: session.account_id,
            session_id: session.session_id.clone(),
        })
    }
}

/// Thread-safe session state store backed by a watch channel
#[derive(Clone, Debug)]
pub struct SessionStateStore {
    sender: Arc<watch::Sender<SessionState>>,
    receiver: watch::Receiver<SessionState>,
}

impl Default for SessionStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateStore {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(SessionState::LoggedOut);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn current(&self) -> SessionState {
        self.receiver.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.receiver.borrow().is_authenticated()
    }

    /// Access state without cloning
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionState) -> R,
    {
        f(&self.receiver.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.receiver.clone()
    }

    pub fn set(&self, state: SessionState) {
        self.sender.send_replace(state);
    }

    pub fn authenticate(&self, session: Session, profile: UserProfile) {
        self.set(SessionState::Authenticated { session, profile });
    }

    /// Swap in a new profile, keeping the session. No-op unless authenticated.
    pub fn replace_profile(&self, profile: UserProfile) {
        self.sender.send_if_modified(|state| match state {
            SessionState::Authenticated { profile: current, .. } => {
                *current = profile;
                true
            }
            _ => false,
        });
    }

    pub fn clear(&self) {
        self.set(SessionState::LoggedOut);
    }
}
