use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use marquee_config::{AuthConfig, ClientConfig};
use marquee_model::UserProfile;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use url::Url;

use super::errors::{AuthError, AuthResult, StorageError};
use super::ports::{AuthorizationOpener, ExpiryPrompt};
use super::state_types::{SessionState, SessionStateStore};
use super::storage::SecretStore;
use super::types::{AccountScope, Credentials, Session, keys};
use crate::infrastructure::api::approval_url;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::api_error::ApiError;
use crate::infrastructure::expiry::ExpiryGate;

/// Upper bound on the best-effort remote session revocation during logout
const LOGOUT_TIMEOUT: Duration = Duration::from_secs(2);

/// Everything the manager needs from outside the HTTP layer
#[derive(Clone, Debug)]
pub struct SessionCollaborators {
    pub secrets: Arc<dyn SecretStore>,
    pub prompt: Arc<dyn ExpiryPrompt>,
    pub opener: Arc<dyn AuthorizationOpener>,
}

/// Owns the authenticated identity.
///
/// Login state transitions go through a watch channel; persisted secrets are
/// written only once the profile fetch has confirmed the session. Session
/// rejections reported by the client land on the [`ExpiryGate`]; however many
/// arrive together, [`SessionManager::handle_expiry`] runs the prompt and the
/// forced logout once.
#[derive(Clone, Debug)]
pub struct SessionManager {
    api: ApiClient,
    expiry_gate: Arc<ExpiryGate>,
    state: SessionStateStore,
    secrets: Arc<dyn SecretStore>,
    prompt: Arc<dyn ExpiryPrompt>,
    opener: Arc<dyn AuthorizationOpener>,
    approval_url: Url,
    expiry_lock: Arc<Mutex<()>>,
}

impl SessionManager {
    /// `expiry_gate` must be the handler `api` was built with.
    pub fn new(
        api: ApiClient,
        expiry_gate: Arc<ExpiryGate>,
        auth: &AuthConfig,
        collaborators: SessionCollaborators,
    ) -> Self {
        Self {
            api,
            expiry_gate,
            state: SessionStateStore::new(),
            secrets: collaborators.secrets,
            prompt: collaborators.prompt,
            opener: collaborators.opener,
            approval_url: auth.approval_url.clone(),
            expiry_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build the client and its expiry gate from configuration.
    pub fn connect(config: &ClientConfig, collaborators: SessionCollaborators) -> AuthResult<Self> {
        let expiry_gate = Arc::new(ExpiryGate::new());
        let api = ApiClient::new(&config.api, expiry_gate.clone())?;
        Ok(Self::new(api, expiry_gate, &config.auth, collaborators))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn expiry_gate(&self) -> &Arc<ExpiryGate> {
        &self.expiry_gate
    }

    pub fn state(&self) -> &SessionStateStore {
        &self.state
    }

    pub fn current(&self) -> SessionState {
        self.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.with_state(|state| state.session().cloned())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.state.with_state(|state| state.profile().cloned())
    }

    pub fn account_scope(&self) -> Option<AccountScope> {
        self.state.with_state(SessionState::account_scope)
    }

    /// Username/password handshake: token, validation, session, profile.
    ///
    /// Any prior session is cleared first. Nothing is persisted unless every
    /// step succeeds.
    pub async fn login(&self, credentials: &Credentials) -> AuthResult<UserProfile> {
        credentials.validate()?;
        self.clear_local().await;
        self.state.set(SessionState::Authenticating);
        info!("[SessionManager] Logging in as {}", credentials.username);

        let handshake = async {
            let token = self.api.create_request_token().await?;
            let validated = self
                .api
                .validate_with_login(
                    &credentials.username,
                    credentials.password(),
                    &token.request_token,
                )
                .await?;
            let session_id = self.api.create_session(&validated.request_token).await?;
            Ok::<_, AuthError>((validated.request_token, session_id))
        };

        let result = match handshake.await {
            Ok((request_token, session_id)) => self.establish(request_token, session_id).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!("[SessionManager] Login failed: {}", e);
            self.state.clear();
        }
        result
    }

    /// Start a browser-approved login and return the approval page.
    pub async fn begin_external_login(&self) -> AuthResult<Url> {
        self.clear_local().await;
        self.state.set(SessionState::Authenticating);

        let prepared = async {
            let token = self.api.create_request_token().await?;
            let url = approval_url(&self.approval_url, &token.request_token)
                .map_err(|e| AuthError::Network(ApiError::Url(e)))?;
            Ok::<_, AuthError>((token.request_token, url))
        };
        let (request_token, url) = match prepared.await {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("[SessionManager] Could not start external login: {}", e);
                self.state.clear();
                return Err(e);
            }
        };

        self.state
            .set(SessionState::AwaitingExternalApproval { request_token });
        if let Err(e) = self.opener.open(&url) {
            warn!("[SessionManager] Could not open approval page: {}", e);
        }
        info!("[SessionManager] Awaiting approval at {}", url);
        Ok(url)
    }

    /// Exchange the approved token from [`Self::begin_external_login`].
    ///
    /// On failure the login stays pending so the user can approve and retry.
    pub async fn complete_login(&self) -> AuthResult<UserProfile> {
        let Some(request_token) = self
            .state
            .with_state(|state| state.pending_request_token().map(str::to_owned))
        else {
            return Err(AuthError::NoPendingApproval);
        };
        self.state.set(SessionState::Authenticating);

        let result = match self.api.create_session(&request_token).await {
            Ok(session_id) => self.establish(request_token.clone(), session_id).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &result {
            warn!("[SessionManager] Completing login failed: {}", e);
            self.state
                .set(SessionState::AwaitingExternalApproval { request_token });
        }
        result
    }

    /// Fetch the profile for a fresh session, persist it and go live.
    async fn establish(&self, request_token: String, session_id: String) -> AuthResult<UserProfile> {
        let profile = match self.api.account_details(&session_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("[SessionManager] Failed to load profile for new session: {}", e);
                self.revoke_remote(&session_id).await;
                return Err(e.into());
            }
        };

        if let Err(e) = self
            .secrets
            .set_many(&[
                (keys::USER_TOKEN, request_token.as_str()),
                (keys::SESSION_ID, session_id.as_str()),
            ])
            .await
        {
            error!("[SessionManager] Failed to persist session: {}", e);
            self.revoke_remote(&session_id).await;
            return Err(e.into());
        }

        // Rejections seen during the handshake belong to the pending token
        self.expiry_gate.reset();
        let session = Session {
            request_token,
            session_id,
            account_id: profile.account_id(),
        };
        self.state.authenticate(session, profile.clone());
        info!(
            "[SessionManager] Authenticated as {} (account {})",
            profile.username,
            profile.account_id()
        );
        Ok(profile)
    }

    /// Revoke the session remotely, best effort, then forget it locally.
    pub async fn logout(&self) {
        let session_id = match self
            .state
            .with_state(|state| state.session().map(|session| session.session_id.clone()))
        {
            Some(id) => Some(id),
            None => self.secrets.get(keys::SESSION_ID).await.ok().flatten(),
        };

        if let Some(session_id) = session_id {
            self.revoke_remote(&session_id).await;
        }
        self.clear_local().await;
        info!("[SessionManager] Logged out");
    }

    /// Prompt, then force a logout. Returns `false` without doing anything
    /// when another caller is already handling an expiry.
    pub async fn handle_expiry(&self) -> bool {
        let Ok(_guard) = self.expiry_lock.try_lock() else {
            debug!("[SessionManager] Expiry already being handled");
            return false;
        };

        info!("[SessionManager] Session expired, prompting user");
        self.prompt.session_expired().await;
        self.logout().await;
        self.expiry_gate.reset();
        true
    }

    /// Wait for the client to report a rejected session and handle it.
    ///
    /// Rejections that arrive while no session is live (an unapproved token,
    /// a stale session during restore) are dropped.
    pub async fn watch_expiry(&self) -> bool {
        loop {
            self.expiry_gate.wait().await;

            if !self.state.is_authenticated() {
                debug!("[SessionManager] Ignoring rejection outside a live session");
                self.expiry_gate.reset();
                continue;
            }

            if self.handle_expiry().await {
                return true;
            }
            // Someone else holds the prompt; let them finish
            drop(self.expiry_lock.lock().await);
        }
    }

    /// Run [`Self::watch_expiry`] for the lifetime of the process.
    pub fn spawn_expiry_watcher(&self) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            loop {
                manager.watch_expiry().await;
            }
        })
    }

    /// Bring back the persisted session, if it is still accepted.
    pub async fn restore_session(&self) -> SessionState {
        let stored = async {
            let token = self.secrets.get(keys::USER_TOKEN).await?;
            let session_id = self.secrets.get(keys::SESSION_ID).await?;
            Ok::<_, StorageError>((token, session_id))
        };

        let (request_token, session_id) = match stored.await {
            Ok((Some(token), Some(session_id))) => (token, session_id),
            Ok((None, None)) => {
                debug!("[SessionManager] No stored session");
                self.state.clear();
                return self.state.current();
            }
            Ok(_) => {
                warn!("[SessionManager] Discarding incomplete stored session");
                self.clear_local().await;
                return self.state.current();
            }
            Err(e) => {
                error!("[SessionManager] Failed to read stored session: {}", e);
                self.clear_local().await;
                return self.state.current();
            }
        };

        self.state.set(SessionState::Authenticating);
        match self.api.account_details(&session_id).await {
            Ok(profile) => {
                self.expiry_gate.reset();
                let session = Session {
                    request_token,
                    session_id,
                    account_id: profile.account_id(),
                };
                info!("[SessionManager] Restored session for {}", profile.username);
                self.state.authenticate(session, profile);
            }
            Err(e) if e.is_session_expired() => {
                info!("[SessionManager] Stored session was rejected");
                self.handle_expiry().await;
            }
            Err(e) => {
                warn!("[SessionManager] Could not validate stored session: {}", e);
                self.clear_local().await;
            }
        }
        self.state.current()
    }

    /// Re-fetch the profile of the live session and replace it wholesale.
    pub async fn refresh_profile(&self) -> AuthResult<UserProfile> {
        let session_id = self
            .state
            .with_state(|state| state.session().map(|session| session.session_id.clone()))
            .ok_or(AuthError::NotAuthenticated)?;

        let profile = self.api.account_details(&session_id).await?;
        self.state.replace_profile(profile.clone());
        Ok(profile)
    }

    async fn revoke_remote(&self, session_id: &str) {
        match tokio::time::timeout(LOGOUT_TIMEOUT, self.api.delete_session(session_id)).await {
            Ok(Ok(_)) => debug!("[SessionManager] Remote session revoked"),
            Ok(Err(e)) => warn!("[SessionManager] Remote logout failed: {}", e),
            Err(_) => warn!("[SessionManager] Remote logout timed out"),
        }
    }

    /// Drop persisted secrets and go to `LoggedOut`. Storage failures are
    /// logged; the in-memory state is cleared regardless.
    async fn clear_local(&self) {
        if let Err(e) = self.secrets.delete_many(keys::ALL).await {
            error!("[SessionManager] Failed to clear stored secrets: {}", e);
        }
        self.state.clear();
    }
}
