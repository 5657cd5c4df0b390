//! Session store: the signed-in user and the persisted token.
//!
//! The store owns the lifecycle of the session token. It reads the token at
//! startup, writes it on sign-in and deletes it on sign-out. Every
//! successful server-side profile mutation is followed by a full profile
//! re-fetch; nothing is merged optimistically.

use crate::client::CookMeClient;
use crate::error::{ClientError, Result};
use crate::token_store::TokenStore;
use crate::types::AuthOutcome;
use cookme_core::{ImageAsset, ProfileUpdate, User};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const EMPTY_FIELDS_MESSAGE: &str = "Please don't leave the field empty";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
pub const SIGN_IN_ERROR_MESSAGE: &str = "An error occurred while signing in";
pub const SIGN_IN_SUCCESS_MESSAGE: &str = "Sign-in successful";
pub const SIGN_UP_ERROR_MESSAGE: &str = "An error occurred while signing up";
pub const SIGN_UP_SUCCESS_MESSAGE: &str = "Sign-up successful";

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    initialized: bool,
}

/// Which long-running session operation a busy flag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionActivity {
    SigningIn,
    SigningUp,
    UpdatingProfile,
    UploadingAvatar,
}

/// Sets a flag for the lifetime of the guard.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Current user plus the token lifecycle.
pub struct SessionStore {
    client: Arc<CookMeClient>,
    tokens: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
    staged: RwLock<ProfileUpdate>,
    signing_in: AtomicBool,
    signing_up: AtomicBool,
    updating_profile: AtomicBool,
    uploading_avatar: AtomicBool,
}

impl SessionStore {
    pub fn new(client: Arc<CookMeClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            tokens,
            state: RwLock::new(SessionState::default()),
            staged: RwLock::new(ProfileUpdate::default()),
            signing_in: AtomicBool::new(false),
            signing_up: AtomicBool::new(false),
            updating_profile: AtomicBool::new(false),
            uploading_avatar: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &Arc<CookMeClient> {
        &self.client
    }

    /// Restore the session from the persisted token.
    ///
    /// Fails open: any problem leaves the store initialized but signed out.
    pub async fn initialize(&self) {
        let token = match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read persisted token");
                None
            }
        };

        let user = match token {
            Some(token) => self.restore(token).await,
            None => {
                debug!("No persisted token");
                None
            }
        };

        let mut state = self.state.write().await;
        state.user = user;
        state.initialized = true;
    }

    async fn restore(&self, token: String) -> Option<User> {
        self.client.set_token(token).await;

        let restored = match self.client.verify_token().await {
            Ok(true) => self.client.get_profile().await.map(Some),
            Ok(false) => Ok(None),
            Err(e) => Err(e),
        };

        match restored {
            Ok(Some(user)) => {
                info!(username = %user.username, "Session restored");
                Some(user)
            }
            Ok(None) => {
                warn!("Persisted token was refused");
                self.client.clear_token().await;
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not restore session");
                self.client.clear_token().await;
                None
            }
        }
    }

    /// Sign in. Every outcome, including transport failures, is a value.
    pub async fn sign_in(&self, username: &str, password: &str) -> AuthOutcome {
        if username.is_empty() || password.is_empty() {
            return AuthOutcome::failure(EMPTY_FIELDS_MESSAGE);
        }

        let _busy = BusyGuard::new(&self.signing_in);

        match self.try_sign_in(username, password).await {
            Ok(user) => {
                info!(username = %user.username, "Signed in");
                self.state.write().await.user = Some(user);
                AuthOutcome::success(SIGN_IN_SUCCESS_MESSAGE)
            }
            Err(ClientError::Rejected(message)) => {
                warn!(message = %message, "Sign-in rejected");
                AuthOutcome::failure(message)
            }
            Err(ClientError::AuthFailed(_)) => AuthOutcome::failure(INVALID_CREDENTIALS_MESSAGE),
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                AuthOutcome::failure(SIGN_IN_ERROR_MESSAGE)
            }
        }
    }

    async fn try_sign_in(&self, username: &str, password: &str) -> Result<User> {
        let token = self.client.login(username, password).await?;

        let persisted = async {
            let user = self.client.get_profile_with(&token).await?;
            self.tokens.save(&token).await?;
            Ok::<User, ClientError>(user)
        }
        .await;

        if persisted.is_err() {
            self.client.clear_token().await;
        }
        persisted
    }

    /// Register an account. Does not sign in.
    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> AuthOutcome {
        if [username, password, first_name, last_name]
            .iter()
            .any(|field| field.is_empty())
        {
            return AuthOutcome::failure(EMPTY_FIELDS_MESSAGE);
        }

        let _busy = BusyGuard::new(&self.signing_up);

        match self
            .client
            .register(username, password, first_name, last_name)
            .await
        {
            Ok(outcome) if outcome.status => {
                if outcome.message.is_empty() {
                    AuthOutcome::success(SIGN_UP_SUCCESS_MESSAGE)
                } else {
                    outcome
                }
            }
            Ok(outcome) => {
                warn!(message = %outcome.message, "Sign-up rejected");
                if outcome.message.is_empty() {
                    AuthOutcome::failure(SIGN_UP_ERROR_MESSAGE)
                } else {
                    outcome
                }
            }
            Err(e) => {
                warn!(error = %e, "Sign-up failed");
                AuthOutcome::failure(SIGN_UP_ERROR_MESSAGE)
            }
        }
    }

    /// Forget the user and delete the persisted token. Safe to repeat.
    pub async fn sign_out(&self) -> Result<()> {
        self.state.write().await.user = None;
        *self.staged.write().await = ProfileUpdate::default();
        self.client.clear_token().await;

        self.tokens.delete().await?;
        info!("Signed out");
        Ok(())
    }

    /// Stage profile edits for the next [`submit_profile_update`](Self::submit_profile_update).
    pub async fn update_profile(
        &self,
        first_name: Option<String>,
        last_name: Option<String>,
        bio: Option<String>,
    ) {
        let id = self.state.read().await.user.as_ref().map(|u| u.id.clone());

        let mut staged = self.staged.write().await;
        staged.id = id;
        staged.merge(ProfileUpdate {
            id: None,
            first_name,
            last_name,
            bio,
        });
    }

    /// Edits staged but not yet sent.
    pub async fn staged_update(&self) -> ProfileUpdate {
        self.staged.read().await.clone()
    }

    /// Send the staged edits, then re-fetch the profile.
    pub async fn submit_profile_update(&self) -> Result<User> {
        let _busy = BusyGuard::new(&self.updating_profile);

        let update = self.staged.read().await.clone();
        if update.is_empty() {
            debug!("No staged profile edits");
            return self.refresh_profile().await;
        }

        let profile = self.client.profile().await?;
        profile.client().update(&update).await?;
        *self.staged.write().await = ProfileUpdate::default();

        self.refresh_profile().await
    }

    /// Replace the avatar, then re-fetch the profile.
    ///
    /// The previous image is deleted first when the profile has one; a
    /// failed delete is logged and the upload continues.
    pub async fn update_avatar(&self, image: &ImageAsset) -> Result<User> {
        let _busy = BusyGuard::new(&self.uploading_avatar);

        let profile = self.client.profile().await?;
        let previous = self
            .state
            .read()
            .await
            .user
            .as_ref()
            .and_then(|u| u.image_public_id.clone());

        if let Some(public_id) = previous {
            match profile.client().delete_avatar(&public_id).await {
                Ok(true) => debug!(public_id = %public_id, "Previous avatar deleted"),
                Ok(false) => debug!(public_id = %public_id, "Previous avatar already gone"),
                Err(e) => warn!(public_id = %public_id, error = %e, "Could not delete previous avatar"),
            }
        }

        profile.client().upload_avatar(image).await?;
        self.refresh_profile().await
    }

    /// Re-fetch the full profile and replace the cached user.
    pub async fn refresh_profile(&self) -> Result<User> {
        let user = self.client.get_profile().await?;
        self.state.write().await.user = Some(user.clone());
        debug!(username = %user.username, "Profile refreshed");
        Ok(user)
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    /// Whether [`initialize`](Self::initialize) has completed.
    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }

    pub fn is_busy(&self, activity: SessionActivity) -> bool {
        let flag = match activity {
            SessionActivity::SigningIn => &self.signing_in,
            SessionActivity::SigningUp => &self.signing_up,
            SessionActivity::UpdatingProfile => &self.updating_profile,
            SessionActivity::UploadingAvatar => &self.uploading_avatar,
        };
        flag.load(Ordering::SeqCst)
    }
}
