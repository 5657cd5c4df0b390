//! Main Cook Me API client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::profile::ProfileClient;
use crate::recipes::RecipeClient;
use crate::types::{AuthOutcome, ClientConfig};
use crate::upload::UploadClient;
use cookme_core::User;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Header carrying the session token on authenticated calls.
pub const AUTH_HEADER: &str = "authorization_r";

/// Response header carrying the session token after login.
pub const TOKEN_HEADER: &str = "token";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Main client for the Cook Me API.
///
/// Holds the HTTP connection pool and the current session token. Token
/// persistence is not its concern; see `SessionStore`.
///
/// # Example
///
/// ```ignore
/// use cookme_client::{ClientConfig, CookMeClient};
///
/// let client = CookMeClient::new(ClientConfig::new("https://api.cookme.app"))?;
/// let token = client.login("ana", "secret").await?;
///
/// let recipes = client.recipes().await?;
/// let recent = recipes.client().recent().await?;
/// println!("{} recent recipes", recent.len());
/// ```
pub struct CookMeClient {
    http: Client,
    config: Arc<RwLock<ClientConfig>>,
}

impl CookMeClient {
    /// Create a new client with default timeouts.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_timeouts(config, DEFAULT_REQUEST_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with explicit request and connect timeouts.
    pub fn with_timeouts(
        config: ClientConfig,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(format!("CookMe/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(ClientConfig {
                url,
                token: config.token,
            })),
        })
    }

    /// Get the API base URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client holds a session token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.token.is_some()
    }

    /// Current session token.
    pub async fn token(&self) -> Option<String> {
        self.config.read().await.token.clone()
    }

    /// Set the session token (e.g., read back from the token store).
    pub async fn set_token(&self, token: impl Into<String>) {
        self.config.write().await.token = Some(token.into());
    }

    /// Forget the session token.
    pub async fn clear_token(&self) {
        self.config.write().await.token = None;
    }

    // ===== Authentication =====

    /// Login with username and password.
    ///
    /// On success the returned token is also kept for subsequent requests.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let url = self.url().await;
        let token = AuthClient::new(&self.http, &url)
            .login(username, password)
            .await?;

        self.set_token(token.clone()).await;
        Ok(token)
    }

    /// Register a new account. Does not sign in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AuthOutcome> {
        let url = self.url().await;
        AuthClient::new(&self.http, &url)
            .register(username, password, first_name, last_name)
            .await
    }

    /// Check the current token with the server.
    ///
    /// Returns `Ok(false)` when there is no token or the server refuses it.
    pub async fn verify_token(&self) -> Result<bool> {
        let (url, token) = {
            let config = self.config.read().await;
            match &config.token {
                Some(t) => (config.url.clone(), t.clone()),
                None => return Ok(false),
            }
        };

        AuthClient::new(&self.http, &url).verify(&token).await
    }

    /// Fetch the full profile of the signed-in user.
    pub async fn get_profile(&self) -> Result<User> {
        let (url, token) = self.credentials().await?;
        AuthClient::new(&self.http, &url).get_profile(&token).await
    }

    /// Fetch a profile with an explicit token (before it is stored).
    pub async fn get_profile_with(&self, token: &str) -> Result<User> {
        let url = self.url().await;
        AuthClient::new(&self.http, &url).get_profile(token).await
    }

    // ===== Authenticated sub-clients =====

    /// Get a recipe client for list, search and mutation calls.
    ///
    /// Returns an error if not authenticated.
    pub async fn recipes(&self) -> Result<RecipeClientHandle> {
        let (url, token) = self.credentials().await?;
        Ok(RecipeClientHandle {
            http: self.http.clone(),
            url,
            token,
        })
    }

    /// Get an upload client for multipart image uploads.
    ///
    /// Returns an error if not authenticated.
    pub async fn upload(&self) -> Result<UploadClientHandle> {
        let (url, token) = self.credentials().await?;
        Ok(UploadClientHandle {
            http: self.http.clone(),
            url,
            token,
        })
    }

    /// Get a profile client for profile edits.
    ///
    /// Returns an error if not authenticated.
    pub async fn profile(&self) -> Result<ProfileClientHandle> {
        let (url, token) = self.credentials().await?;
        Ok(ProfileClientHandle {
            http: self.http.clone(),
            url,
            token,
        })
    }

    async fn credentials(&self) -> Result<(String, String)> {
        let config = self.config.read().await;
        let token = config.token.clone().ok_or(ClientError::AuthRequired)?;
        Ok((config.url.clone(), token))
    }
}

/// Handle for recipe operations.
///
/// Returned by `CookMeClient::recipes()`; use `.client()` to borrow a
/// `RecipeClient`.
pub struct RecipeClientHandle {
    http: Client,
    url: String,
    token: String,
}

impl RecipeClientHandle {
    pub fn client(&self) -> RecipeClient<'_> {
        RecipeClient::new(&self.http, &self.url, &self.token)
    }
}

/// Handle for upload operations.
pub struct UploadClientHandle {
    http: Client,
    url: String,
    token: String,
}

impl UploadClientHandle {
    pub fn client(&self) -> UploadClient<'_> {
        UploadClient::new(&self.http, &self.url, &self.token)
    }
}

/// Handle for profile operations.
pub struct ProfileClientHandle {
    http: Client,
    url: String,
    token: String,
}

impl ProfileClientHandle {
    pub fn client(&self) -> ProfileClient<'_> {
        ProfileClient::new(&self.http, &self.url, &self.token)
    }
}

// =============================================================================
// Shared response handling
// =============================================================================

/// `Bearer <token>` value for [`AUTH_HEADER`].
pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Classify a send failure: connection problems become `ServerUnreachable`.
pub(crate) fn send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Turn a non-success response into the matching error.
pub(crate) async fn error_for_status(response: Response) -> ClientError {
    let status = response.status();
    if status.as_u16() == 401 {
        return ClientError::AuthRequired;
    }
    let message = response.text().await.unwrap_or_default();
    ClientError::ServerError {
        status: status.as_u16(),
        message,
    }
}

/// Parse a successful response body as `T`, or map the failure status.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    if !response.status().is_success() {
        return Err(error_for_status(response).await);
    }

    let body = response.json::<T>().await.map_err(|e| {
        ClientError::ParseError(format!("Failed to parse {}: {}", what, e))
    })?;
    debug!(what, "Parsed response");
    Ok(body)
}
