//! Authentication calls for the Cook Me API.

use crate::client::{bearer, error_for_status, read_json, send_error, AUTH_HEADER, TOKEN_HEADER};
use crate::error::{ClientError, Result};
use crate::types::{AuthOutcome, LoginRequest, RegisterRequest, StatusResponse};
use cookme_core::User;
use reqwest::Client;
use tracing::{debug, info, warn};

/// Authentication client for the Cook Me API.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Login with username and password.
    ///
    /// The session token arrives in the `token` response header.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let url = format!("{}/api/user/login", self.base_url);
        debug!(url = %url, username = %username, "Attempting login");

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            let token = response
                .headers()
                .get(TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string());

            let body: StatusResponse = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse login response: {}", e))
            })?;
            body.into_result("Sign-in was refused")?;

            let token = token.filter(|t| !t.is_empty()).ok_or_else(|| {
                ClientError::ParseError("Login response carried no token header".to_string())
            })?;

            info!(username = %username, "Login successful");
            Ok(token)
        } else if status.as_u16() == 401 {
            warn!(status = %status, "Login failed: invalid credentials");
            Err(ClientError::AuthFailed(
                "Invalid username or password".to_string(),
            ))
        } else {
            Err(error_for_status(response).await)
        }
    }

    /// Register a new account.
    ///
    /// A `status: false` reply (e.g. username taken) is relayed as a failed
    /// outcome rather than an error.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AuthOutcome> {
        let url = format!("{}/api/user/register", self.base_url);
        debug!(url = %url, username = %username, "Registering account");

        let response = self
            .http
            .post(&url)
            .json(&RegisterRequest {
                first_name,
                last_name,
                username,
                password,
            })
            .send()
            .await
            .map_err(send_error)?;

        let body: StatusResponse = read_json(response, "register response").await?;
        let message = body.message.unwrap_or_default();

        if body.status {
            info!(username = %username, "Account registered");
            Ok(AuthOutcome::success(message))
        } else {
            Ok(AuthOutcome::failure(message))
        }
    }

    /// Ask the server whether a token is still valid.
    pub async fn verify(&self, token: &str) -> Result<bool> {
        let url = format!("{}/api/user/verify", self.base_url);
        debug!(url = %url, "Verifying token");

        let response = self
            .http
            .post(&url)
            .header(AUTH_HEADER, bearer(token))
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Ok(false)
        } else {
            Err(error_for_status(response).await)
        }
    }

    /// Get the full profile for a token.
    pub async fn get_profile(&self, token: &str) -> Result<User> {
        let url = format!("{}/api/user/profile", self.base_url);
        debug!(url = %url, "Fetching profile");

        let response = self
            .http
            .get(&url)
            .header(AUTH_HEADER, bearer(token))
            .send()
            .await
            .map_err(send_error)?;

        read_json(response, "user profile").await
    }
}
