//! Profile edits for the Cook Me API.

use crate::client::{bearer, read_json, send_error, AUTH_HEADER};
use crate::error::Result;
use crate::types::{DeleteImageResponse, StatusResponse};
use crate::upload::image_form;
use cookme_core::{ImageAsset, ProfileUpdate};
use reqwest::Client;
use tracing::{debug, info};

/// Profile client for the Cook Me API.
pub struct ProfileClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: &'a str,
}

impl<'a> ProfileClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, token: &'a str) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Send staged profile edits.
    pub async fn update(&self, update: &ProfileUpdate) -> Result<()> {
        let url = format!("{}/api/user/update", self.base_url);
        debug!(url = %url, "Updating profile");

        let response = self
            .http
            .patch(&url)
            .header(AUTH_HEADER, bearer(self.token))
            .json(update)
            .send()
            .await
            .map_err(send_error)?;

        let body: StatusResponse = read_json(response, "profile update response").await?;
        body.into_result("Profile update was refused")?;

        info!("Profile updated");
        Ok(())
    }

    /// Delete the current avatar from the image host.
    ///
    /// Returns `false` when the host no longer had it.
    pub async fn delete_avatar(&self, public_id: &str) -> Result<bool> {
        let url = format!(
            "{}/api/user/delete/profile/{}",
            self.base_url,
            url::form_urlencoded::byte_serialize(public_id.as_bytes()).collect::<String>()
        );
        debug!(url = %url, public_id = %public_id, "Deleting avatar");

        let response = self
            .http
            .delete(&url)
            .header(AUTH_HEADER, bearer(self.token))
            .send()
            .await
            .map_err(send_error)?;

        let body: DeleteImageResponse = read_json(response, "avatar delete response").await?;
        Ok(body.result == "ok")
    }

    /// Upload a new avatar.
    pub async fn upload_avatar(&self, image: &ImageAsset) -> Result<()> {
        let url = format!("{}/api/user/upload/profile", self.base_url);
        debug!(url = %url, file = %image.name, "Uploading avatar");

        let form = image_form(image).await?;
        let response = self
            .http
            .post(&url)
            .header(AUTH_HEADER, bearer(self.token))
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        let body: StatusResponse = read_json(response, "avatar upload response").await?;
        body.into_result("Avatar upload was refused")?;

        info!(file = %image.name, "Avatar uploaded");
        Ok(())
    }
}
