//! Image upload operations for the Cook Me API.

use crate::client::{bearer, read_json, send_error, AUTH_HEADER};
use crate::error::{ClientError, Result};
use crate::types::StatusResponse;
use cookme_core::{ImageAsset, RecipeId, UploadedImage};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info};

/// Multipart field the server reads the image from.
pub const IMAGE_FIELD: &str = "image";

/// Upload client for the Cook Me API.
pub struct UploadClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: &'a str,
}

impl<'a> UploadClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, token: &'a str) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Upload one step image to the image host.
    ///
    /// # Returns
    /// The hosted URL and public id to embed in the recipe's methods.
    pub async fn upload_step_image(&self, image: &ImageAsset) -> Result<UploadedImage> {
        let url = format!("{}/api/upload/recipe/methods/image", self.base_url);
        debug!(url = %url, file = %image.name, "Uploading step image");

        let form = image_form(image).await?;
        let response = self
            .http
            .post(&url)
            .header(AUTH_HEADER, bearer(self.token))
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        let uploaded: UploadedImage = read_json(response, "step image upload response").await?;
        info!(file = %image.name, url = %uploaded.secure_url, "Step image uploaded");
        Ok(uploaded)
    }

    /// Upload the cover image of an already created recipe.
    pub async fn upload_cover_image(&self, recipe_id: &RecipeId, image: &ImageAsset) -> Result<()> {
        let url = format!("{}/api/upload/recipe/image/{}", self.base_url, recipe_id);
        debug!(url = %url, file = %image.name, "Uploading cover image");

        let form = image_form(image).await?;
        let response = self
            .http
            .post(&url)
            .header(AUTH_HEADER, bearer(self.token))
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        let body: StatusResponse = read_json(response, "cover upload response").await?;
        body.into_result("Cover upload was refused")?;

        info!(recipe_id = %recipe_id, file = %image.name, "Cover image uploaded");
        Ok(())
    }
}

/// Read a local image into a one-part multipart form.
pub(crate) async fn image_form(image: &ImageAsset) -> Result<Form> {
    let path = image.local_path();
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(ClientError::FileNotFound(path.display().to_string()));
    }

    let contents = tokio::fs::read(&path).await?;
    let size = contents.len();

    let part = Part::bytes(contents)
        .file_name(image.name.clone())
        .mime_str(&image.mime_type)?;

    debug!(file = %image.name, size, mime = %image.mime_type, "Prepared image part");
    Ok(Form::new().part(IMAGE_FIELD, part))
}
