//! Types for Cook Me API requests and responses.
//!
//! Every response is parsed into one of these schemas before use; a shape
//! mismatch surfaces as `ClientError::ParseError`.

use crate::error::{ClientError, Result};
use cookme_core::{Category, Ingredient, Recipe, RecipeId, RecipeMethod, UserId};
use serde::{Deserialize, Serialize};

/// Configuration for connecting to the Cook Me API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.cookme.app")
    pub url: String,
    /// Current session token (if authenticated)
    pub token: Option<String>,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
        }
    }

    /// Create a config with an existing session token.
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: Some(token.into()),
        }
    }
}

// =============================================================================
// Common
// =============================================================================

/// `{status, message}` envelope used by most mutating endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    /// `Ok` when the server reported success, `Rejected` otherwise.
    pub fn into_result(self, fallback: &str) -> Result<()> {
        if self.status {
            Ok(())
        } else {
            Err(ClientError::Rejected(
                self.message.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

/// Body carrying just a recipe id (favorites, delete).
#[derive(Debug, Clone, Serialize)]
pub struct RecipeIdRequest<'a> {
    #[serde(rename = "_id")]
    pub id: &'a RecipeId,
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Request body for the register endpoint.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    #[serde(rename = "firstName")]
    pub first_name: &'a str,
    #[serde(rename = "lastName")]
    pub last_name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Result of sign-in / sign-up as shown to the user.
///
/// These flows never fail with an error; every outcome is a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub status: bool,
    pub message: String,
}

impl AuthOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}

/// Response of the avatar delete endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteImageResponse {
    /// "ok" or "not found"
    #[serde(default)]
    pub result: String,
}

// =============================================================================
// Recipe Types
// =============================================================================

/// Body of the create endpoint. An empty `_id` creates, a known one updates.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecipeRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub info: String,
    pub ingredients: Vec<Ingredient>,
    pub categories: Vec<Category>,
    pub methods: Vec<RecipeMethod>,
}

/// Response from the create endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeResponse {
    pub recipe_id: RecipeId,
}

/// Request body for the search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    #[serde(rename = "searchText")]
    pub search_text: &'a str,
    pub categories: &'a [Category],
}

/// Request body for the comment endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest<'a> {
    pub comment: &'a str,
    pub recipe_id: &'a RecipeId,
    pub user_id: &'a UserId,
}

/// `GET /api/user/get/all/my/recipe`
#[derive(Debug, Clone, Deserialize)]
pub struct MyRecipesResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub recipe_id: Vec<Recipe>,
}

/// `GET /api/user/get/all/my/favorites`
#[derive(Debug, Clone, Deserialize)]
pub struct MyFavoritesResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub favorites_id: Vec<Recipe>,
}

/// `GET /api/user/get/all/recent/recipe`
#[derive(Debug, Clone, Deserialize)]
pub struct RecentRecipesResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "mostRecentRecipe", default)]
    pub recipes: Vec<Recipe>,
}

/// `GET /api/user/get/all/best/recipe`
#[derive(Debug, Clone, Deserialize)]
pub struct TopRecipesResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "topLikedRecipes", default)]
    pub recipes: Vec<Recipe>,
}

/// A list envelope: the recipes only count when `status` is true.
pub trait RecipeEnvelope {
    fn into_parts(self) -> (StatusResponse, Vec<Recipe>);

    fn into_recipes(self, fallback: &str) -> Result<Vec<Recipe>>
    where
        Self: Sized,
    {
        let (status, recipes) = self.into_parts();
        status.into_result(fallback)?;
        Ok(recipes)
    }
}

impl RecipeEnvelope for MyRecipesResponse {
    fn into_parts(self) -> (StatusResponse, Vec<Recipe>) {
        let status = StatusResponse {
            status: self.status,
            message: self.message,
        };
        (status, self.recipe_id)
    }
}

impl RecipeEnvelope for MyFavoritesResponse {
    fn into_parts(self) -> (StatusResponse, Vec<Recipe>) {
        let status = StatusResponse {
            status: self.status,
            message: self.message,
        };
        (status, self.favorites_id)
    }
}

impl RecipeEnvelope for RecentRecipesResponse {
    fn into_parts(self) -> (StatusResponse, Vec<Recipe>) {
        let status = StatusResponse {
            status: self.status,
            message: self.message,
        };
        (status, self.recipes)
    }
}

impl RecipeEnvelope for TopRecipesResponse {
    fn into_parts(self) -> (StatusResponse, Vec<Recipe>) {
        let status = StatusResponse {
            status: self.status,
            message: self.message,
        };
        (status, self.recipes)
    }
}
