//! Recipe lists, search and mutations for the Cook Me API.

use crate::client::{bearer, read_json, send_error, AUTH_HEADER};
use crate::error::Result;
use crate::types::{
    CommentRequest, CreateRecipeRequest, CreateRecipeResponse, MyFavoritesResponse,
    MyRecipesResponse, RecentRecipesResponse, RecipeEnvelope, RecipeIdRequest, SearchRequest,
    StatusResponse, TopRecipesResponse,
};
use cookme_core::{Category, Recipe, RecipeId, UserId};
use reqwest::{Client, Method, RequestBuilder};
use tracing::{debug, info};

/// Recipe client for the Cook Me API.
pub struct RecipeClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: &'a str,
}

impl<'a> RecipeClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, token: &'a str) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Recipe request");
        self.http
            .request(method, url)
            .header(AUTH_HEADER, bearer(self.token))
    }

    // ===== Lists =====

    /// Personalised recommendations.
    pub async fn recommended(&self) -> Result<Vec<Recipe>> {
        let response = self
            .request(Method::GET, "/api/user/recipes/recommendations")
            .send()
            .await
            .map_err(send_error)?;

        let recipes: Vec<Recipe> = read_json(response, "recommendations").await?;
        debug!(count = recipes.len(), "Fetched recommendations");
        Ok(recipes)
    }

    /// Most liked recipes.
    pub async fn trending(&self) -> Result<Vec<Recipe>> {
        let response = self
            .request(Method::GET, "/api/user/get/all/best/recipe")
            .send()
            .await
            .map_err(send_error)?;

        let body: TopRecipesResponse = read_json(response, "top recipes").await?;
        let recipes = body.into_recipes("Trending recipes unavailable")?;
        debug!(count = recipes.len(), "Fetched trending recipes");
        Ok(recipes)
    }

    /// Most recently published recipes.
    pub async fn recent(&self) -> Result<Vec<Recipe>> {
        let response = self
            .request(Method::GET, "/api/user/get/all/recent/recipe")
            .send()
            .await
            .map_err(send_error)?;

        let body: RecentRecipesResponse = read_json(response, "recent recipes").await?;
        let recipes = body.into_recipes("Recent recipes unavailable")?;
        debug!(count = recipes.len(), "Fetched recent recipes");
        Ok(recipes)
    }

    /// Recipes authored by the signed-in user.
    pub async fn mine(&self) -> Result<Vec<Recipe>> {
        let response = self
            .request(Method::GET, "/api/user/get/all/my/recipe")
            .send()
            .await
            .map_err(send_error)?;

        let body: MyRecipesResponse = read_json(response, "my recipes").await?;
        let recipes = body.into_recipes("Your recipes are unavailable")?;
        debug!(count = recipes.len(), "Fetched my recipes");
        Ok(recipes)
    }

    /// Recipes the signed-in user marked as favorite.
    pub async fn favorites(&self) -> Result<Vec<Recipe>> {
        let response = self
            .request(Method::GET, "/api/user/get/all/my/favorites")
            .send()
            .await
            .map_err(send_error)?;

        let body: MyFavoritesResponse = read_json(response, "favorites").await?;
        let recipes = body.into_recipes("Favorites are unavailable")?;
        debug!(count = recipes.len(), "Fetched favorites");
        Ok(recipes)
    }

    /// Search by free text and categories. Empty text matches everything.
    pub async fn search(&self, text: &str, categories: &[Category]) -> Result<Vec<Recipe>> {
        let response = self
            .request(Method::POST, "/api/user/search/recipes")
            .json(&SearchRequest {
                search_text: text,
                categories,
            })
            .send()
            .await
            .map_err(send_error)?;

        let recipes: Vec<Recipe> = read_json(response, "search results").await?;
        debug!(
            text = %text,
            categories = categories.len(),
            count = recipes.len(),
            "Search complete"
        );
        Ok(recipes)
    }

    // ===== Mutations =====

    pub async fn add_favorite(&self, recipe_id: &RecipeId) -> Result<()> {
        let response = self
            .request(Method::PATCH, "/api/user/add/favorites")
            .json(&RecipeIdRequest { id: recipe_id })
            .send()
            .await
            .map_err(send_error)?;

        let body: StatusResponse = read_json(response, "add favorite response").await?;
        body.into_result("Could not add favorite")
    }

    pub async fn remove_favorite(&self, recipe_id: &RecipeId) -> Result<()> {
        let response = self
            .request(Method::PATCH, "/api/user/remove/favorites")
            .json(&RecipeIdRequest { id: recipe_id })
            .send()
            .await
            .map_err(send_error)?;

        let body: StatusResponse = read_json(response, "remove favorite response").await?;
        body.into_result("Could not remove favorite")
    }

    /// Post a comment on a recipe.
    pub async fn add_comment(
        &self,
        recipe_id: &RecipeId,
        user_id: &UserId,
        comment: &str,
    ) -> Result<()> {
        let response = self
            .request(Method::PATCH, "/api/user/recipe/comment")
            .json(&CommentRequest {
                comment,
                recipe_id,
                user_id,
            })
            .send()
            .await
            .map_err(send_error)?;

        let body: StatusResponse = read_json(response, "comment response").await?;
        body.into_result("Comment was refused")?;

        info!(recipe_id = %recipe_id, "Comment posted");
        Ok(())
    }

    /// Delete one of the signed-in user's recipes.
    pub async fn delete_recipe(&self, recipe_id: &RecipeId) -> Result<()> {
        let response = self
            .request(Method::DELETE, "/api/user/delete/recipe")
            .json(&RecipeIdRequest { id: recipe_id })
            .send()
            .await
            .map_err(send_error)?;

        let body: StatusResponse = read_json(response, "delete response").await?;
        body.into_result("Recipe could not be deleted")?;

        info!(recipe_id = %recipe_id, "Recipe deleted");
        Ok(())
    }

    /// Create a recipe, or update it when the request carries a known id.
    ///
    /// # Returns
    /// The id the server stored the recipe under.
    pub async fn create_recipe(&self, request: &CreateRecipeRequest) -> Result<RecipeId> {
        let response = self
            .request(Method::POST, "/api/create/recipe")
            .json(request)
            .send()
            .await
            .map_err(send_error)?;

        let body: CreateRecipeResponse = read_json(response, "create recipe response").await?;
        info!(
            recipe_id = %body.recipe_id,
            title = %request.title,
            methods = request.methods.len(),
            "Recipe saved"
        );
        Ok(body.recipe_id)
    }
}
