//! Independently fetched recipe lists.
//!
//! Each list is a denormalized copy of what its endpoint returned, in server
//! order. A failed refresh keeps the previous contents and reports the
//! error. Mutations never touch the caches optimistically; they re-fetch the
//! lists they affect.

use crate::client::CookMeClient;
use crate::error::{ClientError, Result};
use crate::session::SessionStore;
use cookme_core::{Category, Recipe, RecipeId, MAX_CATEGORIES};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// One cached list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Recommended,
    Trending,
    Recent,
    /// Recipes authored by the signed-in user
    Mine,
    Favorites,
    /// Results of the last search
    Search,
}

impl ListKind {
    pub const ALL: [ListKind; 6] = [
        ListKind::Recommended,
        ListKind::Trending,
        ListKind::Recent,
        ListKind::Mine,
        ListKind::Favorites,
        ListKind::Search,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Recommended => "recommended",
            ListKind::Trending => "trending",
            ListKind::Recent => "recent",
            ListKind::Mine => "mine",
            ListKind::Favorites => "favorites",
            ListKind::Search => "search",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search text plus up to [`MAX_CATEGORIES`] category filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    categories: Vec<Category>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, categories: impl IntoIterator<Item = Category>) -> Self {
        let mut query = Self {
            text: text.into(),
            categories: Vec::new(),
        };
        for category in categories {
            if !query.categories.contains(&category) {
                query.toggle_category(category);
            }
        }
        query
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Select or deselect a filter; a filter beyond the cap is ignored.
    ///
    /// Returns whether the filter set changed.
    pub fn toggle_category(&mut self, category: Category) -> bool {
        if let Some(pos) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(pos);
            true
        } else if self.categories.len() < MAX_CATEGORIES {
            self.categories.push(category);
            true
        } else {
            false
        }
    }
}

/// The recipe lists shown across the app.
pub struct ListCaches {
    client: Arc<CookMeClient>,
    session: Arc<SessionStore>,
    lists: RwLock<HashMap<ListKind, Vec<Recipe>>>,
    last_query: RwLock<SearchQuery>,
}

impl ListCaches {
    pub fn new(client: Arc<CookMeClient>, session: Arc<SessionStore>) -> Self {
        Self {
            client,
            session,
            lists: RwLock::new(HashMap::new()),
            last_query: RwLock::new(SearchQuery::default()),
        }
    }

    /// Current contents of a list (empty if never fetched).
    pub async fn get(&self, kind: ListKind) -> Vec<Recipe> {
        self.lists
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// The query the search list was last fetched with.
    pub async fn last_query(&self) -> SearchQuery {
        self.last_query.read().await.clone()
    }

    /// Re-fetch one list.
    ///
    /// `Search` re-runs the last query.
    pub async fn refresh(&self, kind: ListKind) -> Result<usize> {
        let fetched = self.fetch(kind).await;
        self.store(kind, fetched).await
    }

    /// Pull-to-refresh for the home screen: recent, trending and
    /// recommended, concurrently.
    pub async fn refresh_home(&self) -> Vec<(ListKind, Result<usize>)> {
        let kinds = [ListKind::Recent, ListKind::Trending, ListKind::Recommended];
        let results = join_all(kinds.iter().map(|kind| self.refresh(*kind))).await;
        kinds.into_iter().zip(results).collect()
    }

    /// Run a search and remember the query.
    pub async fn search(&self, query: SearchQuery) -> Result<usize> {
        *self.last_query.write().await = query;
        self.refresh(ListKind::Search).await
    }

    async fn fetch(&self, kind: ListKind) -> Result<Vec<Recipe>> {
        let recipes = self.client.recipes().await?;
        let recipes = recipes.client();
        match kind {
            ListKind::Recommended => recipes.recommended().await,
            ListKind::Trending => recipes.trending().await,
            ListKind::Recent => recipes.recent().await,
            ListKind::Mine => recipes.mine().await,
            ListKind::Favorites => recipes.favorites().await,
            ListKind::Search => {
                let query = self.last_query().await;
                recipes.search(&query.text, query.categories()).await
            }
        }
    }

    async fn store(&self, kind: ListKind, fetched: Result<Vec<Recipe>>) -> Result<usize> {
        match fetched {
            Ok(recipes) => {
                let count = recipes.len();
                self.lists.write().await.insert(kind, recipes);
                debug!(list = %kind, count, "List refreshed");
                Ok(count)
            }
            Err(e) => {
                warn!(list = %kind, error = %e, "List refresh failed; keeping previous contents");
                Err(e)
            }
        }
    }

    // ===== Mutations =====

    pub async fn add_favorite(&self, recipe_id: &RecipeId) -> Result<()> {
        self.client
            .recipes()
            .await?
            .client()
            .add_favorite(recipe_id)
            .await
            .map_err(|e| {
                warn!(recipe_id = %recipe_id, error = %e, "Add favorite failed");
                e
            })?;
        info!(recipe_id = %recipe_id, "Added favorite");
        self.after_membership_change().await
    }

    pub async fn remove_favorite(&self, recipe_id: &RecipeId) -> Result<()> {
        self.client
            .recipes()
            .await?
            .client()
            .remove_favorite(recipe_id)
            .await
            .map_err(|e| {
                warn!(recipe_id = %recipe_id, error = %e, "Remove favorite failed");
                e
            })?;
        info!(recipe_id = %recipe_id, "Removed favorite");
        self.after_membership_change().await
    }

    /// Flip the favorite state according to the current profile.
    ///
    /// Returns whether the recipe is now a favorite.
    pub async fn toggle_favorite(&self, recipe_id: &RecipeId) -> Result<bool> {
        let is_favorite = self
            .session
            .current_user()
            .await
            .is_some_and(|user| user.has_favorite(recipe_id));

        if is_favorite {
            self.remove_favorite(recipe_id).await?;
        } else {
            self.add_favorite(recipe_id).await?;
        }
        Ok(!is_favorite)
    }

    /// Comment as the signed-in user, then re-fetch the user's recipes.
    pub async fn add_comment(&self, recipe_id: &RecipeId, text: &str) -> Result<()> {
        let user = self
            .session
            .current_user()
            .await
            .ok_or(ClientError::AuthRequired)?;

        self.client
            .recipes()
            .await?
            .client()
            .add_comment(recipe_id, &user.id, text)
            .await
            .map_err(|e| {
                warn!(recipe_id = %recipe_id, error = %e, "Comment failed");
                e
            })?;

        self.refresh(ListKind::Mine).await.map(|_| ())
    }

    pub async fn delete_recipe(&self, recipe_id: &RecipeId) -> Result<()> {
        self.client
            .recipes()
            .await?
            .client()
            .delete_recipe(recipe_id)
            .await
            .map_err(|e| {
                warn!(recipe_id = %recipe_id, error = %e, "Delete failed");
                e
            })?;
        self.after_membership_change().await
    }

    /// Re-fetch the profile plus the personal and favorite lists.
    ///
    /// The first failure is returned after all three have been attempted.
    async fn after_membership_change(&self) -> Result<()> {
        let (profile, mine, favorites) = tokio::join!(
            self.session.refresh_profile(),
            self.refresh(ListKind::Mine),
            self.refresh(ListKind::Favorites),
        );

        if let Err(e) = &profile {
            warn!(error = %e, "Profile refresh failed");
        }
        profile.map(|_| ())?;
        mine?;
        favorites?;
        Ok(())
    }

    /// Drop every cached list (e.g. on sign-out).
    pub async fn clear(&self) {
        self.lists.write().await.clear();
        *self.last_query.write().await = SearchQuery::default();
    }
}
