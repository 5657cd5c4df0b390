//! Inbound deep links.
//!
//! A recipe link looks like `com.miruza.recipe://...?_id=<recipe id>`. It
//! opens the search screen first and, after a fixed delay, the recipe.

use crate::error::{ClientError, Result};
use cookme_core::RecipeId;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};
use url::Url;

/// Scheme the app registers for recipe links
pub const DEFAULT_SCHEME: &str = "com.miruza.recipe";

/// Delay between the search route and the recipe route, in milliseconds
pub const DEFAULT_DETAIL_DELAY_MS: u64 = 2500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLinkAction {
    OpenRecipe { id: RecipeId },
}

/// Screen a deep link navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search,
    RecipeDetail { id: RecipeId },
}

/// Parse a deep link URL into an action
///
/// Supported pattern:
/// - {scheme}://{anything}?_id={recipe id}
pub fn parse_deep_link(url: &str, scheme: &str) -> Result<DeepLinkAction> {
    let parsed =
        Url::parse(url).map_err(|e| ClientError::DeepLink(format!("Invalid URL: {}", e)))?;

    if parsed.scheme() != scheme {
        return Err(ClientError::DeepLink(format!(
            "Invalid scheme '{}', expected '{}'",
            parsed.scheme(),
            scheme
        )));
    }

    let id = parsed
        .query_pairs()
        .find(|(k, _)| k == "_id")
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ClientError::DeepLink("Missing query parameter '_id'".to_string()))?;

    Ok(DeepLinkAction::OpenRecipe {
        id: RecipeId::new(id),
    })
}

/// Turns deep links into timed route sequences.
#[derive(Debug, Clone)]
pub struct DeepLinkRouter {
    scheme: String,
    delay: Duration,
}

impl Default for DeepLinkRouter {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEME, Duration::from_millis(DEFAULT_DETAIL_DELAY_MS))
    }
}

impl DeepLinkRouter {
    pub fn new(scheme: impl Into<String>, delay: Duration) -> Self {
        Self {
            scheme: scheme.into(),
            delay,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Routes for a link, in order. Links that don't parse give none.
    pub fn routes(&self, url: &str) -> Vec<Route> {
        match parse_deep_link(url, &self.scheme) {
            Ok(DeepLinkAction::OpenRecipe { id }) => vec![Route::Search, Route::RecipeDetail { id }],
            Err(e) => {
                debug!(url = %url, error = %e, "Ignoring deep link");
                Vec::new()
            }
        }
    }

    /// Send the routes for `url`, waiting the configured delay before
    /// each route after the first.
    ///
    /// Returns how many routes were delivered; stops early if the receiver
    /// is gone.
    pub async fn dispatch(&self, url: &str, routes: &mpsc::Sender<Route>) -> usize {
        let mut sent = 0;
        for (i, route) in self.routes(url).into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.delay).await;
            }
            debug!(?route, "Deep link route");
            if routes.send(route).await.is_err() {
                break;
            }
            sent += 1;
        }
        if sent > 0 {
            info!(url = %url, routes = sent, "Deep link handled");
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_parse_recipe_link() {
        let result = parse_deep_link("com.miruza.recipe://recipe?_id=abc123", DEFAULT_SCHEME).unwrap();
        match result {
            DeepLinkAction::OpenRecipe { id } => assert_eq!(id.as_str(), "abc123"),
        }
    }

    #[test]
    fn test_parse_ignores_other_params() {
        let result =
            parse_deep_link("com.miruza.recipe:///?utm=x&_id=r%2F1", DEFAULT_SCHEME).unwrap();
        assert_eq!(
            result,
            DeepLinkAction::OpenRecipe {
                id: RecipeId::new("r/1")
            }
        );
    }

    #[test]
    fn test_parse_wrong_scheme() {
        assert!(matches!(
            parse_deep_link("https://example.com/?_id=abc", DEFAULT_SCHEME),
            Err(ClientError::DeepLink(_))
        ));
    }

    #[test]
    fn test_parse_missing_id() {
        assert!(parse_deep_link("com.miruza.recipe://recipe", DEFAULT_SCHEME).is_err());
        assert!(parse_deep_link("com.miruza.recipe://recipe?_id=", DEFAULT_SCHEME).is_err());
    }

    #[test]
    fn test_parse_invalid_url() {
        assert!(parse_deep_link("not a url", DEFAULT_SCHEME).is_err());
    }

    #[test]
    fn test_routes() {
        let router = DeepLinkRouter::default();
        assert_eq!(
            router.routes("com.miruza.recipe://open?_id=r9"),
            vec![
                Route::Search,
                Route::RecipeDetail {
                    id: RecipeId::new("r9")
                }
            ]
        );
        assert!(router.routes("com.miruza.recipe://open").is_empty());
        assert!(router.routes("other://open?_id=r9").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_waits_before_detail() {
        let router = DeepLinkRouter::default();
        let (tx, mut rx) = mpsc::channel(4);
        let start = Instant::now();

        let task = tokio::spawn(async move {
            router.dispatch("com.miruza.recipe://open?_id=r9", &tx).await
        });

        assert_eq!(rx.recv().await, Some(Route::Search));
        assert!(start.elapsed() < Duration::from_millis(10));

        assert_eq!(
            rx.recv().await,
            Some(Route::RecipeDetail {
                id: RecipeId::new("r9")
            })
        );
        assert!(start.elapsed() >= Duration::from_millis(DEFAULT_DETAIL_DELAY_MS));

        assert_eq!(task.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_invalid_link_sends_nothing() {
        let router = DeepLinkRouter::default();
        let (tx, mut rx) = mpsc::channel(4);

        assert_eq!(router.dispatch("com.miruza.recipe://open", &tx).await, 0);
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }
}
