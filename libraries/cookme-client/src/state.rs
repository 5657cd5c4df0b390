//! Application state aggregate.
//!
//! Wires the client, session, lists, orchestrator, search controller and
//! deep-link router together with an explicit `init` / `dispose` lifecycle.

use crate::client::CookMeClient;
use crate::deep_link::DeepLinkRouter;
use crate::error::Result;
use crate::lists::{ListCaches, ListKind, SearchQuery};
use crate::orchestrator::UploadOrchestrator;
use crate::search::SearchController;
use crate::session::SessionStore;
use crate::settings::ClientSettings;
use crate::token_store::{FileTokenStore, TokenStore};
use crate::types::ClientConfig;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState {
    pub settings: ClientSettings,
    pub client: Arc<CookMeClient>,
    pub session: Arc<SessionStore>,
    pub lists: Arc<ListCaches>,
    pub orchestrator: UploadOrchestrator,
    pub search: SearchController,
    pub deep_links: DeepLinkRouter,
}

impl AppState {
    /// Build the state without touching the network or the token store.
    pub fn new(settings: ClientSettings, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        settings.validate()?;

        let client = Arc::new(CookMeClient::with_timeouts(
            ClientConfig::new(settings.api_url.clone()),
            settings.request_timeout(),
            settings.connect_timeout(),
        )?);
        let session = Arc::new(SessionStore::new(Arc::clone(&client), tokens));
        let lists = Arc::new(ListCaches::new(Arc::clone(&client), Arc::clone(&session)));
        let orchestrator =
            UploadOrchestrator::new(Arc::clone(&client), Arc::clone(&session), Arc::clone(&lists));
        let search = SearchController::new(Arc::clone(&lists), settings.search_debounce());
        let deep_links =
            DeepLinkRouter::new(settings.deep_link_scheme.clone(), settings.deep_link_delay());

        Ok(Self {
            settings,
            client,
            session,
            lists,
            orchestrator,
            search,
            deep_links,
        })
    }

    /// Build the state with the file token store, restore the session and
    /// prime the lists.
    pub async fn init(settings: ClientSettings) -> Result<Self> {
        let state = Self::with_file_store(settings)?;
        state.start().await;
        Ok(state)
    }

    /// Build the state with the file token store and restore the session
    /// only. Lists stay empty until refreshed.
    pub async fn open(settings: ClientSettings) -> Result<Self> {
        let state = Self::with_file_store(settings)?;
        state.session.initialize().await;
        Ok(state)
    }

    fn with_file_store(settings: ClientSettings) -> Result<Self> {
        let tokens = Arc::new(FileTokenStore::new(settings.token_dir.clone()));
        Self::new(settings, tokens)
    }

    /// Restore the session and, when signed in, prime the personal,
    /// favorite and search lists.
    pub async fn start(&self) {
        self.session.initialize().await;

        if !self.session.is_authenticated().await {
            info!("Started signed out");
            return;
        }

        let (mine, favorites, search) = tokio::join!(
            self.lists.refresh(ListKind::Mine),
            self.lists.refresh(ListKind::Favorites),
            self.lists.search(SearchQuery::default()),
        );
        for (kind, result) in [
            (ListKind::Mine, mine),
            (ListKind::Favorites, favorites),
            (ListKind::Search, search),
        ] {
            if let Err(e) = result {
                warn!(list = %kind, error = %e, "Initial list fetch failed");
            }
        }
        info!("Started signed in");
    }

    /// Sign out and forget cached lists.
    pub async fn sign_out(&self) -> Result<()> {
        self.search.cancel();
        self.lists.clear().await;
        self.session.sign_out().await
    }

    /// Stop background work. The persisted token is kept.
    pub async fn dispose(self) {
        self.search.cancel();
        self.lists.clear().await;
        info!("State disposed");
    }
}
