//! Cook Me Client
//!
//! HTTP client and client-side workflows for the Cook Me recipe API.
//!
//! # Features
//!
//! - **Session**: sign-in/sign-up, persisted token, profile edits and avatar
//! - **Lists**: recommended, trending, recent, personal, favorites, search
//! - **Search**: debounced search box state
//! - **Upload**: recipe submission (step images, create/update, cover,
//!   reconcile) as an explicit phase machine
//! - **Deep links**: recipe links routed to search, then the recipe
//!
//! # Example
//!
//! ```ignore
//! use cookme_client::{AppState, ClientSettings, ListKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::init(ClientSettings::load()?).await?;
//!
//!     let outcome = state.session.sign_in("ana", "secret").await;
//!     println!("{}", outcome.message);
//!
//!     state.lists.refresh(ListKind::Recent).await?;
//!     for recipe in state.lists.get(ListKind::Recent).await {
//!         println!("{}", recipe.title);
//!     }
//!
//!     state.dispose().await;
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod deep_link;
mod error;
mod lists;
mod orchestrator;
mod profile;
mod recipes;
mod search;
mod session;
mod settings;
mod state;
mod token_store;
mod types;
mod upload;

// Re-export main types
pub use client::{
    CookMeClient, ProfileClientHandle, RecipeClientHandle, UploadClientHandle, AUTH_HEADER,
    TOKEN_HEADER,
};
pub use deep_link::{
    parse_deep_link, DeepLinkAction, DeepLinkRouter, Route, DEFAULT_DETAIL_DELAY_MS,
    DEFAULT_SCHEME,
};
pub use error::{ClientError, Result};
pub use lists::{ListCaches, ListKind, SearchQuery};
pub use orchestrator::{
    SubmissionReport, UploadEvent, UploadOrchestrator, UploadPhase, DEFAULT_INFO,
};
pub use search::{Debouncer, ScheduledTask, SearchController, DEFAULT_DEBOUNCE_MS};
pub use session::{
    SessionActivity, SessionStore, EMPTY_FIELDS_MESSAGE, INVALID_CREDENTIALS_MESSAGE,
    SIGN_IN_ERROR_MESSAGE, SIGN_IN_SUCCESS_MESSAGE, SIGN_UP_ERROR_MESSAGE,
    SIGN_UP_SUCCESS_MESSAGE,
};
pub use settings::{ClientSettings, DEFAULT_SETTINGS_FILE, ENV_PREFIX};
pub use state::AppState;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
pub use types::{AuthOutcome, ClientConfig, CreateRecipeRequest, StatusResponse};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use profile::ProfileClient;
pub use recipes::RecipeClient;
pub use upload::{UploadClient, IMAGE_FIELD};
