//! Cook Me Core
//!
//! Platform-agnostic domain types and the recipe draft buffer for Cook Me.
//!
//! This crate has no network dependencies. It is shared by the HTTP client
//! (`cookme-client`) and any front end that edits recipes.
//!
//! # Architecture
//!
//! - **Domain Types**: `User`, `Recipe`, `Ingredient`, `Comment`, `Category`, ...
//! - **Draft Buffer**: `RecipeDraft` holds in-progress edits and validates
//!   them before submission
//! - **Error Handling**: `CoreError`, `DraftError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use cookme_core::{Category, ImageAsset, RecipeDraft};
//!
//! let mut draft = RecipeDraft::new();
//! draft.set_cover(ImageAsset::from_uri("/tmp/pancakes.jpg"));
//! draft.set_title("Pancakes");
//! draft.add_ingredient();
//! draft.set_ingredient(0, "2 eggs").unwrap();
//! draft.add_ingredient();
//! draft.set_ingredient(1, "200g flour").unwrap();
//! draft.set_category(Category::Breakfast);
//!
//! assert!(draft.validate().is_ok());
//! ```

#![forbid(unsafe_code)]

pub mod draft;
pub mod error;
pub mod types;

pub use draft::{DraftStep, RecipeDraft, StepImage, MAX_CATEGORIES, MIN_INGREDIENTS};
pub use error::{CoreError, DraftError, Result};
pub use types::{
    Author, Category, Comment, CommentUser, CoverImage, ImageAsset, Ingredient, ProfileUpdate,
    Recipe, RecipeId, RecipeMethod, RecipeRef, StepId, UploadedImage, User, UserId,
};
