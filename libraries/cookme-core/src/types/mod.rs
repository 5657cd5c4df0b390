//! Domain types for Cook Me
//!
//! Field names follow the remote API's JSON (`_id`, `firstName`,
//! `isSection`, ...) through serde renames; the Rust side uses snake case.

mod category;
mod ids;
mod image;
mod recipe;
mod user;

pub use category::Category;
pub use ids::{RecipeId, StepId, UserId};
pub use image::{CoverImage, ImageAsset, UploadedImage};
pub use recipe::{Author, Comment, CommentUser, Ingredient, Recipe, RecipeMethod, RecipeRef};
pub use user::{ProfileUpdate, User};
