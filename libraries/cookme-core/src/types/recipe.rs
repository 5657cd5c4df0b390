/// Recipe domain types, as persisted by the server
use super::{Category, RecipeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a recipe's ingredient list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub value: String,
    /// Marks a section header ("For the sauce") rather than an ingredient
    #[serde(rename = "isSection", default)]
    pub is_section: bool,
}

impl Ingredient {
    pub fn item(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_section: false,
        }
    }

    pub fn section(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_section: true,
        }
    }
}

/// A persisted method step.
///
/// Steps with an image carry the uploaded image fields inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeMethod {
    pub value: String,
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

/// Recipe author, as populated by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Comment author: populated profile or bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentUser {
    Profile {
        #[serde(rename = "firstName", default)]
        first_name: String,
        #[serde(rename = "lastName", default)]
        last_name: String,
        #[serde(default)]
        image: Option<String>,
    },
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment: String,
    #[serde(rename = "user_id", default)]
    pub user: Option<CommentUser>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A recipe as returned by the list, search and profile endpoints.
///
/// Every list holds its own copy; the same id in two lists is two values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub info: String,
    /// Cover image URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub methods: Vec<RecipeMethod>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(rename = "comments_id", default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Methods in step order (the server does not guarantee it).
    pub fn ordered_methods(&self) -> Vec<&RecipeMethod> {
        let mut methods: Vec<&RecipeMethod> = self.methods.iter().collect();
        methods.sort_by_key(|m| m.number);
        methods
    }
}

/// Back-reference from a user to a recipe.
///
/// The profile endpoint returns either bare ids or populated recipes
/// depending on the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeRef {
    Id(RecipeId),
    Recipe(Box<Recipe>),
}

impl RecipeRef {
    pub fn id(&self) -> &RecipeId {
        match self {
            RecipeRef::Id(id) => id,
            RecipeRef::Recipe(recipe) => &recipe.id,
        }
    }
}
