/// User domain type
use super::{RecipeRef, UserId};
use serde::{Deserialize, Serialize};

/// User profile as returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,

    #[serde(default)]
    pub username: String,

    #[serde(rename = "firstName", default)]
    pub first_name: String,

    #[serde(rename = "lastName", default)]
    pub last_name: String,

    #[serde(default)]
    pub bio: Option<String>,

    /// Avatar URL
    #[serde(default)]
    pub image: Option<String>,

    /// Image-host id of the avatar, needed to delete it
    #[serde(default)]
    pub image_public_id: Option<String>,

    /// Recipes this user has favorited
    #[serde(rename = "favorites_id", default)]
    pub favorites: Vec<RecipeRef>,

    /// Recipes this user has authored
    #[serde(rename = "recipe_id", default)]
    pub recipes: Vec<RecipeRef>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Whether the given recipe is among this user's favorites
    pub fn has_favorite(&self, recipe_id: &super::RecipeId) -> bool {
        self.favorites.iter().any(|r| r.id() == recipe_id)
    }
}

/// Staged profile edits, sent as one update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.bio.is_none()
    }

    /// Fold `other` into `self`; fields set in `other` win.
    pub fn merge(&mut self, other: ProfileUpdate) {
        if other.first_name.is_some() {
            self.first_name = other.first_name;
        }
        if other.last_name.is_some() {
            self.last_name = other.last_name;
        }
        if other.bio.is_some() {
            self.bio = other.bio;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_profile() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "username": "ana",
            "firstName": "Ana",
            "lastName": "Cruz",
            "bio": null,
            "image": "https://img.example.com/ana.jpg",
            "image_public_id": "avatars/ana",
            "favorites_id": ["r9"],
            "recipe_id": [{"_id": "r1", "title": "Soup"}]
        }))
        .unwrap();

        assert_eq!(user.full_name(), "Ana Cruz");
        assert!(user.bio.is_none());
        assert!(user.has_favorite(&"r9".into()));
        assert!(!user.has_favorite(&"r1".into()));
        assert_eq!(user.recipes.len(), 1);
    }

    #[test]
    fn test_profile_update_merge_and_serialize() {
        let mut staged = ProfileUpdate {
            first_name: Some("Ana".into()),
            ..Default::default()
        };
        staged.merge(ProfileUpdate {
            bio: Some("Home cook".into()),
            ..Default::default()
        });

        let json = serde_json::to_value(&staged).unwrap();
        assert_eq!(json, json!({"firstName": "Ana", "bio": "Home cook"}));
        assert!(!staged.is_empty());
    }
}
