/// Recipe category tags
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category tag attached to a recipe.
///
/// The app offers a fixed set of meal categories. Tags the server sends
/// that are not in that set are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Breakfast,
    Brunch,
    Lunch,
    Dinner,
    Starter,
    Main,
    Dessert,
    Other(String),
}

impl Category {
    /// The categories offered when authoring or filtering.
    pub const ALL: [Category; 7] = [
        Category::Breakfast,
        Category::Brunch,
        Category::Lunch,
        Category::Dinner,
        Category::Starter,
        Category::Main,
        Category::Dessert,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Brunch => "Brunch",
            Category::Lunch => "Lunch",
            Category::Dinner => "Dinner",
            Category::Starter => "Starter",
            Category::Main => "Main",
            Category::Dessert => "Dessert",
            Category::Other(s) => s,
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Breakfast" => Category::Breakfast,
            "Brunch" => Category::Brunch,
            "Lunch" => Category::Lunch,
            "Dinner" => Category::Dinner,
            "Starter" => Category::Starter,
            "Main" => Category::Main,
            "Dessert" => Category::Dessert,
            _ => Category::Other(s),
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    /// Case-insensitive for the known set, verbatim otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let known = Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .cloned();
        Ok(known.unwrap_or_else(|| Category::Other(s.trim().to_string())))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
