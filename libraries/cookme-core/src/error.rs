/// Core error types for Cook Me
use crate::types::StepId;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Reasons a draft edit or a draft submission is refused.
///
/// The `Display` text of the validation variants is the message shown to
/// the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Please select cover image")]
    MissingCover,

    #[error("Please provide a title for the recipe.")]
    MissingTitle,

    #[error("Please provide at least 2 ingredients.")]
    NotEnoughIngredients { found: usize },

    #[error("Please select at least one category.")]
    NoCategory,

    /// Step id does not belong to this draft
    #[error("Step not found: {0}")]
    StepNotFound(StepId),

    /// Index past the end of the ingredient list
    #[error("Ingredient index {index} out of range (len {len})")]
    IngredientOutOfRange { index: usize, len: usize },

    /// Index past the end of the step list
    #[error("Step index {index} out of range (len {len})")]
    StepOutOfRange { index: usize, len: usize },
}

impl DraftError {
    /// Whether this error blocks submission (as opposed to a bad edit).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingCover | Self::MissingTitle | Self::NotEnoughIngredients { .. } | Self::NoCategory
        )
    }
}

/// Core error type for Cook Me
#[derive(Error, Debug)]
pub enum CoreError {
    /// Draft edit or validation errors
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
