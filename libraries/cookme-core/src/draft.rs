//! Recipe draft buffer
//!
//! Holds the in-progress edits of a new recipe, or of an existing one opened
//! for editing, until the user saves or discards them. Nothing here touches
//! the network: step images stay local until submission.
//!
//! Invariants kept by every mutation:
//! - at most [`MAX_CATEGORIES`] categories are selected, without duplicates
//! - step numbers are `1..=N` in list order

use crate::error::{CoreError, DraftError, Result};
use crate::types::{
    Category, CoverImage, ImageAsset, Ingredient, Recipe, RecipeId, StepId, UploadedImage,
};
use serde::{Deserialize, Serialize};

/// Maximum number of categories a recipe can carry
pub const MAX_CATEGORIES: usize = 4;

/// Minimum number of ingredient entries required to submit
pub const MIN_INGREDIENTS: usize = 2;

/// Image attached to a method step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepImage {
    /// Picked locally, uploaded when the draft is submitted
    Local(ImageAsset),
    /// Already on the image host (recipe opened for editing)
    Uploaded(UploadedImage),
}

/// A method step being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftStep {
    #[serde(default = "StepId::generate")]
    pub id: StepId,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub image: Option<StepImage>,
}

impl DraftStep {
    fn new(number: u32) -> Self {
        Self {
            id: StepId::generate(),
            number,
            value: String::new(),
            image: None,
        }
    }

    /// The local image this step still has to upload, if any
    pub fn pending_image(&self) -> Option<&ImageAsset> {
        match &self.image {
            Some(StepImage::Local(asset)) => Some(asset),
            _ => None,
        }
    }
}

/// In-progress edits of a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeDraft {
    recipe_id: Option<RecipeId>,
    cover: Option<CoverImage>,
    title: String,
    description: String,
    ingredients: Vec<Ingredient>,
    steps: Vec<DraftStep>,
    categories: Vec<Category>,
}

impl RecipeDraft {
    /// Empty draft for a new recipe
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft seeded from a persisted recipe, for editing.
    ///
    /// Submitting it updates the recipe with the same id.
    pub fn for_existing(recipe: &Recipe) -> Self {
        let steps = recipe
            .ordered_methods()
            .into_iter()
            .map(|m| DraftStep {
                id: StepId::generate(),
                number: m.number,
                value: m.value.clone(),
                image: m.secure_url.as_ref().map(|url| {
                    StepImage::Uploaded(UploadedImage {
                        secure_url: url.clone(),
                        public_id: m.public_id.clone(),
                    })
                }),
            })
            .collect();

        let mut draft = Self {
            recipe_id: Some(recipe.id.clone()),
            cover: recipe
                .image
                .as_ref()
                .map(|url| CoverImage::Remote { url: url.clone() }),
            title: recipe.title.clone(),
            description: recipe.info.clone(),
            ingredients: recipe.ingredients.clone(),
            steps,
            categories: Vec::new(),
        };
        for category in &recipe.categories {
            draft.set_category(category.clone());
        }
        draft.renumber_steps();
        draft
    }

    /// Parse a draft from JSON, normalising step numbers.
    ///
    /// Rejects more than [`MAX_CATEGORIES`] distinct categories rather than
    /// silently dropping some.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut draft: RecipeDraft = serde_json::from_str(json)?;

        let mut categories = Vec::new();
        for category in draft.categories.drain(..) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        if categories.len() > MAX_CATEGORIES {
            return Err(CoreError::invalid_input(format!(
                "at most {} categories allowed, got {}",
                MAX_CATEGORIES,
                categories.len()
            )));
        }
        draft.categories = categories;
        draft.renumber_steps();
        Ok(draft)
    }

    // ===== Accessors =====

    pub fn recipe_id(&self) -> Option<&RecipeId> {
        self.recipe_id.as_ref()
    }

    pub fn cover(&self) -> Option<&CoverImage> {
        self.cover.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn steps(&self) -> &[DraftStep] {
        &self.steps
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of step images that will be uploaded on submission
    pub fn pending_step_uploads(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.pending_image().is_some())
            .count()
    }

    // ===== Cover, title, description =====

    pub fn set_cover(&mut self, image: ImageAsset) {
        self.cover = Some(CoverImage::Local(image));
    }

    pub fn clear_cover(&mut self) {
        self.cover = None;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    // ===== Categories =====

    /// Toggle a category.
    ///
    /// Selecting a fifth category is ignored without error. Returns whether
    /// the category is selected afterwards.
    pub fn set_category(&mut self, category: Category) -> bool {
        if let Some(pos) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(pos);
            false
        } else if self.categories.len() < MAX_CATEGORIES {
            self.categories.push(category);
            true
        } else {
            false
        }
    }

    pub fn is_selected(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    // ===== Ingredients =====

    pub fn add_ingredient(&mut self) {
        self.ingredients.push(Ingredient::default());
    }

    /// Append a section header entry
    pub fn add_section(&mut self) {
        self.ingredients.push(Ingredient::section(""));
    }

    pub fn set_ingredient(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let len = self.ingredients.len();
        let entry = self
            .ingredients
            .get_mut(index)
            .ok_or(DraftError::IngredientOutOfRange { index, len })?;
        entry.value = text.into();
        Ok(())
    }

    pub fn remove_ingredient(&mut self, index: usize) -> Result<Ingredient> {
        if index >= self.ingredients.len() {
            return Err(DraftError::IngredientOutOfRange {
                index,
                len: self.ingredients.len(),
            }
            .into());
        }
        Ok(self.ingredients.remove(index))
    }

    // ===== Method steps =====

    /// Append an empty step numbered after the last one
    pub fn add_step(&mut self) -> StepId {
        let step = DraftStep::new(self.steps.len() as u32 + 1);
        let id = step.id.clone();
        self.steps.push(step);
        id
    }

    pub fn set_step_text(&mut self, step_id: &StepId, text: impl Into<String>) -> Result<()> {
        self.step_mut(step_id)?.value = text.into();
        Ok(())
    }

    /// Remove the step at `index` and renumber the rest from 1.
    pub fn remove_step(&mut self, index: usize) -> Result<DraftStep> {
        if index >= self.steps.len() {
            return Err(DraftError::StepOutOfRange {
                index,
                len: self.steps.len(),
            }
            .into());
        }
        let removed = self.steps.remove(index);
        self.renumber_steps();
        Ok(removed)
    }

    /// Associate a locally picked image with a step. Upload is deferred.
    pub fn attach_step_image(&mut self, step_id: &StepId, image: ImageAsset) -> Result<()> {
        self.step_mut(step_id)?.image = Some(StepImage::Local(image));
        Ok(())
    }

    pub fn detach_step_image(&mut self, step_id: &StepId) -> Result<Option<StepImage>> {
        Ok(self.step_mut(step_id)?.image.take())
    }

    fn step_mut(&mut self, step_id: &StepId) -> Result<&mut DraftStep> {
        self.steps
            .iter_mut()
            .find(|s| s.id == *step_id)
            .ok_or_else(|| DraftError::StepNotFound(step_id.clone()).into())
    }

    fn renumber_steps(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.number = i as u32 + 1;
        }
    }

    // ===== Validation =====

    /// Check the draft can be submitted.
    ///
    /// Rules are checked in order (cover, title, ingredients, categories)
    /// and the first one broken is returned.
    pub fn validate(&self) -> std::result::Result<(), DraftError> {
        if self.cover.is_none() {
            return Err(DraftError::MissingCover);
        }
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.ingredients.len() < MIN_INGREDIENTS {
            return Err(DraftError::NotEnoughIngredients {
                found: self.ingredients.len(),
            });
        }
        if self.categories.is_empty() {
            return Err(DraftError::NoCategory);
        }
        Ok(())
    }
}
