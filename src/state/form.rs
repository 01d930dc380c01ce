/// Editable form state for creating or editing a recipe
///
/// The form owns its field buffers and knows how to validate them and
/// snapshot them into a `RecipeDraft`. It never talks to the database:
/// the shell decides between create and update based on `mode`.
use iced::widget::text_editor;
use std::path::PathBuf;

use super::data::{Category, Recipe, RecipeDraft};

/// Whether the form creates a new recipe or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// A field-level validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormIssue {
    EmptyName,
}

impl FormIssue {
    pub fn message(&self) -> &'static str {
        match self {
            FormIssue::EmptyName => "Recipe name is required",
        }
    }
}

/// The recipe form: field buffers plus the mode they will be saved in.
pub struct RecipeForm {
    pub mode: FormMode,
    pub name: String,
    pub prep_time: String,
    pub category: Category,
    pub ingredients: text_editor::Content,
    pub steps: text_editor::Content,
    /// Managed path of the attached image, if any
    pub image_path: Option<PathBuf>,
    /// Creation timestamp of the recipe being edited (display only)
    pub created_at: Option<String>,
}

impl RecipeForm {
    /// An empty create-mode form.
    pub fn new() -> Self {
        RecipeForm {
            mode: FormMode::Create,
            name: String::new(),
            prep_time: String::new(),
            category: Category::default(),
            ingredients: text_editor::Content::new(),
            steps: text_editor::Content::new(),
            image_path: None,
            created_at: None,
        }
    }

    /// An edit-mode form prefilled from an existing recipe.
    pub fn edit(recipe: &Recipe) -> Self {
        RecipeForm {
            mode: FormMode::Edit(recipe.id),
            name: recipe.name.clone(),
            prep_time: recipe.prep_time.clone(),
            category: recipe.category,
            ingredients: text_editor::Content::with_text(&recipe.ingredients),
            steps: text_editor::Content::with_text(&recipe.steps),
            image_path: recipe.image_path.as_ref().map(PathBuf::from),
            created_at: Some(recipe.created_at.clone()),
        }
    }

    /// Field-level validation. Submit stays disabled while this is
    /// non-empty.
    pub fn validate(&self) -> Vec<FormIssue> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(FormIssue::EmptyName);
        }
        issues
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Snapshot the current buffers into a draft for the store.
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            name: self.name.trim().to_string(),
            ingredients: self.ingredients.text().trim().to_string(),
            steps: self.steps.text().trim().to_string(),
            prep_time: self.prep_time.trim().to_string(),
            category: self.category,
            image_path: self
                .image_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        }
    }
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self::new()
    }
}
