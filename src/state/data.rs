/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the database layer and the UI layer.
use std::fmt;

/// The fixed set of recipe categories.
///
/// Stored in the database as the display string; anything unknown read
/// back from an older database falls back to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    Starter,
    Main,
    Dessert,
    Drink,
    #[default]
    Other,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Category; 5] = [
        Category::Starter,
        Category::Main,
        Category::Dessert,
        Category::Drink,
        Category::Other,
    ];

    /// Parse a stored database value. Unknown values map to `Other`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "Starter" => Category::Starter,
            "Main" => Category::Main,
            "Dessert" => Category::Dessert,
            "Drink" => Category::Drink,
            _ => Category::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Starter => "Starter",
            Category::Main => "Main",
            Category::Dessert => "Dessert",
            Category::Drink => "Drink",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The list view's category filter: all recipes, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Every filter choice, in menu order.
    pub const ALL: [CategoryFilter; 6] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Starter),
        CategoryFilter::Only(Category::Main),
        CategoryFilter::Only(Category::Dessert),
        CategoryFilter::Only(Category::Drink),
        CategoryFilter::Only(Category::Other),
    ];

    /// The category constraint this filter applies, if any.
    pub fn category(self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(category),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All categories"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

/// Represents a single recipe in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Unique database ID
    pub id: i64,
    /// Recipe name (never empty once persisted)
    pub name: String,
    /// Free-text ingredient list
    pub ingredients: String,
    /// Free-text preparation steps
    pub steps: String,
    /// Free-text preparation time (e.g. "20 min")
    pub prep_time: String,
    /// Recipe category
    pub category: Category,
    /// Path to the managed copy of the attached image, if any
    pub image_path: Option<String>,
    /// RFC 3339 creation timestamp, assigned once at insert
    pub created_at: String,
}

impl Recipe {
    /// Render the recipe as shareable plain text.
    ///
    /// Used by the clipboard copy and the text export actions.
    pub fn to_plaintext(&self) -> String {
        let mut out = Vec::new();
        out.push(format!("Recipe: {}", self.name));
        out.push(format!("Category: {}", self.category));
        if !self.prep_time.is_empty() {
            out.push(format!("Time: {}", self.prep_time));
        }
        out.push(String::new());
        out.push("Ingredients:".to_string());
        out.push(self.ingredients.clone());
        out.push(String::new());
        out.push("Steps:".to_string());
        out.push(self.steps.clone());
        out.join("\n")
    }
}

/// The mutable fields of a recipe, as submitted by the form.
///
/// Everything except `id` and `created_at`: creating a recipe inserts
/// these fields, updating one replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: String,
    pub steps: String,
    pub prep_time: String,
    pub category: Category,
    pub image_path: Option<String>,
}
