use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;

use super::data::{Category, Recipe, RecipeDraft};
use crate::error::{Error, Result};

/// The Library manages the SQLite recipe catalog.
///
/// It is the single source of truth for recipe records; views keep only
/// the rows they are currently displaying.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

/// Map a full recipe row (all columns, in schema order) to a `Recipe`.
fn row_to_recipe(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
    let category: String = row.get(5)?;
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        ingredients: row.get(2)?,
        steps: row.get(3)?,
        prep_time: row.get(4)?,
        category: Category::from_db(&category),
        image_path: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const RECIPE_COLUMNS: &str =
    "id, name, ingredients, steps, prep_time, category, image_path, created_at";

impl Library {
    /// Create a new Library instance and initialize the database.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/recipe-book/recipe_book.db
    /// - macOS: ~/Library/Application Support/recipe-book/recipe_book.db
    /// - Windows: %APPDATA%\recipe-book\recipe_book.db
    pub fn new() -> Result<Self> {
        Self::open(Self::default_db_path())
    }

    /// Open (or create) the catalog at an explicit path.
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;

        println!("📁 Database initialized at: {}", db_path.display());

        let library = Library { conn, db_path };
        library.init_schema()?;

        Ok(library)
    }

    /// Get the path where the database should be stored
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("recipe-book");
        path.push("recipe_book.db");
        path
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS recipes (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                ingredients     TEXT NOT NULL DEFAULT '',
                steps           TEXT NOT NULL DEFAULT '',
                prep_time       TEXT NOT NULL DEFAULT '',
                category        TEXT NOT NULL DEFAULT 'Other',
                image_path      TEXT,
                created_at      TEXT NOT NULL
            )",
            [],
        )?;

        // The list is always presented in name order
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_recipes_name
             ON recipes(name COLLATE NOCASE)",
            [],
        )?;

        Ok(())
    }

    /// Get a count of recipes in the catalog
    pub fn recipe_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a new recipe and return its assigned id.
    ///
    /// Fails with `Error::Validation` when the trimmed name is empty;
    /// nothing is inserted in that case.
    pub fn create_recipe(&self, draft: &RecipeDraft) -> Result<i64> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("recipe name is required".to_string()));
        }

        self.conn.execute(
            "INSERT INTO recipes (name, ingredients, steps, prep_time, category, image_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                name,
                draft.ingredients,
                draft.steps,
                draft.prep_time,
                draft.category.as_str(),
                draft.image_path,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch a single recipe by id.
    pub fn get_recipe(&self, id: i64) -> Result<Recipe> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1");
        self.conn
            .query_row(&sql, [id], row_to_recipe)
            .optional()?
            .ok_or(Error::NotFound(id))
    }

    /// Get all recipes from the catalog.
    ///
    /// Ordering policy: case-insensitive name order, ties broken by
    /// ascending id. Stable across a session.
    pub fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        self.search_recipes("", None)
    }

    /// Get the recipes matching a substring query and an optional category.
    ///
    /// The query matches against name, ingredients and steps. An empty
    /// query with no category returns the full catalog. Ordering is the
    /// same as `get_all_recipes`.
    pub fn search_recipes(&self, query: &str, category: Option<Category>) -> Result<Vec<Recipe>> {
        let mut sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        let query = query.trim();
        if !query.is_empty() {
            sql.push_str(" AND (name LIKE ?1 OR ingredients LIKE ?1 OR steps LIKE ?1)");
            param_values.push(Box::new(format!("%{}%", query)));
        }
        if let Some(category) = category {
            sql.push_str(&format!(" AND category = ?{}", param_values.len() + 1));
            param_values.push(Box::new(category.as_str().to_string()));
        }
        sql.push_str(" ORDER BY name COLLATE NOCASE, id");

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let recipes = stmt
            .query_map(params_refs.as_slice(), row_to_recipe)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(recipes)
    }

    /// Replace every mutable field of an existing recipe.
    ///
    /// Update policy: full replace. `id` and `created_at` are immutable.
    pub fn update_recipe(&self, id: i64, draft: &RecipeDraft) -> Result<()> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("recipe name is required".to_string()));
        }

        let updated = self.conn.execute(
            "UPDATE recipes
             SET name = ?1, ingredients = ?2, steps = ?3, prep_time = ?4, category = ?5, image_path = ?6
             WHERE id = ?7",
            rusqlite::params![
                name,
                draft.ingredients,
                draft.steps,
                draft.prep_time,
                draft.category.as_str(),
                draft.image_path,
                id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    /// Delete a recipe by id.
    ///
    /// Returns the recipe's stored image path (if any) so the caller can
    /// remove the managed image file as well.
    pub fn delete_recipe(&self, id: i64) -> Result<Option<String>> {
        let image_path: Option<Option<String>> = self
            .conn
            .query_row("SELECT image_path FROM recipes WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;

        let image_path = image_path.ok_or(Error::NotFound(id))?;

        self.conn
            .execute("DELETE FROM recipes WHERE id = ?1", [id])?;

        Ok(image_path)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// Open a catalog inside a temp directory for tests.
#[cfg(test)]
pub fn test_library(dir: &std::path::Path) -> Library {
    Library::open(dir.join("recipes.db")).expect("failed to open test library")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            ingredients: "pasta, sauce".to_string(),
            steps: "boil, mix".to_string(),
            prep_time: "20 min".to_string(),
            category: Category::Main,
            image_path: None,
        }
    }

    #[test]
    fn create_then_read_returns_submitted_fields() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        let id = library.create_recipe(&draft("Pasta")).unwrap();
        assert_eq!(id, 1);

        let recipe = library.get_recipe(id).unwrap();
        assert_eq!(recipe.name, "Pasta");
        assert_eq!(recipe.ingredients, "pasta, sauce");
        assert_eq!(recipe.steps, "boil, mix");
        assert_eq!(recipe.prep_time, "20 min");
        assert_eq!(recipe.category, Category::Main);
        assert_eq!(recipe.image_path, None);
        assert!(!recipe.created_at.is_empty());
    }

    #[test]
    fn create_trims_the_name() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        let id = library.create_recipe(&draft("  Pasta  ")).unwrap();
        assert_eq!(library.get_recipe(id).unwrap().name, "Pasta");
    }

    #[test]
    fn empty_name_fails_validation_and_adds_no_row() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        for bad in ["", "   "] {
            let result = library.create_recipe(&draft(bad));
            assert!(matches!(result, Err(Error::Validation(_))));
        }
        assert_eq!(library.recipe_count().unwrap(), 0);
        assert!(library.get_all_recipes().unwrap().is_empty());
    }

    #[test]
    fn missing_ids_return_not_found() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        assert_eq!(library.get_recipe(99), Err(Error::NotFound(99)));
        assert_eq!(
            library.update_recipe(99, &draft("Soup")),
            Err(Error::NotFound(99))
        );
        assert_eq!(library.delete_recipe(99), Err(Error::NotFound(99)));
    }

    #[test]
    fn update_replaces_all_fields() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        let id = library.create_recipe(&draft("Pasta")).unwrap();
        let created_at = library.get_recipe(id).unwrap().created_at;

        let replacement = RecipeDraft {
            name: "Pasta al Pomodoro".to_string(),
            ingredients: "pasta, tomatoes, basil".to_string(),
            steps: "boil, simmer, toss".to_string(),
            prep_time: "35 min".to_string(),
            category: Category::Main,
            image_path: Some("/tmp/images/img_1.jpg".to_string()),
        };
        library.update_recipe(id, &replacement).unwrap();

        let recipe = library.get_recipe(id).unwrap();
        assert_eq!(recipe.name, "Pasta al Pomodoro");
        assert_eq!(recipe.ingredients, "pasta, tomatoes, basil");
        assert_eq!(recipe.steps, "boil, simmer, toss");
        assert_eq!(recipe.prep_time, "35 min");
        assert_eq!(recipe.image_path.as_deref(), Some("/tmp/images/img_1.jpg"));
        // The creation timestamp never changes
        assert_eq!(recipe.created_at, created_at);
    }

    #[test]
    fn update_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        let id = library.create_recipe(&draft("Pasta")).unwrap();
        let result = library.update_recipe(id, &draft("  "));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(library.get_recipe(id).unwrap().name, "Pasta");
    }

    #[test]
    fn delete_removes_the_recipe_from_the_list() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        let id = library.create_recipe(&draft("Pasta")).unwrap();
        library.delete_recipe(id).unwrap();

        assert_eq!(library.get_recipe(id), Err(Error::NotFound(id)));
        assert!(library.get_all_recipes().unwrap().is_empty());
        assert_eq!(library.recipe_count().unwrap(), 0);
    }

    #[test]
    fn delete_returns_the_stored_image_path() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        let mut with_image = draft("Pasta");
        with_image.image_path = Some("/tmp/images/img_7.jpg".to_string());
        let id = library.create_recipe(&with_image).unwrap();

        let image_path = library.delete_recipe(id).unwrap();
        assert_eq!(image_path.as_deref(), Some("/tmp/images/img_7.jpg"));
    }

    #[test]
    fn list_is_ordered_case_insensitively_by_name_then_id() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        library.create_recipe(&draft("banana bread")).unwrap();
        library.create_recipe(&draft("Apple pie")).unwrap();
        let first_crumble = library.create_recipe(&draft("Crumble")).unwrap();
        let second_crumble = library.create_recipe(&draft("crumble")).unwrap();

        let names: Vec<(String, i64)> = library
            .get_all_recipes()
            .unwrap()
            .into_iter()
            .map(|r| (r.name, r.id))
            .collect();

        assert_eq!(names[0].0, "Apple pie");
        assert_eq!(names[1].0, "banana bread");
        // Same name (ignoring case): insertion id breaks the tie
        assert_eq!(names[2].1, first_crumble);
        assert_eq!(names[3].1, second_crumble);
    }

    #[test]
    fn list_length_tracks_live_recipes() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        let a = library.create_recipe(&draft("A")).unwrap();
        library.create_recipe(&draft("B")).unwrap();
        assert_eq!(library.get_all_recipes().unwrap().len(), 2);

        library.delete_recipe(a).unwrap();
        assert_eq!(library.get_all_recipes().unwrap().len(), 1);
    }

    #[test]
    fn search_matches_name_ingredients_and_steps() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        library
            .create_recipe(&RecipeDraft {
                name: "Pancakes".to_string(),
                ingredients: "flour, milk, eggs".to_string(),
                steps: "whisk, fry".to_string(),
                prep_time: String::new(),
                category: Category::Dessert,
                image_path: None,
            })
            .unwrap();
        library.create_recipe(&draft("Pasta")).unwrap();

        let by_name = library.search_recipes("Pancake", None).unwrap();
        assert_eq!(by_name.len(), 1);

        let by_ingredient = library.search_recipes("milk", None).unwrap();
        assert_eq!(by_ingredient.len(), 1);
        assert_eq!(by_ingredient[0].name, "Pancakes");

        let by_step = library.search_recipes("whisk", None).unwrap();
        assert_eq!(by_step.len(), 1);

        assert!(library.search_recipes("tofu", None).unwrap().is_empty());
    }

    #[test]
    fn search_filters_by_category() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        library.create_recipe(&draft("Pasta")).unwrap();
        let mut dessert = draft("Tiramisu");
        dessert.category = Category::Dessert;
        library.create_recipe(&dessert).unwrap();

        let desserts = library.search_recipes("", Some(Category::Dessert)).unwrap();
        assert_eq!(desserts.len(), 1);
        assert_eq!(desserts[0].name, "Tiramisu");

        // Text and category combine
        let none = library
            .search_recipes("Pasta", Some(Category::Dessert))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn empty_search_returns_everything() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());

        library.create_recipe(&draft("A")).unwrap();
        library.create_recipe(&draft("B")).unwrap();

        assert_eq!(library.search_recipes("", None).unwrap().len(), 2);
        assert_eq!(library.search_recipes("  ", None).unwrap().len(), 2);
    }
}
