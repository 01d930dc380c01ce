use copypasta::{ClipboardContext, ClipboardProvider};
use iced::widget::{button, column, container, row, text};
use iced::{Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

mod error;
mod images;
mod state;
mod ui;

use crate::error::{Error, Result};
use crate::images::ImageStore;
use crate::state::data::{Category, CategoryFilter, Recipe};
use crate::state::form::{FormMode, RecipeForm};
use crate::state::library::Library;
use crate::state::settings::Settings;

/// Main application state
struct RecipeBook {
    /// The recipe catalog database
    library: Library,
    /// Managed storage for attached images
    images: ImageStore,
    /// User settings (theme variant), persisted across restarts
    settings: Settings,
    /// Recipes currently shown in the list (the active query result)
    recipes: Vec<Recipe>,
    /// Id of the recipe open in the form, if any
    selected: Option<i64>,
    /// Search box contents
    search: String,
    /// Category filter for the list
    filter: CategoryFilter,
    /// The create/edit form
    form: RecipeForm,
    /// Status message to display to the user
    status: String,
    /// Dismissible error notice, shown above the panels
    notice: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    SearchChanged(String),
    FilterChanged(CategoryFilter),
    RecipeSelected(i64),
    NewRecipe,
    DeleteRecipe(i64),
    NameChanged(String),
    PrepTimeChanged(String),
    CategoryChanged(Category),
    IngredientsEdited(iced::widget::text_editor::Action),
    StepsEdited(iced::widget::text_editor::Action),
    PickImage,
    /// Background image attach completed
    ImageAttached(Result<PathBuf>),
    RemoveImage,
    SaveRecipe,
    CopyRecipe,
    ExportRecipe,
    ToggleTheme,
    DismissNotice,
}

impl RecipeBook {
    /// Create a new instance of the application
    fn new(library: Library, images: ImageStore, settings: Settings) -> (Self, Task<Message>) {
        let count = library.recipe_count().unwrap_or(0);
        println!("🍲 Recipe Book initialized with {} recipes", count);

        let mut app = RecipeBook {
            library,
            images,
            settings,
            recipes: Vec::new(),
            selected: None,
            search: String::new(),
            filter: CategoryFilter::All,
            form: RecipeForm::new(),
            status: format!("Ready. {} recipes in your book.", count),
            notice: None,
        };
        app.refresh();

        (app, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SearchChanged(query) => {
                self.search = query;
                self.refresh();
            }
            Message::FilterChanged(filter) => {
                self.filter = filter;
                self.refresh();
            }
            Message::RecipeSelected(id) => match self.library.get_recipe(id) {
                Ok(recipe) => {
                    self.selected = Some(id);
                    self.form = RecipeForm::edit(&recipe);
                }
                Err(Error::NotFound(_)) => {
                    // Stale row: the recipe vanished under us
                    self.notice = Some("That recipe no longer exists.".to_string());
                    self.selected = None;
                    self.refresh();
                }
                Err(e) => self.notice = Some(e.to_string()),
            },
            Message::NewRecipe => {
                self.selected = None;
                self.form = RecipeForm::new();
            }
            Message::DeleteRecipe(id) => {
                let name = self
                    .recipes
                    .iter()
                    .find(|r| r.id == id)
                    .map(|r| r.name.clone())
                    .unwrap_or_default();

                if confirm_delete(&name) {
                    match delete_recipe(&self.library, &self.images, id) {
                        Ok(()) => self.status = format!("Deleted \"{}\".", name),
                        Err(Error::NotFound(_)) => {
                            self.notice = Some("That recipe no longer exists.".to_string());
                        }
                        Err(e) => self.notice = Some(e.to_string()),
                    }
                    if self.selected == Some(id) {
                        self.selected = None;
                        self.form = RecipeForm::new();
                    }
                    self.refresh();
                }
            }
            Message::NameChanged(name) => self.form.name = name,
            Message::PrepTimeChanged(prep_time) => self.form.prep_time = prep_time,
            Message::CategoryChanged(category) => self.form.category = category,
            Message::IngredientsEdited(action) => self.form.ingredients.perform(action),
            Message::StepsEdited(action) => self.form.steps.perform(action),
            Message::PickImage => {
                let picked = FileDialog::new()
                    .set_title("Choose a picture of the dish")
                    .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif", "webp"])
                    .pick_file();

                if let Some(source) = picked {
                    self.status = format!("Attaching {}…", source.display());
                    return Task::perform(
                        images::attach_async(self.images.clone(), source),
                        Message::ImageAttached,
                    );
                }
            }
            Message::ImageAttached(Ok(stored)) => {
                self.form.image_path = Some(stored);
                self.status = "Image attached.".to_string();
            }
            Message::ImageAttached(Err(e)) => {
                // The recipe can still be saved, just without the image
                self.notice = Some(e.to_string());
                self.status = "Ready.".to_string();
            }
            Message::RemoveImage => {
                // The stored file goes away on save, once the record no
                // longer references it
                self.form.image_path = None;
            }
            Message::SaveRecipe => {
                if !self.form.is_valid() {
                    return Task::none();
                }
                match save_recipe(&self.library, &self.images, &self.form) {
                    Ok(id) => {
                        self.status = format!("Saved \"{}\".", self.form.name.trim());
                        self.selected = Some(id);
                        if let Ok(recipe) = self.library.get_recipe(id) {
                            self.form = RecipeForm::edit(&recipe);
                        }
                    }
                    Err(Error::NotFound(_)) => {
                        // The recipe was deleted while the form was open:
                        // drop the stale id, keep what the user typed
                        self.notice = Some(
                            "That recipe was deleted meanwhile; saving will create a new one."
                                .to_string(),
                        );
                        self.selected = None;
                        self.form.mode = FormMode::Create;
                        self.form.created_at = None;
                    }
                    Err(e) => self.notice = Some(e.to_string()),
                }
                self.refresh();
            }
            Message::CopyRecipe => {
                if let Some(recipe) = self.open_recipe() {
                    match copy_to_clipboard(&recipe.to_plaintext()) {
                        Ok(()) => self.status = "Recipe copied to the clipboard.".to_string(),
                        Err(e) => self.notice = Some(e.to_string()),
                    }
                }
            }
            Message::ExportRecipe => {
                if let Some(recipe) = self.open_recipe() {
                    let default_name = format!("{}.txt", recipe.name.replace(' ', "_"));
                    let target = FileDialog::new()
                        .set_title("Export recipe as text")
                        .set_file_name(default_name)
                        .add_filter("Text", &["txt"])
                        .save_file();

                    if let Some(path) = target {
                        match std::fs::write(&path, recipe.to_plaintext() + "\n") {
                            Ok(()) => self.status = format!("Exported: {}", path.display()),
                            Err(e) => {
                                self.notice = Some(format!("Could not export recipe: {}", e))
                            }
                        }
                    }
                }
            }
            Message::ToggleTheme => {
                self.settings.theme = self.settings.theme.toggled();
                if let Err(e) = self.settings.save() {
                    eprintln!("⚠️  Could not save settings: {}", e);
                }
            }
            Message::DismissNotice => self.notice = None,
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let sidebar = ui::list::sidebar(
            &self.recipes,
            self.selected,
            &self.search,
            self.filter,
            &self.images,
            self.settings.theme,
        );
        let form = ui::form::panel(&self.form);

        let panels = row![
            container(sidebar).width(Length::FillPortion(2)),
            container(form).width(Length::FillPortion(3)),
        ]
        .spacing(16)
        .height(Length::Fill);

        let mut content = column![].spacing(12).padding(16);
        if let Some(notice) = &self.notice {
            content = content.push(notice_bar(notice));
        }
        content = content.push(panels);
        content = content.push(text(&self.status).size(14));

        content.into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        self.settings.theme.to_iced()
    }

    /// Re-run the active list query against the store.
    fn refresh(&mut self) {
        match self
            .library
            .search_recipes(&self.search, self.filter.category())
        {
            Ok(recipes) => self.recipes = recipes,
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// The stored recipe currently open in edit mode, if any.
    fn open_recipe(&self) -> Option<Recipe> {
        match self.form.mode {
            FormMode::Edit(id) => match self.library.get_recipe(id) {
                Ok(recipe) => Some(recipe),
                Err(_) => None,
            },
            FormMode::Create => None,
        }
    }
}

/// Dismissible error bar shown above the panels.
fn notice_bar(notice: &str) -> Element<'_, Message> {
    container(
        row![
            text(notice).style(text::danger).width(Length::Fill),
            button("Dismiss")
                .on_press(Message::DismissNotice)
                .style(button::text),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
    )
    .padding(8)
    .width(Length::Fill)
    .style(container::bordered_box)
    .into()
}

/// Save the form: create or full-replace update, then clean up a
/// replaced image file.
fn save_recipe(library: &Library, images: &ImageStore, form: &RecipeForm) -> Result<i64> {
    let draft = form.to_draft();
    match form.mode {
        FormMode::Create => library.create_recipe(&draft),
        FormMode::Edit(id) => {
            let previous = library.get_recipe(id)?;
            library.update_recipe(id, &draft)?;

            // The record no longer references its old image: remove it
            if previous.image_path != draft.image_path {
                if let Some(old) = previous.image_path {
                    images.remove(Path::new(&old));
                }
            }
            Ok(id)
        }
    }
}

/// Delete a recipe and its managed image file (cleanup policy: remove).
fn delete_recipe(library: &Library, images: &ImageStore, id: i64) -> Result<()> {
    let image_path = library.delete_recipe(id)?;
    if let Some(path) = image_path {
        images.remove(Path::new(&path));
    }
    Ok(())
}

fn copy_to_clipboard(contents: &str) -> Result<()> {
    let mut clipboard = ClipboardContext::new()
        .map_err(|e| Error::Storage(format!("clipboard unavailable: {}", e)))?;
    clipboard
        .set_contents(contents.to_string())
        .map_err(|e| Error::Storage(format!("clipboard write failed: {}", e)))
}

/// Ask the user to confirm a delete. Blocking, like the pickers.
fn confirm_delete(name: &str) -> bool {
    let result = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Delete recipe")
        .set_description(format!("Really delete \"{}\"?", name))
        .set_buttons(rfd::MessageButtons::YesNo)
        .show();
    result == rfd::MessageDialogResult::Yes
}

/// Report a fatal startup error and exit non-zero. Shown as a blocking
/// dialog because no window exists yet.
fn startup_failure(error: &Error) -> ! {
    eprintln!("❌ {}", error);
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Recipe Book")
        .set_description(format!("Recipe Book could not start.\n\n{}", error))
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
    std::process::exit(1);
}

fn main() -> iced::Result {
    // Components come up in dependency order; any storage failure here
    // is fatal
    let library = match Library::new() {
        Ok(library) => library,
        Err(e) => startup_failure(&e),
    };
    let images = match ImageStore::new() {
        Ok(images) => images,
        Err(e) => startup_failure(&e),
    };
    let settings = Settings::load();

    iced::application("Recipe Book", RecipeBook::update, RecipeBook::view)
        .theme(RecipeBook::theme)
        .window_size(iced::Size::new(980.0, 640.0))
        .centered()
        .run_with(move || RecipeBook::new(library, images, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::RecipeDraft;
    use crate::state::library::test_library;
    use tempfile::TempDir;

    fn test_images(dir: &std::path::Path) -> ImageStore {
        ImageStore::at(dir.join("images")).unwrap()
    }

    fn attach_sample(images: &ImageStore, dir: &std::path::Path, name: &str) -> PathBuf {
        let source = dir.join(name);
        image::RgbImage::from_pixel(8, 8, image::Rgb([120, 160, 40]))
            .save(&source)
            .unwrap();
        images.attach(&source).unwrap()
    }

    fn form_with(name: &str, image_path: Option<PathBuf>) -> RecipeForm {
        let mut form = RecipeForm::new();
        form.name = name.to_string();
        form.image_path = image_path;
        form
    }

    #[test]
    fn save_creates_then_updates() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());
        let images = test_images(dir.path());

        let id = save_recipe(&library, &images, &form_with("Pasta", None)).unwrap();
        assert_eq!(library.get_recipe(id).unwrap().name, "Pasta");

        let mut edit = RecipeForm::edit(&library.get_recipe(id).unwrap());
        edit.name = "Pasta al Pomodoro".to_string();
        let same_id = save_recipe(&library, &images, &edit).unwrap();

        assert_eq!(same_id, id);
        assert_eq!(library.get_recipe(id).unwrap().name, "Pasta al Pomodoro");
    }

    #[test]
    fn deleting_recipe_removes_managed_image() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());
        let images = test_images(dir.path());

        let stored = attach_sample(&images, dir.path(), "dish.png");
        let thumb = images.thumbnail_for(&stored).unwrap();
        let id = save_recipe(&library, &images, &form_with("Pasta", Some(stored.clone()))).unwrap();

        delete_recipe(&library, &images, id).unwrap();

        assert_eq!(library.get_recipe(id), Err(Error::NotFound(id)));
        assert!(!stored.exists());
        assert!(!thumb.exists());
    }

    #[test]
    fn deleting_missing_recipe_is_not_found() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());
        let images = test_images(dir.path());

        assert_eq!(
            delete_recipe(&library, &images, 42),
            Err(Error::NotFound(42))
        );
    }

    #[test]
    fn replacing_an_image_on_save_removes_the_old_file() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());
        let images = test_images(dir.path());

        let first = attach_sample(&images, dir.path(), "old.png");
        let id = save_recipe(&library, &images, &form_with("Pasta", Some(first.clone()))).unwrap();

        let second = attach_sample(&images, dir.path(), "new.png");
        let mut edit = RecipeForm::edit(&library.get_recipe(id).unwrap());
        edit.image_path = Some(second.clone());
        save_recipe(&library, &images, &edit).unwrap();

        assert!(!first.exists());
        assert!(second.exists());
        assert_eq!(
            library.get_recipe(id).unwrap().image_path,
            Some(second.to_string_lossy().into_owned())
        );
    }

    #[test]
    fn clearing_the_image_on_save_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());
        let images = test_images(dir.path());

        let stored = attach_sample(&images, dir.path(), "dish.png");
        let id = save_recipe(&library, &images, &form_with("Pasta", Some(stored.clone()))).unwrap();

        let mut edit = RecipeForm::edit(&library.get_recipe(id).unwrap());
        edit.image_path = None;
        save_recipe(&library, &images, &edit).unwrap();

        assert!(!stored.exists());
        assert_eq!(library.get_recipe(id).unwrap().image_path, None);
    }

    #[test]
    fn saving_against_a_deleted_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let library = test_library(dir.path());
        let images = test_images(dir.path());

        let id = library
            .create_recipe(&RecipeDraft {
                name: "Pasta".to_string(),
                ..RecipeDraft::default()
            })
            .unwrap();
        let edit = RecipeForm::edit(&library.get_recipe(id).unwrap());
        library.delete_recipe(id).unwrap();

        assert_eq!(
            save_recipe(&library, &images, &edit),
            Err(Error::NotFound(id))
        );
    }
}
