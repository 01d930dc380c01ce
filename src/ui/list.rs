use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length};
use std::path::Path;

use crate::images::ImageStore;
use crate::state::data::{CategoryFilter, Recipe};
use crate::state::settings::ThemeVariant;
use crate::Message;

/// The recipe list panel: search box, category filter, selectable rows,
/// and the New/Delete/theme actions.
pub fn sidebar<'a>(
    recipes: &'a [Recipe],
    selected: Option<i64>,
    search: &str,
    filter: CategoryFilter,
    images: &ImageStore,
    theme: ThemeVariant,
) -> Element<'a, Message> {
    let controls = row![
        text_input("Search name, ingredient, step…", search)
            .on_input(Message::SearchChanged)
            .width(Length::Fill),
        pick_list(CategoryFilter::ALL, Some(filter), Message::FilterChanged),
    ]
    .spacing(8);

    let body: Element<Message> = if recipes.is_empty() {
        empty_state(search, filter)
    } else {
        let rows = recipes
            .iter()
            .map(|recipe| recipe_row(recipe, selected == Some(recipe.id), images))
            .collect::<Vec<_>>();

        scrollable(column(rows).spacing(4).width(Length::Fill))
            .height(Length::Fill)
            .into()
    };

    let actions = row![
        button("New recipe").on_press(Message::NewRecipe),
        button("Delete")
            .on_press_maybe(selected.map(Message::DeleteRecipe))
            .style(button::danger),
        button(text(theme.toggle_label()))
            .on_press(Message::ToggleTheme)
            .style(button::secondary),
    ]
    .spacing(8);

    column![controls, body, actions]
        .spacing(12)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// One selectable list entry: thumbnail (when present), name, category.
fn recipe_row<'a>(recipe: &'a Recipe, is_selected: bool, images: &ImageStore) -> Element<'a, Message> {
    let mut content = row![].spacing(8).align_y(Alignment::Center);

    if let Some(thumb) = recipe
        .image_path
        .as_ref()
        .and_then(|path| images.thumbnail_for(Path::new(path)))
    {
        content = content.push(
            iced::widget::image(thumb)
                .width(Length::Fixed(36.0))
                .height(Length::Fixed(36.0)),
        );
    }

    content = content.push(text(&recipe.name).width(Length::Fill));
    content = content.push(text(format!("[{}]", recipe.category)).size(13));

    let entry = button(content)
        .on_press(Message::RecipeSelected(recipe.id))
        .width(Length::Fill);

    if is_selected {
        entry.style(button::primary).into()
    } else {
        entry.style(button::text).into()
    }
}

/// Placeholder shown instead of the list when there is nothing to show.
fn empty_state<'a>(search: &str, filter: CategoryFilter) -> Element<'a, Message> {
    let message = if search.trim().is_empty() && filter == CategoryFilter::All {
        "No recipes yet. Click \"New recipe\" to add your first one."
    } else {
        "No recipes match your search."
    };

    container(text(message).size(15))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
