use iced::widget::{button, column, container, pick_list, row, text, text_editor, text_input};
use iced::{Element, Length};

use crate::state::data::Category;
use crate::state::form::{FormMode, RecipeForm};
use crate::Message;

/// The recipe form panel: fields, image preview, and actions.
pub fn panel(form: &RecipeForm) -> Element<'_, Message> {
    let title = match form.mode {
        FormMode::Create => "New recipe",
        FormMode::Edit(_) => "Edit recipe",
    };

    let mut header = row![text(title).size(24)]
        .spacing(12)
        .align_y(iced::Alignment::Center);
    if let Some(created_at) = &form.created_at {
        // Only the date part of the RFC 3339 timestamp
        let date = created_at.split('T').next().unwrap_or(created_at);
        header = header.push(text(format!("added {}", date)).size(13));
    }

    let fields = column![
        text_input("Recipe name", &form.name)
            .on_input(Message::NameChanged)
            .width(Length::Fill),
        row![
            text_input("Time (e.g. 20 min)", &form.prep_time)
                .on_input(Message::PrepTimeChanged)
                .width(Length::Fill),
            pick_list(Category::ALL, Some(form.category), Message::CategoryChanged),
        ]
        .spacing(8),
        text("Ingredients").size(14),
        text_editor(&form.ingredients)
            .on_action(Message::IngredientsEdited)
            .height(Length::Fixed(130.0)),
        text("Steps").size(14),
        text_editor(&form.steps)
            .on_action(Message::StepsEdited)
            .height(Length::Fixed(130.0)),
    ]
    .spacing(8);

    let preview: Element<Message> = match &form.image_path {
        Some(path) => iced::widget::image(path.clone())
            .width(Length::Fixed(320.0))
            .height(Length::Fixed(200.0))
            .into(),
        None => container(text("No image"))
            .center_x(Length::Fixed(320.0))
            .center_y(Length::Fixed(200.0))
            .style(container::bordered_box)
            .into(),
    };

    let image_actions = row![
        button("Attach image…").on_press(Message::PickImage),
        button("Remove image")
            .on_press_maybe(form.image_path.is_some().then_some(Message::RemoveImage))
            .style(button::secondary),
    ]
    .spacing(8);

    let is_editing = matches!(form.mode, FormMode::Edit(_));
    let actions = row![
        button("Save")
            .on_press_maybe(form.is_valid().then_some(Message::SaveRecipe))
            .style(button::primary),
        button("Copy to clipboard")
            .on_press_maybe(is_editing.then_some(Message::CopyRecipe))
            .style(button::secondary),
        button("Export as text…")
            .on_press_maybe(is_editing.then_some(Message::ExportRecipe))
            .style(button::secondary),
    ]
    .spacing(8);

    let mut content = column![header, fields].spacing(12);
    for issue in form.validate() {
        content = content.push(text(issue.message()).size(14).style(text::danger));
    }
    content = content.push(preview);
    content = content.push(image_actions);
    content = content.push(actions);

    iced::widget::scrollable(content.width(Length::Fill))
        .height(Length::Fill)
        .into()
}
