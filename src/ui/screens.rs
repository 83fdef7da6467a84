/// Screen renderers
///
/// One view function per navigational state, all pure reads of the
/// session and the shell's input buffers. The busy and error views take
/// over the whole window; exactly one of busy, error or the current
/// screen is ever presented.

use iced::widget::{button, column, container, row, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length};

use crate::state::artist::ArtistRecord;
use crate::state::data::EncodedImage;
use crate::state::session::Screen;
use crate::{InkStudio, Message};

pub fn view(app: &InkStudio) -> Element<Message> {
    let content: Element<Message> = if let Some(message) = &app.session.failure {
        error_view(message)
    } else if let Some(label) = &app.session.busy {
        busy_view(label)
    } else {
        match app.session.screen {
            Screen::Start => start(app),
            Screen::Recommend => recommend(app),
            Screen::CustomInput => custom_input(app),
            Screen::Preview => preview(app),
            Screen::Artists => artists(app),
        }
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .padding(30)
        .into()
}

fn busy_view(label: &str) -> Element<Message> {
    column![
        text("Working...").size(28),
        text(label).size(16),
    ]
    .spacing(14)
    .align_x(Alignment::Center)
    .into()
}

fn error_view(message: &str) -> Element<Message> {
    column![
        text("Something went wrong").size(28),
        text(message).size(16),
        row![
            button("Try Again").on_press(Message::Retry).padding(10),
            button("Start Over").on_press(Message::Reset).padding(10),
        ]
        .spacing(12),
    ]
    .spacing(18)
    .align_x(Alignment::Center)
    .into()
}

fn start(app: &InkStudio) -> Element<Message> {
    let mut actions = row![
        button("Upload a Photo")
            .on_press(Message::PickImage)
            .padding(12),
    ]
    .spacing(12);

    if app.capabilities.camera_available {
        actions = actions.push(
            button("Take a Photo")
                .on_press(Message::TakePhoto)
                .padding(12),
        );
    }

    let mut content = column![
        text("Ink Studio").size(48),
        text("Upload a photo of the spot you want inked.").size(16),
        actions,
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    if let Some(notice) = &app.notice {
        content = content.push(text(notice).size(14));
    }

    content.into()
}

fn recommend(app: &InkStudio) -> Element<Message> {
    let mut options = Column::new().spacing(10).align_x(Alignment::Center);
    for style in &app.session.style_options {
        options = options.push(
            button(text(style.clone()))
                .on_press(Message::StyleChosen(style.clone()))
                .padding(10),
        );
    }

    let mut content = column![
        text("Pick a direction").size(32),
        text("Ideas suggested for this spot:").size(16),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    if let Some(image) = &app.session.source_image {
        content = content.push(thumbnail(image, 180.0));
    }

    content = content.push(options).push(
        row![
            button("My Own Idea")
                .on_press(Message::CustomIdeaPressed)
                .padding(10),
            button("Start Over").on_press(Message::Reset).padding(10),
        ]
        .spacing(12),
    );

    content.into()
}

fn custom_input(app: &InkStudio) -> Element<Message> {
    let reference_label = match &app.reference_image {
        Some(_) => "Reference attached",
        None => "No reference image",
    };

    let mut reference_controls = row![
        text(reference_label).size(14),
        button("Add Reference")
            .on_press(Message::PickReferenceImage)
            .padding(8),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    if app.reference_image.is_some() {
        reference_controls = reference_controls.push(
            button("Remove").on_press(Message::ClearReference).padding(8),
        );
    }

    let mut content = column![
        text("Describe your idea").size(32),
        text_input("e.g. a small fox curled around a crescent moon", &app.custom_prompt)
            .on_input(Message::CustomPromptChanged)
            .on_submit(Message::CustomSubmitted)
            .padding(10)
            .width(Length::Fixed(420.0)),
        reference_controls,
        row![
            button("Generate").on_press(Message::CustomSubmitted).padding(10),
            button("Back").on_press(Message::BackToRecommend).padding(10),
        ]
        .spacing(12),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    if let Some(notice) = &app.notice {
        content = content.push(text(notice).size(14));
    }

    content.into()
}

fn preview(app: &InkStudio) -> Element<Message> {
    let mut content = column![text("Your preview").size(32)]
        .spacing(16)
        .align_x(Alignment::Center);

    if let Some(image) = &app.session.rendered_image {
        content = content.push(thumbnail(image, 380.0));
    }

    content = content
        .push(
            text_input("Refine it: \"make it smaller\", \"add color\"...", &app.edit_prompt)
                .on_input(Message::EditPromptChanged)
                .on_submit(Message::EditSubmitted)
                .padding(10)
                .width(Length::Fixed(420.0)),
        )
        .push(
            row![
                button("Apply Edit").on_press(Message::EditSubmitted).padding(10),
                button("Find Artists").on_press(Message::FindArtists).padding(10),
                button("Start Over").on_press(Message::Reset).padding(10),
            ]
            .spacing(12),
        );

    if let Some(notice) = &app.notice {
        content = content.push(text(notice).size(14));
    }

    content.into()
}

fn artists(app: &InkStudio) -> Element<Message> {
    let mut listing = Column::new().spacing(12);

    if app.session.nearby_artists.is_empty() {
        listing = listing.push(text("No artists found nearby. Try again later.").size(16));
    } else {
        for artist in &app.session.nearby_artists {
            listing = listing.push(artist_row(artist));
        }
    }

    // No maps widget on this platform; the list is the whole story
    let heading = format!("Artists for \"{}\"", app.session.chosen_style);

    column![
        text(heading).size(32),
        scrollable(listing).height(Length::Fill),
        row![
            button("Back to Preview").on_press(Message::BackToPreview).padding(10),
            button("Start Over").on_press(Message::Reset).padding(10),
        ]
        .spacing(12),
    ]
    .spacing(16)
    .align_x(Alignment::Center)
    .into()
}

fn artist_row(artist: &ArtistRecord) -> Element<Message> {
    let mut details = column![text(artist.title.clone()).size(18)].spacing(4);

    if let Some(rating) = artist.rating {
        let reviews = artist
            .review_count
            .map(|count| format!(" ({count} reviews)"))
            .unwrap_or_default();
        details = details.push(text(format!("Rated {rating:.1}{reviews}")).size(14));
    }

    if let Some(coordinate) = artist.coordinate {
        details = details.push(
            text(format!(
                "{:.4}, {:.4}",
                coordinate.latitude, coordinate.longitude
            ))
            .size(12),
        );
    }

    details = details.push(text(artist.uri.clone()).size(12));

    container(details).padding(10).into()
}

fn thumbnail(image: &EncodedImage, size: f32) -> Element<'static, Message> {
    let handle = iced::widget::image::Handle::from_bytes(image.as_bytes().to_vec());
    iced::widget::image(handle)
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .into()
}
