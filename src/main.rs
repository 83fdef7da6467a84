use iced::{Element, Task, Theme};

mod gateway;
mod provider;
mod state;
mod ui;

use gateway::{user_message, GeminiGateway};
use provider::Capabilities;
use state::artist::ArtistRecord;
use state::data::EncodedImage;
use state::session::{validate_edit_prompt, RetryAction, Session};
use ui::cooldown::Cooldowns;

/// Main application state: the session plus everything the shell needs
/// to drive it (gateway handle, input buffers, per-control cooldowns).
struct InkStudio {
    /// The single state aggregate for one user journey
    session: Session,
    gateway: GeminiGateway,
    /// Custom idea form: prompt buffer and optional style reference
    custom_prompt: String,
    reference_image: Option<EncodedImage>,
    /// Edit prompt buffer on the preview screen
    edit_prompt: String,
    /// Transient alert (picker problems, rejected input); never part of
    /// the session failure state
    notice: Option<String>,
    cooldowns: Cooldowns,
    capabilities: Capabilities,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    // Start screen
    PickImage,
    TakePhoto,
    ImageLoaded(Result<EncodedImage, String>),
    AnalysisComplete(Result<Vec<String>, String>),

    // Recommend screen
    StyleChosen(String),
    CustomIdeaPressed,

    // Custom idea form
    CustomPromptChanged(String),
    PickReferenceImage,
    ReferenceLoaded(Result<EncodedImage, String>),
    ClearReference,
    CustomSubmitted,
    GenerateComplete(Result<EncodedImage, String>),

    // Preview screen
    EditPromptChanged(String),
    EditSubmitted,
    EditComplete(Result<EncodedImage, String>),
    FindArtists,
    ArtistsComplete(Result<Vec<ArtistRecord>, String>),

    // Navigation and recovery
    BackToRecommend,
    BackToPreview,
    Retry,
    Reset,
}

impl InkStudio {
    fn new() -> (Self, Task<Message>) {
        // The app cannot talk to the AI service without a credential,
        // so a missing key stops the launch outright
        let gateway = GeminiGateway::from_env()
            .expect("GEMINI_API_KEY must be set before launching Ink Studio");

        let capabilities = Capabilities::detect();
        log::info!(
            "Ink Studio initialized (camera: {}, map: {})",
            capabilities.camera_available,
            capabilities.map_available
        );

        (
            InkStudio {
                session: Session::new(),
                gateway,
                custom_prompt: String::new(),
                reference_image: None,
                edit_prompt: String::new(),
                notice: None,
                cooldowns: Cooldowns::default(),
                capabilities,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                if !self.cooldowns.pick_image.try_fire() {
                    return Task::none();
                }
                self.notice = None;

                // The native dialog blocks until the user picks or cancels
                match provider::picker::pick_image_file() {
                    Some(path) => Task::perform(provider::picker::load_encoded(path), |result| {
                        Message::ImageLoaded(result.map_err(|e| e.to_string()))
                    }),
                    None => Task::none(),
                }
            }

            Message::TakePhoto => {
                if !self.cooldowns.take_photo.try_fire() {
                    return Task::none();
                }
                match provider::picker::take_photo() {
                    Ok(Some(image)) => self.start_analysis(image),
                    Ok(None) => Task::none(),
                    Err(e) => {
                        self.notice = Some(e.to_string());
                        Task::none()
                    }
                }
            }

            Message::ImageLoaded(Ok(image)) => self.start_analysis(image),
            Message::ImageLoaded(Err(message)) => {
                // Point-of-use alert; the journey has not started yet
                self.notice = Some(message);
                Task::none()
            }

            Message::AnalysisComplete(result) => {
                self.session.commit_analysis(result);
                Task::none()
            }

            Message::StyleChosen(style) => {
                if !self.cooldowns.style_select.try_fire() {
                    return Task::none();
                }
                let prompt = format!("A tattoo of {style}.");
                self.start_generate(style, prompt, None)
            }

            Message::CustomIdeaPressed => {
                self.session.open_custom_input();
                self.notice = None;
                Task::none()
            }

            Message::CustomPromptChanged(value) => {
                self.custom_prompt = value;
                Task::none()
            }

            Message::PickReferenceImage => {
                if !self.cooldowns.pick_reference.try_fire() {
                    return Task::none();
                }
                match provider::picker::pick_image_file() {
                    Some(path) => Task::perform(provider::picker::load_encoded(path), |result| {
                        Message::ReferenceLoaded(result.map_err(|e| e.to_string()))
                    }),
                    None => Task::none(),
                }
            }

            Message::ReferenceLoaded(Ok(image)) => {
                self.reference_image = Some(image);
                Task::none()
            }
            Message::ReferenceLoaded(Err(message)) => {
                self.notice = Some(message);
                Task::none()
            }

            Message::ClearReference => {
                self.reference_image = None;
                Task::none()
            }

            Message::CustomSubmitted => {
                if !self.cooldowns.custom_submit.try_fire() {
                    return Task::none();
                }
                let prompt = self.custom_prompt.trim().to_string();
                if prompt.is_empty() {
                    self.notice = Some("Describe your tattoo idea first.".to_string());
                    return Task::none();
                }
                self.notice = None;
                let reference = self.reference_image.clone();
                self.start_generate(prompt.clone(), prompt, reference)
            }

            Message::GenerateComplete(result) => {
                self.session.commit_render(result);
                Task::none()
            }

            Message::EditPromptChanged(value) => {
                self.edit_prompt = value;
                Task::none()
            }

            Message::EditSubmitted => {
                if !self.cooldowns.edit_submit.try_fire() {
                    return Task::none();
                }
                let Some(prompt) = validate_edit_prompt(&self.edit_prompt).map(str::to_string)
                else {
                    self.notice =
                        Some("Edit requests must be between 3 and 200 characters.".to_string());
                    return Task::none();
                };
                self.notice = None;

                let Some(rendered) = self.session.begin_edit() else {
                    return Task::none();
                };
                self.edit_prompt.clear();

                let gateway = self.gateway.clone();
                Task::perform(
                    async move {
                        gateway
                            .edit(&rendered, &prompt)
                            .await
                            .map_err(|e| user_message(&e))
                    },
                    Message::EditComplete,
                )
            }

            Message::EditComplete(result) => {
                self.session.commit_edit(result);
                Task::none()
            }

            Message::FindArtists => {
                if !self.cooldowns.find_artists.try_fire() {
                    return Task::none();
                }
                self.start_artist_search()
            }

            Message::ArtistsComplete(result) => {
                self.session.commit_artists(result);
                Task::none()
            }

            Message::BackToRecommend => {
                self.session.back_to_recommend();
                Task::none()
            }

            Message::BackToPreview => {
                self.session.back_to_preview();
                Task::none()
            }

            Message::Retry => {
                if !self.cooldowns.retry.try_fire() {
                    return Task::none();
                }
                match self.session.retry_action() {
                    Some(RetryAction::Analyze(image)) => self.start_analysis(image),
                    Some(RetryAction::Generate { style }) => {
                        let prompt = format!("A tattoo of {style}.");
                        self.start_generate(style, prompt, None)
                    }
                    Some(RetryAction::FindArtists) => self.start_artist_search(),
                    Some(RetryAction::ReturnToCustomInput)
                    | Some(RetryAction::Reset)
                    | None => Task::none(),
                }
            }

            Message::Reset => {
                self.session.reset();
                self.custom_prompt.clear();
                self.edit_prompt.clear();
                self.reference_image = None;
                self.notice = None;
                Task::none()
            }
        }
    }

    /// Store the photo and launch the analysis call
    fn start_analysis(&mut self, image: EncodedImage) -> Task<Message> {
        self.session.begin_analysis(image.clone());
        let gateway = self.gateway.clone();
        Task::perform(
            async move { gateway.analyze(&image).await.map_err(|e| user_message(&e)) },
            Message::AnalysisComplete,
        )
    }

    /// Record the chosen style and launch the generation call. Ignored
    /// when no source photo was ever submitted.
    fn start_generate(
        &mut self,
        style: String,
        prompt: String,
        reference: Option<EncodedImage>,
    ) -> Task<Message> {
        let Some(source) = self.session.begin_generate(&style) else {
            return Task::none();
        };
        let gateway = self.gateway.clone();
        Task::perform(
            async move {
                gateway
                    .generate(&source, &prompt, reference.as_ref())
                    .await
                    .map_err(|e| user_message(&e))
            },
            Message::GenerateComplete,
        )
    }

    /// Optimistic transition to the Artists screen, then the grounded
    /// search fills the list when it settles
    fn start_artist_search(&mut self) -> Task<Message> {
        let Some(style) = self.session.begin_artist_search() else {
            return Task::none();
        };
        let gateway = self.gateway.clone();
        Task::perform(
            async move {
                let location = provider::location::current_coordinate();
                gateway::places::find_artists(&gateway, &style, location)
                    .await
                    .map_err(|e| user_message(&e))
            },
            Message::ArtistsComplete,
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        ui::screens::view(self)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Ink Studio", InkStudio::update, InkStudio::view)
        .theme(InkStudio::theme)
        .centered()
        .run_with(InkStudio::new)
}
