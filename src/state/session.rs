/// The Session state machine
///
/// A Session is the single mutable aggregate for one user journey:
/// upload a photo, pick or write a style, preview the generated tattoo,
/// refine it, then search for nearby artists. These methods are the only
/// mutation path; the view layer just reads the fields.
///
/// Async calls are split into a `begin_*` (enter the busy
/// state, hand the shell what it needs for the request) and a `commit_*`
/// (fold the settled result back into the session). The shell runs the
/// actual gateway future between the two.

use super::artist::ArtistRecord;
use super::data::EncodedImage;

/// The five navigational states of the journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Start,
    Recommend,
    CustomInput,
    Preview,
    Artists,
}

/// What the shell must re-invoke after a failure, per current screen
#[derive(Debug, Clone, PartialEq)]
pub enum RetryAction {
    /// Re-run analysis on the stored source photo
    Analyze(EncodedImage),
    /// Re-generate the preview from the chosen style
    Generate { style: String },
    /// Re-run the artist search with the unchanged chosen style
    FindArtists,
    /// Return to the custom idea form without a network call
    ReturnToCustomInput,
    /// Nothing sensible to retry; the session was reset
    Reset,
}

#[derive(Debug, Default)]
pub struct Session {
    pub screen: Screen,
    /// The uploaded body-part photo; set once per journey
    pub source_image: Option<EncodedImage>,
    /// Latest generated/edited preview
    pub rendered_image: Option<EncodedImage>,
    /// Style suggestions in API response order
    pub style_options: Vec<String>,
    /// The style name or free-text prompt behind `rendered_image`;
    /// also seeds the artist search
    pub chosen_style: String,
    pub nearby_artists: Vec<ArtistRecord>,
    /// Progress label while a call is in flight; `Some` == busy
    pub busy: Option<String>,
    /// User-facing error; mutually exclusive with `busy`
    pub failure: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the busy state with a stage label, clearing any failure
    fn begin(&mut self, label: &str) {
        self.busy = Some(label.to_string());
        self.failure = None;
    }

    fn settle(&mut self) {
        self.busy = None;
    }

    fn fail(&mut self, message: String, default: &str) {
        self.failure = Some(if message.trim().is_empty() {
            default.to_string()
        } else {
            message
        });
    }

    /// An image was submitted: store it and enter the analysis stage
    pub fn begin_analysis(&mut self, image: EncodedImage) {
        self.source_image = Some(image);
        self.begin("Analyzing your canvas...");
    }

    /// Fold the analysis result in. Success lands on Recommend with the
    /// style options; failure lands back on Start with the error set.
    /// The source image survives either way.
    pub fn commit_analysis(&mut self, result: Result<Vec<String>, String>) {
        match result {
            Ok(ideas) => {
                self.style_options = ideas;
                self.screen = Screen::Recommend;
            }
            Err(message) => {
                self.fail(
                    message,
                    "Could not analyze the image. Please try another one.",
                );
                self.screen = Screen::Start;
            }
        }
        self.settle();
    }

    /// A style or custom prompt was chosen: record it and enter the
    /// generation stage. Returns the source image for the request, or
    /// `None` when no photo was ever submitted (trigger is ignored).
    pub fn begin_generate(&mut self, style: &str) -> Option<EncodedImage> {
        let source = self.source_image.clone()?;
        self.chosen_style = style.to_string();
        self.begin("Inking your design...");
        Some(source)
    }

    /// Fold the generation result in. The previous screen stays visible
    /// on failure so the user can pick again or fix the prompt.
    pub fn commit_render(&mut self, result: Result<EncodedImage, String>) {
        match result {
            Ok(image) => {
                self.rendered_image = Some(image);
                self.screen = Screen::Preview;
            }
            Err(message) => self.fail(
                message,
                "Failed to generate the tattoo preview. Please try again.",
            ),
        }
        self.settle();
    }

    /// An edit prompt was submitted. Returns the current preview for the
    /// request, or `None` when there is nothing to edit yet.
    pub fn begin_edit(&mut self) -> Option<EncodedImage> {
        let rendered = self.rendered_image.clone()?;
        self.begin("Refining the ink...");
        Some(rendered)
    }

    /// Replace the preview with the edited image; the screen stays on
    /// Preview in both arms.
    pub fn commit_edit(&mut self, result: Result<EncodedImage, String>) {
        match result {
            Ok(image) => self.rendered_image = Some(image),
            Err(message) => self.fail(
                message,
                "Could not apply the edit. Please try a different prompt.",
            ),
        }
        self.settle();
    }

    /// "Find artists" was pressed. This transition is optimistic: the
    /// Artists screen renders its own busy indicator, so we move there
    /// immediately and fill the list when the search settles. Returns the
    /// style seeding the search, or `None` when no style was ever chosen.
    pub fn begin_artist_search(&mut self) -> Option<String> {
        if self.chosen_style.is_empty() {
            return None;
        }
        self.screen = Screen::Artists;
        self.begin("Scanning for local artists...");
        Some(self.chosen_style.clone())
    }

    pub fn commit_artists(&mut self, result: Result<Vec<ArtistRecord>, String>) {
        match result {
            Ok(artists) => self.nearby_artists = artists,
            Err(message) => self.fail(
                message,
                "Could not find artists. Please check your location settings and try again.",
            ),
        }
        self.settle();
    }

    /// "Custom idea" was pressed; needs a source photo to make sense
    pub fn open_custom_input(&mut self) {
        if self.source_image.is_some() {
            self.screen = Screen::CustomInput;
        }
    }

    pub fn back_to_recommend(&mut self) {
        self.screen = Screen::Recommend;
    }

    pub fn back_to_preview(&mut self) {
        self.screen = Screen::Preview;
    }

    /// Clear every field back to its default. Idempotent.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Map a pending failure to the action that should run again.
    ///
    /// Clears the failure and decides from the current screen: Recommend
    /// re-analyzes the stored photo, Preview re-generates from the chosen
    /// style, Artists re-searches with the same style. A failure reached
    /// from the custom idea form returns to the form without a network
    /// call (guarded on the source photo still being present). Anything
    /// else falls back to a full reset.
    ///
    /// Returns `None` when no failure is pending.
    pub fn retry_action(&mut self) -> Option<RetryAction> {
        self.failure.take()?;

        let action = match (self.screen, &self.source_image) {
            (Screen::Recommend, Some(image)) => RetryAction::Analyze(image.clone()),
            (Screen::CustomInput, Some(_)) => RetryAction::ReturnToCustomInput,
            (Screen::Preview, Some(_)) if !self.chosen_style.is_empty() => {
                RetryAction::Generate {
                    style: self.chosen_style.clone(),
                }
            }
            (Screen::Artists, _) if !self.chosen_style.is_empty() => RetryAction::FindArtists,
            _ => {
                self.reset();
                RetryAction::Reset
            }
        };

        Some(action)
    }
}

/// Validate an edit prompt at the input boundary.
///
/// Trims, then accepts 3..=200 characters. Rejected prompts never reach
/// the gateway.
pub fn validate_edit_prompt(prompt: &str) -> Option<&str> {
    let trimmed = prompt.trim();
    let length = trimmed.chars().count();
    if (3..=200).contains(&length) {
        Some(trimmed)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::artist::{extract_coordinate, ArtistRecord};

    fn jpeg(tag: u8) -> EncodedImage {
        EncodedImage::new(vec![0xFF, 0xD8, tag])
    }

    fn artist(title: &str) -> ArtistRecord {
        ArtistRecord {
            title: title.to_string(),
            uri: format!("https://maps.google.com/?q=37.7749,-122.4194&name={title}"),
            place_id: None,
            rating: Some(4.8),
            review_count: Some(120),
            coordinate: extract_coordinate("https://maps.google.com/?q=37.7749,-122.4194"),
        }
    }

    #[test]
    fn test_analysis_success_lands_on_recommend() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        assert!(session.busy.is_some());
        assert!(session.failure.is_none());

        session.commit_analysis(Ok(vec![
            "Tribal sun".to_string(),
            "Watercolor wave".to_string(),
            "Minimalist line".to_string(),
        ]));

        assert_eq!(session.screen, Screen::Recommend);
        assert_eq!(session.style_options.len(), 3);
        assert!(session.busy.is_none());
        assert!(session.failure.is_none());
    }

    #[test]
    fn test_analysis_failure_lands_on_start_with_failure() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Err("boom".to_string()));

        assert_eq!(session.screen, Screen::Start);
        assert!(session.style_options.is_empty());
        assert_eq!(session.failure.as_deref(), Some("boom"));
        assert!(session.busy.is_none());
        // The photo survives the failure
        assert!(session.source_image.is_some());
    }

    #[test]
    fn test_empty_failure_message_gets_a_default() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Err("  ".to_string()));
        assert_eq!(
            session.failure.as_deref(),
            Some("Could not analyze the image. Please try another one.")
        );
    }

    #[test]
    fn test_busy_and_failure_never_overlap() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Err("boom".to_string()));
        assert!(session.failure.is_some() && session.busy.is_none());

        // Starting the next action clears the failure
        session.begin_analysis(jpeg(1));
        assert!(session.busy.is_some() && session.failure.is_none());
    }

    #[test]
    fn test_generate_requires_source_image() {
        let mut session = Session::new();
        assert!(session.begin_generate("Watercolor wave").is_none());
        assert!(session.chosen_style.is_empty());
        assert!(session.busy.is_none());
    }

    #[test]
    fn test_generate_records_chosen_style_before_the_call() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));

        let source = session.begin_generate("Watercolor wave").unwrap();
        assert_eq!(source, jpeg(1));
        assert_eq!(session.chosen_style, "Watercolor wave");
        assert!(session.rendered_image.is_none());
    }

    #[test]
    fn test_generate_failure_keeps_previous_screen() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("A").unwrap();
        session.commit_render(Err("no ink".to_string()));

        assert_eq!(session.screen, Screen::Recommend);
        assert!(session.rendered_image.is_none());
        assert_eq!(session.failure.as_deref(), Some("no ink"));
    }

    #[test]
    fn test_rendered_image_only_after_successful_render() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("A").unwrap();
        assert!(session.rendered_image.is_none());

        session.commit_render(Ok(jpeg(2)));
        assert_eq!(session.screen, Screen::Preview);
        assert_eq!(session.rendered_image, Some(jpeg(2)));
    }

    #[test]
    fn test_edit_replaces_preview_and_stays_on_preview() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("A").unwrap();
        session.commit_render(Ok(jpeg(2)));

        let current = session.begin_edit().unwrap();
        assert_eq!(current, jpeg(2));
        session.commit_edit(Ok(jpeg(3)));

        assert_eq!(session.screen, Screen::Preview);
        assert_eq!(session.rendered_image, Some(jpeg(3)));
    }

    #[test]
    fn test_edit_failure_keeps_old_preview() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("A").unwrap();
        session.commit_render(Ok(jpeg(2)));
        session.begin_edit().unwrap();
        session.commit_edit(Err("bad edit".to_string()));

        assert_eq!(session.screen, Screen::Preview);
        assert_eq!(session.rendered_image, Some(jpeg(2)));
        assert_eq!(session.failure.as_deref(), Some("bad edit"));
    }

    #[test]
    fn test_edit_without_preview_is_ignored() {
        let mut session = Session::new();
        assert!(session.begin_edit().is_none());
    }

    #[test]
    fn test_artist_search_transitions_optimistically() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("Watercolor wave").unwrap();
        session.commit_render(Ok(jpeg(2)));

        let style = session.begin_artist_search().unwrap();
        assert_eq!(style, "Watercolor wave");
        // Screen moved before the search settled
        assert_eq!(session.screen, Screen::Artists);
        assert!(session.busy.is_some());

        session.commit_artists(Ok(vec![artist("Golden Needle")]));
        assert_eq!(session.nearby_artists.len(), 1);
        assert!(session.busy.is_none());
    }

    #[test]
    fn test_artist_search_without_style_is_ignored() {
        let mut session = Session::new();
        assert!(session.begin_artist_search().is_none());
        assert_eq!(session.screen, Screen::Start);
    }

    #[test]
    fn test_custom_input_requires_source_image() {
        let mut session = Session::new();
        session.open_custom_input();
        assert_eq!(session.screen, Screen::Start);

        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.open_custom_input();
        assert_eq!(session.screen, Screen::CustomInput);

        session.back_to_recommend();
        assert_eq!(session.screen, Screen::Recommend);
    }

    #[test]
    fn test_reset_clears_everything_and_is_idempotent() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("A").unwrap();
        session.commit_render(Ok(jpeg(2)));
        session.begin_artist_search().unwrap();
        session.commit_artists(Err("boom".to_string()));

        session.reset();
        assert_eq!(session.screen, Screen::Start);
        assert!(session.source_image.is_none());
        assert!(session.rendered_image.is_none());
        assert!(session.style_options.is_empty());
        assert!(session.chosen_style.is_empty());
        assert!(session.nearby_artists.is_empty());
        assert!(session.busy.is_none());
        assert!(session.failure.is_none());

        session.reset();
        assert_eq!(session.screen, Screen::Start);
    }

    #[test]
    fn test_retry_without_failure_is_noop() {
        let mut session = Session::new();
        assert!(session.retry_action().is_none());
    }

    #[test]
    fn test_retry_from_recommend_reanalyzes_source() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("A").unwrap();
        session.commit_render(Err("boom".to_string()));

        let action = session.retry_action().unwrap();
        assert_eq!(action, RetryAction::Analyze(jpeg(1)));
        assert!(session.failure.is_none());
    }

    #[test]
    fn test_retry_from_preview_regenerates_chosen_style() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("Watercolor wave").unwrap();
        session.commit_render(Ok(jpeg(2)));
        session.begin_edit().unwrap();
        session.commit_edit(Err("boom".to_string()));

        let action = session.retry_action().unwrap();
        assert_eq!(
            action,
            RetryAction::Generate {
                style: "Watercolor wave".to_string()
            }
        );
    }

    #[test]
    fn test_retry_from_artists_keeps_chosen_style() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.begin_generate("Watercolor wave").unwrap();
        session.commit_render(Ok(jpeg(2)));
        session.begin_artist_search().unwrap();
        session.commit_artists(Err("boom".to_string()));

        let action = session.retry_action().unwrap();
        assert_eq!(action, RetryAction::FindArtists);
        assert_eq!(session.chosen_style, "Watercolor wave");
    }

    #[test]
    fn test_retry_from_custom_input_returns_to_form() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec!["A".into(), "B".into(), "C".into()]));
        session.open_custom_input();
        session.begin_generate("dragon over the shoulder").unwrap();
        session.commit_render(Err("boom".to_string()));
        assert_eq!(session.screen, Screen::CustomInput);

        let action = session.retry_action().unwrap();
        assert_eq!(action, RetryAction::ReturnToCustomInput);
        assert!(session.failure.is_none());
        // The source photo is still there for the resubmission
        assert!(session.source_image.is_some());
    }

    #[test]
    fn test_retry_from_start_resets() {
        let mut session = Session::new();
        session.begin_analysis(jpeg(1));
        session.commit_analysis(Err("boom".to_string()));
        assert_eq!(session.screen, Screen::Start);

        let action = session.retry_action().unwrap();
        assert_eq!(action, RetryAction::Reset);
        assert!(session.source_image.is_none());
    }

    #[test]
    fn test_validate_edit_prompt_bounds() {
        assert!(validate_edit_prompt("").is_none());
        assert!(validate_edit_prompt("ab").is_none());
        assert!(validate_edit_prompt("  ab  ").is_none());
        assert_eq!(validate_edit_prompt("abc"), Some("abc"));
        assert_eq!(validate_edit_prompt("  make it red  "), Some("make it red"));

        let max = "x".repeat(200);
        assert_eq!(validate_edit_prompt(&max), Some(max.as_str()));
        let too_long = "x".repeat(201);
        assert!(validate_edit_prompt(&too_long).is_none());
    }

    #[test]
    fn test_full_journey() {
        let mut session = Session::new();

        session.begin_analysis(jpeg(1));
        session.commit_analysis(Ok(vec![
            "Tribal sun".to_string(),
            "Watercolor wave".to_string(),
            "Minimalist line".to_string(),
        ]));
        assert_eq!(session.screen, Screen::Recommend);

        session.begin_generate("Watercolor wave").unwrap();
        session.commit_render(Ok(jpeg(2)));
        assert_eq!(session.screen, Screen::Preview);
        assert_eq!(session.chosen_style, "Watercolor wave");

        session.begin_artist_search().unwrap();
        assert_eq!(session.screen, Screen::Artists);
        assert!(session.busy.is_some());
        session.commit_artists(Ok(vec![artist("Golden Needle"), artist("Iron Rose")]));
        assert_eq!(session.nearby_artists.len(), 2);

        session.back_to_preview();
        assert_eq!(session.screen, Screen::Preview);
    }
}
