/// Gemini API client
///
/// One request/response mapping per operation, no built-in retry:
/// retries are user-initiated through the retry affordance. Request
/// bodies are assembled with `json!`, responses are deserialized into
/// typed structs so the parsing helpers stay testable offline.

use serde::Deserialize;
use serde_json::json;

use super::error::GatewayError;
use crate::state::data::EncodedImage;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model for image understanding and grounded search
pub(crate) const TEXT_MODEL: &str = "gemini-2.5-flash";
/// Model for image generation and editing
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Served instead of failing when the analysis response is malformed
pub const FALLBACK_IDEAS: [&str; 3] = [
    "Fine-line botanical",
    "American traditional eagle",
    "Abstract watercolor splash",
];

const ANALYZE_INSTRUCTION: &str = "\
Task: Analyze the body part in this image and suggest exactly 3 distinct tattoo design ideas that would fit well on this specific area.

Constraints:
- Each suggestion must be a short, descriptive name combining the style and subject
- Names should be 2-5 words maximum
- Suggestions must be visually distinct from each other
- Consider the body part's size, shape, and visibility

Response format: Return a JSON array containing exactly 3 strings.

Examples of good tattoo idea names:
- \"Neo-traditional tiger\"
- \"Minimalist geometric wave\"
- \"Fine-line botanical branch\"
- \"American traditional eagle\"
- \"Abstract watercolor splash\"
- \"Japanese koi fish\"

Output: Return only a valid JSON array of exactly 3 strings, no additional text.";

fn generate_instruction(prompt: &str) -> String {
    format!(
        "\
Task: Generate a realistic tattoo design on the body part shown in this image.

Tattoo design: \"{prompt}\"

Requirements:
- The tattoo must look realistic and appear naturally integrated into the skin
- Follow the natural contours and curves of the body part
- Maintain proper proportions relative to the body part size
- Use appropriate shading and detail for the style
- Ensure the tattoo appears as if it was actually inked on the skin
- Match the lighting and perspective of the original image

Output: Generate a high-quality image showing the tattoo design placed naturally on the body part."
    )
}

fn referenced_generate_instruction(prompt: &str) -> String {
    format!(
        "\
Task: Generate a realistic tattoo design on the body part shown in the second image, using the first image as a style reference.

Tattoo design: \"{prompt}\"

Reference image: Use the first image as inspiration for style, composition, or visual elements. Adapt and integrate these elements into the tattoo design.

Requirements:
- The tattoo must look realistic and appear naturally integrated into the skin
- Follow the natural contours and curves of the body part
- Maintain proper proportions relative to the body part size
- Use appropriate shading and detail matching the reference style when applicable
- Ensure the tattoo appears as if it was actually inked on the skin
- Match the lighting and perspective of the original body part image
- Incorporate elements from the reference image while adapting to the body part's shape

Output: Generate a high-quality image showing the tattoo design placed naturally on the body part, inspired by the reference image."
    )
}

fn edit_instruction(prompt: &str) -> String {
    format!(
        "\
Task: Edit the existing tattoo in this image according to the user's request.

User request: \"{prompt}\"

Requirements:
- Maintain the realistic appearance of the tattoo on skin
- Preserve the natural integration with the body part
- Keep the same lighting and perspective
- Apply the requested changes while maintaining tattoo quality

Output: Generate a high-quality edited image of the tattoo."
    )
}

// ========== Response wire types ==========

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GroundingChunk {
    #[serde(default)]
    pub maps: Option<MapsChunk>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MapsChunk {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub place_answer_sources: Option<OneOrMany<PlaceAnswerSource>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceAnswerSource {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

/// The API serializes a single source as an object, several as an array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::Many(items) => items.first(),
            OneOrMany::One(item) => Some(item),
        }
    }
}

// ========== Client ==========

/// The external AI service boundary. Cheap to clone per background task;
/// the inner reqwest client is already reference-counted.
#[derive(Debug, Clone)]
pub struct GeminiGateway {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl GeminiGateway {
    /// Build the gateway from process configuration. A missing or blank
    /// GEMINI_API_KEY is a fatal startup error for the caller.
    pub fn from_env() -> Result<Self, GatewayError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingCredential)?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            api_base: API_BASE.to_string(),
        })
    }

    pub(crate) async fn generate_content(
        &self,
        model: &str,
        payload: &serde_json::Value,
    ) -> Result<GenerateContentResponse, GatewayError> {
        let endpoint = format!("{}/models/{}:generateContent", self.api_base, model);
        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                code: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GatewayError::BadPayload(e.to_string()))
    }

    /// Analyze the body-part photo and suggest exactly 3 style names.
    ///
    /// A malformed response never blocks the journey: any shape problem
    /// is swallowed and replaced with `FALLBACK_IDEAS`. Only transport
    /// and HTTP failures propagate.
    pub async fn analyze(&self, image: &EncodedImage) -> Result<Vec<String>, GatewayError> {
        let payload = json!({
            "contents": [{
                "parts": [
                    inline_image_part(image),
                    { "text": ANALYZE_INSTRUCTION },
                ],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                },
            },
        });

        let response = self.generate_content(TEXT_MODEL, &payload).await?;
        Ok(parse_style_response(&response))
    }

    /// Generate a tattoo preview on the body-part photo.
    ///
    /// When a reference image is supplied it goes ahead of the body-part
    /// image so the service reads it as style context, not as the
    /// surface to draw on.
    pub async fn generate(
        &self,
        source: &EncodedImage,
        prompt: &str,
        reference: Option<&EncodedImage>,
    ) -> Result<EncodedImage, GatewayError> {
        let parts = match reference {
            Some(reference_image) => json!([
                inline_image_part(reference_image),
                { "text": "Reference image for style guidance:" },
                inline_image_part(source),
                { "text": referenced_generate_instruction(prompt) },
            ]),
            None => json!([
                inline_image_part(source),
                { "text": generate_instruction(prompt) },
            ]),
        };

        self.render(parts).await
    }

    /// Apply a natural-language edit to the current preview
    pub async fn edit(
        &self,
        rendered: &EncodedImage,
        prompt: &str,
    ) -> Result<EncodedImage, GatewayError> {
        let parts = json!([
            inline_image_part(rendered),
            { "text": edit_instruction(prompt) },
        ]);

        self.render(parts).await
    }

    async fn render(&self, parts: serde_json::Value) -> Result<EncodedImage, GatewayError> {
        let payload = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
            },
        });

        let response = self.generate_content(IMAGE_MODEL, &payload).await?;
        parse_image_response(&response)
    }
}

fn inline_image_part(image: &EncodedImage) -> serde_json::Value {
    json!({
        "inlineData": {
            "mimeType": "image/jpeg",
            "data": image.to_base64(),
        },
    })
}

/// Pull the style names out of an analysis response.
///
/// The model is asked for a JSON array of exactly 3 distinct strings;
/// anything else falls back to the fixed triple.
pub(crate) fn parse_style_response(response: &GenerateContentResponse) -> Vec<String> {
    let fallback = || {
        log::warn!("Malformed analysis response; serving fallback style ideas");
        FALLBACK_IDEAS.iter().map(|idea| idea.to_string()).collect()
    };

    let Some(content) = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
    else {
        return fallback();
    };

    let text: String = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    let Ok(ideas) = serde_json::from_str::<Vec<String>>(text.trim()) else {
        return fallback();
    };

    let distinct = ideas
        .iter()
        .enumerate()
        .all(|(i, idea)| !ideas[..i].contains(idea));
    if ideas.len() != 3 || !distinct {
        return fallback();
    }

    ideas
}

/// First inline image part of a render response, decoded
pub(crate) fn parse_image_response(
    response: &GenerateContentResponse,
) -> Result<EncodedImage, GatewayError> {
    let candidate = response
        .candidates
        .first()
        .ok_or(GatewayError::EmptyResponse)?;

    let parts = candidate
        .content
        .as_ref()
        .map(|content| content.parts.as_slice())
        .unwrap_or_default();

    for part in parts {
        if let Some(inline) = &part.inline_data {
            if !inline.data.is_empty() {
                return EncodedImage::from_base64(&inline.data)
                    .map_err(|e| GatewayError::BadPayload(e.to_string()));
            }
        }
    }

    Err(GatewayError::NoImage)
}
