/// Gateway error taxonomy and user-facing translation
///
/// Errors are `Clone` because settled results ride back into the update
/// loop inside application messages.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Fatal at startup; the app cannot run without a credential
    #[error("GEMINI_API_KEY environment variable is not set")]
    MissingCredential,

    /// The request never produced a response
    #[error("Network request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status
    #[error("API call failed with HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// A well-formed response with nothing usable in it
    #[error("No response candidates from API")]
    EmptyResponse,

    /// The model answered but produced no image part
    #[error("No image generated by the API.")]
    NoImage,

    /// The response carried data we could not decode
    #[error("API response could not be decoded: {0}")]
    BadPayload(String),
}

const NETWORK_KEYWORDS: [&str; 5] = ["network", "timeout", "connect", "offline", "dns"];

/// Translate a gateway error into the message shown to the user.
///
/// Network-sounding errors are rewritten to a generic connectivity
/// message; everything else passes through as-is, with a fallback for
/// empty text.
pub fn user_message(error: &GatewayError) -> String {
    let message = error.to_string();
    let lowered = message.to_lowercase();
    if NETWORK_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        return "Network error. Please check your internet connection and try again.".to_string();
    }
    if message.trim().is_empty() {
        return "An unexpected error occurred.".to_string();
    }
    message
}
