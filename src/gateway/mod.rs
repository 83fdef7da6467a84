/// Gemini gateway module
///
/// This module is the boundary to the external AI service:
/// - Request/response client for analyze, generate and edit (client.rs)
/// - Location-grounded artist search (places.rs)
/// - Error taxonomy and user-facing translation (error.rs)

pub mod client;
pub mod error;
pub mod places;

pub use client::GeminiGateway;
pub use error::{user_message, GatewayError};
