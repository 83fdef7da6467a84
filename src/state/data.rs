/// Shared data structures for the application state
///
/// These types flow between the platform provider, the Gemini gateway
/// and the session state machine.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// An encoded JPEG image.
///
/// The provider produces one from a picked file, the gateway ships it
/// base64-encoded on the wire, and the session stores the source photo
/// and the latest rendered preview.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(Vec<u8>);

impl EncodedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encode for an inline-data request part
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Decode from an inline-data response part
    pub fn from_base64(data: &str) -> Result<Self, base64::DecodeError> {
        Ok(Self(BASE64.decode(data)?))
    }
}

// Keep Debug output readable - an image can be megabytes of pixel data
impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("bytes", &self.0.len())
            .finish()
    }
}
