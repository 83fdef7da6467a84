/// Platform provider module
///
/// The boundary to device capabilities:
/// - Image picking and JPEG re-encoding (picker.rs)
/// - Device coordinate resolution (location.rs)
///
/// Provider failures are surfaced as transient notices at the point of
/// use; they never enter the session failure state.

use thiserror::Error;

pub mod location;
pub mod picker;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("No camera is available on this device")]
    CameraUnavailable,

    #[error("Could not read the image: {0}")]
    Decode(String),

    #[error("Could not encode the image: {0}")]
    Encode(String),

    #[error("{0}")]
    Internal(String),
}

/// Platform capabilities, probed once at startup.
///
/// Desktop builds ship neither a camera bridge nor a maps widget; the
/// flags stay false and the views fall back to upload-only input and a
/// plain list of artist results. A mobile shell would probe for real.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub camera_available: bool,
    pub map_available: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        Self {
            camera_available: false,
            map_available: false,
        }
    }
}
