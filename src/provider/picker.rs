/// Image picking and re-encoding
///
/// The picked file is normalized before it goes anywhere near the
/// gateway: center-cropped to a square, capped at 1024px on the long
/// edge, and re-encoded as JPEG. Decoding and encoding are CPU-bound,
/// so they run on a blocking task off the UI thread.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tokio::task;

use super::ProviderError;
use crate::state::data::EncodedImage;

const JPEG_QUALITY: u8 = 85;
const MAX_EDGE: u32 = 1024;

/// Show the native file dialog. Returns `None` when the user cancels.
pub fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select a photo of the body part")
        .add_filter("Images", &["jpg", "jpeg", "png", "webp", "bmp"])
        .pick_file()
}

/// Capture from the device camera.
///
/// Only reachable when `Capabilities::detect()` reports a camera; the
/// desktop build never does, so this is the seam a mobile shell fills in.
pub fn take_photo() -> Result<Option<EncodedImage>, ProviderError> {
    Err(ProviderError::CameraUnavailable)
}

/// Load a picked file and normalize it into an encoded JPEG
pub async fn load_encoded(path: PathBuf) -> Result<EncodedImage, ProviderError> {
    task::spawn_blocking(move || load_encoded_blocking(&path))
        .await
        .map_err(|e| ProviderError::Internal(format!("Task join error: {e}")))?
}

fn load_encoded_blocking(path: &Path) -> Result<EncodedImage, ProviderError> {
    let img = image::open(path).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let square = square_crop(img);
    let sized = if square.width() > MAX_EDGE {
        square.resize(MAX_EDGE, MAX_EDGE, FilterType::Lanczos3)
    } else {
        square
    };

    encode_jpeg(&sized)
}

/// Center-crop to the largest square that fits
fn square_crop(img: DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let edge = width.min(height);
    let x = (width - edge) / 2;
    let y = (height - edge) / 2;
    img.crop_imm(x, y, edge, edge)
}

fn encode_jpeg(img: &DynamicImage) -> Result<EncodedImage, ProviderError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);

    // JPEG has no alpha channel
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| ProviderError::Encode(e.to_string()))?;

    Ok(EncodedImage::new(buffer))
}
