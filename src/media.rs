use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use snafu::{Location, ResultExt, Snafu};
use tracing::instrument;

pub type Result<T, E = MediaError> = std::result::Result<T, E>;

/// Uploads wider than this are scaled down, preserving aspect ratio.
pub const MAX_WIDTH: u32 = 800;

/// Fixed lossy quality for the re-encode.
pub const JPEG_QUALITY: u8 = 60;

/// Per-record ceiling of the remote store; enforced against the embedded
/// string before any write attempt.
pub const MAX_THUMBNAIL_BYTES: usize = 950_000;

/// Decode/resize/encode must finish within this deadline.
pub const COMPRESSION_DEADLINE: Duration = Duration::from_secs(10);

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MediaError {
    /// the uploaded file could not be decoded as an image
    CorruptImage {
        source: image::ImageError,
        #[snafu(implicit)]
        location: Location,
    },

    /// the resized image could not be re-encoded
    Encode {
        source: image::ImageError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("image processing exceeded its {}s deadline", COMPRESSION_DEADLINE.as_secs()))]
    Timeout {
        #[snafu(implicit)]
        location: Location,
    },
}

/// Compress an uploaded image into a self-contained embedded string.
///
/// The raster work runs on the blocking pool; pathological inputs are cut
/// off by the deadline rather than stalling the runtime.
#[instrument(skip(bytes), fields(input_bytes = bytes.len()))]
pub async fn compress(bytes: Vec<u8>) -> Result<String> {
    let task = tokio::task::spawn_blocking(move || compress_blocking(&bytes));

    match tokio::time::timeout(COMPRESSION_DEADLINE, task).await {
        Ok(finished) => finished.expect("compression task panicked"),
        Err(_elapsed) => TimeoutSnafu.fail(),
    }
}

fn compress_blocking(bytes: &[u8]) -> Result<String> {
    let decoded = image::load_from_memory(bytes).context(CorruptImageSnafu)?;
    let resized = bound_width(decoded);

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    resized
        .to_rgb8()
        .write_with_encoder(encoder)
        .context(EncodeSnafu)?;

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)))
}

fn bound_width(image: DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width <= MAX_WIDTH {
        return image;
    }

    let scale = f64::from(MAX_WIDTH) / f64::from(width);
    let scaled_height = (f64::from(height) * scale).round().max(1.0) as u32;
    image.resize_exact(MAX_WIDTH, scaled_height, FilterType::Triangle)
}
