//! Image encoding to inline (data URI) form.
//!
//! Every input is decoded and re-encoded as PNG, so the remote API only ever
//! sees one image format no matter what container the user uploaded.

use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{DynamicImage, ImageOutputFormat};
use tracing::debug;
use vsuite_models::{AssetSource, InlineImage, MediaAsset, NORMALIZED_IMAGE_MIME};

use crate::error::MediaResult;

/// Encode an uploaded image asset.
pub fn encode_asset(asset: &MediaAsset) -> MediaResult<InlineImage> {
    let image = match asset.source() {
        AssetSource::Path(path) => image::open(path)?,
        AssetSource::Bytes(bytes) => image::load_from_memory(bytes)?,
    };
    encode_image(&image)
}

/// Encode an image file on disk.
pub fn encode_path(path: impl AsRef<Path>) -> MediaResult<InlineImage> {
    let image = image::open(path.as_ref())?;
    encode_image(&image)
}

/// Re-encode a decoded image as base64 PNG.
fn encode_image(image: &DynamicImage) -> MediaResult<InlineImage> {
    let png = to_png_bytes(image)?;
    debug!(
        width = image.width(),
        height = image.height(),
        bytes = png.len(),
        "Encoded image as PNG"
    );
    Ok(InlineImage::new(NORMALIZED_IMAGE_MIME, BASE64.encode(png)))
}

/// Raw PNG bytes for an image.
fn to_png_bytes(image: &DynamicImage) -> MediaResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageOutputFormat::Png)?;
    Ok(buf.into_inner())
}
