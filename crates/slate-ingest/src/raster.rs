//! Raster blob decoding.
//!
//! Clipboard raster blobs are decoded just far enough to know they are real
//! images and what size they are, then embedded as self-contained data-URL
//! references — the engine never touches a file system or object store.

use crate::payload::Flavor;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageFormat;
use slate_core::RasterRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("flavor {0:?} is not a raster flavor")]
    NotRaster(Flavor),
    #[error("raster decode failed")]
    Decode(#[from] image::ImageError),
}

fn format_of(flavor: Flavor) -> Option<ImageFormat> {
    match flavor {
        Flavor::Png => Some(ImageFormat::Png),
        Flavor::Jpeg => Some(ImageFormat::Jpeg),
        Flavor::Webp => Some(ImageFormat::WebP),
        _ => None,
    }
}

/// Decode one blob into an embeddable reference with its natural size.
pub fn decode(flavor: Flavor, bytes: &[u8]) -> Result<RasterRef, RasterError> {
    let format = format_of(flavor).ok_or(RasterError::NotRaster(flavor))?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;

    Ok(RasterRef {
        src: format!("data:{};base64,{}", flavor.mime(), BASE64.encode(bytes)),
        natural_width: decoded.width(),
        natural_height: decoded.height(),
    })
}
