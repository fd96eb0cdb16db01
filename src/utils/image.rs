//! Utility functions for decoding uploaded images.

use crate::core::errors::{ClassifyError, SimpleError};
use image::{DynamicImage, ImageFormat, ImageReader, Limits, RgbImage};
use std::io::Cursor;

/// Guesses the encoding of `bytes` from their magic number.
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decodes in-memory image bytes, refusing images wider or taller than `max_dimension`.
///
/// # Errors
///
/// Returns `ClassifyError::Decode` when the bytes are empty, in an unrecognised format,
/// corrupt, or exceed the size limit.
pub fn decode_image(bytes: &[u8], max_dimension: u32) -> Result<DynamicImage, ClassifyError> {
    if bytes.is_empty() {
        return Err(ClassifyError::decode(
            "empty image payload",
            SimpleError::new("zero bytes received"),
        ));
    }

    let format = sniff_format(bytes).ok_or_else(|| {
        ClassifyError::decode(
            "unrecognized image format",
            SimpleError::new(format!("{} bytes with no known image signature", bytes.len())),
        )
    })?;

    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);

    let mut reader = ImageReader::with_format(Cursor::new(bytes), format);
    reader.limits(limits);
    reader
        .decode()
        .map_err(|e| ClassifyError::decode(&format!("failed to decode {format:?} image"), e))
}

/// Converts a DynamicImage to an RgbImage, discarding any alpha channel.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}
