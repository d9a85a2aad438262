//! PNG output for decoded textures.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{ExtendedColorType, ImageEncoder, ImageFormat, codecs::png::PngEncoder};

use crate::{
    error::{DecodeError, DecodeResult},
    texture::DecodedTexture,
};

/// Encode a texture as an RGBA8 PNG.
///
/// # Errors
///
/// Returns [`DecodeError::EncodingFailed`] if the encoder fails.
pub fn encode_png(texture: &DecodedTexture) -> DecodeResult<Vec<u8>> {
    let mut png = Vec::new();
    write_png_to(texture, &mut png)?;
    Ok(png)
}

/// Encode a texture as PNG and write it to `path`.
pub fn write_png(texture: &DecodedTexture, path: &Path) -> DecodeResult<()> {
    let file = File::create(path).map_err(|e| DecodeError::EncodingFailed {
        detail: format!("failed to create {}: {e}", path.display()),
    })?;
    let mut writer = BufWriter::new(file);
    write_png_to(texture, &mut writer)?;
    writer.flush().map_err(|e| DecodeError::EncodingFailed {
        detail: format!("failed to write {}: {e}", path.display()),
    })
}

fn write_png_to<W: Write>(texture: &DecodedTexture, writer: W) -> DecodeResult<()> {
    PngEncoder::new(writer)
        .write_image(
            &texture.data,
            texture.width,
            texture.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| DecodeError::EncodingFailed {
            detail: e.to_string(),
        })
}

/// Decode a PNG (of any colour type) into an RGBA8 texture.
///
/// # Errors
///
/// Returns [`DecodeError::EncodingFailed`] if the bytes are not a readable PNG.
pub fn decode_png(png: &[u8]) -> DecodeResult<DecodedTexture> {
    let image = image::load_from_memory_with_format(png, ImageFormat::Png)
        .map_err(|e| DecodeError::EncodingFailed {
            detail: format!("failed to read png: {e}"),
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    DecodedTexture::try_new(image.into_raw(), width, height)
}
