//! Texture decoding for snapshot payloads.
//!
//! Snapshots carry ASTC 4x4 (LDR) block data. Blocks are decoded one tile at
//! a time so that a corrupt block only costs its own 16 texels.

pub(crate) mod astc;

pub use astc::{
    ASTC_BLOCK_BYTES, ASTC_BLOCK_DIM, FILLER_TEXEL, InvalidBlock, check_block,
    decode_astc_4x4_to_rgba,
};

use crate::error::{DecodeError, DecodeResult};

/// Decoded texture data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    /// RGBA pixel data (4 bytes per pixel), row-major.
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Number of blocks replaced with [`FILLER_TEXEL`] because they were invalid.
    pub substituted_blocks: usize,
}

impl DecodedTexture {
    /// Wrap an RGBA buffer, checking its length against the dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::SizeMismatch`] if `data.len() != 4 * width * height`.
    pub fn try_new(data: Vec<u8>, width: u32, height: u32) -> DecodeResult<Self> {
        let expected = rgba_len(width, height).ok_or(DecodeError::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(DecodeError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            substituted_blocks: 0,
        })
    }

    /// Whether any block had to be replaced with filler texels.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.substituted_blocks > 0
    }

    /// RGBA value of the texel at `(x, y)`.
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        let mut texel = [0u8; 4];
        texel.copy_from_slice(&self.data[index..index + 4]);
        Some(texel)
    }
}

/// Byte length of an RGBA8 buffer, or `None` if it overflows `usize`.
pub(crate) fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
}
