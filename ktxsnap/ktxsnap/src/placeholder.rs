//! Placeholder images for snapshots that could not be decoded.

use std::{fs, path::Path};

use ktxsnap_decode::{DecodedTexture, decode_png, encode_png};

use crate::error::{Error, Result};

/// Side length of the default blank placeholder.
pub const DEFAULT_PLACEHOLDER_SIZE: u32 = 64;

/// Encoded PNG substituted for a failed snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    png: Vec<u8>,
}

impl Placeholder {
    /// A fully transparent image of the given size.
    pub fn blank(width: u32, height: u32) -> Result<Self> {
        let pixels = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        let texture = DecodedTexture::try_new(vec![0; pixels], width, height)?;
        Ok(Self {
            png: encode_png(&texture)?,
        })
    }

    /// The default placeholder: a 64x64 transparent image.
    pub fn transparent() -> Result<Self> {
        Self::blank(DEFAULT_PLACEHOLDER_SIZE, DEFAULT_PLACEHOLDER_SIZE)
    }

    /// Use an existing PNG file. The file is decoded once to validate it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let png = fs::read(path).map_err(|e| Error::io("read", path, &e))?;
        Self::from_png(png)
    }

    /// Use in-memory PNG bytes, validating them first.
    pub fn from_png(png: Vec<u8>) -> Result<Self> {
        decode_png(&png).map_err(|e| Error::Placeholder {
            detail: e.to_string(),
        })?;
        Ok(Self { png })
    }

    /// The encoded PNG bytes.
    #[must_use]
    pub fn png(&self) -> &[u8] {
        &self.png
    }
}
