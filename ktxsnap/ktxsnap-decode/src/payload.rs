//! Payload extraction and LZFSE decompression.

use std::borrow::Cow;

use crate::{
    container::{Compression, ContainerHeader, ContainerVariant},
    error::{DecodeError, DecodeResult},
};

/// Leading bytes of every LZFSE block header (`bvx2`, `bvxn`, `bvx-`, `bvx$`, ...).
pub const LZFSE_MAGIC: &[u8; 3] = b"bvx";

/// Extract the ASTC block stream described by `header` from `data`.
///
/// Raw payloads are borrowed; compressed payloads are decompressed into an
/// owned buffer.
///
/// # Errors
///
/// - [`DecodeError::TruncatedPayload`] if the payload range lies outside `data`.
/// - [`DecodeError::BadCompressionMagic`] if a compressed Standard payload
///   does not start with `bvx`.
/// - [`DecodeError::DecompressionFailed`] if the LZFSE stream is malformed.
pub fn extract_payload<'a>(data: &'a [u8], header: &ContainerHeader) -> DecodeResult<Cow<'a, [u8]>> {
    let location = header.payload;
    let payload = location
        .offset
        .checked_add(location.length)
        .and_then(|end| data.get(location.offset..end))
        .ok_or(DecodeError::TruncatedPayload {
            offset: location.offset,
            length: location.length,
            available: data.len(),
        })?;

    match location.compression {
        Compression::None => Ok(Cow::Borrowed(payload)),
        Compression::Lzfse => {
            // The AAPL chunk tag already asserts compression.
            if header.variant == ContainerVariant::Standard && !payload.starts_with(LZFSE_MAGIC) {
                return Err(DecodeError::BadCompressionMagic {
                    found: payload.iter().take(LZFSE_MAGIC.len()).copied().collect(),
                });
            }
            decompress_lzfse(payload).map(Cow::Owned)
        }
    }
}

/// Decompress a complete LZFSE stream.
pub fn decompress_lzfse(stream: &[u8]) -> DecodeResult<Vec<u8>> {
    let mut out = Vec::new();
    lzfse_rust::decode_bytes(stream, &mut out).map_err(|e| DecodeError::DecompressionFailed {
        detail: e.to_string(),
    })?;
    Ok(out)
}
