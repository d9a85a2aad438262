//! Decode iOS application snapshot files into RGBA pixels and PNG images.
//!
//! iOS caches app-switcher snapshots as KTX textures holding ASTC 4x4 blocks,
//! usually LZFSE-compressed, in either a KTX 1.1 container or Apple's chunked
//! `AAPL` container. Decoding runs as a linear pipeline:
//!
//! 1. [`ContainerHeader::parse`]: identify the layout, dimensions and payload.
//! 2. [`extract_payload`]: slice and, if needed, decompress the block stream.
//! 3. [`decode_astc_4x4_to_rgba`]: expand the blocks into RGBA texels.
//! 4. [`encode_png`]: serialize the texels.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Stateless**: Every call depends only on its input bytes
//! - **Untrusted input**: Malformed files produce a [`DecodeError`], never a panic
//!
//! # Example
//!
//! ```ignore
//! let bytes = std::fs::read("snapshot.ktx")?;
//! let png = ktxsnap_decode::convert_to_png(&bytes)?;
//! std::fs::write("snapshot.ktx.png", png)?;
//! ```

pub mod container;
mod error;
pub mod payload;
pub mod raster;
pub mod texture;

pub use container::{
    Compression, ContainerHeader, ContainerVariant, Endianness, GL_COMPRESSED_RGBA_ASTC_4X4,
    PayloadLocation,
};
pub use error::{DecodeError, DecodeResult, ErrorKind};
pub use payload::extract_payload;
pub use raster::{decode_png, encode_png, write_png};
pub use texture::{DecodedTexture, FILLER_TEXEL, decode_astc_4x4_to_rgba};

/// Decode a snapshot file into RGBA texels.
///
/// Invalid ASTC blocks do not fail the decode; they are filled with
/// [`FILLER_TEXEL`] and counted in [`DecodedTexture::substituted_blocks`].
pub fn decode_snapshot(data: &[u8]) -> DecodeResult<DecodedTexture> {
    let header = ContainerHeader::parse(data)?;
    let blocks = extract_payload(data, &header)?;
    decode_astc_4x4_to_rgba(&blocks, header.pixel_width, header.pixel_height)
}

/// Decode a snapshot file and encode it as PNG.
pub fn convert_to_png(data: &[u8]) -> DecodeResult<Vec<u8>> {
    encode_png(&decode_snapshot(data)?)
}

/// Return the decompressed ASTC block stream of a snapshot file.
///
/// Useful for feeding the raw texture to other tools.
pub fn extract_texture_data(data: &[u8]) -> DecodeResult<Vec<u8>> {
    let header = ContainerHeader::parse(data)?;
    Ok(extract_payload(data, &header)?.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        container::tests::{chunked_file, head_chunk, payload_chunk, standard_file},
        payload::tests::{COMPRESSED_KEY_VALUE, lzfse_stored},
        texture::astc::tests::void_extent_block,
    };

    #[test]
    fn test_all_zero_standard_stream() {
        // 10x6 needs 3x2 blocks.
        let mut body = 96u32.to_le_bytes().to_vec();
        body.extend_from_slice(&[0; 96]);
        let data = standard_file(GL_COMPRESSED_RGBA_ASTC_4X4, 10, 6, &[], &body);

        let texture = decode_snapshot(&data).unwrap();
        assert_eq!(texture.data.len(), 4 * 10 * 6);
        assert_eq!(texture.substituted_blocks, 6);
        assert!(texture.data.chunks_exact(4).all(|t| t == FILLER_TEXEL));
    }

    #[test]
    fn test_chunked_opaque_black() {
        let data = chunked_file(&[
            (b"HEAD", head_chunk(GL_COMPRESSED_RGBA_ASTC_4X4, 4, 4)),
            (b"astc", payload_chunk(&void_extent_block([0, 0, 0, 255]))),
        ]);

        let texture = decode_snapshot(&data).unwrap();
        assert_eq!((texture.width, texture.height), (4, 4));
        assert!(!texture.is_partial());
        assert!(texture.data.chunks_exact(4).all(|t| t == [0, 0, 0, 255]));
    }

    #[test]
    fn test_compressed_standard_to_png() {
        let blocks: Vec<u8> = (0..4).flat_map(|i| void_extent_block([i * 60, 0, 0, 255])).collect();
        let mut body = vec![0u8; 12];
        body.extend(lzfse_stored(&blocks));
        let data = standard_file(GL_COMPRESSED_RGBA_ASTC_4X4, 8, 8, COMPRESSED_KEY_VALUE, &body);

        let png = convert_to_png(&data).unwrap();
        let texture = decode_png(&png).unwrap();
        assert_eq!((texture.width, texture.height), (8, 8));
        assert_eq!(texture.texel(7, 7), Some([180, 0, 0, 255]));
    }

    #[test]
    fn test_unsupported_format_is_not_structural() {
        let data = standard_file(0x8C00, 4, 4, &[], &[0; 20]);
        let err = decode_snapshot(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_extract_texture_data() {
        let blocks = void_extent_block([1, 2, 3, 4]);
        let data = chunked_file(&[
            (b"HEAD", head_chunk(GL_COMPRESSED_RGBA_ASTC_4X4, 4, 4)),
            (b"LZFS", payload_chunk(&lzfse_stored(&blocks))),
        ]);
        assert_eq!(extract_texture_data(&data).unwrap(), blocks.to_vec());
    }
}
