//! ASTC 4x4 (LDR) block decoding.
//!
//! Bit-level texel reconstruction is done by `texture2ddecoder`. That decoder
//! does not reject malformed blocks, so every block is classified here first
//! against the block-mode rules of the ASTC LDR profile. Invalid blocks become
//! [`FILLER_TEXEL`] and are counted in [`DecodedTexture::substituted_blocks`].

use std::fmt;

use crate::{
    error::{DecodeError, DecodeResult},
    texture::{DecodedTexture, rgba_len},
};

/// Bytes per compressed block.
pub const ASTC_BLOCK_BYTES: usize = 16;

/// Block footprint in texels along each axis.
pub const ASTC_BLOCK_DIM: usize = 4;

/// Texel written for every texel of an invalid block: transparent black.
pub const FILLER_TEXEL: [u8; 4] = [0, 0, 0, 0];

/// Block-mode bit pattern of a void-extent (constant colour) block.
const VOID_EXTENT_MODE: u32 = 0x1FC;

/// Extent coordinate value meaning "no extent" when all four hold it.
const VOID_EXTENT_NO_COORD: u32 = 0x1FFF;

/// Weight grids may not exceed 64 weights or fall outside 24..=96 bits.
const MAX_WEIGHTS: u32 = 64;
const MIN_WEIGHT_BITS: u32 = 24;
const MAX_WEIGHT_BITS: u32 = 96;

/// Colour endpoint data may hold at most 18 integers.
const MAX_COLOR_VALUES: u32 = 18;

/// Integer sequence encoding of each weight range, indexed by
/// `(range selector - 2) + 6 * high_precision`: `(bits, trits, quints)`.
const WEIGHT_RANGES: [(u32, bool, bool); 12] = [
    (1, false, false), // 2 levels
    (0, true, false),  // 3
    (2, false, false), // 4
    (0, false, true),  // 5
    (1, true, false),  // 6
    (3, false, false), // 8
    (1, false, true),  // 10
    (2, true, false),  // 12
    (4, false, false), // 16
    (2, false, true),  // 20
    (3, true, false),  // 24
    (5, false, false), // 32
];

/// Reason a block was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidBlock {
    /// Block mode uses a reserved encoding.
    ReservedBlockMode,
    /// Void-extent block with HDR colour, not allowed in the LDR profile.
    HdrVoidExtent,
    /// Weight grid larger than the 4x4 footprint.
    WeightGridTooLarge { width: u32, height: u32 },
    /// Too many weights, or weight data outside 24..=96 bits.
    WeightBitsOutOfRange { weights: u32, bits: u32 },
    /// Dual-plane weights combined with four partitions.
    DualPlaneWithFourPartitions,
    /// Endpoint modes need more than 18 colour integers.
    TooManyColorValues { values: u32 },
    /// HDR colour endpoint mode.
    HdrEndpointMode { mode: u32 },
    /// Not enough bits left for the colour endpoints.
    InsufficientColorBits { available: i32, required: u32 },
    /// Rejected by the texel decoder.
    Rejected { detail: &'static str },
}

impl fmt::Display for InvalidBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedBlockMode => f.write_str("reserved block mode"),
            Self::HdrVoidExtent => f.write_str("hdr void-extent block"),
            Self::WeightGridTooLarge { width, height } => {
                write!(f, "weight grid {width}x{height} exceeds 4x4 footprint")
            }
            Self::WeightBitsOutOfRange { weights, bits } => {
                write!(f, "{weights} weights need {bits} bits")
            }
            Self::DualPlaneWithFourPartitions => f.write_str("dual plane with four partitions"),
            Self::TooManyColorValues { values } => {
                write!(f, "{values} colour values exceed limit of 18")
            }
            Self::HdrEndpointMode { mode } => write!(f, "hdr endpoint mode {mode}"),
            Self::InsufficientColorBits {
                available,
                required,
            } => {
                write!(
                    f,
                    "{available} colour bits available, {required} required"
                )
            }
            Self::Rejected { detail } => write!(f, "rejected: {detail}"),
        }
    }
}

/// Extract `len` bits starting at bit `start` of a little-endian block.
fn bits(block: u128, start: u32, len: u32) -> u32 {
    ((block >> start) & ((1u128 << len) - 1)) as u32
}

/// Weight grid layout decoded from the 11-bit block mode.
struct BlockMode {
    grid_width: u32,
    grid_height: u32,
    dual_plane: bool,
    weight_bits: u32,
}

fn decode_block_mode(mode: u32) -> Result<BlockMode, InvalidBlock> {
    let a = (mode >> 5) & 3;
    let mut high_precision = (mode >> 9) & 1;
    let mut dual_plane = (mode >> 10) & 1;
    let mut range = (mode >> 4) & 1;

    let (grid_width, grid_height) = if mode & 3 != 0 {
        range |= (mode & 3) << 1;
        let b = (mode >> 7) & 3;
        match (mode >> 2) & 3 {
            0 => (b + 4, a + 2),
            1 => (b + 8, a + 2),
            2 => (a + 2, b + 8),
            _ if mode & 0x100 != 0 => ((b & 1) + 2, a + 2),
            _ => (a + 2, (b & 1) + 6),
        }
    } else {
        range |= ((mode >> 2) & 3) << 1;
        if (mode >> 2) & 3 == 0 {
            return Err(InvalidBlock::ReservedBlockMode);
        }
        let b = (mode >> 9) & 3;
        match (mode >> 7) & 3 {
            0 => (12, a + 2),
            1 => (a + 2, 12),
            2 => {
                high_precision = 0;
                dual_plane = 0;
                (a + 6, b + 6)
            }
            _ => match a {
                0 => (6, 10),
                1 => (10, 6),
                _ => return Err(InvalidBlock::ReservedBlockMode),
            },
        }
    };

    let footprint = ASTC_BLOCK_DIM as u32;
    if grid_width > footprint || grid_height > footprint {
        return Err(InvalidBlock::WeightGridTooLarge {
            width: grid_width,
            height: grid_height,
        });
    }

    let weights = grid_width * grid_height * (dual_plane + 1);
    let range_index = (range - 2 + 6 * high_precision) as usize;
    let weight_bits = ise_bit_count(weights, range_index);
    if weights > MAX_WEIGHTS || !(MIN_WEIGHT_BITS..=MAX_WEIGHT_BITS).contains(&weight_bits) {
        return Err(InvalidBlock::WeightBitsOutOfRange {
            weights,
            bits: weight_bits,
        });
    }

    Ok(BlockMode {
        grid_width,
        grid_height,
        dual_plane: dual_plane != 0,
        weight_bits,
    })
}

/// Bits needed to store `count` values with the integer sequence encoding
/// of weight range `range_index`.
fn ise_bit_count(count: u32, range_index: usize) -> u32 {
    let (bits, trits, quints) = WEIGHT_RANGES[range_index];
    let mut total = count * bits;
    if trits {
        total += (8 * count).div_ceil(5);
    }
    if quints {
        total += (7 * count).div_ceil(3);
    }
    total
}

/// Void-extent blocks must be LDR, have both reserved bits set, and carry
/// either no extent (all coordinates ones) or non-empty `s` and `t` ranges.
fn check_void_extent(block: u128) -> Result<(), InvalidBlock> {
    if bits(block, 9, 1) != 0 {
        return Err(InvalidBlock::HdrVoidExtent);
    }
    if bits(block, 10, 2) != 0b11 {
        return Err(InvalidBlock::ReservedBlockMode);
    }

    let [s_min, s_max, t_min, t_max] = [12, 25, 38, 51].map(|start| bits(block, start, 13));
    let no_extent = [s_min, s_max, t_min, t_max].iter().all(|&c| c == VOID_EXTENT_NO_COORD);
    if !no_extent && (s_min >= s_max || t_min >= t_max) {
        return Err(InvalidBlock::ReservedBlockMode);
    }
    Ok(())
}

/// Classify one 16-byte block.
///
/// # Errors
///
/// Returns the first rule the block violates.
pub fn check_block(block: &[u8; ASTC_BLOCK_BYTES]) -> Result<(), InvalidBlock> {
    let block = u128::from_le_bytes(*block);

    if bits(block, 0, 9) == VOID_EXTENT_MODE {
        return check_void_extent(block);
    }

    let mode = decode_block_mode(bits(block, 0, 11))?;
    debug_assert!(mode.grid_width * mode.grid_height <= 16);

    let partitions = bits(block, 11, 2) + 1;
    if mode.dual_plane && partitions == 4 {
        return Err(InvalidBlock::DualPlaneWithFourPartitions);
    }

    let mut endpoint_modes = [0u32; 4];
    let mut extra_mode_bits = 0;
    let color_start = if partitions == 1 {
        endpoint_modes[0] = bits(block, 13, 4);
        17
    } else {
        let low = bits(block, 23, 6);
        if low & 3 == 0 {
            endpoint_modes.fill(low >> 2);
        } else {
            // Remaining mode bits sit directly below the weight data.
            extra_mode_bits = 3 * partitions - 4;
            let high = bits(block, 128 - mode.weight_bits - extra_mode_bits, extra_mode_bits);
            let encoded = low | (high << 6);
            let base_class = (encoded & 3) - 1;
            for (i, endpoint_mode) in endpoint_modes.iter_mut().take(partitions as usize).enumerate() {
                let i = i as u32;
                let class = base_class + ((encoded >> (2 + i)) & 1);
                let sub_mode = (encoded >> (2 + partitions + 2 * i)) & 3;
                *endpoint_mode = (class << 2) | sub_mode;
            }
        }
        29
    };

    let mut color_values = 0;
    for &endpoint_mode in &endpoint_modes[..partitions as usize] {
        if matches!(endpoint_mode, 2 | 3 | 7 | 11 | 14 | 15) {
            return Err(InvalidBlock::HdrEndpointMode {
                mode: endpoint_mode,
            });
        }
        color_values += ((endpoint_mode >> 2) + 1) * 2;
    }
    if color_values > MAX_COLOR_VALUES {
        return Err(InvalidBlock::TooManyColorValues {
            values: color_values,
        });
    }

    let plane_selector_bits = if mode.dual_plane { 2 } else { 0 };
    let available = 128 - (mode.weight_bits + extra_mode_bits + plane_selector_bits + color_start) as i32;
    // The coarsest colour range (6 levels) needs 13/5 bits per value.
    let required = (13 * color_values).div_ceil(5);
    if available < required as i32 {
        return Err(InvalidBlock::InsufficientColorBits {
            available,
            required,
        });
    }

    Ok(())
}

/// Decode one block into 16 RGBA texels.
fn decode_block(block: &[u8; ASTC_BLOCK_BYTES]) -> Result<[[u8; 4]; 16], InvalidBlock> {
    check_block(block)?;

    let mut tile = [0u32; ASTC_BLOCK_DIM * ASTC_BLOCK_DIM];
    texture2ddecoder::decode_astc(
        block,
        ASTC_BLOCK_DIM,
        ASTC_BLOCK_DIM,
        ASTC_BLOCK_DIM,
        ASTC_BLOCK_DIM,
        &mut tile,
    )
    .map_err(|detail| InvalidBlock::Rejected { detail })?;

    // texture2ddecoder packs BGRA32 as 0xAARRGGBB.
    Ok(tile.map(|pixel| {
        let [b, g, r, a] = pixel.to_le_bytes();
        [r, g, b, a]
    }))
}

/// Decode an ASTC 4x4 block stream to RGBA pixels.
///
/// Blocks are read in row-major tile order. Texels of edge tiles that fall
/// outside `width x height` are dropped. Bytes past the last required block
/// are ignored.
///
/// # Errors
///
/// - [`DecodeError::EmptyDimensions`] if either dimension is zero.
/// - [`DecodeError::CorruptBlockStream`] if `data` holds fewer bytes than
///   `ceil(width / 4) * ceil(height / 4)` blocks.
pub fn decode_astc_4x4_to_rgba(data: &[u8], width: u32, height: u32) -> DecodeResult<DecodedTexture> {
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyDimensions { width, height });
    }

    let width = width as usize;
    let height = height as usize;
    let blocks_x = width.div_ceil(ASTC_BLOCK_DIM);
    let blocks_y = height.div_ceil(ASTC_BLOCK_DIM);
    let required = blocks_x
        .checked_mul(blocks_y)
        .and_then(|blocks| blocks.checked_mul(ASTC_BLOCK_BYTES))
        .unwrap_or(usize::MAX);
    if data.len() < required {
        return Err(DecodeError::CorruptBlockStream {
            expected: required,
            actual: data.len(),
        });
    }

    // The block check above bounds the output to 4x the input size.
    let out_len = rgba_len(width as u32, height as u32).ok_or(DecodeError::CorruptBlockStream {
        expected: required,
        actual: data.len(),
    })?;
    let mut out = vec![0u8; out_len];
    let mut substituted_blocks = 0;

    let blocks = data[..required].chunks_exact(ASTC_BLOCK_BYTES);
    for (index, block) in blocks.enumerate() {
        let mut bytes = [0u8; ASTC_BLOCK_BYTES];
        bytes.copy_from_slice(block);
        let tile = decode_block(&bytes).unwrap_or_else(|_| {
            substituted_blocks += 1;
            [FILLER_TEXEL; 16]
        });

        let origin_x = (index % blocks_x) * ASTC_BLOCK_DIM;
        let origin_y = (index / blocks_x) * ASTC_BLOCK_DIM;
        let cols = ASTC_BLOCK_DIM.min(width - origin_x);
        let rows = ASTC_BLOCK_DIM.min(height - origin_y);
        for row in 0..rows {
            let start = ((origin_y + row) * width + origin_x) * 4;
            let texels = &tile[row * ASTC_BLOCK_DIM..row * ASTC_BLOCK_DIM + cols];
            out[start..start + cols * 4].copy_from_slice(texels.as_flattened());
        }
    }

    Ok(DecodedTexture {
        data: out,
        width: width as u32,
        height: height as u32,
        substituted_blocks,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// LDR void-extent block with a constant RGBA colour.
    pub(crate) fn void_extent_block(rgba: [u8; 4]) -> [u8; ASTC_BLOCK_BYTES] {
        let mut block = [0xFFu8; ASTC_BLOCK_BYTES];
        // Block mode 0x1FC, LDR, reserved bits set, no extent coordinates.
        block[0] = 0xFC;
        block[1] = 0xFD;
        for (i, channel) in rgba.into_iter().enumerate() {
            let value = u16::from(channel) * 0x101;
            block[8 + i * 2..10 + i * 2].copy_from_slice(&value.to_le_bytes());
        }
        block
    }

    /// Single-partition block: 4x4 weight grid at 2 bits, endpoint mode `mode`.
    fn normal_block(endpoint_mode: u32) -> [u8; ASTC_BLOCK_BYTES] {
        let bits: u128 = 0x42 | (u128::from(endpoint_mode) << 13);
        bits.to_le_bytes()
    }

    #[test]
    fn test_void_extent_is_valid() {
        assert_eq!(check_block(&void_extent_block([1, 2, 3, 4])), Ok(()));
    }

    #[test]
    fn test_hdr_void_extent_rejected() {
        let mut block = void_extent_block([0, 0, 0, 255]);
        block[1] |= 0x02;
        assert_eq!(check_block(&block), Err(InvalidBlock::HdrVoidExtent));
    }

    /// Overwrite the four 13-bit extent coordinates of a void-extent block.
    fn with_extent(block: [u8; ASTC_BLOCK_BYTES], coords: [u32; 4]) -> [u8; ASTC_BLOCK_BYTES] {
        let mut bits = u128::from_le_bytes(block);
        for (coord, start) in coords.into_iter().zip([12, 25, 38, 51]) {
            bits &= !(0x1FFFu128 << start);
            bits |= u128::from(coord) << start;
        }
        bits.to_le_bytes()
    }

    #[test]
    fn test_void_extent_reserved_bits() {
        let mut block = void_extent_block([0, 0, 0, 255]);
        block[1] &= !0x04;
        assert_eq!(check_block(&block), Err(InvalidBlock::ReservedBlockMode));
    }

    #[test]
    fn test_void_extent_coordinates() {
        let block = void_extent_block([9, 9, 9, 255]);
        assert_eq!(check_block(&with_extent(block, [0, 10, 0, 10])), Ok(()));
        // Empty s range.
        assert_eq!(
            check_block(&with_extent(block, [5, 2, 0, 10])),
            Err(InvalidBlock::ReservedBlockMode)
        );
        // Empty t range.
        assert_eq!(
            check_block(&with_extent(block, [0, 10, 7, 7])),
            Err(InvalidBlock::ReservedBlockMode)
        );
    }

    #[test]
    fn test_all_zero_block_is_reserved() {
        assert_eq!(
            check_block(&[0; ASTC_BLOCK_BYTES]),
            Err(InvalidBlock::ReservedBlockMode)
        );
    }

    #[test]
    fn test_normal_block_modes() {
        // LDR RGB direct and RGBA direct.
        assert_eq!(check_block(&normal_block(8)), Ok(()));
        assert_eq!(check_block(&normal_block(12)), Ok(()));
        // HDR RGB.
        assert_eq!(
            check_block(&normal_block(11)),
            Err(InvalidBlock::HdrEndpointMode { mode: 11 })
        );
    }

    /// Multi-partition block whose partitions share `endpoint_mode`.
    fn shared_mode_block(mode: u128, partitions: u128, endpoint_mode: u128) -> [u8; ASTC_BLOCK_BYTES] {
        let bits = mode | ((partitions - 1) << 11) | ((endpoint_mode << 2) << 23);
        bits.to_le_bytes()
    }

    #[test]
    fn test_two_partitions_shared_mode() {
        assert_eq!(check_block(&shared_mode_block(0x42, 2, 8)), Ok(()));
        assert_eq!(
            check_block(&shared_mode_block(0x42, 2, 15)),
            Err(InvalidBlock::HdrEndpointMode { mode: 15 })
        );
    }

    #[test]
    fn test_two_partitions_separate_modes() {
        // Class selector 2 (base class 1), partition 0 bumped to class 2.
        // Sub-mode of partition 1 comes from the two bits below the weights.
        let block = |partition1_sub_mode: u128| {
            let encoded = 0b10 | (1 << 2) | (partition1_sub_mode << 6);
            let bits: u128 = 0x42 | (1 << 11) | ((encoded & 0x3F) << 23) | ((encoded >> 6) << 94);
            bits.to_le_bytes()
        };

        // Modes 8 (RGB direct) and 6 (RGB scale).
        assert_eq!(check_block(&block(2)), Ok(()));
        // Mode 7 is HDR RGB scale.
        assert_eq!(
            check_block(&block(3)),
            Err(InvalidBlock::HdrEndpointMode { mode: 7 })
        );
    }

    #[test]
    fn test_four_partitions_rgba_too_many_values() {
        assert_eq!(
            check_block(&shared_mode_block(0x42, 4, 12)),
            Err(InvalidBlock::TooManyColorValues { values: 32 })
        );
    }

    #[test]
    fn test_dense_weights_leave_too_few_color_bits() {
        // 4x4 grid at 5 bits per weight: 80 weight bits.
        let dense: u128 = 0x253;
        // One RGBA partition fits in the remaining 31 bits.
        assert_eq!(check_block(&(dense | (12 << 13)).to_le_bytes()), Ok(()));
        assert_eq!(
            check_block(&shared_mode_block(dense, 2, 12)),
            Err(InvalidBlock::InsufficientColorBits {
                available: 19,
                required: 42
            })
        );
    }

    /// Single-partition RGB direct block with 8-bit endpoints and every weight
    /// set to `weight` (2 bits).
    fn rgb_direct_block(e0: [u8; 3], e1: [u8; 3], weight: u32) -> [u8; ASTC_BLOCK_BYTES] {
        let mut bits: u128 = 0x42 | (8 << 13);
        let values = [e0[0], e1[0], e0[1], e1[1], e0[2], e1[2]];
        for (i, value) in values.into_iter().enumerate() {
            bits |= u128::from(value) << (17 + 8 * i);
        }
        let weights = (0..16).fold(0u32, |acc, i| acc | (weight << (2 * i)));
        bits |= u128::from(weights) << 96;
        bits.to_le_bytes()
    }

    #[test]
    fn test_decode_rgb_direct_endpoints() {
        let e0 = [200, 100, 50];
        let e1 = [250, 150, 60];

        let first = decode_astc_4x4_to_rgba(&rgb_direct_block(e0, e1, 0), 4, 4).unwrap();
        assert_eq!(first.substituted_blocks, 0);
        assert_eq!(first.texel(0, 0), Some([200, 100, 50, 255]));
        assert_eq!(first.texel(3, 3), Some([200, 100, 50, 255]));

        let second = decode_astc_4x4_to_rgba(&rgb_direct_block(e0, e1, 3), 4, 4).unwrap();
        assert_eq!(second.substituted_blocks, 0);
        assert_eq!(second.texel(1, 2), Some([250, 150, 60, 255]));
    }

    #[test]
    fn test_weight_grid_too_large() {
        // Grid width B + 8.
        let block = 0x06u128.to_le_bytes();
        assert!(matches!(
            check_block(&block),
            Err(InvalidBlock::WeightGridTooLarge { width: 8, .. })
        ));
    }

    #[test]
    fn test_too_few_weight_bits() {
        // 4x4 grid at 1 bit per weight is only 16 bits.
        let block = 0x41u128.to_le_bytes();
        assert_eq!(
            check_block(&block),
            Err(InvalidBlock::WeightBitsOutOfRange {
                weights: 16,
                bits: 16
            })
        );
    }

    #[test]
    fn test_dual_plane_four_partitions() {
        let bits: u128 = 0x42 | (1 << 10) | (3 << 11);
        assert_eq!(
            check_block(&bits.to_le_bytes()),
            Err(InvalidBlock::DualPlaneWithFourPartitions)
        );
    }

    #[test]
    fn test_single_opaque_black_block() {
        let block = void_extent_block([0, 0, 0, 255]);
        let texture = decode_astc_4x4_to_rgba(&block, 4, 4).unwrap();

        assert_eq!(texture.data.len(), 64);
        assert_eq!(texture.substituted_blocks, 0);
        for texel in texture.data.chunks_exact(4) {
            assert_eq!(texel, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_invalid_block_gets_filler() {
        let mut data = void_extent_block([255, 0, 0, 255]).to_vec();
        data.extend_from_slice(&[0; ASTC_BLOCK_BYTES]);
        let texture = decode_astc_4x4_to_rgba(&data, 8, 4).unwrap();

        assert_eq!(texture.substituted_blocks, 1);
        assert!(texture.is_partial());
        assert_eq!(texture.texel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(texture.texel(4, 0), Some(FILLER_TEXEL));
        assert_eq!(texture.texel(7, 3), Some(FILLER_TEXEL));
    }

    #[test]
    fn test_edge_tiles_are_clipped() {
        // 6x6 needs 2x2 blocks; give each a distinct colour.
        let colors = [[10, 0, 0, 255], [20, 0, 0, 255], [30, 0, 0, 255], [40, 0, 0, 255]];
        let data: Vec<u8> = colors.iter().flat_map(|&c| void_extent_block(c)).collect();
        let texture = decode_astc_4x4_to_rgba(&data, 6, 6).unwrap();

        assert_eq!(texture.data.len(), 6 * 6 * 4);
        assert_eq!(texture.texel(0, 0), Some(colors[0]));
        assert_eq!(texture.texel(5, 0), Some(colors[1]));
        assert_eq!(texture.texel(3, 5), Some(colors[2]));
        assert_eq!(texture.texel(5, 5), Some(colors[3]));
    }

    #[test]
    fn test_short_block_stream() {
        let data = [0u8; 3 * ASTC_BLOCK_BYTES];
        assert_eq!(
            decode_astc_4x4_to_rgba(&data, 8, 8),
            Err(DecodeError::CorruptBlockStream {
                expected: 64,
                actual: 48
            })
        );
    }

    #[test]
    fn test_huge_dimensions_do_not_allocate() {
        let data = [0u8; ASTC_BLOCK_BYTES];
        assert!(matches!(
            decode_astc_4x4_to_rgba(&data, u32::MAX, u32::MAX),
            Err(DecodeError::CorruptBlockStream { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut data = void_extent_block([1, 2, 3, 255]).to_vec();
        data.extend_from_slice(&[0xEE; 40]);
        let texture = decode_astc_4x4_to_rgba(&data, 4, 4).unwrap();
        assert_eq!(texture.substituted_blocks, 0);
    }
}
