//! Snapshot container parsing.
//!
//! iOS writes application snapshots in one of two layouts:
//!
//! - **Standard**: a KTX 1.1 file. A 64-byte header is followed by a
//!   key/value metadata block and the texture data. Apple marks compressed
//!   payloads with a `Compression_APPLE` key.
//! - **`VendorChunked`**: Apple's `AAPL` container, a sequence of
//!   length-prefixed chunks (`HEAD`, `LZFS`, `astc`, ...). Always little-endian.
//!
//! Both are normalized into a [`ContainerHeader`].

use crate::error::{DecodeError, DecodeResult};

/// Size of the fixed KTX 1.1 header, and the minimum accepted input size.
pub const HEADER_LEN: usize = 64;

/// `«KTX 11»\r\n\x1A\n`.
pub const KTX11_IDENTIFIER: [u8; 12] = [
    0xAB, b'K', b'T', b'X', b' ', b'1', b'1', 0xBB, b'\r', b'\n', 0x1A, b'\n',
];

/// `AAPL\r\n\x1A\n`.
pub const AAPL_IDENTIFIER: [u8; 8] = [b'A', b'A', b'P', b'L', b'\r', b'\n', 0x1A, b'\n'];

/// `GL_COMPRESSED_RGBA_ASTC_4x4_KHR`, the only internal format iOS uses for snapshots.
pub const GL_COMPRESSED_RGBA_ASTC_4X4: u32 = 0x93B0;

/// Key/value marker for LZFSE-compressed Standard payloads.
const COMPRESSION_KEY: &[u8] = b"Compression_APPLE";

/// Endianness marker as it appears in a little-endian file.
const LITTLE_ENDIAN_MARKER: [u8; 4] = [0x01, 0x02, 0x03, 0x04];

/// Image-size word preceding raw Standard payloads.
const RAW_PREAMBLE_LEN: usize = 4;
/// Image-size word plus Apple's 8-byte compression preamble.
const COMPRESSED_PREAMBLE_LEN: usize = 12;

/// Length of a `HEAD` chunk record.
const HEAD_RECORD_LEN: usize = 44;
/// Sub-length prefix inside `LZFS` and `astc` chunks.
const PAYLOAD_CHUNK_PREFIX: usize = 4;

/// Container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerVariant {
    /// KTX 1.1.
    Standard,
    /// Apple's `AAPL` chunked container.
    VendorChunked,
}

/// Byte order of the header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Little => u32::from_le_bytes(bytes),
            Self::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Compression applied to the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Lzfse,
}

/// Where the texel payload sits inside the input buffer.
///
/// The range is not guaranteed to be in bounds; the payload stage checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLocation {
    pub offset: usize,
    pub length: usize,
    pub compression: Compression,
}

impl PayloadLocation {
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.compression == Compression::Lzfse
    }
}

/// Parsed container header.
///
/// Only `internal_format`, `pixel_width`, `pixel_height` and `payload` drive
/// decoding; the other fields are kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub variant: ContainerVariant,
    pub endianness: Endianness,
    pub gl_type: u32,
    pub gl_type_size: u32,
    pub gl_format: u32,
    pub internal_format: u32,
    pub base_internal_format: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_depth: u32,
    pub array_elements: u32,
    pub faces: u32,
    pub mip_levels: u32,
    /// Length of the key/value block after the Standard header (0 for `AAPL`).
    pub key_value_bytes: u32,
    pub payload: PayloadLocation,
}

impl ContainerHeader {
    /// Parse a container and check that its texel format is supported.
    ///
    /// # Errors
    ///
    /// Structural errors as for [`parse_unchecked`](Self::parse_unchecked),
    /// or [`DecodeError::UnsupportedFormat`] for any internal format other
    /// than ASTC 4x4.
    pub fn parse(data: &[u8]) -> DecodeResult<Self> {
        let header = Self::parse_unchecked(data)?;
        header.ensure_supported()?;
        Ok(header)
    }

    /// Parse a container without checking the internal format.
    pub fn parse_unchecked(data: &[u8]) -> DecodeResult<Self> {
        if data.len() < HEADER_LEN {
            return Err(DecodeError::TooSmall {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }

        let header = if data[..12] == KTX11_IDENTIFIER {
            parse_standard(data)
        } else if data[..8] == AAPL_IDENTIFIER {
            parse_chunked(data)?
        } else {
            let mut identifier = [0u8; 12];
            identifier.copy_from_slice(&data[..12]);
            return Err(DecodeError::UnknownVariant { identifier });
        };

        if header.pixel_width == 0 || header.pixel_height == 0 {
            return Err(DecodeError::EmptyDimensions {
                width: header.pixel_width,
                height: header.pixel_height,
            });
        }

        Ok(header)
    }

    /// Check that the internal format is ASTC 4x4 RGBA.
    pub fn ensure_supported(&self) -> DecodeResult<()> {
        if self.internal_format == GL_COMPRESSED_RGBA_ASTC_4X4 {
            Ok(())
        } else {
            Err(DecodeError::UnsupportedFormat {
                internal_format: self.internal_format,
            })
        }
    }
}

/// Read a `u32` at `offset`. Callers guarantee `offset + 4 <= data.len()`.
fn read_u32_at(data: &[u8], offset: usize, endianness: Endianness) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    endianness.read_u32(bytes)
}

fn parse_standard(data: &[u8]) -> ContainerHeader {
    let endianness = if data[12..16] == LITTLE_ENDIAN_MARKER {
        Endianness::Little
    } else {
        Endianness::Big
    };

    let mut fields = [0u32; 12];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = read_u32_at(data, 16 + i * 4, endianness);
    }
    let [
        gl_type,
        gl_type_size,
        gl_format,
        internal_format,
        base_internal_format,
        pixel_width,
        pixel_height,
        pixel_depth,
        array_elements,
        faces,
        mip_levels,
        key_value_bytes,
    ] = fields;

    // u32 always fits in usize on supported targets; saturate rather than wrap.
    let key_value_end = HEADER_LEN.saturating_add(key_value_bytes as usize);
    let key_value = &data[HEADER_LEN..key_value_end.min(data.len())];
    let compressed = key_value
        .windows(COMPRESSION_KEY.len())
        .any(|window| window == COMPRESSION_KEY);

    let (compression, preamble) = if compressed {
        (Compression::Lzfse, COMPRESSED_PREAMBLE_LEN)
    } else {
        (Compression::None, RAW_PREAMBLE_LEN)
    };
    let offset = key_value_end.saturating_add(preamble);

    ContainerHeader {
        variant: ContainerVariant::Standard,
        endianness,
        gl_type,
        gl_type_size,
        gl_format,
        internal_format,
        base_internal_format,
        pixel_width,
        pixel_height,
        pixel_depth,
        array_elements,
        faces,
        mip_levels,
        key_value_bytes,
        payload: PayloadLocation {
            offset,
            length: data.len().saturating_sub(offset),
            compression,
        },
    }
}

/// Fields carried by a `HEAD` chunk.
struct HeadRecord {
    internal_format: u32,
    base_internal_format: u32,
    pixel_width: u32,
    pixel_height: u32,
    pixel_depth: u32,
    array_elements: u32,
    faces: u32,
}

fn parse_chunked(data: &[u8]) -> DecodeResult<ContainerHeader> {
    let mut head = None;
    let mut payload = None;
    let mut pos = AAPL_IDENTIFIER.len();

    while let Some(chunk_header) = pos.checked_add(8).and_then(|end| data.get(pos..end)) {
        let length = read_u32_at(chunk_header, 0, Endianness::Little) as usize;
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&chunk_header[4..8]);
        let body = pos + 8;

        match &tag {
            b"HEAD" => {
                let available = data.len() - body;
                if available < HEAD_RECORD_LEN || length < HEAD_RECORD_LEN {
                    return Err(DecodeError::TruncatedChunk {
                        tag,
                        expected: HEAD_RECORD_LEN,
                        actual: available.min(length),
                    });
                }
                // The first four fields are unused.
                let field = |i: usize| read_u32_at(data, body + i * 4, Endianness::Little);
                head = Some(HeadRecord {
                    internal_format: field(4),
                    base_internal_format: field(5),
                    pixel_width: field(6),
                    pixel_height: field(7),
                    pixel_depth: field(8),
                    array_elements: field(9),
                    faces: field(10),
                });
            }
            b"LZFS" | b"astc" => {
                if length < PAYLOAD_CHUNK_PREFIX {
                    return Err(DecodeError::TruncatedChunk {
                        tag,
                        expected: PAYLOAD_CHUNK_PREFIX,
                        actual: length,
                    });
                }
                let compression = if &tag == b"LZFS" {
                    Compression::Lzfse
                } else {
                    Compression::None
                };
                payload = Some(PayloadLocation {
                    offset: body + PAYLOAD_CHUNK_PREFIX,
                    length: length - PAYLOAD_CHUNK_PREFIX,
                    compression,
                });
            }
            _ => {}
        }

        match body.checked_add(length) {
            Some(next) => pos = next,
            None => break,
        }
    }

    let head = head.ok_or(DecodeError::NotAContainer {
        detail: "missing HEAD chunk",
    })?;
    let payload = payload.ok_or(DecodeError::NotAContainer {
        detail: "missing texture data chunk",
    })?;

    Ok(ContainerHeader {
        variant: ContainerVariant::VendorChunked,
        endianness: Endianness::Little,
        gl_type: 0,
        gl_type_size: 0,
        gl_format: 0,
        internal_format: head.internal_format,
        base_internal_format: head.base_internal_format,
        pixel_width: head.pixel_width,
        pixel_height: head.pixel_height,
        pixel_depth: head.pixel_depth,
        array_elements: head.array_elements,
        faces: head.faces,
        mip_levels: 1,
        key_value_bytes: 0,
        payload,
    })
}
