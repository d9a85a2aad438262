//! Error types for snapshot decoding.

use std::fmt;

/// Broad category of a [`DecodeError`].
///
/// Batch callers use this to log "unsupported" files differently from
/// corrupt ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input is not a valid container of either supported layout.
    Structural,
    /// The container is well-formed but holds a texel format we do not decode.
    Unsupported,
    /// Payload bounds or compression magic are wrong.
    Payload,
    /// The LZFSE stream is malformed.
    Decompression,
    /// Not enough block data for the declared dimensions.
    BlockDecode,
    /// Output serialization failed.
    Encoding,
}

impl ErrorKind {
    /// Short lowercase label, suitable for logs and manifests.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Unsupported => "unsupported",
            Self::Payload => "payload",
            Self::Decompression => "decompression",
            Self::BlockDecode => "block-decode",
            Self::Encoding => "encoding",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while decoding a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input buffer is smaller than the fixed container header.
    TooSmall { expected: usize, actual: usize },
    /// The identifier matches neither supported container layout.
    UnknownVariant { identifier: [u8; 12] },
    /// The container is missing a required part.
    NotAContainer { detail: &'static str },
    /// A chunk body is shorter than its record requires.
    TruncatedChunk {
        tag: [u8; 4],
        expected: usize,
        actual: usize,
    },
    /// Width or height is zero.
    EmptyDimensions { width: u32, height: u32 },
    /// Internal format other than ASTC 4x4 RGBA.
    UnsupportedFormat { internal_format: u32 },
    /// Payload range lies outside the input buffer.
    TruncatedPayload {
        offset: usize,
        length: usize,
        available: usize,
    },
    /// Compressed payload does not start with the LZFSE block magic.
    BadCompressionMagic { found: Vec<u8> },
    /// The LZFSE decoder rejected the stream.
    DecompressionFailed { detail: String },
    /// Fewer block bytes than the dimensions require.
    CorruptBlockStream { expected: usize, actual: usize },
    /// Pixel buffer length does not match the dimensions.
    SizeMismatch { expected: usize, actual: usize },
    /// PNG serialization failed.
    EncodingFailed { detail: String },
}

impl DecodeError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooSmall { .. }
            | Self::UnknownVariant { .. }
            | Self::NotAContainer { .. }
            | Self::TruncatedChunk { .. }
            | Self::EmptyDimensions { .. } => ErrorKind::Structural,
            Self::UnsupportedFormat { .. } => ErrorKind::Unsupported,
            Self::TruncatedPayload { .. } | Self::BadCompressionMagic { .. } => ErrorKind::Payload,
            Self::DecompressionFailed { .. } => ErrorKind::Decompression,
            Self::CorruptBlockStream { .. } | Self::SizeMismatch { .. } => ErrorKind::BlockDecode,
            Self::EncodingFailed { .. } => ErrorKind::Encoding,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { expected, actual } => {
                write!(
                    f,
                    "buffer too small: expected at least {expected} bytes, got {actual}"
                )
            }
            Self::UnknownVariant { identifier } => {
                write!(f, "unknown container identifier {}", identifier.escape_ascii())
            }
            Self::NotAContainer { detail } => write!(f, "not a snapshot container: {detail}"),
            Self::TruncatedChunk {
                tag,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "chunk '{}' truncated: expected {expected} bytes, got {actual}",
                    tag.escape_ascii()
                )
            }
            Self::EmptyDimensions { width, height } => {
                write!(f, "texture has empty dimensions {width}x{height}")
            }
            Self::UnsupportedFormat { internal_format } => {
                write!(f, "unsupported internal format {internal_format:#06x}")
            }
            Self::TruncatedPayload {
                offset,
                length,
                available,
            } => {
                write!(
                    f,
                    "payload of {length} bytes at offset {offset} exceeds buffer of {available} bytes"
                )
            }
            Self::BadCompressionMagic { found } => {
                write!(
                    f,
                    "unsupported compression, expected lzfse magic 'bvx', found '{}'",
                    found.escape_ascii()
                )
            }
            Self::DecompressionFailed { detail } => {
                write!(f, "lzfse decompression failed: {detail}")
            }
            Self::CorruptBlockStream { expected, actual } => {
                write!(
                    f,
                    "block stream too short: expected {expected} bytes, got {actual}"
                )
            }
            Self::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer size mismatch: expected {expected} bytes, got {actual}"
                )
            }
            Self::EncodingFailed { detail } => write!(f, "png encoding failed: {detail}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_taxonomy() {
        let structural = DecodeError::TooSmall {
            expected: 64,
            actual: 3,
        };
        let unsupported = DecodeError::UnsupportedFormat {
            internal_format: 0x8C00,
        };
        assert_eq!(structural.kind(), ErrorKind::Structural);
        assert_eq!(unsupported.kind(), ErrorKind::Unsupported);
        assert_ne!(structural.kind(), unsupported.kind());
        assert_eq!(
            DecodeError::BadCompressionMagic { found: vec![0; 3] }.kind(),
            ErrorKind::Payload
        );
    }

    #[test]
    fn test_display_escapes_binary() {
        let err = DecodeError::UnknownVariant {
            identifier: *b"\xABKTX 20\xBB\r\n\x1A\n",
        };
        let text = err.to_string();
        assert!(text.contains("KTX 20"));
        assert!(text.contains("\\xab"));
    }
}
