//! Association keys and output names.

use std::{collections::HashSet, fmt, path::Path};

use serde::Serialize;

/// Snapshot identifiers are UUIDs: 36 characters.
const KEY_LEN: usize = 36;

/// Photos thumbnail format used when the device configuration does not name one.
pub const DEFAULT_THUMBNAIL_FORMAT: &str = "5003";

/// Identifier used by report builders to match an image to its metadata row.
///
/// Derived from the cache file name and otherwise opaque: the batch layer
/// carries it through to the manifest unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssociationKey(String);

impl AssociationKey {
    /// Wrap a key supplied by a collaborator.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive the key from a cache file name: its first 36 characters.
    ///
    /// Shorter names are used whole.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        Self(file_name.chars().take(KEY_LEN).collect())
    }

    /// Derive the key from the last component of `path`.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self::from_file_name(&file_name_lossy(path))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssociationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Assigns unique PNG output names within one batch.
///
/// `a.ktx` becomes `a.ktx.png`; a second `a.ktx` from another directory
/// becomes `a.ktx-1.png`, and so on. Names are compared case-insensitively
/// so they stay distinct on case-insensitive filesystems; the returned name
/// keeps the input's casing.
#[derive(Debug, Default)]
pub struct OutputNamer {
    /// Lowercased names already handed out.
    used: HashSet<String>,
}

impl OutputNamer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a name not previously returned by this namer.
    pub fn assign(&mut self, file_name: &str) -> String {
        let mut name = format!("{file_name}.png");
        let mut suffix = 1;
        while !self.used.insert(name.to_lowercase()) {
            name = format!("{file_name}-{suffix}.png");
            suffix += 1;
        }
        name
    }
}

/// File name of a Photos thumbnail for the configured thumbnail format key.
///
/// Devices record the format (for example `5005`) in their thumbnail
/// configuration. When it is missing the report falls back to
/// [`DEFAULT_THUMBNAIL_FORMAT`].
#[must_use]
pub fn thumbnail_file_name(format_key: Option<&str>) -> String {
    let format = format_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .unwrap_or(DEFAULT_THUMBNAIL_FORMAT);
    format!("{format}.jpg")
}
