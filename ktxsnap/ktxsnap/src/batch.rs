//! Batch conversion of snapshot caches.
//!
//! A batch never aborts because of one bad file: anything that fails to read
//! or decode is replaced with the [`Placeholder`] and recorded in the
//! [`BatchReport`]. Only sink failures, which indicate a broken output
//! environment, stop the batch.

use std::{
    fs,
    path::{Path, PathBuf},
};

#[cfg(feature = "multithreaded")]
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    naming::{AssociationKey, OutputNamer, file_name_lossy},
    placeholder::Placeholder,
    sink::ImageSink,
};

/// Extension of snapshot cache files.
const SNAPSHOT_EXTENSION: &str = "ktx";

/// A snapshot file scheduled for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Location of the cache file.
    pub path: PathBuf,
    /// Key passed through to the report.
    pub key: AssociationKey,
    /// Name the converted image is stored under.
    pub output_name: String,
}

/// Find every `.ktx` file under `root`, sorted by path.
///
/// Each candidate gets its association key and a batch-unique output name.
pub fn collect_candidates(root: &Path) -> Result<Vec<Candidate>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| Error::Walk {
            root: root.display().to_string(),
            message: e.to_string(),
        })?;
        let is_snapshot = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SNAPSHOT_EXTENSION));
        if entry.file_type().is_file() && is_snapshot {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut namer = OutputNamer::new();
    Ok(paths
        .into_iter()
        .map(|path| {
            let file_name = file_name_lossy(&path);
            Candidate {
                key: AssociationKey::from_file_name(&file_name),
                output_name: namer.assign(&file_name),
                path,
            }
        })
        .collect())
}

/// Result of converting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The snapshot decoded. `substituted_blocks > 0` marks a partial recovery.
    Decoded {
        width: u32,
        height: u32,
        substituted_blocks: usize,
    },
    /// The placeholder was stored instead.
    Placeholder {
        /// Error category (`structural`, `unsupported`, ..., or `io`).
        kind: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// One line of the batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    /// Where the bytes came from.
    pub source: String,
    pub key: AssociationKey,
    pub output_name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl BatchEntry {
    #[must_use]
    pub fn is_decoded(&self) -> bool {
        matches!(self.outcome, Outcome::Decoded { .. })
    }

    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(
            self.outcome,
            Outcome::Decoded { substituted_blocks, .. } if substituted_blocks > 0
        )
    }
}

/// Summary of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub decoded: usize,
    pub partial: usize,
    pub placeholders: usize,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    fn from_entries(entries: Vec<BatchEntry>) -> Self {
        let decoded = entries.iter().filter(|e| e.is_decoded()).count();
        let partial = entries.iter().filter(|e| e.is_partial()).count();
        Self {
            decoded,
            partial,
            placeholders: entries.len() - decoded,
            entries,
        }
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as a JSON manifest.
    pub fn write_manifest(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| Error::io("write manifest", path, &e))
    }
}

/// Converts snapshot files into images stored in a sink.
#[derive(Debug)]
pub struct BatchConverter<S> {
    sink: S,
    placeholder: Placeholder,
}

impl<S: ImageSink> BatchConverter<S> {
    /// Create a converter storing images in `sink`.
    pub fn new(sink: S, placeholder: Placeholder) -> Self {
        Self { sink, placeholder }
    }

    /// The sink images are stored in.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Convert every candidate.
    ///
    /// With the `multithreaded` feature files are converted in parallel;
    /// entries are reported in input order either way.
    pub fn convert(&self, candidates: &[Candidate]) -> Result<BatchReport> {
        tracing::info!(count = candidates.len(), "converting snapshots");

        #[cfg(feature = "multithreaded")]
        let entries = candidates
            .par_iter()
            .map(|candidate| self.convert_candidate(candidate))
            .collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "multithreaded"))]
        let entries = candidates
            .iter()
            .map(|candidate| self.convert_candidate(candidate))
            .collect::<Result<Vec<_>>>()?;

        let report = BatchReport::from_entries(entries);
        tracing::info!(
            decoded = report.decoded,
            partial = report.partial,
            placeholders = report.placeholders,
            "batch complete"
        );
        Ok(report)
    }

    fn convert_candidate(&self, candidate: &Candidate) -> Result<BatchEntry> {
        let source = candidate.path.display().to_string();
        match fs::read(&candidate.path) {
            Ok(data) => self.convert_bytes(
                candidate.key.clone(),
                &candidate.output_name,
                source,
                &data,
            ),
            Err(e) => {
                tracing::warn!(%source, error = %e, "failed to read snapshot");
                self.store_placeholder(
                    candidate.key.clone(),
                    &candidate.output_name,
                    source,
                    "io",
                    e.to_string(),
                )
            }
        }
    }

    /// Convert bytes supplied by a collaborator (for example, read from an archive).
    pub fn convert_bytes(
        &self,
        key: AssociationKey,
        output_name: &str,
        source: String,
        data: &[u8],
    ) -> Result<BatchEntry> {
        tracing::debug!(%source, output_name, "decoding snapshot");

        let texture = match ktxsnap_decode::decode_snapshot(data) {
            Ok(texture) => texture,
            Err(e) => {
                tracing::warn!(%source, kind = %e.kind(), error = %e, "snapshot not recoverable");
                return self.store_placeholder(key, output_name, source, e.kind().as_str(), e.to_string());
            }
        };
        let png = match ktxsnap_decode::encode_png(&texture) {
            Ok(png) => png,
            Err(e) => {
                tracing::warn!(%source, error = %e, "failed to encode snapshot");
                return self.store_placeholder(key, output_name, source, e.kind().as_str(), e.to_string());
            }
        };

        if texture.is_partial() {
            tracing::info!(
                %source,
                substituted_blocks = texture.substituted_blocks,
                "snapshot partially recovered"
            );
        }

        self.sink.put(output_name, png)?;
        Ok(BatchEntry {
            source,
            key,
            output_name: output_name.to_string(),
            outcome: Outcome::Decoded {
                width: texture.width,
                height: texture.height,
                substituted_blocks: texture.substituted_blocks,
            },
        })
    }

    fn store_placeholder(
        &self,
        key: AssociationKey,
        output_name: &str,
        source: String,
        kind: &str,
        reason: String,
    ) -> Result<BatchEntry> {
        self.sink.put(output_name, self.placeholder.png().to_vec())?;
        Ok(BatchEntry {
            source,
            key,
            output_name: output_name.to_string(),
            outcome: Outcome::Placeholder {
                kind: kind.to_string(),
                reason,
            },
        })
    }
}
