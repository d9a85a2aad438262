//! Batch conversion of iOS application snapshot caches.
//!
//! This crate walks extracted snapshot directories, decodes every `.ktx`
//! file with [`ktxsnap_decode`], and stores PNG images in an [`ImageSink`].
//! Files that cannot be decoded are replaced with a [`Placeholder`] so that
//! report builders always find an image for every key.
//!
//! # Design principles
//!
//! - **Never abort on one file**: Decode failures become report entries
//! - **Deterministic naming**: Output names depend only on the sorted input set
//! - **Parallel by default**: The `multithreaded` feature converts files with rayon
//!
//! # Example
//!
//! ```ignore
//! use ktxsnap::{BatchConverter, DirectorySink, Placeholder, collect_candidates};
//!
//! let candidates = collect_candidates(Path::new("extracted/Snapshots"))?;
//! let sink = DirectorySink::create("out")?;
//! let converter = BatchConverter::new(sink, Placeholder::transparent()?);
//! let report = converter.convert(&candidates)?;
//! report.write_manifest(Path::new("out/manifest.json"))?;
//! ```

mod batch;
mod error;
pub mod naming;
pub mod placeholder;
pub mod sink;

pub use batch::{BatchConverter, BatchEntry, BatchReport, Candidate, Outcome, collect_candidates};
pub use error::{Error, Result};
pub use naming::{AssociationKey, OutputNamer, thumbnail_file_name};
pub use placeholder::Placeholder;
pub use sink::{DirectorySink, ImageSink, MemorySink, NoSink};

// Re-export the decoder for convenience.
pub use ktxsnap_decode::{DecodeError, DecodedTexture, ErrorKind};
