//! Launch parameter parsing for the converter.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// What the converter was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Convert one snapshot to PNG.
    Convert { input: PathBuf, output: PathBuf },
    /// Write the decompressed ASTC block stream of one snapshot.
    Extract { input: PathBuf, output: PathBuf },
    /// Print the container header of one snapshot.
    Inspect { input: PathBuf },
    /// Convert every snapshot under a directory.
    Batch(BatchOptions),
}

/// Options for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Directory searched recursively for `.ktx` files.
    pub input: PathBuf,
    /// Directory PNG images are written to.
    pub output: PathBuf,
    /// PNG used for files that fail to decode. A transparent 64x64 image when unset.
    pub placeholder: Option<PathBuf>,
    /// Where to write the JSON manifest, if anywhere.
    pub manifest: Option<PathBuf>,
    /// Decode everything but write no images.
    pub dry_run: bool,
}

#[derive(Parser)]
#[command(name = "ktxsnap", about = "Convert iOS snapshot KTX files to PNG")]
struct CliArgs {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Convert one snapshot to PNG.
    Convert {
        input: PathBuf,
        /// Output file (default: `<INPUT>.png`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the decompressed ASTC block stream of one snapshot.
    Extract {
        input: PathBuf,
        /// Output file (default: `<INPUT>.astc`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the container header of one snapshot.
    Inspect { input: PathBuf },
    /// Convert every snapshot under a directory.
    Batch {
        input: PathBuf,
        /// Output directory.
        #[arg(short, long)]
        output: PathBuf,
        /// PNG substituted for files that fail to decode.
        #[arg(long)]
        placeholder: Option<PathBuf>,
        /// Write a JSON manifest of the run to this file.
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Decode everything but write no images.
        #[arg(long)]
        dry_run: bool,
    },
}

impl From<CliCommand> for Command {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Convert { input, output } => Command::Convert {
                output: output.unwrap_or_else(|| with_appended_extension(&input, "png")),
                input,
            },
            CliCommand::Extract { input, output } => Command::Extract {
                output: output.unwrap_or_else(|| with_appended_extension(&input, "astc")),
                input,
            },
            CliCommand::Inspect { input } => Command::Inspect { input },
            CliCommand::Batch {
                input,
                output,
                placeholder,
                manifest,
                dry_run,
            } => Command::Batch(BatchOptions {
                input,
                output,
                placeholder,
                manifest,
                dry_run,
            }),
        }
    }
}

/// `a/b.ktx` with extension `png` becomes `a/b.ktx.png`.
fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Parse the command from the process arguments.
pub fn parse() -> Command {
    CliArgs::parse().command.into()
}
