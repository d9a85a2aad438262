//! Implementations of the converter's subcommands.

use std::{fs, path::Path};

use ktxsnap::{
    BatchConverter, BatchReport, DirectorySink, Error, ImageSink, NoSink, Placeholder, Result,
    collect_candidates,
};
use ktxsnap_decode::{ContainerHeader, decode_snapshot, extract_texture_data, write_png};

use crate::launch_params::BatchOptions;

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io("read", path, &e))
}

/// Convert one snapshot to a PNG file.
pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let texture = decode_snapshot(&read(input)?)?;
    if texture.is_partial() {
        tracing::warn!(
            input = %input.display(),
            substituted_blocks = texture.substituted_blocks,
            "snapshot partially recovered"
        );
    }
    write_png(&texture, output)?;
    tracing::info!(
        output = %output.display(),
        width = texture.width,
        height = texture.height,
        "wrote image"
    );
    Ok(())
}

/// Write the decompressed ASTC block stream of one snapshot.
pub fn extract(input: &Path, output: &Path) -> Result<()> {
    let blocks = extract_texture_data(&read(input)?)?;
    fs::write(output, &blocks).map_err(|e| Error::io("write", output, &e))?;
    tracing::info!(output = %output.display(), bytes = blocks.len(), "wrote texture data");
    Ok(())
}

/// Describe the container header of one snapshot.
///
/// Works for unsupported texel formats too, so the format can be seen.
pub fn inspect(input: &Path) -> Result<String> {
    let header = ContainerHeader::parse_unchecked(&read(input)?)?;
    Ok(describe(&header))
}

fn describe(header: &ContainerHeader) -> String {
    let supported = if header.ensure_supported().is_ok() {
        "supported"
    } else {
        "unsupported"
    };
    format!(
        "variant:          {variant:?}\n\
         endianness:       {endianness:?}\n\
         internal format:  {internal_format:#06x} ({supported})\n\
         base format:      {base_format:#06x}\n\
         size:             {width}x{height}\n\
         mip levels:       {mip_levels}\n\
         key/value bytes:  {key_value_bytes}\n\
         payload:          {length} bytes at {offset} ({compression:?})",
        variant = header.variant,
        endianness = header.endianness,
        internal_format = header.internal_format,
        base_format = header.base_internal_format,
        width = header.pixel_width,
        height = header.pixel_height,
        mip_levels = header.mip_levels,
        key_value_bytes = header.key_value_bytes,
        length = header.payload.length,
        offset = header.payload.offset,
        compression = header.payload.compression,
    )
}

/// Convert every snapshot under `options.input`.
pub fn batch(options: &BatchOptions) -> Result<BatchReport> {
    let placeholder = match &options.placeholder {
        Some(path) => Placeholder::from_file(path)?,
        None => Placeholder::transparent()?,
    };
    let candidates = collect_candidates(&options.input)?;

    let report = if options.dry_run {
        tracing::info!("dry run: no images will be written");
        run(NoSink::new(), placeholder, &candidates)?
    } else {
        run(DirectorySink::create(&options.output)?, placeholder, &candidates)?
    };

    if let Some(path) = &options.manifest {
        report.write_manifest(path)?;
        tracing::info!(manifest = %path.display(), "wrote manifest");
    }
    Ok(report)
}

fn run<S: ImageSink>(
    sink: S,
    placeholder: Placeholder,
    candidates: &[ktxsnap::Candidate],
) -> Result<BatchReport> {
    BatchConverter::new(sink, placeholder).convert(candidates)
}
