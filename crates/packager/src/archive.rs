//! Archive construction for package output.
//!
//! Archives are built fully in memory: module packages are small (the
//! oversize thresholds warn well below a few megabytes), and building in
//! memory lets the compression ratio be measured before anything touches
//! disk.

use std::io::{Cursor, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use modcraft_core::options::{ArchiveFormat, CompressionLevel};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::PackagingError;
use crate::files::PackageFile;

/// Serialize `files` into an archive of the requested format and
/// compression level, returning the raw archive bytes.
pub fn build_archive(
    files: &[PackageFile],
    format: ArchiveFormat,
    compression: CompressionLevel,
) -> Result<Vec<u8>, PackagingError> {
    match format {
        ArchiveFormat::Zip => build_zip(files, compression),
        ArchiveFormat::Tar => build_tar(files, compression),
    }
}

fn build_zip(
    files: &[PackageFile],
    compression: CompressionLevel,
) -> Result<Vec<u8>, PackagingError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    let options = match compression {
        CompressionLevel::None => {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        }
        CompressionLevel::Fast => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(1)),
        CompressionLevel::Best => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(9)),
    };

    for file in files {
        writer.start_file(file.path.as_str(), options)?;
        writer.write_all(&file.contents)?;
    }

    Ok(writer.finish()?.into_inner())
}

fn build_tar(
    files: &[PackageFile],
    compression: CompressionLevel,
) -> Result<Vec<u8>, PackagingError> {
    let mut builder = tar::Builder::new(Vec::new());
    for file in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(file.contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, &file.path, file.contents.as_slice())?;
    }
    let tar_bytes = builder.into_inner()?;

    // A plain `.tar` for no compression; gzip inside the same suffix
    // otherwise (the package layout names the file `<id>.tar` either way).
    let level = match compression {
        CompressionLevel::None => return Ok(tar_bytes),
        CompressionLevel::Fast => Compression::fast(),
        CompressionLevel::Best => Compression::best(),
    };
    let mut encoder = GzEncoder::new(Vec::new(), level);
    encoder.write_all(&tar_bytes)?;
    Ok(encoder.finish()?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
