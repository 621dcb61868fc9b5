//! Zip packaging of a staged pack directory

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use log::info;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Compress the contents of `source_dir` into a zip file at `archive_path`.
///
/// Entries are stored relative to `source_dir` with `/` separators, in sorted
/// order so that the same tree always yields the same archive layout.
/// Returns the number of files stored.
pub fn create_zip(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    if !source_dir.is_dir() {
        return Err(Error::Archive {
            message: format!("'{}' is not a directory", source_dir.display()),
        });
    }
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(archive_path).map_err(|e| Error::Archive {
        message: format!("Failed to create '{}': {}", archive_path.display(), e),
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut stored = 0;

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Archive {
            message: format!("Failed to walk '{}': {}", source_dir.display(), e),
        })?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| Error::Archive {
                message: e.to_string(),
            })?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
        } else {
            zip.start_file(name, options)?;
            zip.write_all(&fs::read(entry.path())?)?;
            stored += 1;
        }
    }

    zip.finish()?;
    info!("Archive written: {}", archive_path.display());
    Ok(stored)
}
