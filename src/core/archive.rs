use crate::utils::error::{ExportError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Create `path` and its parents if needed.
pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| ExportError::DirectoryCreationFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Zip `files` into `archive_path`, each stored under its base name.
///
/// The archive is assembled in a temporary file and only renamed to
/// `archive_path` once it has been finalised.
pub fn bundle(files: &[PathBuf], archive_path: &Path) -> Result<()> {
    let failure = |message: String| ExportError::ArchiveWriteFailure {
        path: archive_path.to_path_buf(),
        message,
    };

    let dir = archive_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let tmp = tempfile::Builder::new()
        .prefix(".bundle-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| failure(e.to_string()))?;

    let mut zip = ZipWriter::new(tmp);

    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| failure(format!("{} has no file name", file.display())))?;

        let mut input = File::open(file)
            .map_err(|e| failure(format!("cannot read {}: {}", file.display(), e)))?;

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name.as_str(), options)
            .map_err(|e| failure(e.to_string()))?;
        io::copy(&mut input, &mut zip)
            .map_err(|e| failure(format!("cannot read {}: {}", file.display(), e)))?;

        tracing::debug!("Added {} to archive", name);
    }

    let tmp = zip.finish().map_err(|e| failure(e.to_string()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| failure(e.to_string()))?;
    tmp.persist_noclobber(archive_path)
        .map_err(|e| failure(e.error.to_string()))?;

    Ok(())
}
