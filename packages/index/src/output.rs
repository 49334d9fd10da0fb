//! JSON document emission.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::IndexError;

/// Serializes `value` as a JSON document with a trailing newline.
///
/// # Errors
///
/// Returns [`IndexError::Json`] if serialization fails.
pub fn render_document<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, IndexError> {
    let mut document = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    document.push('\n');
    Ok(document)
}

/// Writes `value` to `path` as JSON.
///
/// The document is written to a sibling temporary file first and renamed
/// into place, so `path` either keeps its previous contents or holds the
/// complete new document.
///
/// # Errors
///
/// Returns [`IndexError`] if serialization or any file operation fails.
pub fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<(), IndexError> {
    let document = render_document(value, pretty)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    let result = write_staged(&staging, document.as_bytes()).and_then(|()| fs::rename(&staging, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    log::info!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(())
}

fn write_staged(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
