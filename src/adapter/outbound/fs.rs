//! File-system helpers shared by the writers.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Write `contents` to `path` atomically.
///
/// Uses write-to-temp-then-rename pattern for atomicity.
/// Creates parent directory if it doesn't exist.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);
    let mut file = fs::File::create(temp_path)?;

    // Helper to clean up temp file on failure
    let cleanup_and_err = |e| {
        let _ = fs::remove_file(temp_path);
        e
    };

    file.write_all(contents).map_err(cleanup_and_err)?;
    file.sync_all().map_err(cleanup_and_err)?;
    drop(file);

    fs::rename(temp_path, path).map_err(cleanup_and_err)?;

    Ok(())
}

/// Decode file bytes as UTF-8, falling back to Latin-1.
///
/// Area sheets exported from spreadsheets are often Latin-1, where the
/// degree sign is the single byte `0xB0`.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
