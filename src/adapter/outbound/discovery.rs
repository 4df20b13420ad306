//! Batch file discovery by directory and file-name glob.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use tracing::debug;

use crate::error::{ConfigError, Error, Result};

/// Compile a file-name glob such as `buoys*.csv`.
pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidValue {
        field: "input.pattern",
        reason: e.to_string(),
    })?;
    Ok(glob.compile_matcher())
}

/// Regular files in `dir` whose name matches `pattern`, sorted by path.
///
/// A missing directory yields no files rather than an error so that the
/// caller reports the uniform "nothing to process" condition.
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = compile_pattern(pattern)?;

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "input directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| matcher.is_match(name))
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Use explicit paths when given, otherwise discover; fail when nothing is left.
pub fn resolve_inputs(explicit: &[PathBuf], dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let files = if explicit.is_empty() {
        discover(dir, pattern)?
    } else {
        let mut files = explicit.to_vec();
        files.sort();
        files.dedup();
        files
    };

    if files.is_empty() {
        return Err(Error::NoInputFiles {
            pattern: dir.join(pattern).display().to_string(),
        });
    }
    Ok(files)
}
