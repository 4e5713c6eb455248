use crate::core_dispatch::error::DispatchError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A direct subdirectory of the base directory, as seen by one scan.
#[derive(Debug, Clone)]
pub struct CandidateDirectory {
    pub name: String,
    pub path: PathBuf,
    pub created_at: SystemTime,
}

/// Lists the direct subdirectories of `base_dir` with their creation times.
///
/// Files and nested descendants are not candidates, and neither are symlinked
/// entries: `DirEntry::file_type` does not follow links, so only real children
/// of the base directory can be selected. On filesystems without a birth
/// timestamp the modification time stands in (degraded accuracy, not an
/// error).
///
/// An empty base directory yields an empty list; a missing base or one that
/// is not a directory is `DirectoryUnavailable`.
pub fn scan(base_dir: &Path) -> Result<Vec<CandidateDirectory>, DispatchError> {
    let metadata = fs::metadata(base_dir).map_err(|e| {
        DispatchError::DirectoryUnavailable(format!("{}: {}", base_dir.display(), e))
    })?;
    if !metadata.is_dir() {
        return Err(DispatchError::DirectoryUnavailable(format!(
            "{} is not a directory",
            base_dir.display()
        )));
    }

    let entries = fs::read_dir(base_dir).map_err(|e| {
        DispatchError::DirectoryUnavailable(format!("{}: {}", base_dir.display(), e))
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            DispatchError::DirectoryUnavailable(format!("{}: {}", base_dir.display(), e))
        })?;

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            // An entry that vanished between the listing and the stat call
            // is simply no longer a candidate.
            Err(_) => continue,
        };
        if !file_type.is_dir() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };
        let created_at = match metadata.created().or_else(|_| metadata.modified()) {
            Ok(created_at) => created_at,
            Err(_) => continue,
        };

        candidates.push(CandidateDirectory {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            created_at,
        });
    }

    Ok(candidates)
}
