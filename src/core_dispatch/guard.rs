use crate::core_dispatch::error::DispatchError;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a client-supplied path into a root-relative string.
///
/// Absolute paths are refused outright, as is any `..` that would climb
/// above the session root. `.` segments are dropped and inner `..` segments
/// collapse, so `a/../b` becomes `b`. The empty string names the root.
pub fn normalize_relative(client_path: &str) -> Result<String, DispatchError> {
    if client_path.starts_with('/') || client_path.starts_with('\\') {
        return Err(DispatchError::PathEscape(client_path.to_string()));
    }

    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(client_path).components() {
        match component {
            Component::CurDir => {}
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(DispatchError::PathEscape(client_path.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(DispatchError::PathEscape(client_path.to_string()));
            }
        }
    }

    Ok(parts.join("/"))
}

/// Maps a client-supplied path onto the real filesystem under `bound_root`.
///
/// The normalized path is walked component by component; every symlink met
/// on the way is resolved and the resolved location must still be under
/// `bound_root`, so a link inside the root cannot route an operation outside
/// it. A link whose target cannot be resolved is refused as well: writing
/// through a dangling link could land anywhere.
///
/// `bound_root` must already be canonical (the binder guarantees this). The
/// returned path may have a nonexistent suffix — upload targets are created
/// by the caller afterwards.
pub fn resolve_path(bound_root: &Path, client_path: &str) -> Result<PathBuf, DispatchError> {
    let relative = normalize_relative(client_path)?;

    let mut resolved = bound_root.to_path_buf();
    if relative.is_empty() {
        return Ok(resolved);
    }

    for part in relative.split('/') {
        resolved.push(part);
        match fs::symlink_metadata(&resolved) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                resolved = fs::canonicalize(&resolved)
                    .map_err(|_| DispatchError::PathEscape(client_path.to_string()))?;
            }
            // Nonexistent components cannot be symlinks; plain entries need
            // no resolution.
            _ => {}
        }
        if !resolved.starts_with(bound_root) {
            return Err(DispatchError::PathEscape(client_path.to_string()));
        }
    }

    Ok(resolved)
}

/// Joins a client argument onto the session's working directory, producing
/// the effective client path the guard checks. Absolute arguments are passed
/// through untouched so `normalize_relative` can refuse them.
pub fn join_virtual(current_dir: &str, arg: &str) -> String {
    let arg = arg.trim();
    if arg.starts_with('/') || current_dir.is_empty() {
        arg.to_string()
    } else if arg.is_empty() {
        current_dir.to_string()
    } else {
        format!("{}/{}", current_dir, arg)
    }
}
