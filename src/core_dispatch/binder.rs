use crate::core_dispatch::error::DispatchError;
use crate::core_dispatch::resolver;
use crate::session::Session;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Binds `session` to the currently active directory under `base_dir`.
///
/// Runs once per session, right after authentication succeeds and before any
/// filesystem command is accepted. The resolved path is canonicalized and
/// becomes the session root for the rest of the connection; a session that
/// already holds a root keeps it, no matter what the resolver would return
/// now.
///
/// Fails with `NoDirectoryAvailable` when the base directory has no
/// subdirectories; the caller refuses the session.
pub fn bind(session: &mut Session, base_dir: &Path) -> Result<PathBuf, DispatchError> {
    if let Some(root) = &session.bound_root {
        debug!("Session already bound to {:?}, keeping it", root);
        return Ok(root.clone());
    }

    let active = resolver::resolve(base_dir)?
        .ok_or_else(|| DispatchError::NoDirectoryAvailable(base_dir.display().to_string()))?;

    let root = active.path.canonicalize().map_err(|e| {
        DispatchError::DirectoryUnavailable(format!("{}: {}", active.path.display(), e))
    })?;

    info!("Session bound to {:?}", root);
    session.bound_root = Some(root.clone());
    Ok(root)
}
