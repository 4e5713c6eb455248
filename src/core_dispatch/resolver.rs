use crate::core_dispatch::error::DispatchError;
use crate::core_dispatch::scanner::{self, CandidateDirectory};
use std::path::Path;

/// Resolves the currently active directory: the most recently created direct
/// subdirectory of `base_dir`, or `None` when it has no subdirectories.
///
/// Every call re-scans the base directory; nothing is cached between calls,
/// so two resolutions with an unchanged filesystem return the same candidate
/// and concurrent callers never share state.
pub fn resolve(base_dir: &Path) -> Result<Option<CandidateDirectory>, DispatchError> {
    let candidates = scanner::scan(base_dir)?;
    Ok(select(candidates))
}

/// Selection policy: maximum creation time, ties broken by the
/// lexicographically greatest name.
pub fn select(candidates: Vec<CandidateDirectory>) -> Option<CandidateDirectory> {
    candidates.into_iter().max_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.name.cmp(&b.name))
    })
}
