// Tests for the directory-dispatch core.

#[cfg(test)]
mod tests {
    use crate::core_dispatch::binder;
    use crate::core_dispatch::error::DispatchError;
    use crate::core_dispatch::guard;
    use crate::core_dispatch::resolver;
    use crate::core_dispatch::scanner::{self, CandidateDirectory};
    use crate::session::Session;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::thread;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn candidate(name: &str, secs: u64) -> CandidateDirectory {
        CandidateDirectory {
            name: name.to_string(),
            path: PathBuf::from("/base").join(name),
            created_at: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    // Creates subdirectories in order, spaced out far enough for distinct
    // creation times. Names are chosen so that the last one also wins the
    // lexicographic tie-break on filesystems with coarse timestamps.
    fn make_dirs(base: &TempDir, names: &[&str]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                thread::sleep(Duration::from_millis(20));
            }
            fs::create_dir(base.path().join(name)).unwrap();
        }
    }

    fn canonical_root(dir: &TempDir) -> PathBuf {
        dir.path().canonicalize().unwrap()
    }

    #[test]
    fn scan_missing_base_is_unavailable() {
        let err = scanner::scan(Path::new("/nonexistent/ftpdispatch-base")).unwrap_err();
        assert!(matches!(err, DispatchError::DirectoryUnavailable(_)));
    }

    #[test]
    fn scan_base_that_is_a_file_is_unavailable() {
        let base = TempDir::new().unwrap();
        let file = base.path().join("not-a-dir");
        fs::write(&file, "test").unwrap();

        let err = scanner::scan(&file).unwrap_err();
        assert!(matches!(err, DispatchError::DirectoryUnavailable(_)));
    }

    #[test]
    fn scan_empty_base_yields_no_candidates() {
        let base = TempDir::new().unwrap();
        assert!(scanner::scan(base.path()).unwrap().is_empty());
    }

    #[test]
    fn scan_only_sees_direct_subdirectories() {
        let base = TempDir::new().unwrap();
        fs::create_dir(base.path().join("sub")).unwrap();
        fs::create_dir(base.path().join("sub/nested")).unwrap();
        fs::write(base.path().join("a_file.txt"), "content").unwrap();

        let candidates = scanner::scan(base.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "sub");
    }

    #[cfg(unix)]
    #[test]
    fn scan_skips_symlinked_directories() {
        let base = TempDir::new().unwrap();
        fs::create_dir(base.path().join("real")).unwrap();
        std::os::unix::fs::symlink(base.path().join("real"), base.path().join("link")).unwrap();

        let candidates = scanner::scan(base.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "real");
    }

    #[test]
    fn select_picks_newest_timestamp() {
        let picked = resolver::select(vec![
            candidate("aaa", 100),
            candidate("ccc", 300),
            candidate("bbb", 200),
        ])
        .unwrap();
        assert_eq!(picked.name, "ccc");
    }

    #[test]
    fn select_breaks_ties_by_greatest_name() {
        let picked =
            resolver::select(vec![candidate("aaa", 100), candidate("bbb", 100)]).unwrap();
        assert_eq!(picked.name, "bbb");

        // input order must not matter
        let picked =
            resolver::select(vec![candidate("bbb", 100), candidate("aaa", 100)]).unwrap();
        assert_eq!(picked.name, "bbb");
    }

    #[test]
    fn select_of_nothing_is_none() {
        assert!(resolver::select(Vec::new()).is_none());
    }

    #[test]
    fn resolve_empty_base_is_none() {
        let base = TempDir::new().unwrap();
        assert!(resolver::resolve(base.path()).unwrap().is_none());
    }

    #[test]
    fn resolve_picks_the_latest_created_directory() {
        let base = TempDir::new().unwrap();
        make_dirs(&base, &["aaa", "bbb", "ccc"]);

        let active = resolver::resolve(base.path()).unwrap().unwrap();
        assert_eq!(active.name, "ccc");
    }

    #[test]
    fn resolve_is_idempotent_without_filesystem_changes() {
        let base = TempDir::new().unwrap();
        make_dirs(&base, &["aaa", "bbb"]);

        let first = resolver::resolve(base.path()).unwrap().unwrap();
        let second = resolver::resolve(base.path()).unwrap().unwrap();
        assert_eq!(first.name, second.name);
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn bind_without_candidates_is_refused() {
        let base = TempDir::new().unwrap();
        let mut session = Session::new();

        let err = binder::bind(&mut session, base.path()).unwrap_err();
        assert!(matches!(err, DispatchError::NoDirectoryAvailable(_)));
        assert!(session.bound_root.is_none());
    }

    #[test]
    fn bound_session_keeps_its_root_when_a_newer_directory_appears() {
        let base = TempDir::new().unwrap();
        make_dirs(&base, &["first"]);

        let mut session = Session::new();
        let root = binder::bind(&mut session, base.path()).unwrap();
        assert!(root.ends_with("first"));

        thread::sleep(Duration::from_millis(20));
        fs::create_dir(base.path().join("zzz_later")).unwrap();

        // the already-bound session is never re-rooted
        let rebound = binder::bind(&mut session, base.path()).unwrap();
        assert_eq!(rebound, root);
        assert_eq!(session.bound_root.as_deref(), Some(root.as_path()));

        // a fresh session lands in the newer directory
        let mut newcomer = Session::new();
        let new_root = binder::bind(&mut newcomer, base.path()).unwrap();
        assert!(new_root.ends_with("zzz_later"));
    }

    #[test]
    fn guard_accepts_paths_under_the_root() {
        let dir = TempDir::new().unwrap();
        let root = canonical_root(&dir);
        fs::create_dir(root.join("sub")).unwrap();

        assert_eq!(guard::resolve_path(&root, "").unwrap(), root);
        assert_eq!(guard::resolve_path(&root, ".").unwrap(), root);
        assert_eq!(
            guard::resolve_path(&root, "file.txt").unwrap(),
            root.join("file.txt")
        );
        assert_eq!(
            guard::resolve_path(&root, "sub/nested.txt").unwrap(),
            root.join("sub/nested.txt")
        );
    }

    #[test]
    fn guard_normalizes_inner_dotdot() {
        let dir = TempDir::new().unwrap();
        let root = canonical_root(&dir);
        fs::create_dir(root.join("sub")).unwrap();

        assert_eq!(
            guard::resolve_path(&root, "sub/../file.txt").unwrap(),
            root.join("file.txt")
        );
    }

    #[test]
    fn guard_rejects_absolute_paths() {
        let dir = TempDir::new().unwrap();
        let root = canonical_root(&dir);

        for path in ["/etc/passwd", "/", "/file.txt"] {
            let err = guard::resolve_path(&root, path).unwrap_err();
            assert!(matches!(err, DispatchError::PathEscape(_)), "{}", path);
        }
    }

    #[test]
    fn guard_rejects_dotdot_climbing_out() {
        let dir = TempDir::new().unwrap();
        let root = canonical_root(&dir);

        for path in ["..", "../outside.txt", "a/../../b", "../../etc/passwd"] {
            let err = guard::resolve_path(&root, path).unwrap_err();
            assert!(matches!(err, DispatchError::PathEscape(_)), "{}", path);
        }
    }

    #[test]
    fn guard_accepts_nonexistent_upload_targets() {
        let dir = TempDir::new().unwrap();
        let root = canonical_root(&dir);

        assert_eq!(
            guard::resolve_path(&root, "upload.txt").unwrap(),
            root.join("upload.txt")
        );
        assert_eq!(
            guard::resolve_path(&root, "missing/dir/upload.txt").unwrap(),
            root.join("missing/dir/upload.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn guard_rejects_symlinks_leaving_the_root() {
        let outer = TempDir::new().unwrap();
        let root = outer.path().join("root");
        let secret = outer.path().join("secret");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&secret).unwrap();
        fs::write(secret.join("passwd.txt"), "secret").unwrap();
        let root = root.canonicalize().unwrap();
        std::os::unix::fs::symlink(&secret, root.join("exit")).unwrap();

        let err = guard::resolve_path(&root, "exit").unwrap_err();
        assert!(matches!(err, DispatchError::PathEscape(_)));
        let err = guard::resolve_path(&root, "exit/passwd.txt").unwrap_err();
        assert!(matches!(err, DispatchError::PathEscape(_)));
    }

    #[cfg(unix)]
    #[test]
    fn guard_follows_symlinks_staying_inside() {
        let dir = TempDir::new().unwrap();
        let root = canonical_root(&dir);
        fs::create_dir(root.join("sub")).unwrap();
        std::os::unix::fs::symlink(root.join("sub"), root.join("alias")).unwrap();

        let resolved = guard::resolve_path(&root, "alias/file.txt").unwrap();
        assert_eq!(resolved, root.join("sub/file.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn guard_rejects_dangling_symlinks() {
        let dir = TempDir::new().unwrap();
        let root = canonical_root(&dir);
        std::os::unix::fs::symlink(root.join("missing"), root.join("ghost")).unwrap();

        let err = guard::resolve_path(&root, "ghost").unwrap_err();
        assert!(matches!(err, DispatchError::PathEscape(_)));
    }

    #[test]
    fn join_virtual_composes_the_working_directory() {
        assert_eq!(guard::join_virtual("", "file.txt"), "file.txt");
        assert_eq!(guard::join_virtual("sub", "file.txt"), "sub/file.txt");
        assert_eq!(guard::join_virtual("sub", ""), "sub");
        assert_eq!(guard::join_virtual("", ""), "");
        // absolute arguments pass through for the guard to refuse
        assert_eq!(guard::join_virtual("sub", "/abs.txt"), "/abs.txt");
    }

    #[test]
    fn normalize_relative_reports_the_virtual_location() {
        assert_eq!(guard::normalize_relative("sub/dir").unwrap(), "sub/dir");
        assert_eq!(guard::normalize_relative("sub/./dir").unwrap(), "sub/dir");
        assert_eq!(guard::normalize_relative("sub/..").unwrap(), "");
        assert!(guard::normalize_relative("/sub").is_err());
        assert!(guard::normalize_relative("..").is_err());
    }

    // End to end: two directories, a session confined to the newer one.
    #[test]
    fn newest_directory_confines_the_session() {
        let base = TempDir::new().unwrap();
        make_dirs(&base, &["a", "b"]);
        fs::write(base.path().join("a/only_in_a.txt"), "old").unwrap();
        fs::write(base.path().join("b/only_in_b.txt"), "new").unwrap();

        let mut session = Session::new();
        let root = binder::bind(&mut session, base.path()).unwrap();
        assert!(root.ends_with("b"));

        // listing "." resolves to the bound directory itself
        let listing_target = guard::resolve_path(&root, ".").unwrap();
        let names: Vec<String> = fs::read_dir(&listing_target)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["only_in_b.txt"]);

        // the sibling directory stays unreachable
        let err = guard::resolve_path(&root, "../a").unwrap_err();
        assert!(matches!(err, DispatchError::PathEscape(_)));
    }
}
