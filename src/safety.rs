//! Path containment checks
//!
//! Every name that reaches a destructive filesystem call passes through
//! [`is_contained`] first.

use std::path::{Component, Path, PathBuf};

use crate::error::{BackupError, BackupResult};

/// Make a path absolute and lexically resolve `.` and `..`
///
/// The path does not need to exist.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() refuses to remove the root
                out.pop();
            }
        }
    }
    out
}

/// True iff `candidate` lies strictly inside `root`
///
/// Comparison is per component, so `root-evil` never matches `root` and
/// trailing separators make no difference.
pub fn is_contained(root: &Path, candidate: &Path) -> bool {
    let root = normalize(root);
    let candidate = normalize(candidate);
    candidate != root && candidate.starts_with(&root)
}

/// Join `name` onto `root`, failing unless the result stays inside `root`
pub fn contained_join(root: &Path, name: &str) -> BackupResult<PathBuf> {
    let candidate = root.join(name);
    if is_contained(root, &candidate) {
        Ok(candidate)
    } else {
        Err(BackupError::path_violation(root, &candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_itself_is_rejected() {
        assert!(!is_contained(Path::new("/b/Backups"), Path::new("/b/Backups")));
        assert!(!is_contained(Path::new("/b/Backups"), Path::new("/b/Backups/")));
        assert!(!is_contained(Path::new("/b/Backups"), Path::new("/b/Backups/.")));
    }

    #[test]
    fn test_sibling_prefix_is_rejected() {
        assert!(!is_contained(Path::new("/b/Backups"), Path::new("/b/Backups-evil/x")));
    }

    #[test]
    fn test_nested_path_is_accepted() {
        assert!(is_contained(Path::new("/b/Backups"), Path::new("/b/Backups/a/b")));
        assert!(is_contained(Path::new("/b/Backups/"), Path::new("/b/Backups/a/b")));
        assert!(is_contained(Path::new("/b/Backups"), Path::new("/b/Backups/a/b/")));
    }

    #[test]
    fn test_traversal_is_rejected() {
        assert!(!is_contained(Path::new("/b/Backups"), Path::new("/b/Backups/../../etc")));
        assert!(!is_contained(Path::new("/b/Backups"), Path::new("/b/Backups/a/../..")));
        assert!(is_contained(Path::new("/b/Backups"), Path::new("/b/Backups/a/../c")));
    }

    #[test]
    fn test_relative_paths_resolve_against_cwd() {
        assert!(is_contained(Path::new("snaps"), Path::new("snaps/REPO-1")));
        assert!(!is_contained(Path::new("snaps"), Path::new("other/REPO-1")));
    }

    #[test]
    fn test_contained_join() {
        let root = Path::new("/b/Backups");
        assert_eq!(
            contained_join(root, "REPO-20250101-1200").unwrap(),
            PathBuf::from("/b/Backups/REPO-20250101-1200")
        );

        let err = contained_join(root, "../../etc").unwrap_err();
        assert!(err.is_path_violation());
        assert!(contained_join(root, "/etc").unwrap_err().is_path_violation());
        assert!(contained_join(root, "").unwrap_err().is_path_violation());
    }

    #[test]
    fn test_normalize_does_not_escape_root() {
        assert_eq!(normalize(Path::new("/../../x")), PathBuf::from("/x"));
    }
}
