//! Path equivalence
//!
//! Structural path comparison used by every workspace equality check, and
//! therefore by dirty tracking. Paths are made absolute, lexically
//! normalized (`.`/`..` resolved, trailing separators dropped) and then
//! compared with the host filesystem's case rule.

use std::path::{Component, Path, PathBuf};

/// Whether the host's default filesystem ignores case
pub const CASE_INSENSITIVE_HOST: bool = cfg!(any(windows, target_os = "macos"));

/// Compare two paths for structural equality.
///
/// Empty paths are only equal to other empty paths.
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    paths_equal_with_case(a, b, CASE_INSENSITIVE_HOST)
}

/// Compare two optional paths; `None` behaves like an empty path.
pub fn optional_paths_equal(a: Option<&Path>, b: Option<&Path>) -> bool {
    paths_equal(
        a.unwrap_or_else(|| Path::new("")),
        b.unwrap_or_else(|| Path::new("")),
    )
}

pub(crate) fn paths_equal_with_case(a: &Path, b: &Path, case_insensitive: bool) -> bool {
    let a_empty = a.as_os_str().is_empty();
    let b_empty = b.as_os_str().is_empty();
    if a_empty || b_empty {
        return a_empty && b_empty;
    }

    let a = normalize(a);
    let b = normalize(b);
    if case_insensitive {
        a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}

/// Absolute, lexically normalized form of `path`.
///
/// Symlinks are not resolved and the path does not need to exist.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root
                if matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_separator_ignored() {
        assert!(paths_equal(Path::new("/a/b/"), Path::new("/a/b")));
        assert!(paths_equal(Path::new("/a/b//"), Path::new("/a/b")));
    }

    #[test]
    fn test_empty_paths() {
        assert!(!paths_equal(Path::new(""), Path::new("x")));
        assert!(!paths_equal(Path::new("x"), Path::new("")));
        assert!(paths_equal(Path::new(""), Path::new("")));
    }

    #[test]
    fn test_optional_paths() {
        assert!(optional_paths_equal(None, None));
        assert!(optional_paths_equal(None, Some(Path::new(""))));
        assert!(!optional_paths_equal(None, Some(Path::new("/a"))));
    }

    #[test]
    fn test_dot_segments_resolved() {
        assert!(paths_equal(Path::new("/a/./b/../b"), Path::new("/a/b")));
        assert!(paths_equal(Path::new("/../a"), Path::new("/a")));
    }

    #[test]
    fn test_relative_paths_resolve_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert!(paths_equal(Path::new("some/dir"), &cwd.join("some").join("dir")));
    }

    #[test]
    fn test_case_rule() {
        assert!(paths_equal_with_case(
            Path::new("/Data/Input"),
            Path::new("/data/input"),
            true
        ));
        assert!(!paths_equal_with_case(
            Path::new("/Data/Input"),
            Path::new("/data/input"),
            false
        ));
    }

    #[test]
    fn test_different_paths() {
        assert!(!paths_equal(Path::new("/a/b"), Path::new("/a/c")));
    }
}
