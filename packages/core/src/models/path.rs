//! Path Helpers
//!
//! Small helpers over the store's absolute, `/`-delimited paths. Paths are
//! unique at any instant; the migration vacates a path by appending a rename
//! suffix and recovers the original path by deleting every occurrence of
//! that suffix (ancestors of a renamed node may have been renamed too).

/// Parent path of an absolute path.
///
/// The parent of a top-level node (and of the root itself) is `/`.
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

/// Last segment of an absolute path.
pub fn node_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Original path of a renamed-aside node.
///
/// Deletes every occurrence of the rename suffix, not just a trailing one:
/// a node under a renamed ancestor carries the suffix in the middle of its
/// path as well (`/lib.bak/photo.jpg.bak` -> `/lib/photo.jpg`).
pub fn original_path(path: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return path.to_string();
    }
    path.replace(suffix, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/lib/photo.jpg"), "/lib");
        assert_eq!(parent_path("/lib"), "/");
        assert_eq!(parent_path("/"), "/");
    }

    #[test]
    fn test_node_name() {
        assert_eq!(node_name("/lib/photo.jpg"), "photo.jpg");
        assert_eq!(node_name("/lib"), "lib");
    }

    #[test]
    fn test_original_path_strips_trailing_suffix() {
        assert_eq!(original_path("/lib.bak", ".bak"), "/lib");
    }

    #[test]
    fn test_original_path_strips_every_occurrence() {
        assert_eq!(
            original_path("/lib.bak/photo.jpg.bak", ".bak"),
            "/lib/photo.jpg"
        );
    }

    #[test]
    fn test_original_path_without_suffix_is_identity() {
        assert_eq!(original_path("/lib/doc", ".bak"), "/lib/doc");
        assert_eq!(original_path("/lib/doc", ""), "/lib/doc");
    }
}
