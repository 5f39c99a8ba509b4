//! Slash-delimited node paths.

/// Split a path into its id segments. Empty segments (leading, trailing or
/// repeated slashes) are ignored.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}
