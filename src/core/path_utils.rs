/*
 * This module provides utility functions for remote share paths. The backend
 * addresses entries with Windows-style backslash paths and distinguishes
 * UNC-style roots (double leading backslash) from everything else. It
 * centralizes the two rules the rest of the core builds node ids from:
 * root-path normalization and parent/child id joining.
 */

pub const SEPARATOR: char = '\\';

/*
 * Normalizes a user-entered root path into the hierarchy's native form.
 * An input beginning with exactly one backslash followed by a non-backslash
 * character is promoted to the double-leading-backslash form; every other
 * input passes through unchanged. The promoted form starts with a double
 * backslash and is no longer matched by the predicate, so applying the
 * function to its own output is a no-op.
 */
pub fn normalize_root_path(input: &str) -> String {
    let mut chars = input.chars();
    let needs_promotion = chars.next() == Some(SEPARATOR)
        && matches!(chars.next(), Some(second) if second != SEPARATOR);

    if needs_promotion {
        log::debug!("PathUtils: Promoting root path '{input}' to UNC form.");
        let mut promoted = String::with_capacity(input.len() + 1);
        promoted.push(SEPARATOR);
        promoted.push_str(input);
        promoted
    } else {
        input.to_string()
    }
}

/*
 * Joins a parent node id and a child entry name into the child's node id.
 * Avoids a doubled separator when the parent id already ends in one (the
 * drive-root case, e.g. "D:\").
 */
pub fn join_child_id(parent_id: &str, name: &str) -> String {
    if parent_id.ends_with(SEPARATOR) {
        format!("{parent_id}{name}")
    } else {
        format!("{parent_id}{SEPARATOR}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_leading_backslash_is_promoted() {
        assert_eq!(normalize_root_path(r"\server\share"), r"\\server\share");
        assert_eq!(normalize_root_path(r"\s"), r"\\s");
    }

    #[test]
    fn test_other_inputs_pass_through() {
        assert_eq!(normalize_root_path(r"\\server\share"), r"\\server\share");
        assert_eq!(normalize_root_path(r"D:\data"), r"D:\data");
        assert_eq!(normalize_root_path("relative"), "relative");
        assert_eq!(normalize_root_path(""), "");
        // A lone backslash has no following character and is not promoted.
        assert_eq!(normalize_root_path(r"\"), r"\");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in [r"\server\share", r"\\server\share", r"D:\data", r"\", ""] {
            let once = normalize_root_path(input);
            let twice = normalize_root_path(&once);
            assert_eq!(once, twice, "normalize must be a fixed point on its own output");
        }
    }

    #[test]
    fn test_join_child_id_inserts_separator() {
        assert_eq!(
            join_child_id(r"\\server\share", "a.tif"),
            r"\\server\share\a.tif"
        );
    }

    #[test]
    fn test_join_child_id_does_not_double_separator() {
        assert_eq!(join_child_id(r"D:\", "a.tif"), r"D:\a.tif");
    }
}
