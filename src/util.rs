// snapshot/src/util.rs

use std::path::{
    Path,
    PathBuf
};

/// Separator used by every logical (manifest) path, regardless of host.
pub const LOGICAL_SEP: char = '/';

/// Logical `a/b/c.ext` → native path under `root`.
/// Empty segments (`a//b`, trailing `/`) are dropped; `.`/`..` are kept as-is.
pub fn logical_to_native(root: &Path, logical: &str) -> PathBuf {
    let rel: PathBuf = logical
        .split(LOGICAL_SEP)
        .filter(|seg| !seg.is_empty())
        .collect();
    root.join(rel)
}

/// Text after the last `.` of the logical path. A path without a dot yields
/// the whole path back, which no label table maps.
pub fn extension_of(logical: &str) -> &str {
    logical.rsplit('.').next().unwrap_or(logical)
}

/// Best-effort display form of a path for diagnostics.
pub fn display_rel(root: &Path, p: &Path) -> String {
    p.strip_prefix(root)
        .unwrap_or(p)
        .to_string_lossy()
        .replace('\\', "/")
}

/* ================================== Tests ================================== */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_path_joins_segments() {
        let p = logical_to_native(Path::new("root"), "src/components/Header.jsx");
        let expected: PathBuf = ["root", "src", "components", "Header.jsx"].iter().collect();
        assert_eq!(p, expected);
    }

    #[test]
    fn native_path_skips_empty_segments() {
        let p = logical_to_native(Path::new("r"), "a//b/");
        let expected: PathBuf = ["r", "a", "b"].iter().collect();
        assert_eq!(p, expected);
    }

    #[test]
    fn extension_is_last_dot_suffix() {
        assert_eq!(extension_of("src/App.jsx"), "jsx");
        assert_eq!(extension_of("src/components/Header.module.css"), "css");
        assert_eq!(extension_of("Makefile"), "Makefile");
        assert_eq!(extension_of("notes."), "");
    }

    #[test]
    fn display_rel_strips_root() {
        let root = Path::new("proj");
        let p = root.join("src").join("db.js");
        assert_eq!(display_rel(root, &p), "src/db.js");
    }
}
