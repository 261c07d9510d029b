//! Display names for report entries.
//!
//! Pure string manipulation: no filesystem access, and paths are expected to
//! use `/` separators as written by the Go toolchain.

/// Map a source file path to the name it is grouped and displayed under.
///
/// With `packages`, the file is reduced to its containing directory. A
/// non-empty `root` is stripped as a literal prefix; package names are then
/// rendered relative to it (`./sub/pkg`, or `.` for the root package itself).
#[must_use]
pub fn normalize_name(file_name: &str, root: &str, packages: bool) -> String {
    let name = if packages { dir_name(file_name) } else { file_name };

    if root.is_empty() {
        return name.to_string();
    }

    let stripped = name.strip_prefix(root).unwrap_or(name);
    if packages {
        format!(".{stripped}")
    } else {
        stripped.to_string()
    }
}

/// Everything but the last element of `path`, without trailing slashes.
///
/// `a.go` → `.`, `/a.go` → `/`, `x/y/a.go` → `x/y`.
fn dir_name(path: &str) -> &str {
    match path.rfind('/') {
        None => ".",
        Some(i) => {
            let dir = path[..i].trim_end_matches('/');
            if dir.is_empty() {
                "/"
            } else {
                dir
            }
        }
    }
}
