use std::path::PathBuf;
use tempfile::TempDir;

pub const SAMPLE: &[u8] = include_bytes!("../fixtures/sample.coverprofile");

pub const ROOT: &str = "github.com/acme/svc";

/// Write `contents` as a coverage profile in a fresh temporary directory,
/// returning the dir handle and the profile path.
/// The caller must hold onto `TempDir` to keep the temp directory alive.
pub fn write_profile(contents: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coverage.out");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
