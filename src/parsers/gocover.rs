/// Parser for Go's `-coverprofile` format.
///
/// Reference: https://go.dev/blog/cover
///
/// Format:
///   mode: set|count|atomic
///   <file>:<startLine>.<startCol>,<endLine>.<endCol> <numStatements> <count>
///
/// Each line describes a basic block with the number of statements in the
/// block and how many times it was executed. Blocks are grouped per source
/// file; a file may appear on any number of (interleaved) lines.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ProfileError;
use crate::model::{CoverageBlock, Profile};

/// Pre-compiled regex for a single block line.
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$").unwrap()
});

const MODE_PREFIX: &str = "mode: ";

/// Parse the coverage profile at `path`.
pub fn parse_file(path: &Path) -> Result<Vec<Profile>, ProfileError> {
    let file = File::open(path)?;
    parse_reader(&mut BufReader::new(file))
}

/// Parse a coverage profile from raw bytes.
pub fn parse(input: &[u8]) -> Result<Vec<Profile>, ProfileError> {
    parse_reader(&mut &*input)
}

/// Decode every block line, then group, order and merge blocks per file.
///
/// Profiles come back sorted by file name with their blocks sorted by start
/// position.
pub fn parse_reader(reader: &mut dyn BufRead) -> Result<Vec<Profile>, ProfileError> {
    let mut mode: Option<String> = None;
    let mut files: HashMap<String, Profile> = HashMap::new();

    let mut raw_line = String::new();
    let mut line_number = 0usize;
    loop {
        raw_line.clear();
        let n = reader.read_line(&mut raw_line)?;
        if n == 0 {
            break;
        }
        line_number += 1;

        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(mode) = mode.as_deref() else {
            mode = Some(parse_mode_line(line)?);
            continue;
        };

        let (file, block) = parse_block_line(line).ok_or_else(|| ProfileError::Malformed {
            line: line_number,
            content: line.to_string(),
        })?;
        files
            .entry(file.to_string())
            .or_insert_with(|| Profile::new(file.to_string(), mode.to_string()))
            .blocks
            .push(block);
    }

    let mut profiles: Vec<Profile> = files.into_values().collect();
    profiles.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    for profile in &mut profiles {
        merge_duplicate_blocks(profile)?;
    }
    Ok(profiles)
}

/// Validate the `mode: <name>` header and return the mode name.
fn parse_mode_line(line: &str) -> Result<String, ProfileError> {
    match line.strip_prefix(MODE_PREFIX) {
        Some(mode) if !mode.trim().is_empty() => Ok(mode.trim().to_string()),
        _ => Err(ProfileError::BadModeLine(line.to_string())),
    }
}

/// Parse a single block line, returning (file_path, block).
///
/// Format: `<file>:<startLine>.<startCol>,<endLine>.<endCol> <numStmt> <count>`
fn parse_block_line(line: &str) -> Option<(&str, CoverageBlock)> {
    let caps = BLOCK_RE.captures(line)?;
    let file = caps.get(1)?.as_str();
    let number = |i: usize| caps.get(i).map(|m| m.as_str());

    Some((
        file,
        CoverageBlock {
            start_line: number(2)?.parse().ok()?,
            start_col: number(3)?.parse().ok()?,
            end_line: number(4)?.parse().ok()?,
            end_col: number(5)?.parse().ok()?,
            num_stmt: number(6)?.parse().ok()?,
            count: number(7)?.parse().ok()?,
        },
    ))
}

/// Sort blocks by start position and fold blocks recorded more than once
/// (e.g. from merged test binaries) into a single block.
///
/// In `set` mode a merged block is hit if any copy was hit; in `count` and
/// `atomic` mode the counts add up, saturating at `u64::MAX`.
fn merge_duplicate_blocks(profile: &mut Profile) -> Result<(), ProfileError> {
    profile
        .blocks
        .sort_by_key(|b| (b.start_line, b.start_col));

    let set_mode = profile.mode == "set";
    let mut merged: Vec<CoverageBlock> = Vec::with_capacity(profile.blocks.len());
    for block in profile.blocks.drain(..) {
        match merged.last_mut() {
            Some(last) if last.same_range(&block) => {
                if last.num_stmt != block.num_stmt {
                    return Err(ProfileError::InconsistentBlock {
                        file: profile.file_name.clone(),
                        start_line: block.start_line,
                        start_col: block.start_col,
                        before: last.num_stmt,
                        after: block.num_stmt,
                    });
                }
                if set_mode {
                    last.count |= block.count;
                } else {
                    last.count = last.count.saturating_add(block.count);
                }
            }
            _ => merged.push(block),
        }
    }
    profile.blocks = merged;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gocover() {
        let input = b"mode: count\n\
            github.com/user/project/main.go:10.1,12.5 3 5\n\
            github.com/user/project/main.go:14.1,16.5 2 0\n\
            github.com/user/project/util.go:1.1,3.5 1 3\n";
        let profiles = parse(input).unwrap();

        assert_eq!(profiles.len(), 2);

        let main = &profiles[0];
        assert_eq!(main.file_name, "github.com/user/project/main.go");
        assert_eq!(main.mode, "count");
        assert_eq!(main.blocks.len(), 2);
        assert_eq!(main.blocks[0].start_line, 10);
        assert_eq!(main.blocks[0].num_stmt, 3);
        assert_eq!(main.blocks[0].count, 5);
        assert_eq!(main.blocks[1].count, 0);

        let util = &profiles[1];
        assert_eq!(util.file_name, "github.com/user/project/util.go");
        assert_eq!(util.blocks.len(), 1);
    }

    #[test]
    fn test_parse_gocover_empty() {
        assert!(parse(b"").unwrap().is_empty());
        assert!(parse(b"mode: set\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_gocover_bad_mode_line() {
        let err = parse(b"example.com/pkg/f.go:1.1,5.10 2 3\n").unwrap_err();
        assert!(matches!(err, ProfileError::BadModeLine(_)));

        let err = parse(b"mode: \nexample.com/pkg/f.go:1.1,5.10 2 3\n").unwrap_err();
        assert!(matches!(err, ProfileError::BadModeLine(_)));
    }

    #[test]
    fn test_parse_gocover_malformed_line() {
        let input = b"mode: set\n\
            example.com/pkg/f.go:1.1,5.10 2 3\n\
            example.com/pkg/f.go:garbage\n";
        match parse(input).unwrap_err() {
            ProfileError::Malformed { line, content } => {
                assert_eq!(line, 3);
                assert_eq!(content, "example.com/pkg/f.go:garbage");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_gocover_groups_interleaved_files() {
        let input = b"mode: set\n\
            b/x.go:1.1,2.2 1 1\n\
            a/y.go:1.1,2.2 1 0\n\
            b/x.go:4.1,5.2 2 0\n";
        let profiles = parse(input).unwrap();

        let names: Vec<_> = profiles.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["a/y.go", "b/x.go"]);
        assert_eq!(profiles[1].blocks.len(), 2);
    }

    #[test]
    fn test_parse_gocover_sorts_blocks_by_position() {
        let input = b"mode: count\n\
            f.go:20.1,22.2 1 1\n\
            f.go:3.4,5.2 1 1\n\
            f.go:3.1,3.3 1 1\n";
        let profiles = parse(input).unwrap();
        let starts: Vec<_> = profiles[0]
            .blocks
            .iter()
            .map(|b| (b.start_line, b.start_col))
            .collect();
        assert_eq!(starts, vec![(3, 1), (3, 4), (20, 1)]);
    }

    #[test]
    fn test_parse_gocover_merges_duplicates_count_mode() {
        let input = b"mode: count\n\
            f.go:1.1,3.10 2 4\n\
            f.go:1.1,3.10 2 3\n";
        let profiles = parse(input).unwrap();
        assert_eq!(profiles[0].blocks.len(), 1);
        assert_eq!(profiles[0].blocks[0].count, 7);
    }

    #[test]
    fn test_parse_gocover_merged_count_saturates() {
        let input = b"mode: count\n\
            f.go:1.1,2.2 1 18446744073709551615\n\
            f.go:1.1,2.2 1 1\n";
        let profiles = parse(input).unwrap();
        assert_eq!(profiles[0].blocks.len(), 1);
        assert_eq!(profiles[0].blocks[0].count, u64::MAX);
        assert!(profiles[0].blocks[0].is_covered());
    }

    #[test]
    fn test_parse_gocover_merges_duplicates_set_mode() {
        let input = b"mode: set\n\
            f.go:1.1,3.10 2 0\n\
            f.go:1.1,3.10 2 1\n";
        let profiles = parse(input).unwrap();
        assert_eq!(profiles[0].blocks.len(), 1);
        assert_eq!(profiles[0].blocks[0].count, 1);
    }

    #[test]
    fn test_parse_gocover_inconsistent_duplicate() {
        let input = b"mode: set\n\
            f.go:1.1,3.10 2 0\n\
            f.go:1.1,3.10 5 1\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::InconsistentBlock {
                before: 2,
                after: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_block_line() {
        let (file, block) =
            parse_block_line("github.com/user/repo/file.go:10.1,20.5 3 1").unwrap();
        assert_eq!(file, "github.com/user/repo/file.go");
        assert_eq!(block.start_line, 10);
        assert_eq!(block.start_col, 1);
        assert_eq!(block.end_line, 20);
        assert_eq!(block.end_col, 5);
        assert_eq!(block.num_stmt, 3);
        assert_eq!(block.count, 1);
    }

    #[test]
    fn test_parse_block_line_path_with_colon() {
        let (file, _) = parse_block_line("C:/src/pkg/file.go:1.1,2.2 1 0").unwrap();
        assert_eq!(file, "C:/src/pkg/file.go");
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file(Path::new("/nonexistent/coverage.out")).unwrap_err();
        assert!(matches!(err, ProfileError::Io(_)));
    }
}
