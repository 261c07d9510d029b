use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("invalid coverprofile: {0}")]
    ProfileParse(#[from] ProfileError),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("config file error: {0}")]
    Config(String),
}

/// Reasons a coverage profile could not be decoded.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad mode line: {0:?}")]
    BadModeLine(String),

    #[error("line {line} doesn't match expected format: {content:?}")]
    Malformed { line: usize, content: String },

    #[error("inconsistent NumStmt in {file} at {start_line}.{start_col}: changed from {before} to {after}")]
    InconsistentBlock {
        file: String,
        start_line: u32,
        start_col: u32,
        before: u32,
        after: u32,
    },
}

pub type Result<T> = std::result::Result<T, CoverError>;
