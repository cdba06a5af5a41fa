use std::path::PathBuf;

use thiserror::Error;

pub const RC_OK: i32 = 0;
pub const RC_INPUT_FILE_MISSING: i32 = -1;
pub const RC_INVALID_TTASK: i32 = -2;
pub const RC_INVALID_UMAX: i32 = -3;
pub const RC_OUTPUT_FILE: i32 = -4;
pub const RC_INVALID_CONTENT: i32 = -5;

const USAGE_EXIT_CODE: i32 = 2;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input file '{0}' does not exist")]
    InputFileMissing(PathBuf),
    #[error("failed to read input file '{path}': {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid ttask '{0}': expected an integer in 1..=10")]
    InvalidTtask(String),
    #[error("invalid umax '{0}': expected an integer in 1..=10")]
    InvalidUmax(String),
    #[error("failed to create output file '{path}': {source}")]
    OutputCreate {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    OutputWrite(#[from] std::io::Error),
    #[error("invalid content '{line}' at tick {tick}")]
    InvalidContent { tick: u64, line: String },
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

impl Error {
    /// Signed status reported in diagnostics. Errors outside the
    /// input/output taxonomy (config file, argument parsing) have none.
    pub fn return_code(&self) -> Option<i32> {
        match self {
            Error::InputFileMissing(_) | Error::InputRead { .. } => Some(RC_INPUT_FILE_MISSING),
            Error::InvalidTtask(_) => Some(RC_INVALID_TTASK),
            Error::InvalidUmax(_) => Some(RC_INVALID_UMAX),
            Error::OutputCreate { .. } | Error::OutputWrite(_) => Some(RC_OUTPUT_FILE),
            Error::InvalidContent { .. } => Some(RC_INVALID_CONTENT),
            Error::ConfigIo(_)
            | Error::ConfigParse(_)
            | Error::UnsupportedConfigFormat(_)
            | Error::Cli(_) => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.return_code() {
            Some(rc) => rc.abs(),
            None => USAGE_EXIT_CODE,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
