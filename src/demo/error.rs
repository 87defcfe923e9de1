//! Error types for reading recordings

use std::path::PathBuf;

use thiserror::Error;

/// Why a single line failed to decode
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown record code `{0}`")]
    UnknownCode(String),
    #[error("record `{code}` is missing field `{field}`")]
    MissingField {
        code: &'static str,
        field: &'static str,
    },
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("invalid position `{0}`")]
    InvalidPosition(String),
    #[error("invalid frame record: {0}")]
    InvalidFrame(#[from] serde_json::Error),
}

/// A recoverable failure on one record; the pass skips it and continues
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: FormatError,
    },
    #[error("line {line}: duplicate session header")]
    DuplicateHeader { line: usize },
    #[error("read failed after line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// A fatal failure while opening or loading a recording
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("recording has no session header")]
    MissingHeader,
    #[error("invalid session header: {0}")]
    InvalidHeader(String),
    #[error("recording contains no decodable frames")]
    NoFrames,
    #[error("no overview calibration for map `{0}`")]
    UnknownMap(String),
}
