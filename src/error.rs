use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input {path:?}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },
    #[error("failed to decode image {path:?}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("source of {src_rows}x{src_cols} does not fit a {rows}x{cols} target at offset {offset:?}")]
    DoesNotFit {
        src_rows: usize,
        src_cols: usize,
        rows: usize,
        cols: usize,
        offset: (usize, usize),
    },
    #[error("kernel grid needs at least 2 samples per axis, got {0}")]
    InvalidGrid(usize),
    #[error("{path:?} line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
