//! Error types for every pipeline stage.

use std::path::PathBuf;

use thiserror::Error;

/// Raised by [`crate::sampler::PageSampler`] before any page is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplingError {
    #[error("mandatory category `{category}` has {available} line(s), {required} required per page")]
    MandatoryCategoryUnavailable {
        category: String,
        available: usize,
        required: usize,
    },

    #[error("cannot fill a page of {requested} line(s): {reason}")]
    UnsatisfiableSamplingConstraints { requested: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to read challenges file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse challenges YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("category `{0}` is defined more than once")]
    DuplicateCategory(String),

    #[error("category name must not be empty")]
    UnnamedCategory,

    #[error("challenge pool is empty")]
    Empty,
}

#[derive(Debug, Error)]
pub enum OdtError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: String },

    #[error("converter reported success but {0} does not exist")]
    MissingOutput(PathBuf),

    #[error("invalid converter input {0}")]
    InvalidInput(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("{0} has no pages")]
    NoPages(PathBuf),

    #[error("base page has no MediaBox")]
    MissingMediaBox,

    #[error("malformed pdf: {0}")]
    Malformed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level pipeline error; each stage's error propagates unchanged.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Odt(#[from] OdtError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error("failed to prepare work directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
