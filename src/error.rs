use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed JSON, or a `type` outside the supported set.
    #[error("failed to decode schema `{reference}` at JSON path {path}: {message}")]
    Decode {
        reference: String,
        path: String,
        message: String,
    },

    #[error("failed to read schema file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    /// A tree reached the synthesizer in a shape the earlier passes should have ruled out.
    #[error("cannot synthesize type: {0}")]
    Synthesis(String),
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("invalid reference point `{reference}` in `{document}`: references must name a file")]
    MissingDocument { document: String, reference: String },

    #[error(
        "invalid reference file `{target}` in `{document}`: make sure the referenced file is in the processing list"
    )]
    UnknownDocument { document: String, target: String },

    #[error("reference `{reference}` in `{document}` points at missing component `{segment}`")]
    MissingPath {
        document: String,
        reference: String,
        segment: String,
    },

    #[error("reference `{reference}` in `{document}` cannot step into `{segment}` here")]
    InvalidSegment {
        document: String,
        reference: String,
        segment: String,
    },

    #[error("reference `{reference}` in `{document}` does not point at a schema")]
    NotASchema { document: String, reference: String },

    #[error("reference cycle in `{document}`: {}", .chain.join(" -> "))]
    Cycle { document: String, chain: Vec<String> },
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("formatter `{command}` failed: {message}")]
    Formatter { command: String, message: String },
}
