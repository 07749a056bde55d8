use miette::Diagnostic;
use thiserror::Error;

/// Main error type for spritecut operations.
///
/// Only conditions that make further work impossible live here. Heuristic
/// problems (noise, merged blobs, unexpected frame counts, degenerate flood
/// fill seeds) are reported through [`crate::report::Report`] instead.
#[derive(Error, Diagnostic, Debug)]
pub enum CutError {
    #[error("IO error: {0}")]
    #[diagnostic(code(spritecut::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(spritecut::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Failed to decode {path}: {message}")]
    #[diagnostic(
        code(spritecut::decode),
        help("The input must be a readable image (PNG, JPEG, ...)")
    )]
    Decode {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(spritecut::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(spritecut::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(spritecut::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, CutError>;
