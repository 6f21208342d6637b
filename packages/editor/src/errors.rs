//! Error types for the editor.

use thiserror::Error;
use viewfinder_model::{ParseError, SerializeError, Warning};

use crate::viewer::OpenError;

#[derive(Error, Debug)]
pub enum EditorError {
    /// Malformed input, including the rewritten "unparsable content"
    /// sub-kind (same error kind, amended message).
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The input is a known older schema version this editor cannot open.
    #[error("unsupported DMN {version} file detected; only DMN 1.3 files can be opened")]
    UnsupportedVersion { version: String },

    /// The document parsed, but nothing in it is displayable.
    #[error("no displayable contents")]
    NoDisplayableContents,

    /// Export requested before any document was imported.
    #[error("no definitions loaded")]
    NoDefinitions,

    /// A viewer failed to open its element.
    #[error(transparent)]
    ViewerOpen(#[from] OpenError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    /// `open` was called with a descriptor not in the current view set.
    #[error("no view {id:?} in current document")]
    ViewNotFound { id: String },

    /// A viewer's clear/detach hook failed. Not expected in practice;
    /// treated as fatal to the requested switch.
    #[error("viewer failure: {0}")]
    Viewer(anyhow::Error),

    /// A lifecycle listener failed on a non-terminal notification.
    #[error("event listener failed: {0}")]
    Listener(anyhow::Error),
}

impl EditorError {
    /// Warnings attached to the underlying failure, if any.
    pub fn warnings(&self) -> &[Warning] {
        match self {
            EditorError::Parse(error) => error.warnings(),
            EditorError::ViewerOpen(error) => error.warnings(),
            _ => &[],
        }
    }
}
