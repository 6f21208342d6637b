//! # Codec Seam
//!
//! The parser/serializer for the document format is an external
//! collaborator. This module defines the capability trait it must satisfy
//! and the values exchanged across that boundary. All async work in the
//! system is single-threaded cooperative, so codec futures need not be
//! `Send`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Definitions, Reference, Warning};

/// Serialization choices passed through to the codec.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializeOptions {
    /// Pretty-print the output.
    pub format: bool,
}

/// Everything a successful parse produces.
#[derive(Clone, Debug)]
pub struct ParseOutcome {
    /// The parsed tree. Carries the id index for the whole document.
    pub definitions: Definitions,

    /// Unresolved cross-element references encountered while parsing.
    pub references: Vec<Reference>,

    /// Non-fatal findings.
    pub warnings: Vec<Warning>,
}

/// Parse failure reported by the codec.
///
/// Carried as a message plus the warnings collected before the failure.
/// Codecs signal an unrecognized root element with a message containing
/// `failed to parse document as <dmn:Definitions>`; the editor keys its
/// legacy-version detection off that phrase.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ParseError {
    message: String,
    warnings: Vec<Warning>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(message: impl Into<String>, warnings: Vec<Warning>) -> Self {
        Self {
            message: message.into(),
            warnings,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Serialization failure reported by the codec.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct SerializeError {
    message: String,
}

impl SerializeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Parse/serialize capability consumed by the editor.
#[async_trait(?Send)]
pub trait DocumentCodec {
    /// Parse serialized text into a document tree.
    async fn parse(&self, xml: &str) -> Result<ParseOutcome, ParseError>;

    /// Serialize a document tree back to text.
    async fn serialize(
        &self,
        definitions: &Definitions,
        options: &SerializeOptions,
    ) -> Result<String, SerializeError>;
}
