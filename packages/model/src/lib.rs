//! # Viewfinder Model
//!
//! Data model for decision-model documents.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ codec (external): text ⇄ Definitions        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: element tree + identities            │
//! │  - Definitions root with indexed elements   │
//! │  - Closed element/logic kinds               │
//! │  - Parse warnings and references            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: view derivation + switching         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The codec itself is an external collaborator: this crate only defines
//! the [`DocumentCodec`] capability trait and the values flowing across
//! that seam. The tree is replaced wholesale on every successful parse;
//! nodes are shared via `Rc`, so reference identity distinguishes elements
//! from the same parse pass while ids identify elements across passes.

mod codec;
mod element;
mod warnings;

pub use codec::{DocumentCodec, ParseError, ParseOutcome, SerializeError, SerializeOptions};
pub use element::{DecisionLogic, Definitions, Element, ElementKind};
pub use warnings::{Reference, Warning};
