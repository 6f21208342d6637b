//! # Viewfinder Editor
//!
//! Multi-view document controller for decision-model documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ codec (external): text ⇄ Definitions        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: multi-view controller               │
//! │  - Derive displayable views from the tree   │
//! │  - Keep exactly one view active             │
//! │  - Async viewer switching with cleanup      │
//! │  - Lifecycle notifications + hook chain     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ viewers (external): render/edit one type    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is installed, never patched**: every successful parse
//!    replaces the document wholesale; views are recomputed snapshots
//! 2. **One active view**: never transiently two; the pointer moves
//!    eagerly at switch start and is re-resolved on every recomputation
//! 3. **Viewers are pooled per type**: created lazily on first use,
//!    reused across switches, destroyed only on teardown
//! 4. **Notifications may be redundant**: subscribers re-derive their own
//!    diffs instead of treating `views.changed` as an edge trigger
//!
//! ## Usage
//!
//! ```rust,ignore
//! use viewfinder_editor::{Editor, ImportOptions, Opens, Topic, ViewProvider};
//!
//! let mut editor = Editor::new(
//!     Box::new(codec),
//!     vec![
//!         ViewProvider::new("drd", Opens::Tag("definitions"), || Box::new(DrdViewer::new())),
//!         ViewProvider::new("decisionTable", Opens::Predicate(Box::new(is_table)), || {
//!             Box::new(TableViewer::new())
//!         }),
//!     ],
//! );
//!
//! editor.on(Topic::ViewsChanged, |event| {
//!     // react to view set / active view updates
//!     Ok(None)
//! });
//!
//! let warnings = editor.import_xml(&xml, ImportOptions::default()).await?;
//! let table_view = editor.views()[1].clone();
//! editor.open(&table_view).await?;
//! let xml = editor.save_xml(Default::default()).await?;
//! ```

mod bus;
mod editor;
mod errors;
mod event;
mod provider;
mod viewer;
mod views;

pub use bus::{EventBus, ListenerResult, SubscriptionId, DEFAULT_PRIORITY};
pub use editor::{Editor, ImportOptions};
pub use errors::EditorError;
pub use event::{Event, Override, Topic};
pub use provider::{Opens, ProviderRegistry, ViewProvider};
pub use viewer::{OpenError, Surface, Viewer};
pub use views::{InitialViewFn, View};

// Re-export the model types flowing through the public API.
pub use viewfinder_model::{
    DecisionLogic, Definitions, DocumentCodec, Element, ElementKind, ParseError, ParseOutcome,
    Reference, SerializeError, SerializeOptions, Warning,
};
