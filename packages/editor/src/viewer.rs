//! # Viewer Capability
//!
//! A viewer is a stateful renderer/editor instance for one view type,
//! owned by the editor's instance pool and reused across every view of
//! that type. The editor drives it through this trait; the concrete
//! rendering surface behind it is host code.

use std::any::Any;
use std::rc::Rc;

use async_trait::async_trait;
use thiserror::Error;
use viewfinder_model::{Element, Warning};

/// Opaque host attachment target, handed through to viewers untouched.
pub type Surface = Rc<dyn Any>;

/// Failure to open an element in a viewer. Carries the warnings the
/// viewer collected before giving up.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct OpenError {
    message: String,
    warnings: Vec<Warning>,
}

impl OpenError {
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

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Renderer/editor instance for one view type.
///
/// `open` is the only suspend point; attach/detach/clear/destroy are
/// synchronous surface bookkeeping. `clear` and `destroy` are optional;
/// the defaults do nothing, matching viewers that have no per-switch
/// state to drop.
#[async_trait(?Send)]
pub trait Viewer {
    /// Render the given element into this viewer.
    async fn open(&mut self, element: Rc<Element>) -> Result<Vec<Warning>, OpenError>;

    /// Attach the viewer's rendering root to the host surface.
    fn attach_to(&mut self, surface: &Surface);

    /// Remove the viewer's rendering root from wherever it is attached.
    /// Must tolerate being called when not attached.
    fn detach(&mut self) -> anyhow::Result<()>;

    /// Drop per-document state before the viewer is put aside. Failures
    /// propagate fatally to whoever requested the switch.
    fn clear(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release resources for good. Called once, on editor teardown.
    fn destroy(&mut self) {}
}
