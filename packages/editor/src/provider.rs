//! # View Providers
//!
//! A provider declares which document elements it can display and how to
//! build the viewer that displays them. The registry is supplied by the
//! host at construction time and read-only afterwards; matching walks the
//! registration order and the first match wins.

use std::fmt;

use viewfinder_model::Element;

use crate::viewer::Viewer;

type ViewerFactory = Box<dyn Fn() -> Box<dyn Viewer>>;

/// What a provider opens: an exact element type tag, or an arbitrary
/// predicate over the element.
pub enum Opens {
    Tag(&'static str),
    Predicate(Box<dyn Fn(&Element) -> bool>),
}

impl Opens {
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Opens::Tag(tag) => element.tag() == *tag,
            Opens::Predicate(predicate) => predicate(element),
        }
    }
}

impl fmt::Debug for Opens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opens::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            Opens::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Registration entry mapping a document-element shape to a viewer
/// factory.
pub struct ViewProvider {
    id: String,
    opens: Opens,
    factory: ViewerFactory,
}

impl ViewProvider {
    pub fn new(
        id: impl Into<String>,
        opens: Opens,
        factory: impl Fn() -> Box<dyn Viewer> + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            opens,
            factory: Box::new(factory),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn opens(&self, element: &Element) -> bool {
        self.opens.matches(element)
    }

    pub(crate) fn create(&self) -> Box<dyn Viewer> {
        (self.factory)()
    }
}

impl fmt::Debug for ViewProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewProvider")
            .field("id", &self.id)
            .field("opens", &self.opens)
            .finish()
    }
}

/// Ordered, read-only provider list.
#[derive(Debug)]
pub struct ProviderRegistry {
    providers: Vec<ViewProvider>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<ViewProvider>) -> Self {
        Self { providers }
    }

    /// First provider (in registration order) that opens `element`.
    pub fn find_for(&self, element: &Element) -> Option<&ViewProvider> {
        self.providers.iter().find(|p| p.opens(element))
    }

    /// Provider with the given id.
    ///
    /// # Panics
    ///
    /// Panics when no provider with that id is registered. Requesting an
    /// unknown view type is a programmer error in the host's setup, not a
    /// runtime condition to recover from.
    pub fn by_id(&self, id: &str) -> &ViewProvider {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .unwrap_or_else(|| panic!("no provider registered for view type {id:?}"))
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
