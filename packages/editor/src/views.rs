//! # View Derivation and Selection
//!
//! On every document change the editor recomputes which views exist and
//! which one should stay active, then diffs the outcome against the
//! previous snapshot to decide whether hosts need a `views.changed`
//! notification. Descriptors are value-like snapshots: recomputed, never
//! mutated.

use std::rc::Rc;

use viewfinder_model::{Definitions, Element};

use crate::provider::ProviderRegistry;

/// Host override for the initial-view heuristic: picks an index into the
/// derived set. An out-of-range or `None` pick falls back to "no view".
pub type InitialViewFn = dyn Fn(&[View]) -> Option<usize>;

/// A displayable unit within the document, paired with the provider type
/// that renders it.
#[derive(Clone, Debug)]
pub struct View {
    element: Rc<Element>,
    id: String,
    name: String,
    view_type: String,
}

impl View {
    pub(crate) fn new(element: Rc<Element>, view_type: &str) -> Self {
        Self {
            id: element.id.clone(),
            name: element.display_name().to_string(),
            view_type: view_type.to_string(),
            element,
        }
    }

    /// The document element this view displays. Not owned; replaced by a
    /// fresh reference on every re-parse.
    pub fn element(&self) -> &Rc<Element> {
        &self.element
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the provider that renders this view.
    pub fn view_type(&self) -> &str {
        &self.view_type
    }

    /// Whether two descriptors denote the same view: same element
    /// reference, or, across re-parses where the reference has been
    /// replaced, the same element id. Ids are unique within one parse.
    pub fn is_same(&self, other: &View) -> bool {
        Rc::ptr_eq(&self.element, &other.element) || self.id == other.id
    }

    fn unchanged_in(&self, set: &[View]) -> bool {
        set.iter()
            .any(|other| other.is_same(self) && other.name == self.name)
    }
}

/// Compute the ordered view set for the current document.
///
/// Candidates are the root element followed by its direct children in
/// source order; each is paired with the first provider that opens it.
/// Elements with no matching provider are not displayable and silently
/// dropped.
pub(crate) fn derive_views(
    definitions: Option<&Definitions>,
    registry: &ProviderRegistry,
) -> Vec<View> {
    let Some(definitions) = definitions else {
        return Vec::new();
    };

    std::iter::once(definitions.root())
        .chain(definitions.drg_elements().iter())
        .filter_map(|element| {
            registry
                .find_for(element)
                .map(|provider| View::new(Rc::clone(element), provider.id()))
        })
        .collect()
}

/// Choose the view to keep active after a document change.
///
/// A still-present previous selection survives (matched per
/// [`View::is_same`], so it survives re-parses); otherwise the
/// initial-view heuristic applies: the host override if set, the first
/// entry of the set by default.
pub(crate) fn select_active(
    previous: Option<&View>,
    views: &[View],
    initial: Option<&InitialViewFn>,
) -> Option<View> {
    if let Some(previous) = previous {
        if let Some(found) = views.iter().find(|v| v.is_same(previous)) {
            return Some(found.clone());
        }
    }
    initial_view(views, initial)
}

fn initial_view(views: &[View], initial: Option<&InitialViewFn>) -> Option<View> {
    match initial {
        Some(pick) => pick(views).and_then(|index| views.get(index)).cloned(),
        None => views.first().cloned(),
    }
}

/// Whether hosts must be told the views changed.
///
/// True when the active view identity changed, the active view was
/// renamed, the set's cardinality changed, or any member of the old set
/// is no longer present unchanged (same identity and name) in the new
/// one. Computed even when the active view itself is stable, so renamed
/// or removed sibling views are still observable.
pub(crate) fn views_changed(
    old_views: &[View],
    new_views: &[View],
    old_active: Option<&View>,
    new_active: Option<&View>,
) -> bool {
    match (old_active, new_active) {
        (None, None) => {}
        (Some(old), Some(new)) => {
            if !old.is_same(new) || old.name != new.name {
                return true;
            }
        }
        _ => return true,
    }

    if old_views.len() != new_views.len() {
        return true;
    }

    old_views.iter().any(|old| !old.unchanged_in(new_views))
}
