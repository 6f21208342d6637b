//! # Multi-View Editor
//!
//! [`Editor`] is the document controller: it owns the codec seam, the
//! notification bus, the provider registry, the viewer instance pool and
//! the current document/view state, and it runs the import → derive →
//! select → switch lifecycle.
//!
//! ## Switch state machine
//!
//! ```text
//! Idle ──switch(V)──▶ Detaching ──▶ Opening ──▶ Settled
//!            │        (old viewer,   (new viewer    (resolve /
//!            │         only if it     open(elem))    reject)
//!            │         differs)
//!            └─ target none: straight to Settled (empty success)
//! ```
//!
//! The active-view pointer is assigned *before* the new viewer's `open`
//! completes. That eager assignment is a deliberate eventual-consistency
//! contract: hosts reading the "currently selected view" during a pending
//! switch see the requested target, while the visual attach is still in
//! flight. `views.changed` fires at that point and again at settlement,
//! so subscribers must treat notifications as potentially redundant.
//!
//! All async entry points take `&mut self`: two requests on one editor
//! cannot overlap, which makes each switch atomic from the caller's
//! perspective. Dropping a returned future mid-flight is the one way to
//! abandon a switch half-way and is not supported.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use viewfinder_model::{
    Definitions, DocumentCodec, ParseError, ParseOutcome, SerializeOptions, Warning,
};

use crate::bus::{EventBus, ListenerResult, SubscriptionId};
use crate::errors::EditorError;
use crate::event::{Event, Override, Topic};
use crate::provider::{ProviderRegistry, ViewProvider};
use crate::viewer::{Surface, Viewer};
use crate::views::{self, InitialViewFn, View};

/// Namespace signatures of document versions this editor cannot open.
const DMN11_URI: &str = "http://www.omg.org/spec/DMN/20151101/dmn.xsd";
const DMN12_URI: &str = "http://www.omg.org/spec/DMN/20180521/MODEL/";

/// Codec message fragment signalling an unrecognized root element.
const ROOT_MISMATCH: &str = "failed to parse document as <dmn:Definitions>";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Switch to the selected view after installing the document. With
    /// `open: false` the import is parse-only: views are derived and the
    /// active-view pointer re-resolved, but no viewer is touched.
    pub open: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { open: true }
    }
}

/// Multi-view document controller.
pub struct Editor {
    codec: Box<dyn DocumentCodec>,
    bus: EventBus,
    registry: ProviderRegistry,

    /// At most one lazily-created viewer per provider id, reused across
    /// switches and destroyed only on teardown.
    viewers: HashMap<String, Box<dyn Viewer>>,

    definitions: Option<Definitions>,
    views: Vec<View>,
    active_view: Option<View>,

    /// Provider id of the viewer currently holding the stage (opened, and
    /// attached whenever a surface is present).
    current_viewer: Option<String>,
    surface: Option<Surface>,

    initial_view: Option<Box<InitialViewFn>>,
}

impl Editor {
    pub fn new(codec: Box<dyn DocumentCodec>, providers: Vec<ViewProvider>) -> Self {
        Self {
            codec,
            bus: EventBus::new(),
            registry: ProviderRegistry::new(providers),
            viewers: HashMap::new(),
            definitions: None,
            views: Vec::new(),
            active_view: None,
            current_viewer: None,
            surface: None,
            initial_view: None,
        }
    }

    /// Override the initial-view heuristic (default: first derived view).
    pub fn with_initial_view(
        mut self,
        pick: impl Fn(&[View]) -> Option<usize> + 'static,
    ) -> Self {
        self.initial_view = Some(Box::new(pick));
        self
    }

    // --- subscriptions -----------------------------------------------------

    pub fn on(
        &mut self,
        topic: Topic,
        listener: impl FnMut(&Event) -> ListenerResult + 'static,
    ) -> SubscriptionId {
        self.bus.on(topic, listener)
    }

    pub fn on_priority(
        &mut self,
        topic: Topic,
        priority: i32,
        listener: impl FnMut(&Event) -> ListenerResult + 'static,
    ) -> SubscriptionId {
        self.bus.on_priority(topic, priority, listener)
    }

    pub fn once(
        &mut self,
        topic: Topic,
        listener: impl FnMut(&Event) -> ListenerResult + 'static,
    ) -> SubscriptionId {
        self.bus.once(topic, listener)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.bus.off(id)
    }

    // --- state accessors ---------------------------------------------------

    /// The current view set, in derivation order.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// The view currently shown, or none. During a pending switch this
    /// already points at the requested target (see module docs).
    pub fn active_view(&self) -> Option<&View> {
        self.active_view.as_ref()
    }

    pub fn definitions(&self) -> Option<&Definitions> {
        self.definitions.as_ref()
    }

    /// The pooled viewer for a view type, if one has been created yet.
    pub fn viewer(&self, view_type: &str) -> Option<&dyn Viewer> {
        self.viewers.get(view_type).map(|viewer| viewer.as_ref())
    }

    // --- import ------------------------------------------------------------

    /// Import serialized document text.
    ///
    /// Fires `import.parse.start` (listeners may rewrite the text), parses
    /// via the codec, fires `import.parse.complete` (listeners may
    /// substitute the tree), installs the tree, recomputes views and,
    /// unless [`ImportOptions::open`] is false, switches to the selected
    /// view. A single terminal `import.done` carries the combined error
    /// and the union of parse and render warnings.
    pub async fn import_xml(
        &mut self,
        xml: &str,
        options: ImportOptions,
    ) -> Result<Vec<Warning>, EditorError> {
        tracing::debug!(bytes = xml.len(), "importing document");

        let xml = match self.emit(&Event::ImportParseStart {
            xml: xml.to_string(),
        })? {
            Some(Override::Xml(replaced)) => replaced,
            _ => xml.to_string(),
        };

        let outcome = match self.codec.parse(&xml).await {
            Ok(outcome) => outcome,
            Err(error) => {
                let error = rewrite_parse_error(error, &xml);
                let warnings = error.warnings().to_vec();
                self.emit(&Event::ImportParseComplete {
                    error: Some(error.to_string()),
                    definitions: None,
                    references: Vec::new(),
                    warnings: warnings.clone(),
                })?;
                self.finish_import(Some(&error), warnings);
                return Err(error);
            }
        };

        let ParseOutcome {
            definitions,
            references,
            warnings: parse_warnings,
        } = outcome;

        let definitions = match self.emit(&Event::ImportParseComplete {
            error: None,
            definitions: Some(definitions.clone()),
            references,
            warnings: parse_warnings.clone(),
        })? {
            Some(Override::Definitions(replaced)) => replaced,
            _ => definitions,
        };

        self.definitions = Some(definitions);
        self.recompute_views()?;

        if !options.open {
            self.bus.emit_logged(&Event::ImportDone {
                error: None,
                warnings: parse_warnings.clone(),
            });
            return Ok(parse_warnings);
        }

        let target = self.active_view.clone();
        if target.is_none() && self.views.is_empty() {
            let error = EditorError::NoDisplayableContents;
            self.finish_import(Some(&error), parse_warnings);
            return Err(error);
        }

        match self.switch_to(target).await {
            Ok(render_warnings) => {
                let mut warnings = parse_warnings;
                warnings.extend(render_warnings);
                self.finish_import(None, warnings.clone());
                Ok(warnings)
            }
            Err(error) => {
                let mut warnings = parse_warnings;
                warnings.extend(error.warnings().iter().cloned());
                self.finish_import(Some(&error), warnings);
                Err(error)
            }
        }
    }

    /// Terminal `import.done` notification; listener failures here are
    /// logged, never allowed to mask the import's own outcome.
    fn finish_import(&mut self, error: Option<&EditorError>, warnings: Vec<Warning>) {
        match error {
            None => tracing::debug!(warnings = warnings.len(), "import done"),
            Some(error) => tracing::debug!(error = %error, "import failed"),
        }
        self.bus.emit_logged(&Event::ImportDone {
            error: error.map(EditorError::to_string),
            warnings,
        });
    }

    // --- export ------------------------------------------------------------

    /// Serialize the current document back to text.
    ///
    /// Fails with [`EditorError::NoDefinitions`] before any event fires
    /// when nothing was imported. Listeners on `saveXML.start` may
    /// substitute the tree to serialize; listeners on `saveXML.serialized`
    /// may rewrite the produced text. Listener failures during those and
    /// the terminal `saveXML.done` are logged, never propagated.
    pub async fn save_xml(&mut self, options: SerializeOptions) -> Result<String, EditorError> {
        let Some(definitions) = self.definitions.clone() else {
            return Err(EditorError::NoDefinitions);
        };

        let definitions = match self.emit(&Event::SaveXmlStart {
            definitions: definitions.clone(),
        })? {
            Some(Override::Definitions(replaced)) => replaced,
            _ => definitions,
        };

        match self.codec.serialize(&definitions, &options).await {
            Ok(xml) => {
                let xml = match self.bus.emit_logged(&Event::SaveXmlSerialized {
                    error: None,
                    xml: Some(xml.clone()),
                }) {
                    Some(Override::Xml(replaced)) => replaced,
                    _ => xml,
                };
                self.bus.emit_logged(&Event::SaveXmlDone {
                    error: None,
                    xml: Some(xml.clone()),
                });
                Ok(xml)
            }
            Err(error) => {
                self.bus.emit_logged(&Event::SaveXmlSerialized {
                    error: Some(error.to_string()),
                    xml: None,
                });
                self.bus.emit_logged(&Event::SaveXmlDone {
                    error: Some(error.to_string()),
                    xml: None,
                });
                Err(EditorError::Serialize(error))
            }
        }
    }

    // --- view switching ----------------------------------------------------

    /// Switch to a specific view of the current document.
    ///
    /// The descriptor is matched against the current set (same element or
    /// same id); unknown descriptors are rejected with
    /// [`EditorError::ViewNotFound`].
    pub async fn open(&mut self, view: &View) -> Result<Vec<Warning>, EditorError> {
        let target = self
            .views
            .iter()
            .find(|candidate| candidate.is_same(view))
            .cloned()
            .ok_or_else(|| EditorError::ViewNotFound {
                id: view.id().to_string(),
            })?;

        self.switch_to(Some(target)).await
    }

    /// Recompute the view set and re-resolve the active-view pointer
    /// against it, e.g. after host code mutated the document between
    /// switches. Fires `views.changed` when the outcome differs; does not
    /// touch any viewer.
    pub fn refresh_views(&mut self) -> Result<(), EditorError> {
        self.recompute_views()
    }

    /// The switch orchestrator. Processes one switch to completion:
    /// detach the old viewer (only if it differs from the new one),
    /// eagerly record the target as active, attach/open the new viewer,
    /// settle with warnings or the open failure.
    async fn switch_to(&mut self, target: Option<View>) -> Result<Vec<Warning>, EditorError> {
        let new_type = target.as_ref().map(|view| view.view_type().to_string());

        // Create the target viewer up front so creation failures (unknown
        // provider) surface before the old viewer is torn down.
        if let Some(view_type) = new_type.as_deref() {
            self.ensure_viewer(view_type)?;
        }

        let viewer_changed = self.current_viewer != new_type;
        if viewer_changed {
            if let Some(old_type) = self.current_viewer.take() {
                if let Some(viewer) = self.viewers.get_mut(&old_type) {
                    viewer.clear().map_err(EditorError::Viewer)?;
                    viewer.detach().map_err(EditorError::Viewer)?;
                }
            }
        }

        // Eager assignment: the pointer moves before open() resolves.
        let previous = std::mem::replace(&mut self.active_view, target.clone());
        let identity_changed = match (previous.as_ref(), target.as_ref()) {
            (Some(old), Some(new)) => !old.is_same(new),
            (None, None) => false,
            _ => true,
        };
        if identity_changed {
            self.emit_views_changed()?;
        }

        let result = match target {
            Some(view) => {
                let view_type = view.view_type().to_string();
                if viewer_changed {
                    if let Some(surface) = self.surface.clone() {
                        self.viewers
                            .get_mut(&view_type)
                            .expect("viewer created above")
                            .attach_to(&surface);
                    }
                    self.current_viewer = Some(view_type.clone());
                }

                self.emit(&Event::ImportRenderStart {
                    view: view.clone(),
                    element: view.element().clone(),
                })?;

                let opened = self
                    .viewers
                    .get_mut(&view_type)
                    .expect("viewer created above")
                    .open(view.element().clone())
                    .await;

                match opened {
                    Ok(warnings) => {
                        self.emit(&Event::ImportRenderComplete {
                            view: view.clone(),
                            error: None,
                            warnings: warnings.clone(),
                        })?;
                        Ok(warnings)
                    }
                    Err(error) => {
                        self.emit(&Event::ImportRenderComplete {
                            view: view.clone(),
                            error: Some(error.to_string()),
                            warnings: error.warnings().to_vec(),
                        })?;
                        Err(EditorError::ViewerOpen(error))
                    }
                }
            }
            None => Ok(Vec::new()),
        };

        // Settlement notification, redundant or not.
        self.emit_views_changed()?;
        result
    }

    // --- attachment and teardown -------------------------------------------

    /// Attach the editor (and its current viewer) to a host surface.
    pub fn attach_to(&mut self, surface: Surface) -> Result<(), EditorError> {
        self.surface = Some(surface.clone());
        if let Some(view_type) = self.current_viewer.clone() {
            if let Some(viewer) = self.viewers.get_mut(&view_type) {
                viewer.attach_to(&surface);
            }
        }
        self.emit(&Event::Attach)?;
        Ok(())
    }

    /// Detach the editor from its host surface, if attached.
    pub fn detach(&mut self) -> Result<(), EditorError> {
        if self.surface.take().is_none() {
            return Ok(());
        }
        if let Some(view_type) = self.current_viewer.clone() {
            if let Some(viewer) = self.viewers.get_mut(&view_type) {
                viewer.detach().map_err(EditorError::Viewer)?;
            }
        }
        self.emit(&Event::Detach)?;
        Ok(())
    }

    /// Tear the editor down: detach and destroy every pooled viewer and
    /// drop all document state. Viewer failures during teardown are
    /// logged, not propagated.
    pub fn destroy(&mut self) {
        for (view_type, viewer) in self.viewers.iter_mut() {
            if let Err(error) = viewer.detach() {
                tracing::warn!(view_type = %view_type, error = %error, "viewer detach failed during destroy");
            }
            viewer.destroy();
        }
        self.viewers.clear();
        self.current_viewer = None;
        self.surface = None;
        self.active_view = None;
        self.views.clear();
        self.definitions = None;
    }

    // --- internals ---------------------------------------------------------

    fn emit(&mut self, event: &Event) -> Result<Option<Override>, EditorError> {
        self.bus.emit(event).map_err(EditorError::Listener)
    }

    fn emit_views_changed(&mut self) -> Result<(), EditorError> {
        self.emit(&Event::ViewsChanged {
            views: self.views.clone(),
            active_view: self.active_view.clone(),
        })?;
        Ok(())
    }

    /// Derive the view set from the current document and re-resolve the
    /// active-view pointer, firing `views.changed` when the outcome
    /// differs from the previous snapshot.
    fn recompute_views(&mut self) -> Result<(), EditorError> {
        let new_views = views::derive_views(self.definitions.as_ref(), &self.registry);
        let previous_active = self.active_view.take();
        let next_active = views::select_active(
            previous_active.as_ref(),
            &new_views,
            self.initial_view.as_deref(),
        );

        let changed = views::views_changed(
            &self.views,
            &new_views,
            previous_active.as_ref(),
            next_active.as_ref(),
        );

        self.views = new_views;
        self.active_view = next_active;

        if changed {
            self.emit_views_changed()?;
        }
        Ok(())
    }

    /// Fill the pool slot for a view type, announcing the first creation.
    fn ensure_viewer(&mut self, view_type: &str) -> Result<(), EditorError> {
        if self.viewers.contains_key(view_type) {
            return Ok(());
        }

        let viewer = self.registry.by_id(view_type).create();
        self.viewers.insert(view_type.to_string(), viewer);
        tracing::debug!(view_type, "viewer created");
        self.emit(&Event::ViewerCreated {
            viewer_type: view_type.to_string(),
        })?;
        Ok(())
    }
}

/// Special-case parse failures before they reach the caller.
///
/// A root-element mismatch on text carrying a known older namespace
/// becomes a descriptive unsupported-version error (the original error is
/// logged and discarded). An "unparsable content" message gets contextual
/// guidance appended. Anything else passes through unchanged.
fn rewrite_parse_error(error: ParseError, xml: &str) -> EditorError {
    if error.message().contains(ROOT_MISMATCH) {
        let version = if xml.contains(DMN11_URI) {
            Some("1.1")
        } else if xml.contains(DMN12_URI) {
            Some("1.2")
        } else {
            None
        };
        if let Some(version) = version {
            tracing::warn!(error = %error, version, "discarding parse error for legacy document");
            return EditorError::UnsupportedVersion {
                version: version.to_string(),
            };
        }
    }

    static UNPARSABLE: OnceLock<Regex> = OnceLock::new();
    let pattern = UNPARSABLE.get_or_init(|| {
        Regex::new(r"unparsable content <([^>]+)> detected").expect("static pattern")
    });
    if let Some(captures) = pattern.captures(error.message()) {
        let rewritten = format!(
            "unparsable content <{}> detected; this may indicate an invalid DMN file",
            &captures[1]
        );
        return EditorError::Parse(ParseError::with_warnings(
            rewritten,
            error.warnings().to_vec(),
        ));
    }

    EditorError::Parse(error)
}
