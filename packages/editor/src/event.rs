//! # Notification Topics and Payloads
//!
//! Every lifecycle milestone of the editor is announced on the
//! notification bus as one of the closed [`Event`] variants. Topic names
//! are stable wire names; hosts subscribe by [`Topic`].
//!
//! Events are observational snapshots: errors ride along as display
//! strings (the typed error reaches the caller through the operation's
//! `Result`), and trees are cheap `Rc`-backed clones. Listeners on the
//! rewritable stages return an [`Override`] to replace the value carried
//! into the next lifecycle step.

use std::fmt;
use std::rc::Rc;

use viewfinder_model::{Definitions, Element, Reference, Warning};

use crate::views::View;

/// Subscription key for the notification bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    ImportParseStart,
    ImportParseComplete,
    ImportDone,
    SaveXmlStart,
    SaveXmlSerialized,
    SaveXmlDone,
    ImportRenderStart,
    ImportRenderComplete,
    ViewsChanged,
    ViewerCreated,
    Attach,
    Detach,
}

impl Topic {
    /// Stable wire name of the topic.
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::ImportParseStart => "import.parse.start",
            Topic::ImportParseComplete => "import.parse.complete",
            Topic::ImportDone => "import.done",
            Topic::SaveXmlStart => "saveXML.start",
            Topic::SaveXmlSerialized => "saveXML.serialized",
            Topic::SaveXmlDone => "saveXML.done",
            Topic::ImportRenderStart => "import.render.start",
            Topic::ImportRenderComplete => "import.render.complete",
            Topic::ViewsChanged => "views.changed",
            Topic::ViewerCreated => "viewer.created",
            Topic::Attach => "attach",
            Topic::Detach => "detach",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered to listeners.
#[derive(Clone, Debug)]
pub enum Event {
    /// Import is about to parse the given text. Rewritable: listeners may
    /// return [`Override::Xml`] to replace the text handed to the codec.
    ImportParseStart { xml: String },

    /// Parsing finished. The id index rides on `definitions`
    /// (`Definitions::elements_by_id`). Rewritable: listeners may return
    /// [`Override::Definitions`] to substitute the tree getting installed.
    ImportParseComplete {
        error: Option<String>,
        definitions: Option<Definitions>,
        references: Vec<Reference>,
        warnings: Vec<Warning>,
    },

    /// Terminal import notification, carrying the combined outcome.
    ImportDone {
        error: Option<String>,
        warnings: Vec<Warning>,
    },

    /// Export is about to serialize. Rewritable: listeners may return
    /// [`Override::Definitions`] to substitute the tree being serialized.
    SaveXmlStart { definitions: Definitions },

    /// Serialization finished. Rewritable: listeners may return
    /// [`Override::Xml`] to replace the produced text.
    SaveXmlSerialized {
        error: Option<String>,
        xml: Option<String>,
    },

    /// Terminal export notification.
    SaveXmlDone {
        error: Option<String>,
        xml: Option<String>,
    },

    /// A viewer is about to open the target view's element.
    ImportRenderStart { view: View, element: Rc<Element> },

    /// The viewer finished opening, successfully or not.
    ImportRenderComplete {
        view: View,
        error: Option<String>,
        warnings: Vec<Warning>,
    },

    /// The derived view set and/or the active view changed. May be
    /// redundant; consumers re-derive their own diff if they need one.
    ViewsChanged {
        views: Vec<View>,
        active_view: Option<View>,
    },

    /// A viewer instance was created for the first time. The live handle
    /// is reachable through `Editor::viewer(viewer_type)`.
    ViewerCreated { viewer_type: String },

    /// The editor was attached to a host surface.
    Attach,

    /// The editor was detached from its host surface.
    Detach,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::ImportParseStart { .. } => Topic::ImportParseStart,
            Event::ImportParseComplete { .. } => Topic::ImportParseComplete,
            Event::ImportDone { .. } => Topic::ImportDone,
            Event::SaveXmlStart { .. } => Topic::SaveXmlStart,
            Event::SaveXmlSerialized { .. } => Topic::SaveXmlSerialized,
            Event::SaveXmlDone { .. } => Topic::SaveXmlDone,
            Event::ImportRenderStart { .. } => Topic::ImportRenderStart,
            Event::ImportRenderComplete { .. } => Topic::ImportRenderComplete,
            Event::ViewsChanged { .. } => Topic::ViewsChanged,
            Event::ViewerCreated { .. } => Topic::ViewerCreated,
            Event::Attach => Topic::Attach,
            Event::Detach => Topic::Detach,
        }
    }
}

/// Replacement value returned by a listener on a rewritable stage.
///
/// `None` from a listener means "no change", never "clear the value"; the
/// last non-`None` override in subscription order wins.
#[derive(Clone, Debug)]
pub enum Override {
    Xml(String),
    Definitions(Definitions),
}
