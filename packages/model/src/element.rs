//! # Document Element Tree
//!
//! A parsed decision-model document is a [`Definitions`] value: a root
//! element plus an id index over the whole tree. Nodes are immutable and
//! shared via `Rc`; editing happens by installing a new tree, never by
//! mutating one in place.

use std::collections::HashMap;
use std::rc::Rc;

/// Kind of decision logic attached to a decision element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionLogic {
    DecisionTable,
    LiteralExpression,
}

/// Closed set of element kinds the model understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// The document root.
    Definitions,

    /// A decision, optionally carrying its logic representation.
    Decision { logic: Option<DecisionLogic> },

    InputData,
    BusinessKnowledgeModel,
    KnowledgeSource,
}

/// One node in the parsed document tree.
#[derive(Debug, PartialEq)]
pub struct Element {
    /// Document-wide unique id (unique within one parse pass).
    pub id: String,

    /// Display name, if the document carries one.
    pub name: Option<String>,

    pub kind: ElementKind,

    /// Direct children in source order.
    pub children: Vec<Rc<Element>>,
}

impl Element {
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Rc<Element>>) -> Self {
        self.children = children;
        self
    }

    /// Stable type tag, used for provider matching.
    pub fn tag(&self) -> &'static str {
        match self.kind {
            ElementKind::Definitions => "definitions",
            ElementKind::Decision { .. } => "decision",
            ElementKind::InputData => "inputData",
            ElementKind::BusinessKnowledgeModel => "businessKnowledgeModel",
            ElementKind::KnowledgeSource => "knowledgeSource",
        }
    }

    /// Name to show for this element, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// The decision logic of this element, if it is a decision carrying one.
    pub fn decision_logic(&self) -> Option<DecisionLogic> {
        match self.kind {
            ElementKind::Decision { logic } => logic,
            _ => None,
        }
    }
}

/// A parsed document: root element plus an id index over the tree.
///
/// Cloning is cheap, the tree is shared rather than copied. Ids are expected to
/// be unique within one parse pass; on duplicates the later element wins
/// the index slot.
#[derive(Clone, Debug)]
pub struct Definitions {
    root: Rc<Element>,
    elements_by_id: HashMap<String, Rc<Element>>,
}

impl Definitions {
    /// Install a root element, indexing the tree by element id.
    pub fn new(root: Element) -> Self {
        let root = Rc::new(root);
        let mut elements_by_id = HashMap::new();
        index(&root, &mut elements_by_id);
        Self {
            root,
            elements_by_id,
        }
    }

    pub fn root(&self) -> &Rc<Element> {
        &self.root
    }

    pub fn id(&self) -> &str {
        &self.root.id
    }

    pub fn name(&self) -> Option<&str> {
        self.root.name.as_deref()
    }

    /// Direct children of the root, in source order.
    pub fn drg_elements(&self) -> &[Rc<Element>] {
        &self.root.children
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Rc<Element>> {
        self.elements_by_id.get(id)
    }

    pub fn elements_by_id(&self) -> &HashMap<String, Rc<Element>> {
        &self.elements_by_id
    }
}

fn index(element: &Rc<Element>, map: &mut HashMap<String, Rc<Element>>) {
    map.insert(element.id.clone(), Rc::clone(element));
    for child in &element.children {
        index(child, map);
    }
}
