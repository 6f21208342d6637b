//! Diagnostic values produced while parsing a document.

use serde::{Deserialize, Serialize};

/// Non-fatal finding reported by the codec or a viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Human-readable description.
    pub message: String,

    /// Id of the element the warning points at, if any.
    pub element: Option<String>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: None,
        }
    }

    pub fn for_element(message: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: Some(element.into()),
        }
    }
}

/// Cross-element reference collected during parsing.
///
/// References are reported as raw id pairs; resolution against the tree is
/// the host's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Id of the element holding the reference.
    pub source: String,

    /// Property the reference was found on.
    pub property: String,

    /// Id of the referenced element.
    pub target: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_roundtrips_through_json() {
        let warning = Warning::for_element("decision has no logic", "decision_1");

        let json = serde_json::to_string(&warning).unwrap();
        let back: Warning = serde_json::from_str(&json).unwrap();

        assert_eq!(back, warning);
    }

    #[test]
    fn test_plain_warning_has_no_element() {
        let warning = Warning::new("dangling reference");
        assert!(warning.element.is_none());
    }
}
