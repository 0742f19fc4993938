//! ARIA reflection tables
//!
//! Static mapping between `aria-*` attributes and their reflective
//! accessibility properties, plus the capability set describing which
//! properties the embedding platform actually reflects.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Reflective accessibility property names, camelCase. ID-reference
/// relationships carry an `Element`/`Elements` suffix.
pub const ARIA_PROPERTIES: &[&str] = &[
    "role",
    "ariaActiveDescendantElement",
    "ariaAtomic",
    "ariaAutoComplete",
    "ariaBrailleLabel",
    "ariaBrailleRoleDescription",
    "ariaBusy",
    "ariaChecked",
    "ariaColCount",
    "ariaColIndex",
    "ariaColIndexText",
    "ariaColSpan",
    "ariaControlsElements",
    "ariaCurrent",
    "ariaDescribedByElements",
    "ariaDescription",
    "ariaDetailsElements",
    "ariaDisabled",
    "ariaErrorMessageElements",
    "ariaExpanded",
    "ariaFlowToElements",
    "ariaHasPopup",
    "ariaHidden",
    "ariaInvalid",
    "ariaKeyShortcuts",
    "ariaLabel",
    "ariaLabelledByElements",
    "ariaLevel",
    "ariaLive",
    "ariaModal",
    "ariaMultiLine",
    "ariaMultiSelectable",
    "ariaOrientation",
    "ariaOwnsElements",
    "ariaPlaceholder",
    "ariaPosInSet",
    "ariaPressed",
    "ariaReadOnly",
    "ariaRelevant",
    "ariaRequired",
    "ariaRoleDescription",
    "ariaRowCount",
    "ariaRowIndex",
    "ariaRowIndexText",
    "ariaRowSpan",
    "ariaSelected",
    "ariaSetSize",
    "ariaSort",
    "ariaValueMax",
    "ariaValueMin",
    "ariaValueNow",
    "ariaValueText",
];

/// Attributes that support the clone-based IDREF fallback
pub const CLONEABLE_ATTRIBUTES: &[&str] = &[
    "aria-describedby",
    "aria-details",
    "aria-errormessage",
    "aria-labelledby",
];

/// kebab-case attribute spelling for a reflective property: strip any
/// `Element`/`Elements` suffix, hyphenate after `aria`, lowercase.
pub fn property_to_attribute(property: &str) -> String {
    let stripped = property
        .strip_suffix("Elements")
        .or_else(|| property.strip_suffix("Element"))
        .unwrap_or(property);
    let hyphenated = match stripped.strip_prefix("aria") {
        Some(rest) => format!("aria-{rest}"),
        None => stripped.to_string(),
    };
    hyphenated.to_ascii_lowercase()
}

static ATTRIBUTE_TO_PROPERTY: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    ARIA_PROPERTIES
        .iter()
        .map(|p| (property_to_attribute(p), *p))
        .collect()
});

/// Resolve an `aria-*` attribute to its reflective property, if known
pub fn attribute_to_property(attribute: &str) -> Option<&'static str> {
    ATTRIBUTE_TO_PROPERTY.get(attribute).copied()
}

/// Whether a property reflects an element-reference relationship
pub fn is_idref_property(property: &str) -> bool {
    property.ends_with("Elements") || property.ends_with("Element")
}

/// Whether an attribute supports the clone fallback
pub fn is_cloneable(attribute: &str) -> bool {
    CLONEABLE_ATTRIBUTES.contains(&attribute)
}

/// Capability set: which reflective properties the platform exposes.
///
/// Strategy selection queries this on every propagation call, so a
/// platform that gains a property between calls upgrades automatically.
#[derive(Debug, Clone)]
pub struct ReflectionSupport {
    supported: HashSet<&'static str>,
}

impl ReflectionSupport {
    /// Every property reflected
    pub fn full() -> Self {
        Self {
            supported: ARIA_PROPERTIES.iter().copied().collect(),
        }
    }

    /// No reflection at all (legacy platforms)
    pub fn none() -> Self {
        Self {
            supported: HashSet::new(),
        }
    }

    /// Everything except the listed properties
    pub fn without(properties: &[&str]) -> Self {
        let mut support = Self::full();
        for property in properties {
            support.remove(property);
        }
        support
    }

    /// Whether the platform reflects a property
    pub fn supports(&self, property: &str) -> bool {
        self.supported.contains(property)
    }

    /// Mark a property as reflected. Unknown names are ignored.
    pub fn add(&mut self, property: &str) {
        if let Some(canonical) = ARIA_PROPERTIES.iter().find(|p| **p == property) {
            self.supported.insert(canonical);
        }
    }

    /// Mark a property as not reflected
    pub fn remove(&mut self, property: &str) {
        self.supported.retain(|p| *p != property);
    }
}

impl Default for ReflectionSupport {
    /// Token properties reflected, IDREF element properties not: the
    /// platform generation the clone fallback exists for
    fn default() -> Self {
        Self {
            supported: ARIA_PROPERTIES
                .iter()
                .copied()
                .filter(|p| !is_idref_property(p))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_attribute_round_trip() {
        for property in ARIA_PROPERTIES {
            let attribute = property_to_attribute(property);
            assert_eq!(
                attribute_to_property(&attribute),
                Some(*property),
                "{attribute} should map back to {property}"
            );
        }
    }

    #[test]
    fn test_known_mappings() {
        assert_eq!(property_to_attribute("ariaLabel"), "aria-label");
        assert_eq!(
            property_to_attribute("ariaLabelledByElements"),
            "aria-labelledby"
        );
        assert_eq!(
            property_to_attribute("ariaActiveDescendantElement"),
            "aria-activedescendant"
        );
        assert_eq!(property_to_attribute("role"), "role");

        assert_eq!(attribute_to_property("aria-haspopup"), Some("ariaHasPopup"));
        assert_eq!(attribute_to_property("aria-not-a-real-attribute"), None);
    }

    #[test]
    fn test_idref_detection() {
        assert!(is_idref_property("ariaLabelledByElements"));
        assert!(is_idref_property("ariaActiveDescendantElement"));
        assert!(!is_idref_property("ariaLabel"));
    }

    #[test]
    fn test_cloneable_set() {
        for attribute in CLONEABLE_ATTRIBUTES {
            assert!(is_cloneable(attribute));
            let property = attribute_to_property(attribute).unwrap();
            assert!(is_idref_property(property));
        }
        assert!(!is_cloneable("aria-owns"));
        assert!(!is_cloneable("aria-label"));
    }

    #[test]
    fn test_support_sets() {
        let default = ReflectionSupport::default();
        assert!(default.supports("ariaLabel"));
        assert!(!default.supports("ariaLabelledByElements"));

        let full = ReflectionSupport::full();
        assert!(full.supports("ariaLabelledByElements"));

        let mut partial = ReflectionSupport::without(&["ariaLabel"]);
        assert!(!partial.supports("ariaLabel"));
        partial.add("ariaLabel");
        assert!(partial.supports("ariaLabel"));
        partial.add("notAProperty");
        assert!(!partial.supports("notAProperty"));
    }
}
