//! ARIA delegation
//!
//! Propagates a host element's `aria-*` attributes across its shadow
//! boundary to descendants that opt in through the `delegatedaria`
//! attribute. Per attribute, the best available strategy wins:
//! reflective property copy, clone-based IDREF fallback, or verbatim
//! attribute copy.

use std::collections::HashMap;

use veil_dom::{
    Document, MutationObserverInit, MutationRecord, MutationType, NodeId, ObserverId,
    PropertyValue,
};

use crate::reflection::{
    attribute_to_property, is_cloneable, is_idref_property, ReflectionSupport,
    CLONEABLE_ATTRIBUTES,
};

/// Attribute a shadow descendant sets to receive delegated values
pub const DELEGATED_ARIA_ATTRIBUTE: &str = "delegatedaria";

const ROLE_ATTRIBUTE: &str = "role";
const ID_ATTRIBUTE: &str = "id";
const STYLE_ATTRIBUTE: &str = "style";
const HIDDEN_STYLE: &str = "display: none;";
const INTERNAL_ID_PREFIX: &str = "delegated-";

/// Delegation configuration errors
#[derive(Debug, thiserror::Error)]
pub enum DelegationError {
    #[error("Unknown ARIA attribute: {0}")]
    UnknownAttribute(String),

    #[error("ARIA attribute {0} has neither reflective property support nor a clone fallback")]
    UnsupportedIdref(String),

    #[error("Delegation target is not a shadow root")]
    NotAShadowRoot,
}

/// Per-shadow-root delegation state
#[derive(Debug, Default)]
struct RootState {
    /// Attribute names this root delegates, in registration order
    attributes: Vec<Box<str>>,
    /// External id -> generated internal id. Entries outlive their
    /// clones, so a reference that reappears gets its old internal id
    /// back.
    idref_map: HashMap<Box<str>, Box<str>>,
}

impl RootState {
    fn delegates(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a.as_ref() == attribute)
    }
}

/// The delegation engine: one shared observer serving every registered
/// shadow root in a document.
#[derive(Debug)]
pub struct AriaDelegation {
    observer: ObserverId,
    support: ReflectionSupport,
    roots: HashMap<NodeId, RootState>,
}

impl AriaDelegation {
    /// Create the engine with the default capability set
    pub fn new(document: &mut Document) -> Self {
        Self::with_support(document, ReflectionSupport::default())
    }

    /// Create the engine with an explicit capability set
    pub fn with_support(document: &mut Document, support: ReflectionSupport) -> Self {
        Self {
            observer: document.register_observer(),
            support,
            roots: HashMap::new(),
        }
    }

    /// Capability set currently assumed for reflective properties
    pub fn support(&self) -> &ReflectionSupport {
        &self.support
    }

    /// Replace the capability set. Strategy selection re-evaluates on
    /// every propagation, so the change applies to the next one.
    pub fn set_support(&mut self, support: ReflectionSupport) {
        self.support = support;
    }

    /// Register a shadow root for delegation of the space-separated
    /// `aria-*` attribute names in `attribute_list`.
    ///
    /// Validates the full list before mutating anything, installs the
    /// write-once `delegates_aria` configuration on the root, wires up
    /// observation of the host and the shadow subtree, and synchronously
    /// propagates to every descendant already carrying `delegatedaria`.
    /// Returns the shadow root id for chaining.
    pub fn delegates_aria(
        &mut self,
        document: &mut Document,
        shadow: NodeId,
        attribute_list: &str,
    ) -> Result<NodeId, DelegationError> {
        let names: Vec<&str> = attribute_list.split_whitespace().collect();
        for name in &names {
            let property = attribute_to_property(name)
                .ok_or_else(|| DelegationError::UnknownAttribute((*name).to_string()))?;
            if is_idref_property(property)
                && !self.support.supports(property)
                && !is_cloneable(name)
            {
                return Err(DelegationError::UnsupportedIdref((*name).to_string()));
            }
        }
        let host = document
            .shadow_host(shadow)
            .ok_or(DelegationError::NotAShadowRoot)?;

        if self.roots.contains_key(&shadow) {
            // Configuration writes after the first are silently
            // ignored, and re-observing would double-dispatch.
            return Ok(shadow);
        }

        document.set_delegates_aria(shadow, attribute_list);
        self.roots.insert(
            shadow,
            RootState {
                attributes: names.iter().map(|n| Box::from(*n)).collect(),
                idref_map: HashMap::new(),
            },
        );
        tracing::debug!("delegating {attribute_list:?} from host {host:?}");

        document.observe(
            self.observer,
            host,
            MutationObserverInit {
                attributes: true,
                attribute_old_value: true,
                attribute_filter: Some(names.iter().map(|n| n.to_string()).collect()),
                ..Default::default()
            },
        );
        document.observe(
            self.observer,
            shadow,
            MutationObserverInit {
                attributes: true,
                attribute_old_value: true,
                attribute_filter: Some(vec![DELEGATED_ARIA_ATTRIBUTE.to_string()]),
                child_list: true,
                subtree: true,
                ..Default::default()
            },
        );

        for child in document.elements_with_attribute(shadow, DELEGATED_ARIA_ATTRIBUTE) {
            let granted = self.requested_attributes(document, shadow, child);
            self.delegate_attributes(document, shadow, child, &granted);
        }
        Ok(shadow)
    }

    /// Synchronously process every queued mutation record, in arrival
    /// order, with the same classification the observer path uses.
    /// Loops until quiescent so records produced while processing
    /// (clone appends and removals) are drained in the same pass.
    pub fn complete_delegation_mutations(&mut self, document: &mut Document) {
        loop {
            let records = document.take_records(self.observer);
            if records.is_empty() {
                break;
            }
            for record in records {
                self.handle_mutation(document, record);
            }
        }
    }

    // --- Dispatch ---

    fn handle_mutation(&mut self, document: &mut Document, record: MutationRecord) {
        match record.mutation_type {
            MutationType::Attributes => {
                if record.attribute_name.as_deref() == Some(DELEGATED_ARIA_ATTRIBUTE) {
                    self.handle_delegated_list_change(document, &record);
                } else {
                    self.handle_host_attribute_change(document, &record);
                }
            }
            MutationType::ChildList => self.handle_child_list_change(document, &record),
        }
    }

    /// A child's `delegatedaria` list changed: revoke attributes no
    /// longer listed, propagate newly listed ones, then collect clones.
    fn handle_delegated_list_change(&mut self, document: &mut Document, record: &MutationRecord) {
        let child = record.target;
        let Some(shadow) = document.containing_shadow_root(child) else {
            return;
        };
        let (revoked, granted) = match self.roots.get(&shadow) {
            Some(state) => {
                let old_value = record.old_value.as_deref().unwrap_or("");
                let old_tokens: Vec<&str> = old_value.split_whitespace().collect();
                let new_tokens: Vec<&str> = document
                    .attribute(child, DELEGATED_ARIA_ATTRIBUTE)
                    .unwrap_or("")
                    .split_whitespace()
                    .collect();
                // Confined to the configured set either way: names
                // outside it were never propagated, so there is nothing
                // to revoke and nothing to grant.
                let revoked: Vec<String> = old_tokens
                    .iter()
                    .filter(|n| !new_tokens.contains(n) && state.delegates(n))
                    .map(|n| (*n).to_string())
                    .collect();
                let granted: Vec<String> = new_tokens
                    .iter()
                    .filter(|n| !old_tokens.contains(n) && state.delegates(n))
                    .map(|n| (*n).to_string())
                    .collect();
                (revoked, granted)
            }
            None => return,
        };

        for name in &revoked {
            tracing::trace!("revoking {name:?} from {child:?}");
            document.remove_attribute(child, name);
            if let Some(property) = attribute_to_property(name) {
                document.clear_property(child, property);
            }
        }
        self.delegate_attributes(document, shadow, child, &granted);
        self.remove_unused_idref_elements(document, shadow);
    }

    /// A delegated attribute changed on a host: re-propagate that one
    /// attribute to every child listing it, then collect clones.
    fn handle_host_attribute_change(&mut self, document: &mut Document, record: &MutationRecord) {
        let host = record.target;
        let Some(shadow) = document.shadow_root(host) else {
            return;
        };
        if !self.roots.contains_key(&shadow) {
            return;
        }
        let Some(name) = record.attribute_name.clone() else {
            return;
        };
        for child in document.elements_with_attribute(shadow, DELEGATED_ARIA_ATTRIBUTE) {
            let listed = document
                .attribute(child, DELEGATED_ARIA_ATTRIBUTE)
                .is_some_and(|v| v.split_whitespace().any(|t| t == name));
            if listed {
                self.delegate_attributes(document, shadow, child, std::slice::from_ref(&name));
            }
        }
        self.remove_unused_idref_elements(document, shadow);
    }

    /// Children were added or removed somewhere inside a shadow tree:
    /// propagate to added delegation targets, then collect clones once
    /// per touched root.
    fn handle_child_list_change(&mut self, document: &mut Document, record: &MutationRecord) {
        let mut touched: Vec<NodeId> = Vec::new();

        for &added in &record.added_nodes {
            if document.attribute(added, DELEGATED_ARIA_ATTRIBUTE).is_none() {
                continue;
            }
            let Some(shadow) = document.containing_shadow_root(added) else {
                continue;
            };
            if !self.roots.contains_key(&shadow) {
                continue;
            }
            let granted = self.requested_attributes(document, shadow, added);
            self.delegate_attributes(document, shadow, added, &granted);
            if !touched.contains(&shadow) {
                touched.push(shadow);
            }
        }

        let removed_target = record
            .removed_nodes
            .iter()
            .any(|&n| document.attribute(n, DELEGATED_ARIA_ATTRIBUTE).is_some());
        if removed_target {
            // Removed nodes are already detached; the record's target
            // still sits in the tree they were removed from.
            if let Some(shadow) = document.containing_shadow_root(record.target) {
                if self.roots.contains_key(&shadow) && !touched.contains(&shadow) {
                    touched.push(shadow);
                }
            }
        }

        for shadow in touched {
            self.remove_unused_idref_elements(document, shadow);
        }
    }

    /// The child's `delegatedaria` tokens intersected with the root's
    /// configured set
    fn requested_attributes(
        &self,
        document: &Document,
        shadow: NodeId,
        child: NodeId,
    ) -> Vec<String> {
        match self.roots.get(&shadow) {
            Some(state) => document
                .attribute(child, DELEGATED_ARIA_ATTRIBUTE)
                .unwrap_or("")
                .split_whitespace()
                .filter(|n| state.delegates(n))
                .map(str::to_owned)
                .collect(),
            None => Vec::new(),
        }
    }

    // --- Propagation ---

    /// Apply the host's current value for each attribute to a child.
    /// Any delegation at all forces the host's role to `presentation`;
    /// that latch is never reverted.
    fn delegate_attributes(
        &mut self,
        document: &mut Document,
        shadow: NodeId,
        child: NodeId,
        names: &[String],
    ) {
        if names.is_empty() {
            return;
        }
        let Some(host) = document.shadow_host(shadow) else {
            return;
        };
        document.set_attribute(host, ROLE_ATTRIBUTE, "presentation");
        for name in names {
            self.delegate_attribute(document, shadow, host, child, name);
        }
    }

    /// Strategy priority: reflective property, clone fallback, verbatim
    /// attribute copy. Re-evaluated on every call.
    fn delegate_attribute(
        &mut self,
        document: &mut Document,
        shadow: NodeId,
        host: NodeId,
        child: NodeId,
        name: &str,
    ) {
        let Some(property) = attribute_to_property(name) else {
            return;
        };
        let value = document.attribute(host, name).map(str::to_owned);

        if self.support.supports(property) {
            match value {
                Some(value) if is_idref_property(property) => {
                    let host_root = document.root_of(host);
                    let refs: Vec<NodeId> = value
                        .split_whitespace()
                        .filter_map(|id| document.get_element_by_id_in(host_root, id))
                        .collect();
                    document.set_property(child, property, PropertyValue::Elements(refs));
                }
                Some(value) => {
                    document.set_property(child, property, PropertyValue::Token(value.into()));
                }
                None => document.clear_property(child, property),
            }
        } else if is_cloneable(name) {
            match value {
                Some(value) => {
                    let external: Vec<String> =
                        value.split_whitespace().map(str::to_owned).collect();
                    let internal = self.clone_idref_elements(document, shadow, &external);
                    document.set_attribute(child, name, &internal.join(" "));
                }
                None => document.remove_attribute(child, name),
            }
        } else {
            match value {
                Some(value) if !value.is_empty() => document.set_attribute(child, name, &value),
                _ => document.remove_attribute(child, name),
            }
        }
    }

    // --- Clone management ---

    /// Clone each externally referenced element into the shadow root,
    /// hidden but queryable, under a generated internal id. Unresolved
    /// ids are skipped. Existing clones are always replaced, never
    /// patched, so the clone mirrors the current source. Returns the
    /// internal ids created, in input order.
    fn clone_idref_elements(
        &mut self,
        document: &mut Document,
        shadow: NodeId,
        external_ids: &[String],
    ) -> Vec<String> {
        let Some(host) = document.shadow_host(shadow) else {
            return Vec::new();
        };
        let host_root = document.root_of(host);
        let mut internal_ids = Vec::new();

        for external in external_ids {
            let Some(source) = document.get_element_by_id_in(host_root, external) else {
                tracing::trace!("unresolved idref {external:?}, skipping");
                continue;
            };
            let internal = self.internal_id_for(document, shadow, external);
            if let Some(stale) = document.get_element_by_id_in(shadow, &internal) {
                document.remove_child(stale);
            }
            let clone = document.clone_subtree(source);
            if !clone.is_valid() {
                continue;
            }
            document.set_attribute(clone, ID_ATTRIBUTE, &internal);
            document.set_attribute(clone, STYLE_ATTRIBUTE, HIDDEN_STYLE);
            document.append_child(shadow, clone);
            tracing::debug!("cloned {external:?} into {shadow:?} as {internal:?}");
            internal_ids.push(internal);
        }
        internal_ids
    }

    /// Obtain the internal id mapped to an external id, generating
    /// `delegated-<external>` (with `-1`, `-2`, ... on collision
    /// against ids already present in the shadow root) on first use.
    fn internal_id_for(&mut self, document: &Document, shadow: NodeId, external: &str) -> String {
        let state = self.roots.entry(shadow).or_default();
        if let Some(existing) = state.idref_map.get(external) {
            return existing.to_string();
        }
        let base = format!("{INTERNAL_ID_PREFIX}{external}");
        let mut candidate = base.clone();
        let mut suffix = 0u32;
        while document.get_element_by_id_in(shadow, &candidate).is_some() {
            suffix += 1;
            candidate = format!("{base}-{suffix}");
        }
        state
            .idref_map
            .insert(Box::from(external), Box::from(candidate.as_str()));
        candidate
    }

    /// Remove clones whose internal id no longer appears in any
    /// cloneable attribute value inside the shadow root. The id map
    /// keeps its entries; only the DOM node goes.
    fn remove_unused_idref_elements(&mut self, document: &mut Document, shadow: NodeId) {
        let Some(state) = self.roots.get(&shadow) else {
            return;
        };
        let unused: Vec<String> = state
            .idref_map
            .values()
            .filter(|internal| !references_internal_id(document, shadow, internal))
            .map(|internal| internal.to_string())
            .collect();

        for internal in unused {
            if let Some(clone) = document.get_element_by_id_in(shadow, &internal) {
                tracing::debug!("removing unreferenced clone {internal:?}");
                document.remove_child(clone);
            }
        }
    }
}

/// Whether any element inside the shadow root still token-references
/// the internal id through a cloneable attribute
fn references_internal_id(document: &Document, shadow: NodeId, internal: &str) -> bool {
    document.tree().descendants(shadow).any(|node| {
        CLONEABLE_ATTRIBUTES.iter().any(|attribute| {
            document
                .attribute(node, attribute)
                .is_some_and(|value| value.split_whitespace().any(|token| token == internal))
        })
    })
}
