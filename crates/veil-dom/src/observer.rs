//! Mutation observation
//!
//! MutationObserver-style change records. Observers register
//! target-scoped observations with attribute filters; matching records
//! queue per observer in arrival order until drained with
//! `take_records`.

use crate::tree::DomTree;
use crate::NodeId;

/// Observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    fn accepts_attribute(&self, name: &str) -> bool {
        if !self.attributes {
            return false;
        }
        match &self.attribute_filter {
            Some(filter) => filter.iter().any(|f| f.as_str() == name),
            None => true,
        }
    }
}

/// Mutation record
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    ChildList,
}

#[derive(Debug)]
struct Observation {
    target: NodeId,
    options: MutationObserverInit,
}

#[derive(Debug, Default)]
struct ObserverState {
    observations: Vec<Observation>,
    queue: Vec<MutationRecord>,
}

/// Registry of observers for one document
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<ObserverState>,
}

impl ObserverRegistry {
    pub(crate) fn register(&mut self) -> ObserverId {
        let id = ObserverId(self.observers.len() as u32);
        self.observers.push(ObserverState::default());
        id
    }

    /// Add or replace the observation for a target. Re-observing the
    /// same target swaps its options, as `MutationObserver.observe`
    /// does.
    pub(crate) fn observe(
        &mut self,
        observer: ObserverId,
        target: NodeId,
        options: MutationObserverInit,
    ) {
        let Some(state) = self.observers.get_mut(observer.0 as usize) else {
            return;
        };
        for obs in &mut state.observations {
            if obs.target == target {
                obs.options = options;
                return;
            }
        }
        state.observations.push(Observation { target, options });
    }

    /// Drain an observer's queued records, in arrival order
    pub(crate) fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(observer.0 as usize)
            .map(|s| std::mem::take(&mut s.queue))
            .unwrap_or_default()
    }

    pub(crate) fn notify_attribute(
        &mut self,
        tree: &DomTree,
        target: NodeId,
        name: &str,
        old_value: Option<&str>,
    ) {
        for state in &mut self.observers {
            let matched = state.observations.iter().find(|obs| {
                obs.options.accepts_attribute(name) && in_scope(tree, obs, target)
            });
            if let Some(obs) = matched {
                let old = if obs.options.attribute_old_value {
                    old_value.map(str::to_owned)
                } else {
                    None
                };
                state.queue.push(MutationRecord {
                    mutation_type: MutationType::Attributes,
                    target,
                    added_nodes: Vec::new(),
                    removed_nodes: Vec::new(),
                    attribute_name: Some(name.to_string()),
                    old_value: old,
                });
            }
        }
    }

    pub(crate) fn notify_child_list(
        &mut self,
        tree: &DomTree,
        target: NodeId,
        added: &[NodeId],
        removed: &[NodeId],
    ) {
        for state in &mut self.observers {
            let matched = state
                .observations
                .iter()
                .any(|obs| obs.options.child_list && in_scope(tree, obs, target));
            if matched {
                state.queue.push(MutationRecord {
                    mutation_type: MutationType::ChildList,
                    target,
                    added_nodes: added.to_vec(),
                    removed_nodes: removed.to_vec(),
                    attribute_name: None,
                    old_value: None,
                });
            }
        }
    }
}

fn in_scope(tree: &DomTree, obs: &Observation, target: NodeId) -> bool {
    target == obs.target || (obs.options.subtree && tree.is_inclusive_ancestor(obs.target, target))
}
