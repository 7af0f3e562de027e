//! # Child Registry
//!
//! Weak, unordered collection of a coordinator's children. It never keeps a
//! child alive. Entries whose coordinator has been released are compacted
//! out by every lookup pass and by `prune`.

use std::rc::Weak;

use log::debug;

use crate::core::coordinator::{CoordinatorId, CoordinatorRef, FlowTag, Node};

struct ChildEntry {
    id: CoordinatorId,
    tag: FlowTag,
    node: Weak<dyn Node>,
}

impl ChildEntry {
    fn upgrade(&self) -> Option<CoordinatorRef> {
        self.node.upgrade().map(|node| CoordinatorRef { node })
    }
}

#[derive(Default)]
pub struct ChildRegistry {
    entries: Vec<ChildEntry>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, child: &CoordinatorRef) {
        self.entries.push(ChildEntry {
            id: child.id(),
            tag: child.tag(),
            node: child.downgrade_node(),
        });
    }

    /// Number of entries, live or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: CoordinatorId) -> bool {
        self.entries
            .iter()
            .any(|e| e.id == id && e.node.strong_count() > 0)
    }

    /// Live children in insertion order, dropping dead entries on the way.
    pub fn live(&mut self) -> Vec<CoordinatorRef> {
        let mut live = Vec::with_capacity(self.entries.len());
        self.entries.retain(|entry| match entry.upgrade() {
            Some(child) => {
                live.push(child);
                true
            }
            None => false,
        });
        live
    }

    /// The most recently added live child tagged `tag`.
    pub fn find_last(&mut self, tag: FlowTag) -> Option<CoordinatorRef> {
        self.prune();
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.tag == tag)
            .find_map(ChildEntry::upgrade)
    }

    /// Remove entries whose coordinator is gone. Returns how many.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.node.strong_count() > 0);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Pruned {} released child entries", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinator::Coordinator;
    use crate::test_support::{Fixture, Recorder};

    const A: FlowTag = FlowTag::new("a");
    const B: FlowTag = FlowTag::new("b");

    fn coordinator(fx: &Fixture, tag: FlowTag) -> Coordinator<u32> {
        Coordinator::new(&fx.navigator, tag, None, Recorder::<u32>::new().translator())
    }

    #[test]
    fn test_registry_does_not_own_children() {
        let fx = Fixture::new();
        let mut registry = ChildRegistry::new();
        let child = coordinator(&fx, A);
        registry.add(&child.handle());
        assert_eq!(registry.live().len(), 1);

        drop(child);
        assert!(registry.live().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_last_prefers_newest_with_tag() {
        let fx = Fixture::new();
        let mut registry = ChildRegistry::new();
        let first = coordinator(&fx, A);
        let other = coordinator(&fx, B);
        let second = coordinator(&fx, A);
        registry.add(&first.handle());
        registry.add(&other.handle());
        registry.add(&second.handle());

        let found = registry.find_last(A).unwrap();
        assert_eq!(found.id(), second.id());
        assert_eq!(registry.find_last(B).unwrap().id(), other.id());
        assert!(registry.find_last(FlowTag::new("c")).is_none());
    }

    #[test]
    fn test_find_last_skips_and_removes_dead_entries() {
        let fx = Fixture::new();
        let mut registry = ChildRegistry::new();
        let first = coordinator(&fx, A);
        let second = coordinator(&fx, A);
        registry.add(&first.handle());
        registry.add(&second.handle());
        drop(second);

        assert_eq!(registry.find_last(A).unwrap().id(), first.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_prune_counts_removed() {
        let fx = Fixture::new();
        let mut registry = ChildRegistry::new();
        for _ in 0..3 {
            let child = coordinator(&fx, A);
            registry.add(&child.handle());
        }
        let keep = coordinator(&fx, B);
        registry.add(&keep.handle());
        assert_eq!(registry.prune(), 3);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(keep.id()));
    }
}
