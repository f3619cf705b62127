//! Constraints and the per-view constraint store
//!
//! A constraint relates a source anchor to an optional target anchor with a
//! multiplier, an additive constant, and a priority. No target means the
//! source attribute equals the constant directly. Each view keeps its
//! constraints partitioned into four lists, one per resolution slot, sorted
//! lazily by descending priority.

use crate::anchor::{Anchor, Slot};
use crate::tree::ViewId;

/// Conflict-resolution priority. Higher priorities are tried first; the first
/// constraint whose formula fully resolves wins outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Trivial,
    Low,
    Default,
    High,
    Required,
}

/// A directed relation from one anchor to an optional target anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub source: Anchor,
    pub target: Option<Anchor>,
    /// Only meaningful for size constraints; location constraints keep 1.0
    pub multiplier: f32,
    pub constant: f32,
    pub priority: Priority,
}

impl Constraint {
    /// `source = target` (offset 0, default priority)
    pub fn equal(source: Anchor, target: Anchor) -> Self {
        Self::offset(source, 0.0, target)
    }

    /// `source = target + constant`.
    ///
    /// For trailing/bottom source anchors the constant measures an inset: the
    /// source edge sits `constant` inside the target point.
    pub fn offset(source: Anchor, constant: f32, target: Anchor) -> Self {
        Self {
            source,
            target: Some(target),
            multiplier: 1.0,
            constant,
            priority: Priority::Default,
        }
    }

    /// `source = constant` (absolute, no target)
    pub fn fixed(source: Anchor, constant: f32) -> Self {
        Self {
            source,
            target: None,
            multiplier: 1.0,
            constant,
            priority: Priority::Default,
        }
    }

    /// `source = target * multiplier + constant` (size anchors)
    pub fn scaled(source: Anchor, target: Anchor, multiplier: f32, constant: f32) -> Self {
        Self {
            source,
            target: Some(target),
            multiplier,
            constant,
            priority: Priority::Default,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// The resolution slot this constraint feeds
    pub fn slot(&self) -> Slot {
        self.source.slot()
    }
}

/// Per-view collection of constraints, one list per resolution slot
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore {
    lists: [Vec<Constraint>; 4],
    needs_sorting: bool,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constraints feeding the given slot, in storage order.
    ///
    /// Call `sort_if_needed` first to get priority order.
    pub fn list(&self, slot: Slot) -> &[Constraint] {
        &self.lists[slot.index()]
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.lists[constraint.slot().index()].push(constraint);
        self.needs_sorting = true;
    }

    /// Remove every constraint feeding the given slot
    pub fn remove_all(&mut self, slot: Slot) {
        self.lists[slot.index()].clear();
    }

    /// Remove every constraint in all four lists
    pub fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    /// Every view targeted by any constraint in any list
    pub fn targets(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.lists
            .iter()
            .flatten()
            .filter_map(|constraint| constraint.target.map(|anchor| anchor.view))
    }

    /// Stable sort each list by descending priority. Lazy: does nothing
    /// unless a push dirtied the store, so declaration order is preserved
    /// within a priority band.
    pub fn sort_if_needed(&mut self) {
        if !self.needs_sorting {
            return;
        }
        for list in &mut self.lists {
            list.sort_by(|a, b| b.priority.cmp(&a.priority));
        }
        self.needs_sorting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(raw: usize) -> ViewId {
        ViewId::from_raw(raw)
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Required > Priority::High);
        assert!(Priority::High > Priority::Default);
        assert!(Priority::Default > Priority::Low);
        assert!(Priority::Low > Priority::Trivial);
    }

    #[test]
    fn test_push_partitions_by_slot() {
        let mut store = ConstraintStore::new();
        store.push(Constraint::fixed(Anchor::leading(view(0)), 5.0));
        store.push(Constraint::fixed(Anchor::top(view(0)), 6.0));
        store.push(Constraint::fixed(Anchor::width(view(0)), 7.0));
        store.push(Constraint::fixed(Anchor::height(view(0)), 8.0));

        assert_eq!(store.list(Slot::X).len(), 1);
        assert_eq!(store.list(Slot::Y).len(), 1);
        assert_eq!(store.list(Slot::WIDTH).len(), 1);
        assert_eq!(store.list(Slot::HEIGHT).len(), 1);
        assert_eq!(store.list(Slot::X)[0].constant, 5.0);
        assert_eq!(store.list(Slot::HEIGHT)[0].constant, 8.0);
    }

    #[test]
    fn test_sort_is_stable_and_priority_descending() {
        let mut store = ConstraintStore::new();
        let anchor = Anchor::leading(view(0));
        store.push(Constraint::fixed(anchor, 1.0).with_priority(Priority::Low));
        store.push(Constraint::fixed(anchor, 2.0).with_priority(Priority::Required));
        store.push(Constraint::fixed(anchor, 3.0).with_priority(Priority::Required));
        store.push(Constraint::fixed(anchor, 4.0).with_priority(Priority::Default));
        store.sort_if_needed();

        let constants: Vec<f32> = store.list(Slot::X).iter().map(|c| c.constant).collect();
        assert_eq!(constants, vec![2.0, 3.0, 4.0, 1.0]);
    }

    #[test]
    fn test_sort_is_lazy() {
        let mut store = ConstraintStore::new();
        let anchor = Anchor::leading(view(0));
        store.push(Constraint::fixed(anchor, 1.0).with_priority(Priority::Low));
        store.push(Constraint::fixed(anchor, 2.0).with_priority(Priority::High));
        store.sort_if_needed();
        assert_eq!(store.list(Slot::X)[0].constant, 2.0);

        // Clean store: sorting again must not disturb anything
        store.sort_if_needed();
        assert_eq!(store.list(Slot::X)[0].constant, 2.0);
    }

    #[test]
    fn test_remove_all_for_slot() {
        let mut store = ConstraintStore::new();
        store.push(Constraint::fixed(Anchor::leading(view(0)), 1.0));
        store.push(Constraint::fixed(Anchor::width(view(0)), 2.0));
        store.remove_all(Slot::X);

        assert!(store.list(Slot::X).is_empty());
        assert_eq!(store.list(Slot::WIDTH).len(), 1);
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_targets_iterates_all_lists() {
        let mut store = ConstraintStore::new();
        store.push(Constraint::equal(Anchor::leading(view(0)), Anchor::leading(view(1))));
        store.push(Constraint::equal(Anchor::height(view(0)), Anchor::height(view(2))));
        store.push(Constraint::fixed(Anchor::width(view(0)), 10.0));

        let targets: Vec<ViewId> = store.targets().collect();
        assert_eq!(targets, vec![view(1), view(2)]);
    }
}
