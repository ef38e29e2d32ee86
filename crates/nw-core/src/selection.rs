//! Selection manager.
//!
//! An ordered set of entity ids. Insertion order is kept so that context
//! gathering for the assistant is deterministic.

use crate::id::EntityId;
use smallvec::SmallVec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: SmallVec<[EntityId; 8]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present → absent, absent → present. Returns whether `id` is now selected.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn insert(&mut self, id: EntityId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| *s != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }

    pub fn as_slice(&self) -> &[EntityId] {
        &self.ids
    }

    /// Ids that move together when `active` is dragged: the whole selection
    /// if `active` is part of it, otherwise `active` alone.
    pub fn drag_group(&self, active: EntityId) -> SmallVec<[EntityId; 8]> {
        if self.contains(active) {
            self.ids.clone()
        } else {
            smallvec::smallvec![active]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(n: u64) -> EntityId {
        EntityId::from_raw(n)
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut sel = Selection::new();
        sel.toggle(id(1));
        sel.toggle(id(2));
        let before = sel.clone();
        assert!(sel.toggle(id(3)));
        assert!(!sel.toggle(id(3)));
        assert_eq!(sel, before);
        // Re-selecting an id appends it: membership is restored, order is not.
        assert!(!sel.toggle(id(1)));
        assert!(sel.toggle(id(1)));
        assert_eq!(members(&sel), members(&before));
    }

    fn members(sel: &Selection) -> Vec<EntityId> {
        let mut ids = sel.as_slice().to_vec();
        ids.sort();
        ids
    }

    #[test]
    fn keeps_insertion_order() {
        let mut sel = Selection::new();
        for n in [5, 2, 9] {
            sel.toggle(id(n));
        }
        assert_eq!(sel.as_slice(), &[id(5), id(2), id(9)]);
    }

    #[test]
    fn drag_group_contract() {
        let mut sel = Selection::new();
        sel.insert(id(1));
        sel.insert(id(2));
        sel.insert(id(3));
        assert_eq!(sel.drag_group(id(2)).as_slice(), &[id(1), id(2), id(3)]);
        assert_eq!(sel.drag_group(id(4)).as_slice(), &[id(4)]);
    }

    #[test]
    fn clear_is_unconditional() {
        let mut sel = Selection::new();
        sel.clear();
        assert!(sel.is_empty());
        sel.insert(id(7));
        sel.clear();
        assert!(sel.is_empty());
    }
}
