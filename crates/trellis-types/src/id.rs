//! Opaque element identifier.
//!
//! A visual-element tree hands out [`ElementId`]s; the runtime only ever
//! passes them back to the tree that minted them. The key type is a slotmap
//! key so the reference tree implementation gets generational indices (a
//! removed element's id never aliases a later one) without this crate
//! committing to any particular tree.

use slotmap::new_key_type;

new_key_type! {
    /// Key of a single element inside a visual-element tree.
    ///
    /// Ids are meaningful only to the tree that produced them. An id may
    /// outlive its element (handlers can fire on detached elements); tree
    /// queries on a stale id return "no match" rather than an error.
    pub struct ElementId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn ids_are_generational() {
        let mut arena: SlotMap<ElementId, &str> = SlotMap::with_key();
        let first = arena.insert("button");
        arena.remove(first);
        let second = arena.insert("input");

        assert_ne!(first, second);
        assert!(!arena.contains_key(first));
        assert!(arena.contains_key(second));
    }

    #[test]
    fn default_id_matches_nothing() {
        let arena: SlotMap<ElementId, ()> = SlotMap::with_key();
        assert!(!arena.contains_key(ElementId::default()));
    }
}
