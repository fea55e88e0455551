//! Character cycling order: a position-addressed list of toggleable entries
//!
//! Every transform borrows the current order and returns a fresh value, so a
//! caller holding the previous order never observes it changing underneath.
//! Entries are addressed by their current position, not by character id:
//! after a reorder, index `i` refers to whatever now sits at `i`.

use serde::{Deserialize, Serialize};

use crate::constants::characters;
use crate::types::{CharacterId, CycleEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CyclingOrder(Vec<CycleEntry>);

impl Default for CyclingOrder {
    /// Every character, in roster order, enabled
    fn default() -> Self {
        Self(
            (0..characters::COUNT)
                .map(|id| CycleEntry::new(id, true))
                .collect(),
        )
    }
}

impl CyclingOrder {
    pub fn new(entries: Vec<CycleEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[CycleEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CycleEntry> {
        self.0.get(index)
    }

    /// Character ids included in the runtime cycle, in cycling order
    pub fn enabled(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.0.iter().filter(|entry| entry.on).map(|entry| entry.character_id)
    }

    /// Flip `on` for the entry currently at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn toggle(&self, index: usize) -> Self {
        let mut entries = self.0.clone();
        entries[index].on = !entries[index].on;
        Self(entries)
    }

    /// Move the entry at `old_index` to `new_index`; entries in between shift by one.
    ///
    /// # Panics
    /// If either index is out of bounds.
    pub fn reorder(&self, old_index: usize, new_index: usize) -> Self {
        assert!(
            new_index < self.0.len(),
            "reorder target {new_index} out of bounds for cycling order of length {}",
            self.0.len()
        );
        let mut entries = self.0.clone();
        let entry = entries.remove(old_index);
        entries.insert(new_index, entry);
        Self(entries)
    }

    /// Set every entry's `on` flag to the same value
    pub fn set_all(&self, on: bool) -> Self {
        Self(
            self.0
                .iter()
                .map(|entry| CycleEntry::new(entry.character_id, on))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(entries: &[(CharacterId, bool)]) -> CyclingOrder {
        CyclingOrder::new(
            entries
                .iter()
                .map(|&(id, on)| CycleEntry::new(id, on))
                .collect(),
        )
    }

    fn ids(order: &CyclingOrder) -> Vec<CharacterId> {
        order.entries().iter().map(|e| e.character_id).collect()
    }

    #[test]
    fn test_default_contains_every_character_enabled() {
        let order = CyclingOrder::default();
        assert_eq!(order.len(), characters::COUNT as usize);
        assert!(order.entries().iter().all(|e| e.on));
        assert_eq!(ids(&order), (0..characters::COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_reorder_first_to_last() {
        let before = order(&[(0, true), (1, true), (2, true)]);
        let after = before.reorder(0, 2);
        assert_eq!(after, order(&[(1, true), (2, true), (0, true)]));
        // Source value untouched
        assert_eq!(ids(&before), vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_last_to_first() {
        let after = order(&[(0, true), (1, false), (2, true), (3, true)]).reorder(3, 0);
        assert_eq!(ids(&after), vec![3, 0, 1, 2]);
        assert!(!after.entries()[2].on);
    }

    #[test]
    fn test_reorder_is_a_move_not_a_swap() {
        let after = CyclingOrder::default().reorder(2, 6);
        assert_eq!(ids(&after)[..8], [0, 1, 3, 4, 5, 6, 2, 7]);
    }

    #[test]
    fn test_reorder_same_index_is_identity() {
        let before = order(&[(4, true), (5, false)]);
        assert_eq!(before.reorder(1, 1), before);
    }

    #[test]
    fn test_reorder_preserves_multiset_and_relative_order() {
        let before = order(&[
            (5, true),
            (3, false),
            (9, true),
            (0, false),
            (11, true),
            (2, true),
        ]);
        for old in 0..before.len() {
            for new in 0..before.len() {
                let after = before.reorder(old, new);
                let moved = before.entries()[old];

                let mut sorted_before = ids(&before);
                let mut sorted_after = ids(&after);
                sorted_before.sort_unstable();
                sorted_after.sort_unstable();
                assert_eq!(sorted_before, sorted_after, "multiset changed for {old}->{new}");
                assert_eq!(after.entries()[new], moved);

                let rest_before: Vec<_> = before
                    .entries()
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != old)
                    .map(|(_, e)| *e)
                    .collect();
                let rest_after: Vec<_> = after
                    .entries()
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != new)
                    .map(|(_, e)| *e)
                    .collect();
                assert_eq!(rest_before, rest_after, "relative order changed for {old}->{new}");
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_reorder_out_of_range_panics() {
        order(&[(0, true), (1, true)]).reorder(0, 2);
    }

    #[test]
    fn test_toggle_flips_only_addressed_entry() {
        let before = order(&[(0, true), (1, true), (2, false)]);
        let after = before.toggle(1);
        assert_eq!(after, order(&[(0, true), (1, false), (2, false)]));

        let again = after.toggle(2);
        assert_eq!(again, order(&[(0, true), (1, false), (2, true)]));
    }

    #[test]
    fn test_toggle_addresses_current_position_after_reorder() {
        let reordered = order(&[(0, true), (1, true), (2, true)]).reorder(0, 2);
        // Position 0 now holds character 1
        let toggled = reordered.toggle(0);
        assert_eq!(toggled, order(&[(1, false), (2, true), (0, true)]));
    }

    #[test]
    #[should_panic]
    fn test_toggle_out_of_range_panics() {
        order(&[(0, true)]).toggle(1);
    }

    #[test]
    fn test_set_all_overrides_every_entry() {
        let scrambled = CyclingOrder::default().reorder(0, 11).reorder(4, 1).toggle(3);
        let all_off = scrambled.set_all(true).set_all(false);
        assert!(all_off.entries().iter().all(|e| !e.on));
        assert_eq!(ids(&all_off), ids(&scrambled));

        let all_on = all_off.set_all(true);
        assert!(all_on.entries().iter().all(|e| e.on));
    }

    #[test]
    fn test_enabled_follows_cycling_order() {
        let order = order(&[(7, true), (2, false), (4, true)]);
        assert_eq!(order.enabled().collect::<Vec<_>>(), vec![7, 4]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let json = serde_json::to_string(&order(&[(1, true), (0, false)])).unwrap();
        assert_eq!(
            json,
            r#"[{"characterId":1,"on":true},{"characterId":0,"on":false}]"#
        );
    }
}
