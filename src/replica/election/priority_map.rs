use crate::replica::peers::VesselId;
use std::collections::{BTreeMap, BTreeSet};

/// PriorityMap holds the random priority each vessel drew for the election. It outlives the
/// election round, because failover picks the replacement leader from it.
#[derive(Default)]
pub(crate) struct PriorityMap {
    priorities: BTreeMap<VesselId, u64>,
}

impl PriorityMap {
    pub(crate) fn new() -> Self {
        PriorityMap::default()
    }

    /// Returns true if `id` wasn't known yet.
    pub(crate) fn insert_if_absent(&mut self, id: VesselId, priority: u64) -> bool {
        if self.priorities.contains_key(&id) {
            return false;
        }

        self.priorities.insert(id, priority);
        true
    }

    pub(crate) fn remove(&mut self, id: VesselId) {
        self.priorities.remove(&id);
    }

    pub(crate) fn purge(&mut self, dead: &BTreeSet<VesselId>) {
        self.priorities.retain(|id, _| !dead.contains(id));
    }

    pub(crate) fn get(&self, id: VesselId) -> Option<u64> {
        self.priorities.get(&id).copied()
    }

    /// Number of vessels we've either heard a priority from, or heard the death of.
    pub(crate) fn accounted_for(&self, dead: &BTreeSet<VesselId>) -> usize {
        let heard_from = self.priorities.keys().filter(|id| !dead.contains(id)).count();
        heard_from + dead.len()
    }

    /// `winner()` is the vessel with the highest priority. Equal priorities go to the larger id,
    /// so every vessel holding the same map picks the same winner.
    pub(crate) fn winner(&self) -> Option<VesselId> {
        self.priorities
            .iter()
            .max_by_key(|(id, priority)| (**priority, **id))
            .map(|(id, _)| *id)
    }

    pub(crate) fn entries(&self) -> Vec<(VesselId, u64)> {
        self.priorities.iter().map(|(id, p)| (*id, *p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: u32) -> VesselId {
        VesselId::new(v)
    }

    fn map_of(entries: &[(u32, u64)]) -> PriorityMap {
        let mut map = PriorityMap::new();
        for (v, p) in entries {
            map.insert_if_absent(id(*v), *p);
        }
        map
    }

    #[test]
    fn winner_is_highest_priority() {
        let map = map_of(&[(1, 5), (2, 9), (3, 3)]);

        assert_eq!(map.winner(), Some(id(2)));
    }

    #[test]
    fn tie_goes_to_larger_id() {
        let map = map_of(&[(4, 7), (1, 7), (3, 2)]);

        assert_eq!(map.winner(), Some(id(4)));
    }

    #[test]
    fn empty_map_has_no_winner() {
        assert_eq!(PriorityMap::new().winner(), None);
    }

    #[test]
    fn first_priority_wins_for_an_id() {
        let mut map = PriorityMap::new();

        assert!(map.insert_if_absent(id(1), 10));
        assert!(!map.insert_if_absent(id(1), 99));
        assert_eq!(map.get(id(1)), Some(10));
    }

    #[test]
    fn replacement_after_removing_winner() {
        let mut map = map_of(&[(1, 5), (2, 9), (3, 3)]);

        map.remove(id(2));

        assert_eq!(map.winner(), Some(id(1)));
    }

    #[test]
    fn purge_drops_dead_entries() {
        let mut map = map_of(&[(1, 5), (2, 9), (3, 3)]);
        let dead: BTreeSet<_> = vec![id(2), id(3)].into_iter().collect();

        map.purge(&dead);

        assert_eq!(map.entries(), vec![(id(1), 5)]);
    }

    #[test]
    fn deaths_count_as_accounted_for() {
        let map = map_of(&[(1, 5), (2, 9)]);
        let dead: BTreeSet<_> = vec![id(2), id(4)].into_iter().collect();

        // 1 heard from, 2 and 4 dead. 2 isn't counted twice.
        assert_eq!(map.accounted_for(&dead), 3);
    }
}
