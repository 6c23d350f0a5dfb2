use crate::replica::peers::VesselId;
use std::collections::BTreeSet;

/// Membership is this vessel's local view of which vessels can still be reached. `alive` and
/// `dead` always partition `1..=N`. `dead` only ever grows.
///
/// The ring is not stored as links between vessels. It's the ordered `alive` set, and the next
/// hop is recomputed from it every time `dead` changes.
pub(crate) struct Membership {
    my_id: VesselId,
    number_of_vessels: u32,
    alive: BTreeSet<VesselId>,
    dead: BTreeSet<VesselId>,
    ring_successor: VesselId,
    // Highest id we've heard of. Starts at N and is raised by peer-death notices, so a walk
    // around the ring never stops short of the real ring size.
    max_id: VesselId,
}

impl Membership {
    pub(crate) fn new(my_id: VesselId, number_of_vessels: u32) -> Self {
        let alive: BTreeSet<VesselId> = (1..=number_of_vessels).map(VesselId::new).collect();
        let ring_successor = successor_in(&alive, my_id).unwrap_or(my_id);

        Membership {
            my_id,
            number_of_vessels,
            alive,
            dead: BTreeSet::new(),
            ring_successor,
            max_id: VesselId::new(number_of_vessels),
        }
    }

    pub(crate) fn number_of_vessels(&self) -> u32 {
        self.number_of_vessels
    }

    /// `successor_of()` returns the smallest alive id greater than `id`, wrapping around to the
    /// smallest alive id.
    pub(crate) fn successor_of(&self, id: VesselId) -> VesselId {
        successor_in(&self.alive, id).unwrap_or(self.my_id)
    }

    /// Next hop for ring messages. `None` means we're the only vessel left.
    pub(crate) fn ring_successor(&self) -> Option<VesselId> {
        if self.ring_successor == self.my_id {
            None
        } else {
            Some(self.ring_successor)
        }
    }

    /// `mark_dead()` returns true if `id` was alive and is now dead. Marking an already dead (or
    /// unknown) id is a no-op. We never mark ourselves dead; we're clearly still here.
    pub(crate) fn mark_dead(&mut self, id: VesselId) -> bool {
        if id == self.my_id || !self.alive.remove(&id) {
            return false;
        }

        self.dead.insert(id);
        self.ring_successor = self.successor_of(self.my_id);
        true
    }

    pub(crate) fn is_alive(&self, id: VesselId) -> bool {
        self.alive.contains(&id)
    }

    pub(crate) fn dead(&self) -> &BTreeSet<VesselId> {
        &self.dead
    }

    /// Every alive vessel except us.
    pub(crate) fn alive_peers(&self) -> Vec<VesselId> {
        self.alive.iter().copied().filter(|id| *id != self.my_id).collect()
    }

    pub(crate) fn max_id(&self) -> VesselId {
        self.max_id
    }

    pub(crate) fn observe_max_id(&mut self, id: VesselId) {
        if id > self.max_id {
            self.max_id = id;
        }
    }
}

fn successor_in(alive: &BTreeSet<VesselId>, id: VesselId) -> Option<VesselId> {
    alive
        .range(VesselId::new(id.as_u32().saturating_add(1))..)
        .next()
        .or_else(|| alive.iter().next())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: u32) -> VesselId {
        VesselId::new(v)
    }

    fn membership_with_dead(my_id: u32, n: u32, dead: &[u32]) -> Membership {
        let mut membership = Membership::new(id(my_id), n);
        for d in dead {
            membership.mark_dead(id(*d));
        }
        membership
    }

    #[test]
    fn successor_wraps_around_full_ring() {
        let membership = Membership::new(id(1), 5);

        assert_eq!(membership.successor_of(id(1)), id(2));
        assert_eq!(membership.successor_of(id(4)), id(5));
        assert_eq!(membership.successor_of(id(5)), id(1));
        assert_eq!(membership.ring_successor(), Some(id(2)));
    }

    #[test]
    fn successor_skips_dead_vessel() {
        let membership = membership_with_dead(1, 5, &[3]);

        assert_eq!(membership.successor_of(id(2)), id(4));
    }

    #[test]
    fn successor_wraps_past_dead_tail() {
        let membership = membership_with_dead(1, 5, &[4, 5]);

        assert_eq!(membership.successor_of(id(3)), id(1));
    }

    #[test]
    fn ring_successor_recomputed_on_death() {
        let mut membership = Membership::new(id(2), 5);
        assert_eq!(membership.ring_successor(), Some(id(3)));

        membership.mark_dead(id(3));
        assert_eq!(membership.ring_successor(), Some(id(4)));

        membership.mark_dead(id(4));
        membership.mark_dead(id(5));
        assert_eq!(membership.ring_successor(), Some(id(1)));
    }

    #[test]
    fn sole_survivor_has_no_successor() {
        let membership = membership_with_dead(2, 3, &[1, 3]);

        assert_eq!(membership.ring_successor(), None);
        assert_eq!(membership.successor_of(id(2)), id(2));
        assert!(membership.alive_peers().is_empty());
    }

    #[test]
    fn single_vessel_cluster_has_no_successor() {
        let membership = Membership::new(id(1), 1);

        assert_eq!(membership.ring_successor(), None);
    }

    #[test]
    fn mark_dead_is_idempotent() {
        let mut membership = Membership::new(id(1), 4);

        assert!(membership.mark_dead(id(3)));
        assert!(!membership.mark_dead(id(3)));
        assert!(!membership.mark_dead(id(9)));
        assert_eq!(membership.dead().len(), 1);
    }

    #[test]
    fn never_marks_self_dead() {
        let mut membership = Membership::new(id(2), 3);

        assert!(!membership.mark_dead(id(2)));
        assert!(membership.is_alive(id(2)));
    }

    #[test]
    fn alive_and_dead_partition_the_cluster() {
        let membership = membership_with_dead(1, 6, &[2, 5, 5, 6]);

        for v in 1..=6 {
            let is_alive = membership.is_alive(id(v));
            let is_dead = membership.dead().contains(&id(v));
            assert!(is_alive ^ is_dead, "vessel {} must be exactly one of alive/dead", v);
        }
        assert_eq!(membership.alive_peers(), vec![id(3), id(4)]);
    }

    #[test]
    fn max_id_only_goes_up() {
        let mut membership = Membership::new(id(1), 4);

        membership.observe_max_id(id(2));
        assert_eq!(membership.max_id(), id(4));

        membership.observe_max_id(id(6));
        assert_eq!(membership.max_id(), id(6));
    }
}
