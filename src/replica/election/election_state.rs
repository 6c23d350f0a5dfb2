use crate::replica::election::state_change_listener::{
    self, ElectionStateChangeListener, ElectionStateChangeNotifier, ElectionStateSnapshot,
};
use crate::replica::peers::VesselId;
use std::fmt;

/// ElectionState tracks where this vessel is in the election and who it believes the leader is.
///
/// `Initializing -> Electing -> {Leader | Follower}`. Nothing goes back to `Electing`. After the
/// round concludes, the leader only changes through failover, which bumps `leader_epoch`.
pub(crate) struct ElectionState {
    my_id: VesselId,
    phase: Phase,
    leader_epoch: u64,
    finalize_scheduled: bool,
    state_change_notifier: ElectionStateChangeNotifier,
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Phase {
    Initializing,
    Electing,
    Leader,
    Follower(VesselId),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum CurrentLeader {
    Me,
    Other(VesselId),
    Unknown,
}

impl ElectionState {
    pub(crate) fn new(my_id: VesselId) -> (Self, ElectionStateChangeListener) {
        let (notifier, listener) = state_change_listener::new(ElectionStateSnapshot::Initializing);

        let election_state = ElectionState {
            my_id,
            phase: Phase::Initializing,
            leader_epoch: 0,
            finalize_scheduled: false,
            state_change_notifier: notifier,
        };

        (election_state, listener)
    }

    pub(crate) fn begin_electing(&mut self) {
        if let Phase::Initializing = self.phase {
            self.phase = Phase::Electing;
            self.notify_new_state();
        }
    }

    /// Returns true exactly once: the first time it's called while electing. The caller is then
    /// responsible for concluding the round after the finalize delay.
    pub(crate) fn try_schedule_finalize(&mut self) -> bool {
        if self.phase != Phase::Electing || self.finalize_scheduled {
            return false;
        }

        self.finalize_scheduled = true;
        true
    }

    /// Conclude the election round with `winner`. Returns false if the round had already been
    /// concluded (e.g. an announcement got here first).
    pub(crate) fn conclude(&mut self, winner: VesselId) -> bool {
        if self.phase != Phase::Electing {
            return false;
        }

        self.set_leader(winner);
        true
    }

    /// Adopt a leader announced by a peer after failover. Stale announcements, whose epoch is not
    /// newer than ours, are refused.
    pub(crate) fn adopt_announced_leader(&mut self, leader: VesselId, epoch: u64) -> bool {
        if epoch <= self.leader_epoch {
            return false;
        }

        self.leader_epoch = epoch;
        self.set_leader(leader);
        true
    }

    /// Replace the leader ourselves after failing to reach it. Returns the new epoch.
    pub(crate) fn fail_over_to(&mut self, new_leader: VesselId) -> u64 {
        self.leader_epoch += 1;
        self.set_leader(new_leader);
        self.leader_epoch
    }

    pub(crate) fn current_leader(&self) -> CurrentLeader {
        match self.phase {
            Phase::Leader => CurrentLeader::Me,
            Phase::Follower(leader_id) => CurrentLeader::Other(leader_id),
            Phase::Initializing | Phase::Electing => CurrentLeader::Unknown,
        }
    }

    pub(crate) fn leader_id(&self) -> Option<VesselId> {
        match self.current_leader() {
            CurrentLeader::Me => Some(self.my_id),
            CurrentLeader::Other(leader_id) => Some(leader_id),
            CurrentLeader::Unknown => None,
        }
    }

    pub(crate) fn leader_epoch(&self) -> u64 {
        self.leader_epoch
    }

    pub(crate) fn current_state(&self) -> ElectionStateSnapshot {
        match self.phase {
            Phase::Initializing => ElectionStateSnapshot::Initializing,
            Phase::Electing => ElectionStateSnapshot::Electing,
            Phase::Leader => ElectionStateSnapshot::Leader,
            Phase::Follower(leader_id) => ElectionStateSnapshot::Follower(leader_id),
        }
    }

    fn set_leader(&mut self, leader: VesselId) {
        self.phase = if leader == self.my_id {
            Phase::Leader
        } else {
            Phase::Follower(leader)
        };
        self.notify_new_state();
    }

    fn notify_new_state(&self) {
        self.state_change_notifier.notify_new_state(self.current_state());
    }
}

impl fmt::Debug for ElectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::Initializing => write!(f, "Initializing"),
            Phase::Electing => write!(f, "Electing"),
            Phase::Leader => write!(f, "Leader(Epoch={})", self.leader_epoch),
            Phase::Follower(leader_id) => write!(f, "Follower(Leader={}, Epoch={})", leader_id, self.leader_epoch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: u32) -> VesselId {
        VesselId::new(v)
    }

    #[test]
    fn conclude_only_while_electing() {
        let (mut state, _listener) = ElectionState::new(id(1));

        assert!(!state.conclude(id(2)));
        assert_eq!(state.current_leader(), CurrentLeader::Unknown);

        state.begin_electing();
        assert!(state.conclude(id(2)));
        assert_eq!(state.current_leader(), CurrentLeader::Other(id(2)));

        // Round is over. Never back to electing.
        state.begin_electing();
        assert!(!state.conclude(id(1)));
        assert_eq!(state.leader_id(), Some(id(2)));
    }

    #[test]
    fn finalize_scheduled_once() {
        let (mut state, _listener) = ElectionState::new(id(1));
        assert!(!state.try_schedule_finalize());

        state.begin_electing();
        assert!(state.try_schedule_finalize());
        assert!(!state.try_schedule_finalize());
    }

    #[test]
    fn winning_makes_us_leader() {
        let (mut state, _listener) = ElectionState::new(id(3));
        state.begin_electing();
        state.conclude(id(3));

        assert_eq!(state.current_leader(), CurrentLeader::Me);
        assert_eq!(state.leader_id(), Some(id(3)));
    }

    #[test]
    fn stale_announcement_is_refused() {
        let (mut state, _listener) = ElectionState::new(id(3));
        state.begin_electing();
        state.conclude(id(2));

        assert!(state.adopt_announced_leader(id(1), 2));
        assert!(!state.adopt_announced_leader(id(4), 1));
        assert!(!state.adopt_announced_leader(id(4), 2));

        assert_eq!(state.leader_id(), Some(id(1)));
        assert_eq!(state.leader_epoch(), 2);
    }

    #[test]
    fn fail_over_bumps_epoch() {
        let (mut state, _listener) = ElectionState::new(id(1));
        state.begin_electing();
        state.conclude(id(2));

        assert_eq!(state.fail_over_to(id(1)), 1);
        assert_eq!(state.current_leader(), CurrentLeader::Me);
    }

    #[tokio::test]
    async fn listener_observes_transitions() {
        let (mut state, mut listener) = ElectionState::new(id(1));
        assert_eq!(listener.current(), ElectionStateSnapshot::Initializing);

        state.begin_electing();
        assert_eq!(listener.next().await, Some(ElectionStateSnapshot::Electing));

        state.conclude(id(2));
        assert_eq!(listener.next().await, Some(ElectionStateSnapshot::Follower(id(2))));
    }
}
