use crate::replica::ElectionStateChangeListener;
use crate::replica::ElectionStateSnapshot;
use crate::replica::VesselId;

/// An event that happened, as observed by the local vessel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VesselEvent {
    /// An election or failover changed our role. Consuming this event type is subtle. It doesn't
    /// queue intermediate events. If several happen between two calls to `next_event()`, only the
    /// most recent one is seen.
    Election(ElectionEvent),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ElectionEvent {
    Initializing,
    Electing,
    Leader,
    Follower(FollowerEventData),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FollowerEventData {
    pub leader_vessel_id: VesselId,
}

pub struct EventListener {
    election_state_change_listener: ElectionStateChangeListener,
}

impl EventListener {
    pub(crate) fn new(election_state_change_listener: ElectionStateChangeListener) -> Self {
        EventListener {
            election_state_change_listener,
        }
    }

    /// `next_event()` waits for the next event this vessel observes. Returns None once the vessel
    /// has shut down.
    pub async fn next_event(&mut self) -> Option<VesselEvent> {
        self.election_state_change_listener
            .next()
            .await
            .map(|election_state| VesselEvent::Election(ElectionEvent::from(election_state)))
    }

    /// The most recent event, without waiting.
    pub fn current(&self) -> VesselEvent {
        VesselEvent::Election(ElectionEvent::from(self.election_state_change_listener.current()))
    }
}

// ------- Conversions --------

impl From<ElectionStateSnapshot> for ElectionEvent {
    fn from(election_state: ElectionStateSnapshot) -> Self {
        match election_state {
            ElectionStateSnapshot::Initializing => ElectionEvent::Initializing,
            ElectionStateSnapshot::Electing => ElectionEvent::Electing,
            ElectionStateSnapshot::Leader => ElectionEvent::Leader,
            ElectionStateSnapshot::Follower(leader_vessel_id) => {
                ElectionEvent::Follower(FollowerEventData { leader_vessel_id })
            }
        }
    }
}
