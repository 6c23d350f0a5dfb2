mod election_state;
mod priority_map;
mod state_change_listener;
mod timers;

pub(crate) use election_state::CurrentLeader;
pub(crate) use election_state::ElectionState;
pub(crate) use priority_map::PriorityMap;
pub(crate) use state_change_listener::ElectionStateChangeListener;
pub(crate) use state_change_listener::ElectionStateSnapshot;
pub(crate) use timers::spawn_election_timer;
pub(crate) use timers::ElectionTimeout;
pub(crate) use timers::RealClock;
