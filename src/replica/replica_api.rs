use crate::replica::messages::VesselMessage;
use crate::replica::peers::VesselId;

/// What the leader decides to do with a client write.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum SubmitRoute {
    /// We're leader and the write is applied locally. Replication is on its way.
    Applied { key: u64 },
    /// Someone else is leader. The caller has to send it there.
    ForwardToLeader { leader: VesselId },
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub(crate) enum SubmitRefusal {
    #[error("No leader has been elected yet")]
    NoLeader,
}

/// Why a peer's message was turned away. Only leader-directed writes can be.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub(crate) enum MessageRefusal {
    #[error("Not the leader (current leader: {leader:?})")]
    NotLeader { leader: Option<VesselId> },
}

/// Everything ring forwarding needs to route around a dead vessel.
#[derive(Clone, Debug)]
pub(crate) struct RingRepair {
    pub(crate) dead: VesselId,
    /// False when something else already marked `dead` and repaired the ring.
    pub(crate) newly_dead: bool,
    /// None when we're the only vessel left.
    pub(crate) successor: Option<VesselId>,
    pub(crate) max_id: VesselId,
    /// Every vessel we know is dead, `dead` included. Neighbours of the new successor may have
    /// died before they could pass their own notices on.
    pub(crate) known_dead: Vec<VesselId>,
    /// Priorities we know, to be replayed to the new successor.
    pub(crate) priorities: Vec<(VesselId, u64)>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FailoverOutcome {
    pub(crate) new_leader: VesselId,
    pub(crate) leader_epoch: u64,
    /// Set when this failover picked `new_leader` and it's not us. The caller must get it to
    /// the new leader before sending it any write, or the write lands on a vessel that doesn't
    /// know it leads yet.
    pub(crate) announcement: Option<VesselMessage>,
}

/// SubmitOutput is where a write ended up.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutput {
    /// This vessel is leader and applied the write. `key` is the record written, for creates the
    /// newly assigned one.
    Applied { key: u64 },
    /// The leader accepted the write. It assigns the key and replicates.
    Forwarded { leader: VesselId },
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum SubmitError {
    #[error("No leader has been elected yet")]
    NoLeader,

    #[error("Leader {failed_leader} was unreachable and replaced by {new_leader}. Write was not applied.")]
    LeaderFailedOver {
        failed_leader: VesselId,
        new_leader: VesselId,
    },

    #[error("Vessel {leader} refused the write, it doesn't consider itself leader. Write was not applied.")]
    LeaderRefused { leader: VesselId },

    #[error("Write was not accepted after {attempts} leaders failed")]
    RetriesExhausted { attempts: u32 },

    #[error("Vessel has shut down")]
    VesselExited,
}

/// What the write path does after failing over from an unreachable leader.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WriteRetryPolicy {
    /// Send the same write to the new leader. Gives up after as many failovers as there are
    /// vessels.
    RetryOnNewLeader,
    /// Fail the write with `SubmitError::LeaderFailedOver` and let the caller decide.
    ReturnAfterFailover,
}

impl Default for WriteRetryPolicy {
    fn default() -> Self {
        WriteRetryPolicy::RetryOnNewLeader
    }
}

/// BoardSnapshot is everything needed to render the board of one vessel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoardSnapshot {
    pub vessel_id: VesselId,
    /// Ordered by key.
    pub entries: Vec<(u64, String)>,
    pub role: Role,
    pub leader: Option<VesselId>,
    pub leader_priority: Option<u64>,
    pub leader_epoch: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Initializing,
    Electing,
    Leader,
    Follower,
}
