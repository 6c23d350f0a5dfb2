use crate::actor::WeakActorClient;
use crate::replica::election::{
    spawn_election_timer, CurrentLeader, ElectionState, ElectionStateChangeListener, ElectionStateSnapshot,
    ElectionTimeout, PriorityMap, RealClock,
};
use crate::replica::membership::Membership;
use crate::replica::peer_client::PeerClient;
use crate::replica::propagation;
use crate::replica::replica_api::{
    BoardSnapshot, FailoverOutcome, MessageRefusal, RingRepair, Role, SubmitRefusal, SubmitRoute,
};
use crate::replica::ring::RingForwarder;
use crate::replica::store::{RecordOp, RecordStore};
use crate::replica::{BoardPath, VesselId, VesselMessage, WriteOp};
use std::time::Duration;

pub(crate) struct ReplicaConfig {
    pub(crate) logger: slog::Logger,
    pub(crate) my_vessel_id: VesselId,
    pub(crate) number_of_vessels: u32,
    pub(crate) peer_client: PeerClient,
    pub(crate) actor_client: WeakActorClient,
    pub(crate) settle_delay: Duration,
    pub(crate) finalize_delay: Duration,
    pub(crate) priority: Option<u64>,
}

/// Replica is all the state of one vessel: who is alive, the election, the leader pointer and
/// the board. It only ever runs on the replica actor, so none of it needs locking. Anything that
/// has to wait on a peer is handed to a spawned task.
pub(crate) struct Replica {
    logger: slog::Logger,
    my_vessel_id: VesselId,
    membership: Membership,
    priorities: PriorityMap,
    election_state: ElectionState,
    store: RecordStore,
    peer_client: PeerClient,
    ring: RingForwarder,
    actor_client: WeakActorClient,
    settle_delay: Duration,
    finalize_delay: Duration,
    priority_override: Option<u64>,
}

impl Replica {
    pub(crate) fn new(config: ReplicaConfig) -> (Self, ElectionStateChangeListener) {
        let (election_state, listener) = ElectionState::new(config.my_vessel_id);
        let ring = RingForwarder::new(
            config.logger.clone(),
            config.peer_client.clone(),
            config.actor_client.clone(),
        );

        let replica = Replica {
            logger: config.logger,
            my_vessel_id: config.my_vessel_id,
            membership: Membership::new(config.my_vessel_id, config.number_of_vessels),
            priorities: PriorityMap::new(),
            election_state,
            store: RecordStore::new(),
            peer_client: config.peer_client,
            ring,
            actor_client: config.actor_client,
            settle_delay: config.settle_delay,
            finalize_delay: config.finalize_delay,
            priority_override: config.priority,
        };

        (replica, listener)
    }

    /// Give the other vessels `settle_delay` to come up before we start gossiping.
    pub(crate) fn start_settle_timer(&self) {
        spawn_election_timer(
            RealClock,
            self.settle_delay,
            ElectionTimeout::Settled,
            self.actor_client.clone(),
        );
    }

    pub(crate) fn handle_election_timeout(&mut self, timeout: ElectionTimeout) {
        match timeout {
            ElectionTimeout::Settled => self.start_election(),
            ElectionTimeout::Finalize => self.finalize_election(),
        }
    }

    /// Only leader-directed writes can be refused, when we don't lead. Everything else is taken,
    /// even when it turns out to change nothing.
    pub(crate) fn handle_message(&mut self, message: VesselMessage) -> Result<(), MessageRefusal> {
        match message {
            VesselMessage::SubmitEntryToLeader { value } => {
                return self.handle_leader_write(WriteOp::Create { value });
            }
            VesselMessage::ModifyEntryToLeader { key, value } => {
                return self.handle_leader_write(WriteOp::Modify { key, value });
            }
            VesselMessage::DeleteEntryToLeader { key } => {
                return self.handle_leader_write(WriteOp::Delete { key });
            }
            VesselMessage::SubmitOnVessels {
                target: BoardPath::Board,
                key,
                value,
            } => self.store.apply_replicated(RecordOp::Create { key, value }),
            VesselMessage::SubmitOnVessels {
                target: BoardPath::Entry(_),
                key,
                value,
            } => self.store.apply_replicated(RecordOp::Modify { key, value }),
            VesselMessage::DeleteOnVessels { key } => self.store.apply_replicated(RecordOp::Delete { key }),
            VesselMessage::LeaderElection { origin, priority } => self.handle_priority(origin, priority),
            VesselMessage::DeadNeighbourInElection { dead, max_id } => self.handle_dead_neighbour(dead, max_id),
            VesselMessage::LeaderDeadNewElection {
                leader,
                priority,
                epoch,
            } => self.handle_new_leader_announcement(leader, priority, epoch),
        }

        Ok(())
    }

    pub(crate) fn handle_submit(&mut self, op: WriteOp) -> Result<SubmitRoute, SubmitRefusal> {
        match self.election_state.current_leader() {
            CurrentLeader::Me => Ok(SubmitRoute::Applied {
                key: self.apply_as_leader(op),
            }),
            CurrentLeader::Other(leader) => Ok(SubmitRoute::ForwardToLeader { leader }),
            CurrentLeader::Unknown => Err(SubmitRefusal::NoLeader),
        }
    }

    pub(crate) fn ring_successor(&self) -> Option<VesselId> {
        self.membership.ring_successor()
    }

    pub(crate) fn handle_peer_unreachable(&mut self, peer_id: VesselId) -> RingRepair {
        let newly_dead = self.mark_dead(peer_id);
        if newly_dead {
            self.check_election_complete();
        }

        RingRepair {
            dead: peer_id,
            newly_dead,
            successor: self.membership.ring_successor(),
            max_id: self.membership.max_id(),
            known_dead: self.membership.dead().iter().copied().collect(),
            priorities: self.priorities.entries(),
        }
    }

    /// Failover: replace an unreachable leader with the best priority we still know of, and tell
    /// everyone else. Returns None if there's nobody to fail over to.
    ///
    /// The announcement to the new leader itself is left to the caller, see `FailoverOutcome`.
    pub(crate) fn handle_leader_unreachable(&mut self, failed_leader: VesselId) -> Option<FailoverOutcome> {
        let current_leader = self.election_state.leader_id()?;
        if current_leader != failed_leader || failed_leader == self.my_vessel_id {
            // Someone beat us to it. Go with whatever the pointer says now.
            return Some(FailoverOutcome {
                new_leader: current_leader,
                leader_epoch: self.election_state.leader_epoch(),
                announcement: None,
            });
        }

        self.mark_dead(failed_leader);
        let new_leader = self.priorities.winner()?;
        let priority = self.priorities.get(new_leader).unwrap_or_default();
        let leader_epoch = self.election_state.fail_over_to(new_leader);

        slog::info!(
            self.logger,
            "Leader {} is dead. New leader is {} (priority {}, epoch {})",
            failed_leader,
            new_leader,
            priority,
            leader_epoch
        );

        let announcement = VesselMessage::LeaderDeadNewElection {
            leader: new_leader,
            priority,
            epoch: leader_epoch,
        };
        let bystanders = self
            .membership
            .alive_peers()
            .into_iter()
            .filter(|id| *id != new_leader)
            .collect();
        propagation::spawn_fan_out(&self.logger, &self.peer_client, bystanders, announcement.clone());

        Some(FailoverOutcome {
            new_leader,
            leader_epoch,
            announcement: if new_leader == self.my_vessel_id {
                None
            } else {
                Some(announcement)
            },
        })
    }

    pub(crate) fn snapshot(&self) -> BoardSnapshot {
        let leader = self.election_state.leader_id();
        let role = match self.election_state.current_state() {
            ElectionStateSnapshot::Initializing => Role::Initializing,
            ElectionStateSnapshot::Electing => Role::Electing,
            ElectionStateSnapshot::Leader => Role::Leader,
            ElectionStateSnapshot::Follower(_) => Role::Follower,
        };

        BoardSnapshot {
            vessel_id: self.my_vessel_id,
            entries: self.store.entries(),
            role,
            leader,
            leader_priority: leader.and_then(|id| self.priorities.get(id)),
            leader_epoch: self.election_state.leader_epoch(),
        }
    }

    fn start_election(&mut self) {
        if self.election_state.current_state() != ElectionStateSnapshot::Initializing {
            return;
        }
        self.election_state.begin_electing();

        let priority = self.priority_override.unwrap_or_else(rand::random);
        self.priorities.insert_if_absent(self.my_vessel_id, priority);
        slog::info!(self.logger, "Joining election with priority {}", priority);

        self.ring.spawn_forward(VesselMessage::LeaderElection {
            origin: self.my_vessel_id,
            priority,
        });
        self.check_election_complete();
    }

    fn handle_priority(&mut self, origin: VesselId, priority: u64) {
        if !self.membership.is_alive(origin) {
            slog::debug!(self.logger, "Ignoring priority of vessel {}, it's not alive", origin);
            return;
        }

        if !self.priorities.insert_if_absent(origin, priority) {
            return;
        }

        // Our own priority has been all the way around.
        if origin != self.my_vessel_id {
            self.ring.spawn_forward(VesselMessage::LeaderElection { origin, priority });
        }
        self.check_election_complete();
    }

    fn handle_dead_neighbour(&mut self, dead: VesselId, max_id: VesselId) {
        self.membership.observe_max_id(max_id);

        if !self.mark_dead(dead) {
            return;
        }

        self.ring.spawn_forward(VesselMessage::DeadNeighbourInElection {
            dead,
            max_id: self.membership.max_id(),
        });
        self.check_election_complete();
    }

    fn handle_new_leader_announcement(&mut self, leader: VesselId, priority: u64, epoch: u64) {
        let previous_leader = self.election_state.leader_id();
        if !self.election_state.adopt_announced_leader(leader, epoch) {
            slog::warn!(
                self.logger,
                "Ignoring stale announcement of leader {} (epoch {}, ours is {})",
                leader,
                epoch,
                self.election_state.leader_epoch()
            );
            return;
        }

        if let Some(previous_leader) = previous_leader {
            if previous_leader != leader {
                self.mark_dead(previous_leader);
            }
        }
        if self.membership.is_alive(leader) {
            self.priorities.insert_if_absent(leader, priority);
        }

        slog::info!(
            self.logger,
            "Vessel {} announced as new leader (priority {}, epoch {})",
            leader,
            priority,
            epoch
        );
    }

    fn handle_leader_write(&mut self, op: WriteOp) -> Result<(), MessageRefusal> {
        let leader = match self.election_state.current_leader() {
            CurrentLeader::Me => {
                self.apply_as_leader(op);
                return Ok(());
            }
            CurrentLeader::Other(leader) => Some(leader),
            CurrentLeader::Unknown => None,
        };

        // Either the sender's pointer is stale, or our own election hasn't finished yet.
        slog::warn!(self.logger, "Refusing {:?}, not leader (current leader: {:?})", op, leader);
        Err(MessageRefusal::NotLeader { leader })
    }

    /// Apply on the leader's board and replicate to every other alive vessel. Modify and delete
    /// of absent keys are still replicated; they're no-ops everywhere.
    fn apply_as_leader(&mut self, op: WriteOp) -> u64 {
        let (key, record_op) = match op {
            WriteOp::Create { value } => {
                let key = self.store.create(value.clone());
                (key, RecordOp::Create { key, value })
            }
            WriteOp::Modify { key, value } => {
                self.store.modify(key, value.clone());
                (key, RecordOp::Modify { key, value })
            }
            WriteOp::Delete { key } => {
                self.store.delete(key);
                (key, RecordOp::Delete { key })
            }
        };

        propagation::spawn_fan_out(
            &self.logger,
            &self.peer_client,
            self.membership.alive_peers(),
            VesselMessage::replicate(record_op),
        );

        key
    }

    fn check_election_complete(&mut self) {
        let accounted_for = self.priorities.accounted_for(self.membership.dead());
        if accounted_for < self.membership.number_of_vessels() as usize {
            return;
        }

        if self.election_state.try_schedule_finalize() {
            slog::info!(
                self.logger,
                "Heard from every vessel. Picking leader in {:?}",
                self.finalize_delay
            );
            spawn_election_timer(
                RealClock,
                self.finalize_delay,
                ElectionTimeout::Finalize,
                self.actor_client.clone(),
            );
        }
    }

    fn finalize_election(&mut self) {
        self.priorities.purge(self.membership.dead());

        let winner = match self.priorities.winner() {
            Some(winner) => winner,
            None => {
                slog::error!(self.logger, "Election ended without a single priority");
                return;
            }
        };

        if self.election_state.conclude(winner) {
            slog::info!(self.logger, "Elected leader is {}. I am {:?}", winner, self.election_state);
        }
    }

    fn mark_dead(&mut self, vessel_id: VesselId) -> bool {
        if !self.membership.mark_dead(vessel_id) {
            return false;
        }

        self.priorities.remove(vessel_id);
        slog::info!(self.logger, "Vessel {} is dead", vessel_id);
        true
    }
}
