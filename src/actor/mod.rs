use crate::replica;
use crate::replica::{
    BoardSnapshot, ElectionTimeout, FailoverOutcome, MessageRefusal, RingRepair, SubmitRefusal, SubmitRoute, VesselId,
    VesselMessage, WriteOp,
};
use std::fmt::Debug;
use tokio::sync::{mpsc, oneshot};

// Every read-modify-write on membership, priorities, leader pointer and store is one event, so
// handling them one at a time on the actor makes each of them atomic. Anything that talks to a
// peer runs on a spawned task and reports back here.
#[derive(Debug)]
pub(crate) enum Event {
    // A peer posted a message to us. Leader-directed writes are refused unless we lead.
    Deliver(VesselMessage, Callback<Result<(), MessageRefusal>>),

    // Settled: draw priority, start gossip.
    // Finalize: pick the winner.
    ElectionTimeout(ElectionTimeout),

    // Ring forwarding asks where to send next.
    RingSuccessor(Callback<Option<VesselId>>),

    // Ring forwarding failed to reach a vessel. Mark it dead, hand back what's needed to repair
    // the ring around it.
    PeerUnreachable(VesselId, Callback<RingRepair>),

    // Leader: apply and fan out.
    // Follower: tell the caller where to forward.
    // Neither: refuse.
    Submit(WriteOp, Callback<Result<SubmitRoute, SubmitRefusal>>),

    // Failover.
    LeaderUnreachable(VesselId, Callback<Option<FailoverOutcome>>),

    Snapshot(Callback<BoardSnapshot>),
}

#[derive(Debug)]
pub(crate) struct Callback<T: Debug>(oneshot::Sender<T>);

impl<T: Debug> Callback<T> {
    pub(crate) fn send(self, message: T) {
        // Caller gave up waiting. Nothing to do about it.
        let _ = self.0.send(message);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Replica actor has exited")]
pub(crate) struct ActorExited;

/// ActorClient keeps the replica actor alive. Once every ActorClient is dropped, the event loop
/// ends and every WeakActorClient call fails with `ActorExited`.
pub(crate) struct ActorClient {
    sender: mpsc::Sender<Event>,
}

impl ActorClient {
    pub(crate) fn new(buffer_size: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (ActorClient { sender: tx }, rx)
    }

    pub(crate) fn weak(&self) -> WeakActorClient {
        WeakActorClient {
            sender: self.sender.downgrade(),
        }
    }
}

/// WeakActorClient is what background tasks, timers and the server hold, so they don't keep a
/// dropped vessel running.
#[derive(Clone)]
pub(crate) struct WeakActorClient {
    sender: mpsc::WeakSender<Event>,
}

impl WeakActorClient {
    pub(crate) async fn deliver(&self, message: VesselMessage) -> Result<Result<(), MessageRefusal>, ActorExited> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Deliver(message, Callback(tx))).await?;
        rx.await.map_err(|_| ActorExited)
    }

    pub(crate) async fn election_timeout(&self, timeout: ElectionTimeout) -> Result<(), ActorExited> {
        self.send(Event::ElectionTimeout(timeout)).await
    }

    pub(crate) async fn ring_successor(&self) -> Result<Option<VesselId>, ActorExited> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::RingSuccessor(Callback(tx))).await?;
        rx.await.map_err(|_| ActorExited)
    }

    pub(crate) async fn peer_unreachable(&self, peer_id: VesselId) -> Result<RingRepair, ActorExited> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::PeerUnreachable(peer_id, Callback(tx))).await?;
        rx.await.map_err(|_| ActorExited)
    }

    pub(crate) async fn submit(&self, op: WriteOp) -> Result<Result<SubmitRoute, SubmitRefusal>, ActorExited> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Submit(op, Callback(tx))).await?;
        rx.await.map_err(|_| ActorExited)
    }

    pub(crate) async fn leader_unreachable(&self, leader_id: VesselId) -> Result<Option<FailoverOutcome>, ActorExited> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::LeaderUnreachable(leader_id, Callback(tx))).await?;
        rx.await.map_err(|_| ActorExited)
    }

    pub(crate) async fn snapshot(&self) -> Result<BoardSnapshot, ActorExited> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Snapshot(Callback(tx))).await?;
        rx.await.map_err(|_| ActorExited)
    }

    async fn send(&self, event: Event) -> Result<(), ActorExited> {
        let sender = self.sender.upgrade().ok_or(ActorExited)?;
        sender.send(event).await.map_err(|_| ActorExited)
    }
}

/// ReplicaActor runs the replica logic in actor model.
pub(crate) struct ReplicaActor {
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event>,
    replica: replica::Replica,
}

impl ReplicaActor {
    pub(crate) fn new(logger: slog::Logger, receiver: mpsc::Receiver<Event>, replica: replica::Replica) -> Self {
        ReplicaActor {
            logger,
            receiver,
            replica,
        }
    }

    pub(crate) async fn run_event_loop(mut self) {
        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }

        slog::info!(self.logger, "Replica event loop has exited");
    }

    // This must NOT be async. Anything slow gets spawned and comes back as another event.
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Deliver(message, callback) => {
                let result = self.replica.handle_message(message);
                callback.send(result);
            }
            Event::ElectionTimeout(timeout) => {
                self.replica.handle_election_timeout(timeout);
            }
            Event::RingSuccessor(callback) => {
                callback.send(self.replica.ring_successor());
            }
            Event::PeerUnreachable(peer_id, callback) => {
                let repair = self.replica.handle_peer_unreachable(peer_id);
                callback.send(repair);
            }
            Event::Submit(op, callback) => {
                let route = self.replica.handle_submit(op);
                callback.send(route);
            }
            Event::LeaderUnreachable(leader_id, callback) => {
                let outcome = self.replica.handle_leader_unreachable(leader_id);
                callback.send(outcome);
            }
            Event::Snapshot(callback) => {
                callback.send(self.replica.snapshot());
            }
        }
    }
}
