use crate::actor::{ActorClient, WeakActorClient};
use crate::replica::{BoardSnapshot, SubmitError, SubmitOutput, WriteCoordinator, WriteOp};

/// Board is the client-facing side of a vessel: writes go in through `submit()`, the current
/// state of the board comes out of `snapshot()`.
pub struct Board {
    // Keeps the replica actor running for as long as the board exists.
    _actor_client: ActorClient,
    weak_actor_client: WeakActorClient,
    write_coordinator: WriteCoordinator,
}

#[derive(Debug, thiserror::Error)]
#[error("Vessel has shut down")]
pub struct SnapshotError;

impl Board {
    pub(crate) fn new(actor_client: ActorClient, write_coordinator: WriteCoordinator) -> Self {
        Board {
            weak_actor_client: actor_client.weak(),
            _actor_client: actor_client,
            write_coordinator,
        }
    }

    /// `submit()` applies `op` on the leader. If this vessel is the leader, it's applied before
    /// this returns. Otherwise it returns once the leader has accepted it, and the leader's copy
    /// reaches this vessel's board shortly after.
    pub async fn submit(&self, op: WriteOp) -> Result<SubmitOutput, SubmitError> {
        self.write_coordinator.submit(op).await
    }

    pub(crate) fn write_coordinator(&self) -> WriteCoordinator {
        self.write_coordinator.clone()
    }

    pub async fn snapshot(&self) -> Result<BoardSnapshot, SnapshotError> {
        self.weak_actor_client.snapshot().await.map_err(|_| SnapshotError)
    }
}
