use crate::actor::WeakActorClient;
use crate::replica::{MessageRefusal, VesselId, VesselMessage};

/// VesselInbox is where a transport hands over messages addressed to this vessel.
///
/// It doesn't keep the vessel alive. Once the `Vessel` is dropped, deliveries fail.
#[derive(Clone)]
pub struct VesselInbox {
    actor_client: WeakActorClient,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Vessel has shut down")]
    VesselExited,
    #[error("Vessel is not the leader (current leader: {leader:?})")]
    NotLeader { leader: Option<VesselId> },
}

impl VesselInbox {
    pub(crate) fn new(actor_client: WeakActorClient) -> Self {
        VesselInbox { actor_client }
    }

    /// Resolves once the vessel has handled `message`. Messages the vessel decides to ignore,
    /// such as stale announcements, still count as delivered. A leader-directed write sent to a
    /// vessel that doesn't lead fails with `NotLeader`, and is not applied.
    pub async fn deliver(&self, message: VesselMessage) -> Result<(), DeliveryError> {
        self.actor_client
            .deliver(message)
            .await
            .map_err(|_| DeliveryError::VesselExited)?
            .map_err(|refusal| match refusal {
                MessageRefusal::NotLeader { leader } => DeliveryError::NotLeader { leader },
            })
    }
}
