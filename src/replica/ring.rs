use crate::actor::WeakActorClient;
use crate::replica::peer_client::PeerClient;
use crate::replica::replica_api::RingRepair;
use crate::replica::{VesselId, VesselMessage};

/// RingForwarder delivers one message to the ring successor, repairing the ring on the way.
///
/// When the successor can't be reached, the replica marks it dead and hands back the next alive
/// vessel. Before the message is retried there, the new successor is told about every death we
/// know of and gets every priority we know, so it doesn't miss what the dead vessels would have
/// relayed. Every attempt marks one more vessel dead, so the loop ends after at most `max_id`
/// attempts.
#[derive(Clone)]
pub(crate) struct RingForwarder {
    logger: slog::Logger,
    peer_client: PeerClient,
    actor_client: WeakActorClient,
}

impl RingForwarder {
    pub(crate) fn new(logger: slog::Logger, peer_client: PeerClient, actor_client: WeakActorClient) -> Self {
        RingForwarder {
            logger,
            peer_client,
            actor_client,
        }
    }

    pub(crate) fn spawn_forward(&self, message: VesselMessage) {
        tokio::task::spawn(self.clone().forward(message));
    }

    pub(crate) async fn forward(self, message: VesselMessage) {
        let mut attempts_left: Option<u32> = None;

        loop {
            let successor = match self.actor_client.ring_successor().await {
                Ok(Some(successor)) => successor,
                Ok(None) => {
                    slog::debug!(self.logger, "No one left on the ring to forward {:?} to", message);
                    return;
                }
                Err(_) => return,
            };

            let error = match self.peer_client.send(successor, message.clone()).await {
                Ok(()) => return,
                Err(e) => e,
            };
            slog::warn!(self.logger, "Ring successor {} is unreachable: {}", successor, error);

            let repair = match self.actor_client.peer_unreachable(successor).await {
                Ok(repair) => repair,
                Err(_) => return,
            };

            let budget = attempts_left.get_or_insert(repair.max_id.as_u32());
            *budget = budget.saturating_sub(1);
            if *budget == 0 {
                slog::warn!(self.logger, "Giving up forwarding {:?} around the ring", message);
                return;
            }

            match repair.successor {
                Some(new_successor) if repair.newly_dead => self.bridge(new_successor, &repair).await,
                Some(_) => {}
                None => {
                    slog::info!(self.logger, "Every other vessel is dead");
                    return;
                }
            }
        }
    }

    async fn bridge(&self, new_successor: VesselId, repair: &RingRepair) {
        for dead in repair.known_dead.iter().copied() {
            let notice = VesselMessage::DeadNeighbourInElection {
                dead,
                max_id: repair.max_id,
            };
            if self.peer_client.send(new_successor, notice).await.is_err() {
                // The retry in forward() finds out and repairs again.
                return;
            }
        }

        for (origin, priority) in repair.priorities.iter().copied() {
            let replay = VesselMessage::LeaderElection { origin, priority };
            if self.peer_client.send(new_successor, replay).await.is_err() {
                return;
            }
        }
    }
}
