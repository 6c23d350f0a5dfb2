use crate::actor::WeakActorClient;
use crate::replica::peer_client::PeerClient;
use crate::replica::replica_api::{SubmitError, SubmitOutput, SubmitRefusal, SubmitRoute, WriteRetryPolicy};
use crate::replica::WriteOp;
use crate::transport::TransportError;

/// WriteCoordinator is the client-facing write path of one vessel.
///
/// The replica decides whether the write is ours to apply. If another vessel leads, the write is
/// sent there from here, outside the actor, so a slow or dead leader never blocks the replica.
/// An unreachable leader triggers failover, then `retry_policy` decides what happens to the write.
/// A leader that answers but refuses the write gets no failover. The route is read once more in
/// case our pointer moved on, and if the same vessel refuses again the write fails.
#[derive(Clone)]
pub(crate) struct WriteCoordinator {
    logger: slog::Logger,
    peer_client: PeerClient,
    actor_client: WeakActorClient,
    retry_policy: WriteRetryPolicy,
    max_failovers: u32,
}

impl WriteCoordinator {
    pub(crate) fn new(
        logger: slog::Logger,
        peer_client: PeerClient,
        actor_client: WeakActorClient,
        retry_policy: WriteRetryPolicy,
        number_of_vessels: u32,
    ) -> Self {
        WriteCoordinator {
            logger,
            peer_client,
            actor_client,
            retry_policy,
            max_failovers: number_of_vessels,
        }
    }

    pub(crate) async fn submit(&self, op: WriteOp) -> Result<SubmitOutput, SubmitError> {
        let mut failovers = 0;
        let mut refused_by = None;
        let mut refusals = 0;

        loop {
            let route = self
                .actor_client
                .submit(op.clone())
                .await
                .map_err(|_| SubmitError::VesselExited)?
                .map_err(|refusal| match refusal {
                    SubmitRefusal::NoLeader => SubmitError::NoLeader,
                })?;

            let leader = match route {
                SubmitRoute::Applied { key } => return Ok(SubmitOutput::Applied { key }),
                SubmitRoute::ForwardToLeader { leader } => leader,
            };

            let error = match self.peer_client.send(leader, op.to_leader_message()).await {
                Ok(()) => return Ok(SubmitOutput::Forwarded { leader }),
                Err(TransportError::NotLeader(_)) => {
                    slog::warn!(self.logger, "Vessel {} refused {:?}, it doesn't lead", leader, op);
                    refusals += 1;
                    if refused_by == Some(leader) || refusals > self.max_failovers {
                        return Err(SubmitError::LeaderRefused { leader });
                    }
                    refused_by = Some(leader);
                    continue;
                }
                Err(e) => e,
            };
            slog::warn!(self.logger, "Leader {} is unreachable: {}", leader, error);

            let outcome = self
                .actor_client
                .leader_unreachable(leader)
                .await
                .map_err(|_| SubmitError::VesselExited)?
                .ok_or(SubmitError::NoLeader)?;
            failovers += 1;

            if let Some(announcement) = outcome.announcement {
                // If this fails, the retry finds the new leader unreachable too and fails over again.
                if let Err(e) = self.peer_client.send(outcome.new_leader, announcement).await {
                    slog::warn!(self.logger, "Failed to tell {} it leads now: {}", outcome.new_leader, e);
                }
            }

            match self.retry_policy {
                WriteRetryPolicy::ReturnAfterFailover => {
                    return Err(SubmitError::LeaderFailedOver {
                        failed_leader: leader,
                        new_leader: outcome.new_leader,
                    });
                }
                WriteRetryPolicy::RetryOnNewLeader => {
                    if failovers >= self.max_failovers {
                        return Err(SubmitError::RetriesExhausted { attempts: failovers });
                    }
                    slog::info!(
                        self.logger,
                        "Retrying {:?} on leader {} (epoch {})",
                        op,
                        outcome.new_leader,
                        outcome.leader_epoch
                    );
                }
            }
        }
    }
}
