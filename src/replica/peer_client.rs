use crate::replica::{VesselId, VesselMessage};
use crate::transport::{PeerTransport, TransportError};
use std::sync::Arc;
use std::time::Duration;

/// PeerClient is how the replica's background tasks reach other vessels. Every send is bounded
/// by `peer_timeout`, whatever the transport does.
#[derive(Clone)]
pub(crate) struct PeerClient {
    logger: slog::Logger,
    transport: Arc<dyn PeerTransport>,
    peer_timeout: Duration,
}

impl PeerClient {
    pub(crate) fn new(logger: slog::Logger, transport: Arc<dyn PeerTransport>, peer_timeout: Duration) -> Self {
        PeerClient {
            logger,
            transport,
            peer_timeout,
        }
    }

    pub(crate) async fn send(&self, to: VesselId, message: VesselMessage) -> Result<(), TransportError> {
        slog::debug!(self.logger, "ClientWire - to {} - {:?}", to, message);
        let result = match tokio::time::timeout(self.peer_timeout, self.transport.send(to, message)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(to, self.peer_timeout)),
        };
        slog::debug!(self.logger, "ClientWire - to {} - {:?}", to, result);

        result
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// RecordingTransport keeps every message it delivered. Sends to vessels marked unreachable
    /// fail as if the vessel was down, and sends to vessels marked not-leader are refused.
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        sent: Mutex<Vec<(VesselId, VesselMessage)>>,
        unreachable: Mutex<HashSet<VesselId>>,
        not_leader: Mutex<HashSet<VesselId>>,
    }

    impl RecordingTransport {
        pub(crate) fn mark_unreachable(&self, id: VesselId) {
            self.unreachable.lock().unwrap().insert(id);
        }

        pub(crate) fn mark_not_leader(&self, id: VesselId) {
            self.not_leader.lock().unwrap().insert(id);
        }

        pub(crate) fn sent(&self) -> Vec<(VesselId, VesselMessage)> {
            self.sent.lock().unwrap().clone()
        }

        pub(crate) fn sent_to(&self, id: VesselId) -> Vec<VesselMessage> {
            self.sent()
                .into_iter()
                .filter(|(to, _)| *to == id)
                .map(|(_, message)| message)
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl PeerTransport for RecordingTransport {
        async fn send(&self, to: VesselId, message: VesselMessage) -> Result<(), TransportError> {
            if self.unreachable.lock().unwrap().contains(&to) {
                return Err(TransportError::Unreachable(to, "test".into()));
            }
            if self.not_leader.lock().unwrap().contains(&to) {
                return Err(TransportError::NotLeader(to));
            }
            self.sent.lock().unwrap().push((to, message));
            Ok(())
        }
    }
}
