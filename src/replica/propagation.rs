use crate::replica::peer_client::PeerClient;
use crate::replica::{VesselId, VesselMessage};

/// Sends `message` to each of `targets` on its own detached task and returns right away.
///
/// One attempt per target. A failure is logged and that's it: the target is not marked dead and
/// will just miss this message. Nothing waits on these tasks.
pub(crate) fn spawn_fan_out(
    logger: &slog::Logger,
    peer_client: &PeerClient,
    targets: Vec<VesselId>,
    message: VesselMessage,
) {
    for target in targets {
        let logger = logger.clone();
        let peer_client = peer_client.clone();
        let message = message.clone();

        tokio::task::spawn(async move {
            if let Err(e) = peer_client.send(target, message).await {
                slog::warn!(logger, "Propagation to vessel {} failed: {}", target, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::peer_client::test_utils::RecordingTransport;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn each_reachable_target_gets_one_copy() {
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        let transport = Arc::new(RecordingTransport::default());
        transport.mark_unreachable(VesselId::new(3));
        let peer_client = PeerClient::new(logger.clone(), transport.clone(), Duration::from_secs(1));
        let message = VesselMessage::DeleteOnVessels { key: 4 };

        spawn_fan_out(
            &logger,
            &peer_client,
            vec![VesselId::new(2), VesselId::new(3), VesselId::new(4)],
            message.clone(),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(transport.sent_to(VesselId::new(2)), vec![message.clone()]);
        assert_eq!(transport.sent_to(VesselId::new(3)), vec![]);
        assert_eq!(transport.sent_to(VesselId::new(4)), vec![message]);
    }
}
