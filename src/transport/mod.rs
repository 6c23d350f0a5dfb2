mod grpc;
mod in_process;

pub use grpc::GrpcPeerTransport;
pub(crate) use grpc::from_proto;
pub use in_process::InProcessNetwork;
pub use in_process::InProcessTransport;

use crate::replica::{VesselId, VesselMessage};
use std::time::Duration;

/// PeerTransport delivers one message to one peer and reports whether the peer took it.
///
/// `NotLeader` means the peer is up but turned a leader-directed write away. Any other error means
/// the peer is treated as unreachable by ring forwarding and by the write path. There is no retry
/// at this level.
#[async_trait::async_trait]
pub trait PeerTransport: Send + Sync + 'static {
    async fn send(&self, to: VesselId, message: VesselMessage) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Vessel {0} is unreachable: {1}")]
    Unreachable(VesselId, String),
    #[error("Vessel {0} did not answer within {1:?}")]
    Timeout(VesselId, Duration),
    #[error("Vessel {0} rejected the message: {1}")]
    Rejected(VesselId, String),
    #[error("Vessel {0} is not the leader")]
    NotLeader(VesselId),
}
