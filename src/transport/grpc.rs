use crate::grpc::grpc_vessel_client::GrpcVesselClient;
use crate::grpc::ProtoVesselPost;
use crate::replica::{AddressScheme, VesselId, VesselMessage, WireFields};
use crate::transport::{PeerTransport, TransportError};
use tonic::transport::Endpoint;
use tonic::Code;

/// GrpcPeerTransport opens a fresh connection for every message. Vessels only talk in short
/// bursts, and a dead peer then shows up as a failed connect instead of a stale channel.
pub struct GrpcPeerTransport {
    addressing: AddressScheme,
}

impl GrpcPeerTransport {
    pub fn new(addressing: AddressScheme) -> Self {
        GrpcPeerTransport { addressing }
    }
}

#[async_trait::async_trait]
impl PeerTransport for GrpcPeerTransport {
    async fn send(&self, to: VesselId, message: VesselMessage) -> Result<(), TransportError> {
        let url = format!("http://{}", self.addressing.address(to));
        let endpoint = Endpoint::from_shared(url).map_err(|e| TransportError::Unreachable(to, e.to_string()))?;
        let connection = endpoint
            .connect()
            .await
            .map_err(|e| TransportError::Unreachable(to, e.to_string()))?;

        let mut client = GrpcVesselClient::new(connection);
        client
            .post(to_proto(WireFields::from(&message)))
            .await
            .map(|_| ())
            .map_err(|status| match status.code() {
                Code::FailedPrecondition => TransportError::NotLeader(to),
                _ => TransportError::Rejected(to, status.message().to_string()),
            })
    }
}

pub(crate) fn to_proto(fields: WireFields) -> ProtoVesselPost {
    ProtoVesselPost {
        path: fields.path,
        action: fields.action,
        key: fields.key,
        value: fields.value,
        epoch: fields.epoch,
    }
}

pub(crate) fn from_proto(post: ProtoVesselPost) -> WireFields {
    WireFields {
        path: post.path,
        action: post.action,
        key: post.key,
        value: post.value,
        epoch: post.epoch,
    }
}
