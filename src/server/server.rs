use crate::api::{ClientForm, DeliveryError, VesselInbox};
use crate::grpc::grpc_vessel_server::{GrpcVessel, GrpcVesselServer};
use crate::grpc::proto_client_submit_reply::Outcome;
use crate::grpc::{ProtoClientSubmit, ProtoClientSubmitReply, ProtoVesselAck, ProtoVesselPost};
use crate::replica::{SubmitError, SubmitOutput, VesselMessage, WriteCoordinator};
use crate::server::RpcServerShutdownSignal;
use crate::transport::from_proto;
use std::convert::TryFrom;
use std::net::SocketAddr;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// RpcServer is the type that implements the vessel gRPC interface. Peers post messages to the
/// inbox, clients submit board forms to the write path.
pub(crate) struct RpcServer {
    logger: slog::Logger,
    inbox: VesselInbox,
    write_coordinator: WriteCoordinator,
}

impl RpcServer {
    pub(crate) fn new(logger: slog::Logger, inbox: VesselInbox, write_coordinator: WriteCoordinator) -> Self {
        RpcServer {
            logger,
            inbox,
            write_coordinator,
        }
    }

    pub(crate) async fn run(self, socket_addr: SocketAddr, shutdown_signal: RpcServerShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening on '{:?}'", socket_addr);

        let result = Server::builder()
            .add_service(GrpcVesselServer::new(self))
            .serve_with_shutdown(socket_addr, shutdown_signal.wait())
            .await;

        slog::info!(logger, "Server run() has exited: {:?}", result);
    }

    async fn handle_post(&self, rpc_request: ProtoVesselPost) -> Result<ProtoVesselAck, Status> {
        let message = VesselMessage::try_from(from_proto(rpc_request))
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        self.inbox
            .deliver(message)
            .await
            .map_err(|e| match e {
                DeliveryError::NotLeader { .. } => Status::failed_precondition(e.to_string()),
                DeliveryError::VesselExited => Status::unavailable(e.to_string()),
            })?;

        Ok(ProtoVesselAck {})
    }

    async fn handle_submit(&self, rpc_request: ProtoClientSubmit) -> Result<ProtoClientSubmitReply, Status> {
        let op = ClientForm::parse(&rpc_request.path, &rpc_request.fields)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let outcome = match self.write_coordinator.submit(op).await.map_err(convert_submit_error)? {
            SubmitOutput::Applied { key } => Outcome::AppliedKey(key),
            SubmitOutput::Forwarded { leader } => Outcome::ForwardedTo(leader.as_u32()),
        };

        Ok(ProtoClientSubmitReply { outcome: Some(outcome) })
    }
}

fn convert_submit_error(error: SubmitError) -> Status {
    match error {
        SubmitError::LeaderFailedOver { .. } | SubmitError::LeaderRefused { .. } => {
            Status::aborted(error.to_string())
        }
        SubmitError::NoLeader | SubmitError::RetriesExhausted { .. } | SubmitError::VesselExited => {
            Status::unavailable(error.to_string())
        }
    }
}

#[async_trait::async_trait]
impl GrpcVessel for RpcServer {
    async fn post(&self, rpc_request_wrapped: Request<ProtoVesselPost>) -> Result<Response<ProtoVesselAck>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_post(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }

    async fn submit(
        &self,
        rpc_request_wrapped: Request<ProtoClientSubmit>,
    ) -> Result<Response<ProtoClientSubmitReply>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_submit(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        rpc_result.map(Response::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::{AddressScheme, WireFields};
    use crate::{InProcessNetwork, Role, Vessel, VesselConfig, VesselId, VesselOptions};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tonic::Code;

    fn create_lone_vessel(settle_delay: Duration) -> (Vessel, RpcServer) {
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        let network = InProcessNetwork::new();
        let vessel = crate::create_vessel_with_transport(
            VesselConfig {
                my_vessel_id: 1,
                number_of_vessels: 1,
                addressing: AddressScheme::Loopback { base_port: 0 },
                info_logger: logger.clone(),
                options: VesselOptions {
                    settle_delay: Some(settle_delay),
                    finalize_delay: Some(Duration::from_millis(10)),
                    ..VesselOptions::default()
                },
            },
            Arc::new(network.transport_for(VesselId::new(1))),
        )
        .expect("Vessel creation failed");
        let server = RpcServer::new(logger, vessel.inbox(), vessel.board.write_coordinator());

        (vessel, server)
    }

    async fn wait_until_leader(vessel: &Vessel) {
        for _ in 0..500 {
            if vessel.board.snapshot().await.expect("Vessel is gone").role == Role::Leader {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Vessel never became leader");
    }

    fn form(path: &str, fields: &[(&str, &str)]) -> Request<ProtoClientSubmit> {
        Request::new(ProtoClientSubmit {
            path: path.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[tokio::test]
    async fn submitted_form_is_applied_by_leader() {
        let (vessel, server) = create_lone_vessel(Duration::from_millis(10));
        wait_until_leader(&vessel).await;

        let reply = server
            .submit(form("/board", &[("entry", "hello")]))
            .await
            .expect("Submit failed")
            .into_inner();
        server
            .submit(form("/entries/0", &[("delete", "0"), ("entry", "HELLO")]))
            .await
            .expect("Submit failed");

        assert_eq!(reply.outcome, Some(Outcome::AppliedKey(0)));
        let snapshot = vessel.board.snapshot().await.expect("Vessel is gone");
        assert_eq!(snapshot.entries, vec![(0, "HELLO".to_string())]);
    }

    #[tokio::test]
    async fn malformed_form_is_invalid_argument() {
        let (_vessel, server) = create_lone_vessel(Duration::from_millis(10));

        let status = server
            .submit(form("/entries/0", &[("delete", "maybe")]))
            .await
            .expect_err("Form should be rejected");

        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn submit_without_leader_is_unavailable() {
        let (_vessel, server) = create_lone_vessel(Duration::from_secs(60));

        let status = server
            .submit(form("/board", &[("entry", "too early")]))
            .await
            .expect_err("No leader yet");

        assert_eq!(status.code(), Code::Unavailable);
    }

    #[tokio::test]
    async fn leader_write_posted_to_non_leader_is_failed_precondition() {
        let (vessel, server) = create_lone_vessel(Duration::from_secs(60));

        let fields = WireFields::from(&VesselMessage::SubmitEntryToLeader { value: "lost".into() });
        let post = ProtoVesselPost {
            path: fields.path,
            action: fields.action,
            key: fields.key,
            value: fields.value,
            epoch: fields.epoch,
        };

        let status = server
            .post(Request::new(post))
            .await
            .expect_err("Vessel doesn't lead yet");

        assert_eq!(status.code(), Code::FailedPrecondition);
        assert!(vessel.board.snapshot().await.expect("Vessel is gone").entries.is_empty());
    }
}
