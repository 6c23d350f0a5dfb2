use crate::actor::{ActorClient, ReplicaActor};
use crate::api::options::VesselOptionsValidated;
use crate::replica::{AddressScheme, PeerClient, Replica, ReplicaConfig, VesselId, WriteCoordinator};
use crate::server::{RpcServer, RpcServerShutdownHandle};
use crate::transport::{GrpcPeerTransport, PeerTransport};
use crate::{server, Board, EventListener, VesselInbox, VesselOptions};
use std::convert::TryFrom;
use std::sync::Arc;

pub struct VesselConfig {
    /// 1-based. Vessels of a cluster are numbered `1..=number_of_vessels`.
    pub my_vessel_id: u32,
    pub number_of_vessels: u32,
    pub addressing: AddressScheme,
    pub info_logger: slog::Logger,
    pub options: VesselOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum VesselCreationError {
    #[error("Vessel id {my_vessel_id} is not in 1..={number_of_vessels}")]
    VesselIdOutOfRange { my_vessel_id: u32, number_of_vessels: u32 },
    #[error("{number_of_vessels} vessels don't fit in {addressing:?}, it has room for {max_vessel_id}")]
    TooManyVessels {
        number_of_vessels: u32,
        addressing: AddressScheme,
        max_vessel_id: u32,
    },
    #[error("Illegal options for configuring vessel: {0}")]
    IllegalOptions(String),
}

/// Vessel is one running member of the cluster. Dropping it stops the vessel: the replica task
/// exits, and the gRPC server (if any) shuts down.
pub struct Vessel {
    pub board: Board,
    pub event_listener: EventListener,
    vessel_id: VesselId,
    inbox: VesselInbox,
    _server_shutdown_handle: Option<RpcServerShutdownHandle>,
}

impl Vessel {
    pub fn vessel_id(&self) -> VesselId {
        self.vessel_id
    }

    /// The inbox that transports deliver this vessel's messages to.
    pub fn inbox(&self) -> VesselInbox {
        self.inbox.clone()
    }
}

/// `try_create_vessel()` starts a vessel that talks gRPC. It serves on its own address from
/// `config.addressing` and reaches peers on theirs.
pub async fn try_create_vessel(config: VesselConfig) -> Result<Vessel, VesselCreationError> {
    let transport = Arc::new(GrpcPeerTransport::new(config.addressing));
    let my_server_addr = config.addressing.address(VesselId::new(config.my_vessel_id));

    let (mut vessel, logger) = build_vessel(config, transport)?;

    let (server_shutdown_handle, server_shutdown_signal) = server::shutdown_signal();
    let rpc_server = RpcServer::new(logger, vessel.inbox(), vessel.board.write_coordinator());
    tokio::spawn(rpc_server.run(my_server_addr, server_shutdown_signal));
    vessel._server_shutdown_handle = Some(server_shutdown_handle);

    Ok(vessel)
}

/// `create_vessel_with_transport()` starts a vessel that reaches its peers through `transport`.
/// Delivering messages to it is up to the caller, through `Vessel::inbox()`.
///
/// Must be called from within a tokio runtime.
pub fn create_vessel_with_transport(
    config: VesselConfig,
    transport: Arc<dyn PeerTransport>,
) -> Result<Vessel, VesselCreationError> {
    build_vessel(config, transport).map(|(vessel, _)| vessel)
}

fn build_vessel(
    config: VesselConfig,
    transport: Arc<dyn PeerTransport>,
) -> Result<(Vessel, slog::Logger), VesselCreationError> {
    if config.my_vessel_id == 0 || config.my_vessel_id > config.number_of_vessels {
        return Err(VesselCreationError::VesselIdOutOfRange {
            my_vessel_id: config.my_vessel_id,
            number_of_vessels: config.number_of_vessels,
        });
    }

    let max_vessel_id = config.addressing.max_vessel_id();
    if config.number_of_vessels > max_vessel_id {
        return Err(VesselCreationError::TooManyVessels {
            number_of_vessels: config.number_of_vessels,
            addressing: config.addressing,
            max_vessel_id,
        });
    }

    let options = VesselOptionsValidated::try_from(config.options)
        .map_err(|e| VesselCreationError::IllegalOptions(e.to_string()))?;

    let my_vessel_id = VesselId::new(config.my_vessel_id);
    let logger = config
        .info_logger
        .new(slog::o!("VesselId" => my_vessel_id.to_string()));

    let (actor_client, actor_queue_rx) = ActorClient::new(64);
    let peer_client = PeerClient::new(logger.clone(), transport, options.peer_timeout);

    let (replica, election_state_change_listener) = Replica::new(ReplicaConfig {
        logger: logger.clone(),
        my_vessel_id,
        number_of_vessels: config.number_of_vessels,
        peer_client: peer_client.clone(),
        actor_client: actor_client.weak(),
        settle_delay: options.settle_delay,
        finalize_delay: options.finalize_delay,
        priority: options.priority,
    });
    replica.start_settle_timer();

    let write_coordinator = WriteCoordinator::new(
        logger.clone(),
        peer_client,
        actor_client.weak(),
        options.write_retry_policy,
        config.number_of_vessels,
    );
    let inbox = VesselInbox::new(actor_client.weak());

    let replica_actor = ReplicaActor::new(logger.clone(), actor_queue_rx, replica);
    tokio::spawn(replica_actor.run_event_loop());

    slog::info!(logger, "Vessel {} of {} started", my_vessel_id, config.number_of_vessels);

    let vessel = Vessel {
        board: Board::new(actor_client, write_coordinator),
        event_listener: EventListener::new(election_state_change_listener),
        vessel_id: my_vessel_id,
        inbox,
        _server_shutdown_handle: None,
    };

    Ok((vessel, logger))
}
