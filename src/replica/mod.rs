mod election;
mod membership;
mod messages;
mod peer_client;
mod peers;
mod propagation;
mod replica;
mod replica_api;
mod ring;
mod store;
mod write_coordinator;

pub(crate) use election::ElectionStateChangeListener;
pub(crate) use election::ElectionStateSnapshot;
pub(crate) use election::ElectionTimeout;
pub use messages::Action;
pub use messages::BoardPath;
pub use messages::VesselMessage;
pub use messages::WireError;
pub use messages::WireFields;
pub use messages::WriteOp;
pub(crate) use peer_client::PeerClient;
pub use peers::AddressScheme;
pub use peers::VesselId;
pub(crate) use replica::Replica;
pub(crate) use replica::ReplicaConfig;
pub(crate) use replica_api::FailoverOutcome;
pub(crate) use replica_api::MessageRefusal;
pub(crate) use replica_api::RingRepair;
pub(crate) use replica_api::SubmitRefusal;
pub(crate) use replica_api::SubmitRoute;
pub use replica_api::BoardSnapshot;
pub use replica_api::Role;
pub use replica_api::SubmitError;
pub use replica_api::SubmitOutput;
pub use replica_api::WriteRetryPolicy;
pub use store::RecordOp;
pub(crate) use write_coordinator::WriteCoordinator;
