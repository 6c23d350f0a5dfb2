mod actor;
mod api;
mod replica;
mod server;
mod transport;
mod grpc {
    include!("../generated/vessel.rs");
}

pub use api::create_vessel_with_transport;
pub use api::try_create_vessel;
pub use api::Board;
pub use api::ClientForm;
pub use api::ClientFormError;
pub use api::DeliveryError;
pub use api::ElectionEvent;
pub use api::EventListener;
pub use api::FollowerEventData;
pub use api::SnapshotError;
pub use api::Vessel;
pub use api::VesselConfig;
pub use api::VesselCreationError;
pub use api::VesselEvent;
pub use api::VesselInbox;
pub use api::VesselOptions;
pub use replica::Action;
pub use replica::AddressScheme;
pub use replica::BoardPath;
pub use replica::BoardSnapshot;
pub use replica::RecordOp;
pub use replica::Role;
pub use replica::SubmitError;
pub use replica::SubmitOutput;
pub use replica::VesselId;
pub use replica::VesselMessage;
pub use replica::WireError;
pub use replica::WireFields;
pub use replica::WriteOp;
pub use replica::WriteRetryPolicy;
pub use transport::GrpcPeerTransport;
pub use transport::InProcessNetwork;
pub use transport::InProcessTransport;
pub use transport::PeerTransport;
pub use transport::TransportError;

// `crate::{root_mod}` holds no code, only `mod` and `pub use` statements. No `mod` is `pub`;
// everything public is exported through an individual use statement.
