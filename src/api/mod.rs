//! This mod is meant to hold most of the code for the library's client-facing API.
mod board;
mod client_form;
mod event_bus;
mod inbox;
mod options;
mod wiring;

pub use board::Board;
pub use board::SnapshotError;
pub use client_form::ClientForm;
pub use client_form::ClientFormError;
pub use event_bus::ElectionEvent;
pub use event_bus::EventListener;
pub use event_bus::FollowerEventData;
pub use event_bus::VesselEvent;
pub use inbox::DeliveryError;
pub use inbox::VesselInbox;
pub use options::VesselOptions;
pub use wiring::create_vessel_with_transport;
pub use wiring::try_create_vessel;
pub use wiring::Vessel;
pub use wiring::VesselConfig;
pub use wiring::VesselCreationError;
