use crate::api::{DeliveryError, VesselInbox};
use crate::replica::{VesselId, VesselMessage};
use crate::transport::{PeerTransport, TransportError};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// InProcessNetwork connects vessels running in the same process. Every vessel registers its
/// inbox, and gets its own `InProcessTransport` to reach the others.
///
/// `kill()` takes a vessel off the network: nothing reaches it and nothing it sends gets out,
/// which is what a crashed vessel looks like to its peers.
#[derive(Clone, Default)]
pub struct InProcessNetwork {
    inner: Arc<Mutex<NetworkState>>,
}

#[derive(Default)]
struct NetworkState {
    inboxes: HashMap<VesselId, VesselInbox>,
    killed: HashSet<VesselId>,
}

impl InProcessNetwork {
    pub fn new() -> Self {
        InProcessNetwork::default()
    }

    pub fn transport_for(&self, vessel_id: VesselId) -> InProcessTransport {
        InProcessTransport {
            network: self.clone(),
            from: vessel_id,
        }
    }

    pub fn register(&self, vessel_id: VesselId, inbox: VesselInbox) {
        self.state().inboxes.insert(vessel_id, inbox);
    }

    pub fn kill(&self, vessel_id: VesselId) {
        self.state().killed.insert(vessel_id);
    }

    pub fn is_killed(&self, vessel_id: VesselId) -> bool {
        self.state().killed.contains(&vessel_id)
    }

    fn route(&self, from: VesselId, to: VesselId) -> Result<VesselInbox, TransportError> {
        let state = self.state();
        if state.killed.contains(&from) {
            return Err(TransportError::Unreachable(to, format!("sender {} is down", from)));
        }
        if state.killed.contains(&to) {
            return Err(TransportError::Unreachable(to, "vessel is down".to_string()));
        }

        state
            .inboxes
            .get(&to)
            .cloned()
            .ok_or_else(|| TransportError::Unreachable(to, "vessel never joined the network".to_string()))
    }

    fn state(&self) -> MutexGuard<'_, NetworkState> {
        // Nothing panics while holding the lock, but don't take the whole network down if it did.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct InProcessTransport {
    network: InProcessNetwork,
    from: VesselId,
}

#[async_trait::async_trait]
impl PeerTransport for InProcessTransport {
    async fn send(&self, to: VesselId, message: VesselMessage) -> Result<(), TransportError> {
        let inbox = self.network.route(self.from, to)?;
        inbox
            .deliver(message)
            .await
            .map_err(|e| match e {
                DeliveryError::NotLeader { .. } => TransportError::NotLeader(to),
                DeliveryError::VesselExited => TransportError::Rejected(to, e.to_string()),
            })
    }
}
