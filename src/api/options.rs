use crate::replica::WriteRetryPolicy;
use std::convert::TryFrom;
use tokio::time::Duration;

/// VesselOptions tunes a vessel. Anything left as `None` gets its default.
#[derive(Clone, Default)]
pub struct VesselOptions {
    /// How long to wait after startup before joining the election. Default 1s.
    pub settle_delay: Option<Duration>,
    /// How long to wait, once every vessel is accounted for, before picking the leader. Gives
    /// in-flight death notices time to arrive. Default 15s.
    pub finalize_delay: Option<Duration>,
    /// Upper bound on any single call to a peer. A peer that doesn't answer in time is dead.
    /// Default 30s.
    pub peer_timeout: Option<Duration>,
    pub write_retry_policy: Option<WriteRetryPolicy>,
    /// Use this election priority instead of a random one.
    pub priority: Option<u64>,
}

pub(super) struct VesselOptionsValidated {
    pub settle_delay: Duration,
    pub finalize_delay: Duration,
    pub peer_timeout: Duration,
    pub write_retry_policy: WriteRetryPolicy,
    pub priority: Option<u64>,
}

impl VesselOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.peer_timeout == Duration::from_millis(0) {
            return Err("Peer timeout must be greater than zero");
        }

        Ok(())
    }
}

impl TryFrom<VesselOptions> for VesselOptionsValidated {
    type Error = &'static str;

    fn try_from(options: VesselOptions) -> Result<Self, Self::Error> {
        let values = VesselOptionsValidated {
            settle_delay: options.settle_delay.unwrap_or(Duration::from_secs(1)),
            finalize_delay: options.finalize_delay.unwrap_or(Duration::from_secs(15)),
            peer_timeout: options.peer_timeout.unwrap_or(Duration::from_secs(30)),
            write_retry_policy: options.write_retry_policy.unwrap_or_default(),
            priority: options.priority,
        };

        values.validate()?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = VesselOptionsValidated::try_from(VesselOptions::default()).unwrap();

        assert_eq!(options.settle_delay, Duration::from_secs(1));
        assert_eq!(options.finalize_delay, Duration::from_secs(15));
        assert_eq!(options.peer_timeout, Duration::from_secs(30));
        assert_eq!(options.write_retry_policy, WriteRetryPolicy::RetryOnNewLeader);
        assert_eq!(options.priority, None);
    }

    #[test]
    fn zero_peer_timeout_is_illegal() {
        let result = VesselOptionsValidated::try_from(VesselOptions {
            peer_timeout: Some(Duration::from_millis(0)),
            ..VesselOptions::default()
        });

        assert!(result.is_err());
    }
}
