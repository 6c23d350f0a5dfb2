use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::num::ParseIntError;
use std::str::FromStr;

/// VesselId identifies one node of the cluster. Valid ids are `1..=N`, where `N` is the cluster
/// size every vessel is started with.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct VesselId(u32);

impl VesselId {
    pub fn new(id: u32) -> Self {
        VesselId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VesselId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(VesselId)
    }
}

/// AddressScheme is how a vessel's address is derived from its id. There is no discovery; every
/// vessel can compute every other vessel's address from the id alone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddressScheme {
    /// `a.b.c.<id>:<port>`, every vessel listening on the same port.
    Subnet { prefix: [u8; 3], port: u16 },
    /// `127.0.0.1:<base_port + id>`. Handy for running a whole cluster on one machine.
    Loopback { base_port: u16 },
}

impl AddressScheme {
    /// The largest id that still gets an address of its own. Vessel creation refuses clusters
    /// larger than this.
    pub fn max_vessel_id(&self) -> u32 {
        match *self {
            AddressScheme::Subnet { .. } => u32::from(u8::MAX),
            AddressScheme::Loopback { base_port } => u32::from(u16::MAX - base_port),
        }
    }

    /// Only meaningful for ids up to `max_vessel_id()`.
    pub fn address(&self, id: VesselId) -> SocketAddr {
        match *self {
            AddressScheme::Subnet { prefix, port } => {
                let last_octet = id.as_u32() as u8;
                SocketAddr::V4(SocketAddrV4::new(
                    Ipv4Addr::new(prefix[0], prefix[1], prefix[2], last_octet),
                    port,
                ))
            }
            AddressScheme::Loopback { base_port } => SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::LOCALHOST,
                base_port + id.as_u32() as u16,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subnet_addresses_use_id_as_last_octet() {
        let scheme = AddressScheme::Subnet {
            prefix: [10, 1, 0],
            port: 8080,
        };

        assert_eq!(
            scheme.address(VesselId::new(7)),
            "10.1.0.7:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn loopback_addresses_offset_port_by_id() {
        let scheme = AddressScheme::Loopback { base_port: 47000 };

        assert_eq!(
            scheme.address(VesselId::new(3)),
            "127.0.0.1:47003".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn max_vessel_id_is_what_the_address_has_room_for() {
        let subnet = AddressScheme::Subnet {
            prefix: [10, 1, 0],
            port: 80,
        };
        let loopback = AddressScheme::Loopback { base_port: 65000 };

        assert_eq!(subnet.max_vessel_id(), 255);
        assert_eq!(loopback.max_vessel_id(), 535);
        assert_eq!(
            loopback.address(VesselId::new(535)),
            "127.0.0.1:65535".parse::<SocketAddr>().unwrap()
        );
    }
}
