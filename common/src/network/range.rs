use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use pnet::ipnetwork::IpNetwork;

use crate::error::ScanError;

/// Largest network a single scan will expand.
pub const MAX_RANGE_HOSTS: u128 = 1 << 16;

/// The usable host addresses of a network, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostRange {
    V4 { start_addr: Ipv4Addr, end_addr: Ipv4Addr },
    V6 { start_addr: Ipv6Addr, end_addr: Ipv6Addr },
}

impl HostRange {
    /// Usable hosts of `network` following standard subnetting rules.
    ///
    /// IPv4 drops the network and broadcast addresses except on /31 and /32.
    /// IPv6 has no broadcast, so only the subnet-router anycast address is
    /// dropped, except on /127 and /128.
    pub fn of(network: IpNetwork) -> Self {
        match network {
            IpNetwork::V4(net) => {
                let first: u32 = net.network().into();
                let last: u32 = net.broadcast().into();
                let (start, end) = if net.prefix() >= 31 {
                    (first, last)
                } else {
                    (first + 1, last - 1)
                };
                HostRange::V4 {
                    start_addr: Ipv4Addr::from(start),
                    end_addr: Ipv4Addr::from(end),
                }
            }
            IpNetwork::V6(net) => {
                let prefix = net.prefix();
                let mask: u128 = if prefix == 0 {
                    0
                } else {
                    u128::MAX << (128 - u32::from(prefix))
                };
                let first: u128 = u128::from(net.ip()) & mask;
                let last: u128 = first | !mask;
                let start = if prefix >= 127 { first } else { first + 1 };
                HostRange::V6 {
                    start_addr: Ipv6Addr::from(start),
                    end_addr: Ipv6Addr::from(last),
                }
            }
        }
    }

    fn bounds(&self) -> (u128, u128) {
        match *self {
            HostRange::V4 { start_addr, end_addr } => {
                (u32::from(start_addr).into(), u32::from(end_addr).into())
            }
            HostRange::V6 { start_addr, end_addr } => (start_addr.into(), end_addr.into()),
        }
    }

    pub fn len(&self) -> u128 {
        let (start, end) = self.bounds();
        if start > end {
            0
        } else {
            (end - start).saturating_add(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hosts in ascending numeric order.
    pub fn to_iter(&self) -> impl Iterator<Item = IpAddr> {
        let (start, end) = self.bounds();
        let is_v6 = matches!(self, HostRange::V6 { .. });
        (start..=end).map(move |n| {
            if is_v6 {
                IpAddr::V6(Ipv6Addr::from(n))
            } else {
                IpAddr::V4(Ipv4Addr::from(n as u32))
            }
        })
    }
}

/// Parses CIDR notation like "192.168.1.0/24" or "fd00::/120".
///
/// Host bits are masked off, so "192.168.1.77/24" names the same network.
/// A bare address is read as a single-host network.
pub fn parse_cidr(s: &str) -> Result<IpNetwork, ScanError> {
    let trimmed = s.trim();
    let invalid = |reason: String| ScanError::InvalidRange {
        input: s.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("empty range".to_string()));
    }

    let network = trimmed
        .parse::<IpNetwork>()
        .map_err(|e| invalid(e.to_string()))?;

    IpNetwork::new(network.network(), network.prefix()).map_err(|e| invalid(e.to_string()))
}

/// Expands a CIDR string into its usable hosts, refusing oversized networks.
pub fn cidr_hosts(cidr: &str) -> Result<HostRange, ScanError> {
    let range = HostRange::of(parse_cidr(cidr)?);
    let hosts = range.len();
    if hosts > MAX_RANGE_HOSTS {
        return Err(ScanError::RangeTooLarge {
            cidr: cidr.trim().to_string(),
            hosts,
            limit: MAX_RANGE_HOSTS,
        });
    }
    Ok(range)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
