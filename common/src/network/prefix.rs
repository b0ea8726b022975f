//! # Network Prefix Models
//!
//! Defines the two prefix granularities the aggregation engine works with:
//! * [`Prefix24`]: an IPv4 address masked to its top three octets.
//! * [`Prefix16`]: an IPv4 address masked to its top two octets.
//!
//! Prefixes render in truncated-dotted form (`"1.2."`, `"1.2.3."`) rather
//! than CIDR notation. Downstream blocklist consumers prefix-match against
//! these strings, so the rendering must stay stable.

use std::fmt;
use std::net::Ipv4Addr;

/// A /16 network, identified by its top two octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix16([u8; 2]);

/// A /24 network, identified by its top three octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix24([u8; 3]);

impl Prefix16 {
    pub fn octets(&self) -> [u8; 2] {
        self.0
    }
}

impl Prefix24 {
    pub fn octets(&self) -> [u8; 3] {
        self.0
    }

    /// The unique /16 containing this /24.
    pub fn parent(&self) -> Prefix16 {
        Prefix16([self.0[0], self.0[1]])
    }
}

impl From<Ipv4Addr> for Prefix16 {
    fn from(addr: Ipv4Addr) -> Self {
        let [a, b, _, _] = addr.octets();
        Self([a, b])
    }
}

impl From<Ipv4Addr> for Prefix24 {
    fn from(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self([a, b, c])
    }
}

impl fmt::Display for Prefix16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.", self.0[0], self.0[1])
    }
}

impl fmt::Display for Prefix24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.", self.0[0], self.0[1], self.0[2])
    }
}
