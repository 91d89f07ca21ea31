//! Common types for the SDN control plane.
//!
//! This crate provides type-safe representations of the primitives that
//! cross the boundary between an OpenFlow switch and its controller:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`DatapathId`]: the stable identifier of one switch
//! - [`PortNo`]: physical and reserved OpenFlow port numbers
//! - [`EthernetFrame`]: the L2 header decoded from a packet-in payload

mod datapath;
mod ethernet;
mod mac;
mod port;

pub use datapath::DatapathId;
pub use ethernet::{
    EthernetFrame, VlanTag, ETHERTYPE_ARP, ETHERTYPE_IPV4, ETHERTYPE_IPV6, ETHERTYPE_VLAN,
    ETH_HEADER_LEN, VLAN_TAG_LEN,
};
pub use mac::MacAddress;
pub use port::PortNo;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid datapath id: {0}")]
    InvalidDatapathId(String),

    #[error("invalid port number: {0}")]
    InvalidPortNo(String),

    #[error("truncated frame: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
}
