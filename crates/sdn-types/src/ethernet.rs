//! Ethernet II header decoding for packet-in payloads.
//!
//! ```text
//! +-------------+-------------+----------------------+-----------+---------+
//! | Destination |   Source    | 802.1Q tag (optional)| EtherType | Payload |
//! |  (6 bytes)  |  (6 bytes)  |  TPID 0x8100 + TCI   | (2 bytes) |         |
//! +-------------+-------------+----------------------+-----------+---------+
//! ```

use crate::{MacAddress, ParseError};
use serde::{Deserialize, Serialize};

/// Ethernet header size (6 + 6 + 2 = 14 bytes)
pub const ETH_HEADER_LEN: usize = 14;

/// Size of one 802.1Q tag (TPID + TCI)
pub const VLAN_TAG_LEN: usize = 4;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_ARP: u16 = 0x0806;
pub const ETHERTYPE_IPV6: u16 = 0x86dd;
pub const ETHERTYPE_VLAN: u16 = 0x8100;

/// An 802.1Q tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VlanTag {
    /// VLAN identifier (12 bits). Zero marks a priority-tagged frame.
    pub vid: u16,
    /// Priority code point (3 bits).
    pub pcp: u8,
}

/// The L2 header of a frame forwarded to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthernetFrame {
    pub dst: MacAddress,
    pub src: MacAddress,
    pub vlan: Option<VlanTag>,
    /// EtherType of the payload (after any 802.1Q tag).
    pub ethertype: u16,
}

impl EthernetFrame {
    /// Decodes the Ethernet header at the start of `data`.
    ///
    /// Only the header is inspected; the payload is not validated.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < ETH_HEADER_LEN {
            return Err(ParseError::Truncated {
                needed: ETH_HEADER_LEN,
                actual: data.len(),
            });
        }

        let dst = MacAddress::new(mac_at(data, 0));
        let src = MacAddress::new(mac_at(data, 6));
        let outer_type = u16::from_be_bytes([data[12], data[13]]);

        if outer_type != ETHERTYPE_VLAN {
            return Ok(Self {
                dst,
                src,
                vlan: None,
                ethertype: outer_type,
            });
        }

        let tagged_len = ETH_HEADER_LEN + VLAN_TAG_LEN;
        if data.len() < tagged_len {
            return Err(ParseError::Truncated {
                needed: tagged_len,
                actual: data.len(),
            });
        }

        let tci = u16::from_be_bytes([data[14], data[15]]);
        Ok(Self {
            dst,
            src,
            vlan: Some(VlanTag {
                vid: tci & 0x0fff,
                pcp: (tci >> 13) as u8,
            }),
            ethertype: u16::from_be_bytes([data[16], data[17]]),
        })
    }

    /// Returns true if the destination is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        self.dst.is_broadcast()
    }

    /// Encodes the header back to wire format. Used to build test frames.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ETH_HEADER_LEN + VLAN_TAG_LEN);
        buf.extend_from_slice(self.dst.as_bytes());
        buf.extend_from_slice(self.src.as_bytes());
        if let Some(tag) = self.vlan {
            buf.extend_from_slice(&ETHERTYPE_VLAN.to_be_bytes());
            let tci = ((tag.pcp as u16 & 0x7) << 13) | (tag.vid & 0x0fff);
            buf.extend_from_slice(&tci.to_be_bytes());
        }
        buf.extend_from_slice(&self.ethertype.to_be_bytes());
        buf
    }
}

fn mac_at(data: &[u8], offset: usize) -> [u8; 6] {
    let mut mac = [0u8; 6];
    mac.copy_from_slice(&data[offset..offset + 6]);
    mac
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mac(last: u8) -> MacAddress {
        MacAddress::new([0x02, 0, 0, 0, 0, last])
    }

    #[test]
    fn test_parse_untagged() {
        let mut data = vec![0xff; 6];
        data.extend_from_slice(mac(1).as_bytes());
        data.extend_from_slice(&ETHERTYPE_ARP.to_be_bytes());
        data.extend_from_slice(&[0u8; 28]);

        let frame = EthernetFrame::parse(&data).unwrap();
        assert_eq!(frame.dst, MacAddress::BROADCAST);
        assert_eq!(frame.src, mac(1));
        assert_eq!(frame.vlan, None);
        assert_eq!(frame.ethertype, ETHERTYPE_ARP);
        assert!(frame.is_broadcast());
    }

    #[test]
    fn test_parse_tagged() {
        let frame = EthernetFrame {
            dst: mac(2),
            src: mac(1),
            vlan: Some(VlanTag { vid: 100, pcp: 5 }),
            ethertype: ETHERTYPE_IPV4,
        };
        let parsed = EthernetFrame::parse(&frame.to_bytes()).unwrap();
        assert_eq!(parsed, frame);
        assert!(!parsed.is_broadcast());
    }

    #[test]
    fn test_truncated_header() {
        let err = EthernetFrame::parse(&[0u8; 10]).unwrap_err();
        assert_eq!(err, ParseError::Truncated { needed: 14, actual: 10 });
    }

    #[test]
    fn test_truncated_vlan_tag() {
        let mut data = vec![0u8; 12];
        data.extend_from_slice(&ETHERTYPE_VLAN.to_be_bytes());
        data.push(0);
        let err = EthernetFrame::parse(&data).unwrap_err();
        assert_eq!(err, ParseError::Truncated { needed: 18, actual: 15 });
    }
}
