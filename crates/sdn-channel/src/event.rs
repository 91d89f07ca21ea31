//! Inbound events delivered by the control-channel runtime.

use sdn_types::{DatapathId, PortNo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime-assigned identity of one switch connection.
///
/// A switch that reconnects gets a new `ConnectionId` even though its
/// [`DatapathId`] is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(raw: u64) -> Self {
        ConnectionId(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Features announced by a switch when its connection comes up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchFeatures {
    pub dpid: DatapathId,
    /// Port numbers as listed in the features reply, reserved ones included.
    #[serde(default)]
    pub ports: Vec<PortNo>,
}

/// Why the switch sent a packet to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketInReason {
    /// No flow entry matched.
    #[default]
    NoMatch,
    /// A flow entry explicitly sent the packet.
    Action,
}

/// OFPT_PACKET_IN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketIn {
    pub in_port: PortNo,
    /// Switch buffer holding the full packet, if it was buffered.
    #[serde(default)]
    pub buffer_id: Option<u32>,
    /// Length of the original frame on the wire.
    #[serde(default)]
    pub total_len: u16,
    #[serde(default)]
    pub reason: PacketInReason,
    /// Frame bytes (possibly truncated to the switch's miss_send_len).
    #[serde(with = "crate::hex_bytes")]
    pub data: Vec<u8>,
}

impl PacketIn {
    /// Builds an unbuffered packet-in carrying the whole frame.
    pub fn unbuffered(in_port: PortNo, data: Vec<u8>) -> Self {
        Self {
            in_port,
            buffer_id: None,
            total_len: u16::try_from(data.len()).unwrap_or(u16::MAX),
            reason: PacketInReason::NoMatch,
            data,
        }
    }
}

/// OFPT_PORT_STATUS reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortStatusReason {
    Add,
    Delete,
    Modify,
}

/// Operator-issued port admission action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    DisablePort,
    EnablePort,
}

/// Everything the controller reacts to, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    ConnectionUp {
        connection: ConnectionId,
        features: SwitchFeatures,
    },
    ConnectionDown {
        connection: ConnectionId,
    },
    PacketIn {
        connection: ConnectionId,
        packet: PacketIn,
    },
    PortStatus {
        connection: ConnectionId,
        reason: PortStatusReason,
        port: PortNo,
    },
    Admin {
        dpid: DatapathId,
        action: AdminAction,
        port: PortNo,
    },
}

impl ControllerEvent {
    /// Name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerEvent::ConnectionUp { .. } => "connection_up",
            ControllerEvent::ConnectionDown { .. } => "connection_down",
            ControllerEvent::PacketIn { .. } => "packet_in",
            ControllerEvent::PortStatus { .. } => "port_status",
            ControllerEvent::Admin { .. } => "admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_packet_in_from_json() {
        let line = r#"{"event":"packet_in","connection":1,"packet":{"in_port":2,"data":"ffffffffffff020000000001"}}"#;
        let event: ControllerEvent = serde_json::from_str(line).unwrap();
        match event {
            ControllerEvent::PacketIn { connection, packet } => {
                assert_eq!(connection, ConnectionId::new(1));
                assert_eq!(packet.in_port, PortNo::new(2));
                assert_eq!(packet.buffer_id, None);
                assert_eq!(packet.data.len(), 12);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_admin_from_json() {
        let line = r#"{"event":"admin","dpid":1,"action":"disable_port","port":3}"#;
        let event: ControllerEvent = serde_json::from_str(line).unwrap();
        assert_eq!(
            event,
            ControllerEvent::Admin {
                dpid: DatapathId::new(1),
                action: AdminAction::DisablePort,
                port: PortNo::new(3),
            }
        );
        assert_eq!(event.kind(), "admin");
    }

    #[test]
    fn test_connection_up_from_json() {
        let line = r#"{"event":"connection_up","connection":7,"features":{"dpid":1,"ports":[1,2,65534]}}"#;
        let event: ControllerEvent = serde_json::from_str(line).unwrap();
        match event {
            ControllerEvent::ConnectionUp { features, .. } => {
                assert_eq!(features.ports, vec![PortNo::new(1), PortNo::new(2), PortNo::LOCAL]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_unbuffered_packet_in() {
        let packet = PacketIn::unbuffered(PortNo::new(1), vec![0u8; 60]);
        assert_eq!(packet.total_len, 60);
        assert_eq!(packet.buffer_id, None);
    }
}
