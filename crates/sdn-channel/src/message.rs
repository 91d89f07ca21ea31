//! Outbound OpenFlow 1.0 messages.

use sdn_types::{EthernetFrame, MacAddress, PortNo};
use serde::{Deserialize, Serialize};

/// Default flow priority (OFP_DEFAULT_PRIORITY).
pub const DEFAULT_PRIORITY: u16 = 0x8000;

/// Match fields of a flow entry. `None` wildcards the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_port: Option<PortNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_src: Option<MacAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_dst: Option<MacAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_vlan: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_vlan_pcp: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_type: Option<u16>,
}

impl FlowMatch {
    /// Matches only traffic entering on `port`.
    pub fn in_port(port: PortNo) -> Self {
        Self {
            in_port: Some(port),
            ..Self::default()
        }
    }

    /// Builds the exact-match flow signature of a frame seen on `in_port`.
    pub fn from_frame(frame: &EthernetFrame, in_port: PortNo) -> Self {
        Self {
            in_port: Some(in_port),
            dl_src: Some(frame.src),
            dl_dst: Some(frame.dst),
            dl_vlan: frame.vlan.map(|tag| tag.vid),
            dl_vlan_pcp: frame.vlan.map(|tag| tag.pcp),
            dl_type: Some(frame.ethertype),
        }
    }
}

/// A flow entry action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Output(PortNo),
}

/// Flow-table modification command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowModCommand {
    Add,
    Delete,
}

/// OFPT_FLOW_MOD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMod {
    pub command: FlowModCommand,
    #[serde(rename = "match")]
    pub match_: FlowMatch,
    /// Seconds without a hit before the entry expires; 0 never expires.
    pub idle_timeout: u16,
    /// Seconds after installation before the entry expires; 0 never expires.
    pub hard_timeout: u16,
    pub priority: u16,
    pub actions: Vec<Action>,
}

impl FlowMod {
    /// Builds an add with a single output action.
    pub fn add(
        match_: FlowMatch,
        out_port: PortNo,
        idle_timeout: u16,
        hard_timeout: u16,
        priority: u16,
    ) -> Self {
        Self {
            command: FlowModCommand::Add,
            match_,
            idle_timeout,
            hard_timeout,
            priority,
            actions: vec![Action::Output(out_port)],
        }
    }

    /// Builds a delete of every entry matching `match_`.
    pub fn delete(match_: FlowMatch) -> Self {
        Self {
            command: FlowModCommand::Delete,
            match_,
            idle_timeout: 0,
            hard_timeout: 0,
            priority: DEFAULT_PRIORITY,
            actions: Vec::new(),
        }
    }
}

/// OFPT_PACKET_OUT
///
/// Exactly one of `buffer_id` and `data` is set: a packet buffered by the
/// switch is released by id, otherwise the raw frame is sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketOut {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_hex")]
    pub data: Option<Vec<u8>>,
    pub in_port: PortNo,
    pub actions: Vec<Action>,
}

impl PacketOut {
    /// Returns the output ports in action order.
    pub fn output_ports(&self) -> Vec<PortNo> {
        self.actions
            .iter()
            .map(|action| match action {
                Action::Output(port) => *port,
            })
            .collect()
    }
}

/// Messages a controller sends to a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfMessage {
    FlowMod(FlowMod),
    PacketOut(PacketOut),
}

impl OfMessage {
    pub fn as_flow_mod(&self) -> Option<&FlowMod> {
        match self {
            OfMessage::FlowMod(flow_mod) => Some(flow_mod),
            OfMessage::PacketOut(_) => None,
        }
    }

    pub fn as_packet_out(&self) -> Option<&PacketOut> {
        match self {
            OfMessage::PacketOut(packet_out) => Some(packet_out),
            OfMessage::FlowMod(_) => None,
        }
    }
}

impl From<FlowMod> for OfMessage {
    fn from(flow_mod: FlowMod) -> Self {
        OfMessage::FlowMod(flow_mod)
    }
}

impl From<PacketOut> for OfMessage {
    fn from(packet_out: PacketOut) -> Self {
        OfMessage::PacketOut(packet_out)
    }
}

mod opt_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| hex::decode(text.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
