//! Control-channel contract for OpenFlow controller applications.
//!
//! The transport that accepts switch connections, frames OpenFlow messages
//! and dispatches events lives outside this workspace. This crate defines
//! what crosses that boundary:
//!
//! - [`ControllerEvent`]: inbound notifications (connection up/down,
//!   packet-in, port status) and administrative commands
//! - [`OfMessage`]: outbound flow-table modifications and packet-outs
//! - [`SwitchConnection`]: the handle a controller uses to talk to one switch
//! - [`ConnectionListener`]: the explicitly registered event handler
//!
//! # Architecture
//!
//! 1. The runtime accepts a switch and announces it with `ConnectionUp`
//! 2. Packets missing the switch flow table arrive as `PacketIn`
//! 3. The listener answers through the connection with `FlowMod`/`PacketOut`
//! 4. Sends are fire-and-forget; delivery failures stay in the runtime

mod connection;
mod error;
mod event;
mod listener;
mod message;

pub use connection::{ChannelConnection, OutboundCommand, SwitchConnection};
pub use error::{ChannelError, ChannelResult};
pub use event::{
    AdminAction, ConnectionId, ControllerEvent, PacketIn, PacketInReason, PortStatusReason,
    SwitchFeatures,
};
pub use listener::{dispatch, ConnectionListener};
pub use message::{Action, FlowMatch, FlowMod, FlowModCommand, OfMessage, PacketOut, DEFAULT_PRIORITY};

/// Serde helper encoding raw frame bytes as a lower-case hex string.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text.trim()).map_err(serde::de::Error::custom)
    }
}
