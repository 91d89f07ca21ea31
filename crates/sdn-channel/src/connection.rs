//! Controller-side handle on one switch connection.

use crate::error::{ChannelError, ChannelResult};
use crate::event::ConnectionId;
use crate::message::OfMessage;
use sdn_types::DatapathId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

/// Outbound half of a switch connection.
///
/// `send` is fire-and-forget: implementations never block and never report
/// delivery failures to the caller. Whether the switch applied a message is
/// not observable through this trait.
pub trait SwitchConnection: Send + Sync {
    /// Identity of this connection.
    fn id(&self) -> ConnectionId;

    /// Datapath id announced by the switch.
    fn dpid(&self) -> DatapathId;

    /// Queues a message for the switch.
    fn send(&self, message: OfMessage);
}

/// A message leaving the controller, tagged with its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundCommand {
    pub connection: ConnectionId,
    pub dpid: DatapathId,
    pub message: OfMessage,
}

/// [`SwitchConnection`] that hands messages to the transport through an
/// unbounded mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelConnection {
    id: ConnectionId,
    dpid: DatapathId,
    tx: mpsc::UnboundedSender<OutboundCommand>,
}

impl ChannelConnection {
    pub fn new(
        id: ConnectionId,
        dpid: DatapathId,
        tx: mpsc::UnboundedSender<OutboundCommand>,
    ) -> Self {
        Self { id, dpid, tx }
    }

    /// Queues a message, reporting a closed transport.
    pub fn try_send(&self, message: OfMessage) -> ChannelResult<()> {
        self.tx
            .send(OutboundCommand {
                connection: self.id,
                dpid: self.dpid,
                message,
            })
            .map_err(|_| ChannelError::Closed { dpid: self.dpid })
    }
}

impl SwitchConnection for ChannelConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn dpid(&self) -> DatapathId {
        self.dpid
    }

    fn send(&self, message: OfMessage) {
        if let Err(e) = self.try_send(message) {
            warn!(connection = %self.id, error = %e, "Dropping outbound message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{FlowMatch, FlowMod};
    use pretty_assertions::assert_eq;
    use sdn_types::PortNo;

    #[tokio::test]
    async fn test_send_tags_destination() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = ChannelConnection::new(ConnectionId::new(3), DatapathId::new(9), tx);

        let msg: OfMessage = FlowMod::delete(FlowMatch::in_port(PortNo::new(1))).into();
        conn.send(msg.clone());

        let out = rx.recv().await.unwrap();
        assert_eq!(out.connection, ConnectionId::new(3));
        assert_eq!(out.dpid, DatapathId::new(9));
        assert_eq!(out.message, msg);
    }

    #[test]
    fn test_send_after_close_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = ChannelConnection::new(ConnectionId::new(1), DatapathId::new(1), tx);
        drop(rx);

        let msg: OfMessage = FlowMod::delete(FlowMatch::in_port(PortNo::new(2))).into();
        assert!(matches!(
            conn.try_send(msg.clone()),
            Err(ChannelError::Closed { .. })
        ));
        // Fire-and-forget path must not panic.
        conn.send(msg);
    }
}
