//! Explicit handler contract for control-channel events.

use std::sync::Arc;

use sdn_types::{DatapathId, PortNo};

use crate::connection::SwitchConnection;
use crate::event::{AdminAction, ConnectionId, ControllerEvent, PacketIn, PortStatusReason, SwitchFeatures};

/// A controller application registered with the control-channel runtime.
///
/// The runtime calls exactly one method per inbound event and waits for it
/// to return before delivering the next one, so implementations never see
/// concurrent calls.
pub trait ConnectionListener {
    /// Returns the name of this application (for logging).
    fn name(&self) -> &str;

    /// A switch connected. `connection` is the handle for all replies.
    fn on_connection_up(&mut self, connection: Arc<dyn SwitchConnection>, features: SwitchFeatures);

    /// A switch connection closed.
    fn on_connection_down(&mut self, connection: ConnectionId);

    /// A packet missed the switch flow table.
    fn on_packet_in(&mut self, connection: ConnectionId, packet: &PacketIn);

    /// A port was added, removed or changed on the switch.
    fn on_port_status(&mut self, _connection: ConnectionId, _reason: PortStatusReason, _port: PortNo) {
        // Default: no-op
    }

    /// An operator changed port admission on a switch.
    fn on_admin(&mut self, _dpid: DatapathId, _action: AdminAction, _port: PortNo) {
        // Default: no-op
    }
}

/// Routes one event to the matching listener method.
///
/// `ConnectionUp` needs a transport handle, so the caller supplies `connect`
/// to build one for the new connection.
pub fn dispatch<L, F>(listener: &mut L, event: ControllerEvent, connect: F)
where
    L: ConnectionListener + ?Sized,
    F: FnOnce(ConnectionId, DatapathId) -> Arc<dyn SwitchConnection>,
{
    match event {
        ControllerEvent::ConnectionUp {
            connection,
            features,
        } => {
            let handle = connect(connection, features.dpid);
            listener.on_connection_up(handle, features);
        }
        ControllerEvent::ConnectionDown { connection } => listener.on_connection_down(connection),
        ControllerEvent::PacketIn { connection, packet } => {
            listener.on_packet_in(connection, &packet)
        }
        ControllerEvent::PortStatus {
            connection,
            reason,
            port,
        } => listener.on_port_status(connection, reason, port),
        ControllerEvent::Admin { dpid, action, port } => listener.on_admin(dpid, action, port),
    }
}
