//! Controller - session registry and event routing.

use std::collections::HashMap;
use std::sync::Arc;

use sdn_channel::{
    AdminAction, ConnectionId, ConnectionListener, PacketIn, PortStatusReason, SwitchConnection,
    SwitchFeatures,
};
use sdn_types::{DatapathId, PortNo};
use tracing::{debug, error, info, warn};

use crate::config::{L2SwitchConfig, SessionConfig};
use crate::error::{L2SwitchError, Result};
use crate::flow_installer::FlowInstaller;
use crate::session::{LearnedState, SwitchSession};

/// Owns one [`SwitchSession`] per live connection.
///
/// Sessions are keyed by [`ConnectionId`], so a switch that reconnects never
/// shares a session with its previous connection. Learned state only carries
/// over when `retain_state_on_reconnect` is set.
#[derive(Debug)]
pub struct Controller {
    installer: FlowInstaller,
    session_config: SessionConfig,
    sessions: HashMap<ConnectionId, SwitchSession>,
    /// State of disconnected switches, kept for reconnect retention.
    parked: HashMap<DatapathId, LearnedState>,
}

impl Controller {
    pub fn new(config: &L2SwitchConfig) -> Self {
        Self {
            installer: FlowInstaller::new(&config.flow),
            session_config: config.session.clone(),
            sessions: HashMap::new(),
            parked: HashMap::new(),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session(&self, connection: ConnectionId) -> Option<&SwitchSession> {
        self.sessions.get(&connection)
    }

    /// Returns the newest live session of a switch.
    pub fn session_for(&self, dpid: DatapathId) -> Option<&SwitchSession> {
        self.sessions
            .values()
            .filter(|session| session.dpid() == dpid)
            .max_by_key(|session| session.connection_id())
    }

    fn session_for_mut(&mut self, dpid: DatapathId) -> Result<&mut SwitchSession> {
        self.sessions
            .values_mut()
            .filter(|session| session.dpid() == dpid)
            .max_by_key(|session| session.connection_id())
            .ok_or(L2SwitchError::UnknownSwitch(dpid))
    }

    /// Blocks `port` on switch `dpid`. Returns false if it was already blocked.
    pub fn disable_port(&mut self, dpid: DatapathId, port: PortNo) -> Result<bool> {
        Ok(self.session_for_mut(dpid)?.disable_port(port))
    }

    /// Unblocks `port` on switch `dpid`. Returns false if it was not blocked.
    pub fn enable_port(&mut self, dpid: DatapathId, port: PortNo) -> Result<bool> {
        Ok(self.session_for_mut(dpid)?.enable_port(port))
    }
}

impl ConnectionListener for Controller {
    fn name(&self) -> &str {
        "l2switch"
    }

    fn on_connection_up(&mut self, connection: Arc<dyn SwitchConnection>, features: SwitchFeatures) {
        let id = connection.id();
        let dpid = features.dpid;

        if self.sessions.values().any(|session| session.dpid() == dpid) {
            warn!(%dpid, connection = %id, "Switch already has a live connection");
        }

        let parked = self.parked.remove(&dpid);
        let session = match parked {
            Some(state) if self.session_config.retain_state_on_reconnect => {
                info!(
                    %dpid,
                    hosts = state.mac_table.len(),
                    blocked = ?state.admission.blocked(),
                    "Restoring learned state"
                );
                SwitchSession::with_state(connection, &features, self.installer, state)
            }
            _ => SwitchSession::new(connection, &features, self.installer),
        };

        info!(%dpid, connection = %id, ports = features.ports.len(), "Switch connected to controller");
        if let Some(previous) = self.sessions.insert(id, session) {
            error!(connection = %id, dpid = %previous.dpid(), "Connection id reused; dropped old session");
        }
    }

    fn on_connection_down(&mut self, connection: ConnectionId) {
        let Some(session) = self.sessions.remove(&connection) else {
            debug!(%connection, "Close for unknown connection");
            return;
        };

        let dpid = session.dpid();
        info!(%dpid, %connection, stats = ?session.stats(), "Switch disconnected");
        if self.session_config.retain_state_on_reconnect {
            self.parked.insert(dpid, session.into_state());
        }
    }

    fn on_packet_in(&mut self, connection: ConnectionId, packet: &PacketIn) {
        match self.sessions.get_mut(&connection) {
            Some(session) => {
                session.handle_packet_in(packet);
            }
            None => debug!(%connection, "Packet-in for unknown connection"),
        }
    }

    fn on_port_status(&mut self, connection: ConnectionId, reason: PortStatusReason, port: PortNo) {
        match self.sessions.get_mut(&connection) {
            Some(session) => session.port_status(reason, port),
            None => debug!(%connection, "Port status for unknown connection"),
        }
    }

    fn on_admin(&mut self, dpid: DatapathId, action: AdminAction, port: PortNo) {
        let result = match action {
            AdminAction::DisablePort => self.disable_port(dpid, port),
            AdminAction::EnablePort => self.enable_port(dpid, port),
        };
        if let Err(e) = result {
            warn!(error = %e, ?action, %port, "Admin command failed");
        }
    }
}
