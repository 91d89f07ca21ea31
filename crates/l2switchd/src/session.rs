//! SwitchSession - learning and admission state bound to one connection.

use std::collections::BTreeSet;
use std::sync::Arc;

use sdn_channel::{Action, ConnectionId, PacketIn, PacketOut, PortStatusReason, SwitchConnection, SwitchFeatures};
use sdn_types::{DatapathId, EthernetFrame, PortNo};
use tracing::{debug, info, instrument, warn};

use crate::classifier;
use crate::flow_installer::FlowInstaller;
use crate::mac_table::{LearnOutcome, MacTable};
use crate::port_admission::PortAdmission;
use crate::types::{DropReason, ForwardingDecision, SessionStats};

/// State that may outlive a connection when reconnect retention is enabled.
#[derive(Debug, Clone, Default)]
pub struct LearnedState {
    pub mac_table: MacTable,
    pub admission: PortAdmission,
}

/// Exclusive owner of one switch's MAC table and blocked ports.
///
/// All mutation goes through [`handle_packet_in`](Self::handle_packet_in),
/// [`disable_port`](Self::disable_port), [`enable_port`](Self::enable_port)
/// and [`port_status`](Self::port_status), each taking `&mut self`.
pub struct SwitchSession {
    connection: Arc<dyn SwitchConnection>,
    dpid: DatapathId,
    ports: BTreeSet<PortNo>,
    mac_table: MacTable,
    admission: PortAdmission,
    installer: FlowInstaller,
    stats: SessionStats,
}

impl SwitchSession {
    /// Creates a session with an empty MAC table and no blocked ports.
    pub fn new(
        connection: Arc<dyn SwitchConnection>,
        features: &SwitchFeatures,
        installer: FlowInstaller,
    ) -> Self {
        Self::with_state(connection, features, installer, LearnedState::default())
    }

    /// Creates a session seeded with state kept from an earlier connection.
    pub fn with_state(
        connection: Arc<dyn SwitchConnection>,
        features: &SwitchFeatures,
        installer: FlowInstaller,
        state: LearnedState,
    ) -> Self {
        Self {
            dpid: features.dpid,
            ports: features.ports.iter().copied().collect(),
            connection,
            mac_table: state.mac_table,
            admission: state.admission,
            installer,
            stats: SessionStats::default(),
        }
    }

    pub fn dpid(&self) -> DatapathId {
        self.dpid
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection.id()
    }

    pub fn ports(&self) -> &BTreeSet<PortNo> {
        &self.ports
    }

    pub fn mac_table(&self) -> &MacTable {
        &self.mac_table
    }

    pub fn admission(&self) -> &PortAdmission {
        &self.admission
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Consumes the session, keeping what a reconnect may restore.
    pub fn into_state(self) -> LearnedState {
        LearnedState {
            mac_table: self.mac_table,
            admission: self.admission,
        }
    }

    /// Classifies one packet-in and sends the resulting commands.
    #[instrument(skip(self, packet), fields(dpid = %self.dpid, in_port = %packet.in_port))]
    pub fn handle_packet_in(&mut self, packet: &PacketIn) -> ForwardingDecision {
        self.stats.packets_in += 1;
        let in_port = packet.in_port;

        let frame = match EthernetFrame::parse(&packet.data) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Ignoring incomplete packet");
                let decision = ForwardingDecision::Drop(DropReason::ParseFailure);
                self.stats.record(&decision);
                return decision;
            }
        };

        debug!(src = %frame.src, dst = %frame.dst, "Packet received");

        let (learned, decision) =
            classifier::classify(&mut self.mac_table, &self.admission, &frame, in_port);
        self.log_learned(&frame, in_port, learned);
        self.stats.record(&decision);

        match decision {
            ForwardingDecision::Flood { exclude, cause } => {
                debug!(?cause, "Flooding");
                self.flood(packet, exclude);
            }
            ForwardingDecision::Forward { out_port } => {
                self.installer
                    .install(self.connection.as_ref(), &frame, in_port, out_port);
                self.send_packet(packet, vec![Action::Output(out_port)]);
            }
            ForwardingDecision::Drop(reason) => {
                debug!(?reason, dst = %frame.dst, "Dropping packet");
            }
        }

        decision
    }

    /// Blocks `port` and purges rules matching traffic entering on it.
    /// Returns false (and sends nothing) if the port was already blocked.
    #[instrument(skip(self), fields(dpid = %self.dpid))]
    pub fn disable_port(&mut self, port: PortNo) -> bool {
        if !self.admission.block(port) {
            debug!(%port, "Port already blocked");
            return false;
        }

        info!(%port, "Port blocked to prevent loops");
        self.installer.invalidate_port(self.connection.as_ref(), port);
        self.stats.flow_deletes += 1;
        true
    }

    /// Unblocks `port` and purges rules matching it so it is learned afresh.
    /// Returns false (and sends nothing) if the port was not blocked.
    #[instrument(skip(self), fields(dpid = %self.dpid))]
    pub fn enable_port(&mut self, port: PortNo) -> bool {
        if !self.admission.unblock(port) {
            debug!(%port, "Port not blocked");
            return false;
        }

        info!(%port, "Port unblocked");
        self.installer.invalidate_port(self.connection.as_ref(), port);
        self.stats.flow_deletes += 1;
        true
    }

    /// Tracks ports appearing on or leaving the switch.
    pub fn port_status(&mut self, reason: PortStatusReason, port: PortNo) {
        match reason {
            PortStatusReason::Add | PortStatusReason::Modify => {
                if self.ports.insert(port) {
                    info!(dpid = %self.dpid, %port, "Port added");
                }
            }
            PortStatusReason::Delete => {
                self.ports.remove(&port);
                self.admission.unblock(port);
                let forgotten = self.mac_table.remove_port(port);
                info!(dpid = %self.dpid, %port, forgotten, "Port removed");
            }
        }
    }

    fn log_learned(&mut self, frame: &EthernetFrame, in_port: PortNo, learned: LearnOutcome) {
        match learned {
            LearnOutcome::New => {
                debug!(mac = %frame.src, port = %in_port, "Learned host location");
            }
            LearnOutcome::Refreshed => {}
            LearnOutcome::Moved { previous } => {
                self.stats.host_moves += 1;
                if self.admission.is_blocked(in_port) {
                    debug!(mac = %frame.src, %previous, port = %in_port, "Host seen on blocked port");
                } else {
                    warn!(
                        mac = %frame.src,
                        %previous,
                        port = %in_port,
                        "Possible loop detected: host seen on a new port"
                    );
                }
            }
        }
    }

    fn flood(&self, packet: &PacketIn, exclude: PortNo) {
        let actions = classifier::flood_ports(&self.ports, &self.admission, exclude)
            .into_iter()
            .map(Action::Output)
            .collect();
        self.send_packet(packet, actions);
    }

    fn send_packet(&self, packet: &PacketIn, actions: Vec<Action>) {
        let packet_out = PacketOut {
            buffer_id: packet.buffer_id,
            data: packet.buffer_id.is_none().then(|| packet.data.clone()),
            in_port: packet.in_port,
            actions,
        };
        self.connection.send(packet_out.into());
    }
}

impl std::fmt::Debug for SwitchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchSession")
            .field("connection", &self.connection.id())
            .field("dpid", &self.dpid)
            .field("ports", &self.ports)
            .field("mac_table", &self.mac_table)
            .field("admission", &self.admission)
            .field("stats", &self.stats)
            .finish()
    }
}
