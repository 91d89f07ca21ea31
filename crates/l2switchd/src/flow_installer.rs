//! Translates forwarding decisions into switch flow-table commands.

use sdn_channel::{FlowMatch, FlowMod, SwitchConnection};
use sdn_types::{EthernetFrame, PortNo};
use tracing::debug;

use crate::config::FlowConfig;

/// Emits flow installs and per-port invalidations. Fire-and-forget: nothing
/// is acknowledged and nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowInstaller {
    idle_timeout: u16,
    hard_timeout: u16,
    priority: u16,
}

impl FlowInstaller {
    pub fn new(config: &FlowConfig) -> Self {
        Self {
            idle_timeout: config.idle_timeout_secs,
            hard_timeout: config.hard_timeout_secs,
            priority: config.priority,
        }
    }

    /// Rule directing the flow of `frame` (seen on `in_port`) out `out_port`.
    pub fn forwarding_rule(&self, frame: &EthernetFrame, in_port: PortNo, out_port: PortNo) -> FlowMod {
        FlowMod::add(
            FlowMatch::from_frame(frame, in_port),
            out_port,
            self.idle_timeout,
            self.hard_timeout,
            self.priority,
        )
    }

    /// Delete of every rule matching traffic that enters on `port`.
    pub fn port_invalidation(&self, port: PortNo) -> FlowMod {
        FlowMod::delete(FlowMatch::in_port(port))
    }

    pub fn install(
        &self,
        connection: &dyn SwitchConnection,
        frame: &EthernetFrame,
        in_port: PortNo,
        out_port: PortNo,
    ) {
        debug!(
            dpid = %connection.dpid(),
            src = %frame.src,
            dst = %frame.dst,
            %out_port,
            "Installing flow"
        );
        connection.send(self.forwarding_rule(frame, in_port, out_port).into());
    }

    pub fn invalidate_port(&self, connection: &dyn SwitchConnection, port: PortNo) {
        debug!(dpid = %connection.dpid(), %port, "Deleting flows entering on port");
        connection.send(self.port_invalidation(port).into());
    }
}

impl Default for FlowInstaller {
    fn default() -> Self {
        Self::new(&FlowConfig::default())
    }
}
