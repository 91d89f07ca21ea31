//! Type definitions for l2switchd

use sdn_types::PortNo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a frame was flooded instead of forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloodCause {
    /// Destination is the broadcast address.
    Broadcast,
    /// Destination has not been learned yet.
    UnknownDestination,
    /// Destination was learned on a blocked port.
    BlockedDestination(PortNo),
}

/// Why a frame was not sent anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Frame could not be decoded.
    ParseFailure,
    /// Destination is reachable through the ingress port itself.
    SelfLoop,
    /// Frame entered on a blocked port.
    BlockedIngress,
}

/// Outcome of classifying one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardingDecision {
    /// Send out every admitted port except `exclude` (the ingress port).
    Flood { exclude: PortNo, cause: FloodCause },
    /// Install a rule and send out `out_port`.
    Forward { out_port: PortNo },
    /// Do nothing.
    Drop(DropReason),
}

impl ForwardingDecision {
    pub fn is_flood(&self) -> bool {
        matches!(self, ForwardingDecision::Flood { .. })
    }

    pub fn is_drop(&self) -> bool {
        matches!(self, ForwardingDecision::Drop(_))
    }
}

impl fmt::Display for ForwardingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardingDecision::Flood { exclude, cause } => {
                write!(f, "flood (except {}, {:?})", exclude, cause)
            }
            ForwardingDecision::Forward { out_port } => write!(f, "forward to {}", out_port),
            ForwardingDecision::Drop(reason) => write!(f, "drop ({:?})", reason),
        }
    }
}

/// Per-session counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub packets_in: u64,
    pub parse_failures: u64,
    pub floods: u64,
    pub forwards: u64,
    pub drops: u64,
    pub flows_installed: u64,
    pub flow_deletes: u64,
    pub host_moves: u64,
}

impl SessionStats {
    /// Counts the decision taken for one packet-in.
    pub fn record(&mut self, decision: &ForwardingDecision) {
        match decision {
            ForwardingDecision::Flood { .. } => self.floods += 1,
            ForwardingDecision::Forward { .. } => {
                self.forwards += 1;
                self.flows_installed += 1;
            }
            ForwardingDecision::Drop(DropReason::ParseFailure) => {
                self.drops += 1;
                self.parse_failures += 1;
            }
            ForwardingDecision::Drop(_) => self.drops += 1,
        }
    }
}
