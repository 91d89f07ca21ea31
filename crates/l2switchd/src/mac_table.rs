//! Per-switch MAC learning table.

use sdn_types::{MacAddress, PortNo};
use std::collections::HashMap;

/// Result of recording one source address observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    /// First time this address was seen on the switch.
    New,
    /// Seen again on the port it was already mapped to.
    Refreshed,
    /// Previously mapped to a different port; the mapping now points at the
    /// new ingress port. Either the host moved or frames are looping.
    Moved { previous: PortNo },
}

/// Host address to ingress port mapping, most recent observation wins.
///
/// Entries never expire here; learned flows age out on the switch through
/// their idle and hard timeouts.
#[derive(Debug, Clone, Default)]
pub struct MacTable {
    entries: HashMap<MacAddress, PortNo>,
}

impl MacTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `mac` was seen as a source on `port`.
    pub fn learn(&mut self, mac: MacAddress, port: PortNo) -> LearnOutcome {
        match self.entries.insert(mac, port) {
            None => LearnOutcome::New,
            Some(previous) if previous == port => LearnOutcome::Refreshed,
            Some(previous) => LearnOutcome::Moved { previous },
        }
    }

    /// Returns the port `mac` was last seen on.
    pub fn lookup(&self, mac: &MacAddress) -> Option<PortNo> {
        self.entries.get(mac).copied()
    }

    /// Forgets every address learned on `port`. Returns how many were removed.
    pub fn remove_port(&mut self, port: PortNo) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, learned| *learned != port);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
