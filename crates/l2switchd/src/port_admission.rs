//! Administrative port admission (blocked ports) of one switch.

use sdn_types::PortNo;
use std::collections::BTreeSet;

/// Ports an operator has disabled for forwarding and flooding.
///
/// Empty when a session starts. Only [`block`](Self::block) and
/// [`unblock`](Self::unblock) change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortAdmission {
    blocked: BTreeSet<PortNo>,
}

impl PortAdmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks `port`. Returns false if it was already blocked.
    pub fn block(&mut self, port: PortNo) -> bool {
        self.blocked.insert(port)
    }

    /// Unblocks `port`. Returns false if it was not blocked.
    pub fn unblock(&mut self, port: PortNo) -> bool {
        self.blocked.remove(&port)
    }

    pub fn is_blocked(&self, port: PortNo) -> bool {
        self.blocked.contains(&port)
    }

    /// Blocked ports in ascending order.
    pub fn blocked(&self) -> Vec<PortNo> {
        self.blocked.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}
