//! Per-frame forwarding decision.
//!
//! Given a decoded frame and its ingress port:
//!
//! 1. Learn `src -> in_port`, overwriting any previous mapping
//! 2. Ingress port blocked: drop
//! 3. Broadcast destination: flood
//! 4. Unknown destination: flood
//! 5. Known destination on the ingress port: drop
//! 6. Known destination on a blocked port: flood
//! 7. Otherwise: forward (and install a rule)
//!
//! Floods never install rules: the set of admitted ports can change after
//! the decision was made, and an unknown destination may be learned later.
//! Frames entering a blocked port go nowhere, so a rule keyed on that
//! ingress port is never reinstalled after `disable_port` purged it.

use std::collections::BTreeSet;

use sdn_types::{EthernetFrame, PortNo};

use crate::mac_table::{LearnOutcome, MacTable};
use crate::port_admission::PortAdmission;
use crate::types::{DropReason, FloodCause, ForwardingDecision};

/// Learns the frame's source and decides where the frame goes.
pub fn classify(
    mac_table: &mut MacTable,
    admission: &PortAdmission,
    frame: &EthernetFrame,
    in_port: PortNo,
) -> (LearnOutcome, ForwardingDecision) {
    let learned = mac_table.learn(frame.src, in_port);
    (learned, decide(mac_table, admission, frame, in_port))
}

/// Decides where a frame goes without touching the table.
pub fn decide(
    mac_table: &MacTable,
    admission: &PortAdmission,
    frame: &EthernetFrame,
    in_port: PortNo,
) -> ForwardingDecision {
    if admission.is_blocked(in_port) {
        return ForwardingDecision::Drop(DropReason::BlockedIngress);
    }

    if frame.is_broadcast() {
        return ForwardingDecision::Flood {
            exclude: in_port,
            cause: FloodCause::Broadcast,
        };
    }

    let Some(out_port) = mac_table.lookup(&frame.dst) else {
        return ForwardingDecision::Flood {
            exclude: in_port,
            cause: FloodCause::UnknownDestination,
        };
    };

    if out_port == in_port {
        return ForwardingDecision::Drop(DropReason::SelfLoop);
    }

    if admission.is_blocked(out_port) {
        return ForwardingDecision::Flood {
            exclude: in_port,
            cause: FloodCause::BlockedDestination(out_port),
        };
    }

    ForwardingDecision::Forward { out_port }
}

/// Ports a flood reaches: every physical switch port except the ingress
/// port and the blocked ones, in ascending order.
pub fn flood_ports(
    switch_ports: &BTreeSet<PortNo>,
    admission: &PortAdmission,
    in_port: PortNo,
) -> Vec<PortNo> {
    switch_ports
        .iter()
        .copied()
        .filter(|port| *port != in_port)
        .filter(|port| !admission.is_blocked(*port))
        .filter(PortNo::is_physical)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sdn_types::{MacAddress, ETHERTYPE_IPV4};

    fn mac(last: u8) -> MacAddress {
        MacAddress::new([0x02, 0, 0, 0, 0, last])
    }

    fn frame(src: MacAddress, dst: MacAddress) -> EthernetFrame {
        EthernetFrame {
            dst,
            src,
            vlan: None,
            ethertype: ETHERTYPE_IPV4,
        }
    }

    fn ports(list: &[u16]) -> BTreeSet<PortNo> {
        list.iter().copied().map(PortNo::new).collect()
    }

    #[test]
    fn test_broadcast_floods_and_learns() {
        let mut table = MacTable::new();
        let admission = PortAdmission::new();

        let (learned, decision) = classify(
            &mut table,
            &admission,
            &frame(mac(1), MacAddress::BROADCAST),
            PortNo::new(1),
        );

        assert_eq!(learned, LearnOutcome::New);
        assert_eq!(
            decision,
            ForwardingDecision::Flood {
                exclude: PortNo::new(1),
                cause: FloodCause::Broadcast
            }
        );
        assert_eq!(table.lookup(&mac(1)), Some(PortNo::new(1)));
    }

    #[test]
    fn test_broadcast_floods_even_if_broadcast_address_was_learned() {
        let mut table = MacTable::new();
        table.learn(MacAddress::BROADCAST, PortNo::new(3));
        let decision = decide(
            &table,
            &PortAdmission::new(),
            &frame(mac(1), MacAddress::BROADCAST),
            PortNo::new(1),
        );
        assert!(decision.is_flood());
    }

    #[test]
    fn test_unknown_destination_floods() {
        let mut table = MacTable::new();
        let (_, decision) = classify(
            &mut table,
            &PortAdmission::new(),
            &frame(mac(3), mac(4)),
            PortNo::new(5),
        );
        assert_eq!(
            decision,
            ForwardingDecision::Flood {
                exclude: PortNo::new(5),
                cause: FloodCause::UnknownDestination
            }
        );
    }

    #[test]
    fn test_known_destination_forwards() {
        let mut table = MacTable::new();
        table.learn(mac(1), PortNo::new(1));

        let (learned, decision) = classify(
            &mut table,
            &PortAdmission::new(),
            &frame(mac(2), mac(1)),
            PortNo::new(2),
        );

        assert_eq!(learned, LearnOutcome::New);
        assert_eq!(
            decision,
            ForwardingDecision::Forward {
                out_port: PortNo::new(1)
            }
        );
    }

    #[test]
    fn test_destination_on_ingress_port_drops() {
        let mut table = MacTable::new();
        table.learn(mac(1), PortNo::new(1));

        let (_, decision) = classify(
            &mut table,
            &PortAdmission::new(),
            &frame(mac(2), mac(1)),
            PortNo::new(1),
        );
        assert_eq!(decision, ForwardingDecision::Drop(DropReason::SelfLoop));
    }

    #[test]
    fn test_frame_to_itself_drops() {
        // Source is learned first, so a frame addressed to its own sender
        // resolves to the ingress port.
        let mut table = MacTable::new();
        let (_, decision) = classify(
            &mut table,
            &PortAdmission::new(),
            &frame(mac(1), mac(1)),
            PortNo::new(6),
        );
        assert_eq!(decision, ForwardingDecision::Drop(DropReason::SelfLoop));
    }

    #[test]
    fn test_blocked_destination_floods() {
        let mut table = MacTable::new();
        table.learn(mac(1), PortNo::new(3));
        let mut admission = PortAdmission::new();
        admission.block(PortNo::new(3));

        let (_, decision) = classify(&mut table, &admission, &frame(mac(2), mac(1)), PortNo::new(2));
        assert_eq!(
            decision,
            ForwardingDecision::Flood {
                exclude: PortNo::new(2),
                cause: FloodCause::BlockedDestination(PortNo::new(3))
            }
        );
    }

    #[test]
    fn test_blocked_ingress_drops_but_still_learns() {
        let mut table = MacTable::new();
        table.learn(mac(1), PortNo::new(1));
        let mut admission = PortAdmission::new();
        admission.block(PortNo::new(3));

        for dst in [MacAddress::BROADCAST, mac(1), mac(7)] {
            let (_, decision) =
                classify(&mut table, &admission, &frame(mac(9), dst), PortNo::new(3));
            assert_eq!(decision, ForwardingDecision::Drop(DropReason::BlockedIngress));
        }
        assert_eq!(table.lookup(&mac(9)), Some(PortNo::new(3)));
    }

    #[test]
    fn test_moved_host_is_relearned() {
        let mut table = MacTable::new();
        table.learn(mac(1), PortNo::new(1));

        let (learned, _) = classify(
            &mut table,
            &PortAdmission::new(),
            &frame(mac(1), MacAddress::BROADCAST),
            PortNo::new(4),
        );
        assert_eq!(
            learned,
            LearnOutcome::Moved {
                previous: PortNo::new(1)
            }
        );
        assert_eq!(table.lookup(&mac(1)), Some(PortNo::new(4)));
    }

    #[test]
    fn test_flood_ports_excludes_ingress_blocked_and_reserved() {
        let mut switch_ports = ports(&[1, 2, 3, 4]);
        switch_ports.insert(PortNo::LOCAL);
        let mut admission = PortAdmission::new();
        admission.block(PortNo::new(3));

        assert_eq!(
            flood_ports(&switch_ports, &admission, PortNo::new(1)),
            vec![PortNo::new(2), PortNo::new(4)]
        );
    }

    #[test]
    fn test_flood_ports_blocked_ingress() {
        let switch_ports = ports(&[1, 2]);
        let mut admission = PortAdmission::new();
        admission.block(PortNo::new(1));
        assert_eq!(
            flood_ports(&switch_ports, &admission, PortNo::new(1)),
            vec![PortNo::new(2)]
        );
    }
}
