//! OpenFlow port numbers.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An OpenFlow 1.0 port number.
///
/// Numbers below [`PortNo::MAX`] identify physical switch ports; the range
/// from `MAX` upwards is reserved for virtual ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNo(u16);

impl PortNo {
    /// First reserved port number. Physical ports are strictly below.
    pub const MAX: PortNo = PortNo(0xff00);
    /// Send the packet back out its ingress port.
    pub const IN_PORT: PortNo = PortNo(0xfff8);
    /// Flood using the switch's own flooding rules.
    pub const FLOOD: PortNo = PortNo(0xfffb);
    /// All physical ports except the ingress port.
    pub const ALL: PortNo = PortNo(0xfffc);
    /// Send to the controller.
    pub const CONTROLLER: PortNo = PortNo(0xfffd);
    /// The switch's local networking stack.
    pub const LOCAL: PortNo = PortNo(0xfffe);
    /// Not associated with a physical port.
    pub const NONE: PortNo = PortNo(0xffff);

    pub const fn new(raw: u16) -> Self {
        PortNo(raw)
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true for numbers that name a physical port.
    pub const fn is_physical(&self) -> bool {
        self.0 < Self::MAX.0
    }

    /// Returns true for the reserved virtual port range.
    pub const fn is_reserved(&self) -> bool {
        !self.is_physical()
    }
}

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PortNo::IN_PORT => write!(f, "IN_PORT"),
            PortNo::FLOOD => write!(f, "FLOOD"),
            PortNo::ALL => write!(f, "ALL"),
            PortNo::CONTROLLER => write!(f, "CONTROLLER"),
            PortNo::LOCAL => write!(f, "LOCAL"),
            PortNo::NONE => write!(f, "NONE"),
            PortNo(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for PortNo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN_PORT" => Ok(PortNo::IN_PORT),
            "FLOOD" => Ok(PortNo::FLOOD),
            "ALL" => Ok(PortNo::ALL),
            "CONTROLLER" => Ok(PortNo::CONTROLLER),
            "LOCAL" => Ok(PortNo::LOCAL),
            "NONE" => Ok(PortNo::NONE),
            other => other
                .parse::<u16>()
                .map(PortNo)
                .map_err(|_| ParseError::InvalidPortNo(s.to_string())),
        }
    }
}

impl From<u16> for PortNo {
    fn from(raw: u16) -> Self {
        PortNo(raw)
    }
}
