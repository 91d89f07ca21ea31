//! Datapath identifier of one switch connection.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OpenFlow datapath identifier.
///
/// The low 48 bits usually carry a switch MAC address and the upper 16 bits
/// are implementer-defined. Displayed in the dashed form used by controller
/// logs, e.g. `00-00-00-00-00-01`, with `|<upper>` appended when the upper
/// 16 bits are set.
///
/// ```
/// use sdn_types::DatapathId;
///
/// assert_eq!(DatapathId::new(1).to_string(), "00-00-00-00-00-01");
/// assert_eq!(DatapathId::new(0x0002_0000_0000_00ff).to_string(), "00-00-00-00-00-ff|2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatapathId(u64);

impl DatapathId {
    pub const fn new(raw: u64) -> Self {
        DatapathId(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DatapathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        write!(
            f,
            "{:02x}-{:02x}-{:02x}-{:02x}-{:02x}-{:02x}",
            bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]
        )?;
        let upper = self.0 >> 48;
        if upper != 0 {
            write!(f, "|{}", upper)?;
        }
        Ok(())
    }
}

impl FromStr for DatapathId {
    type Err = ParseError;

    /// Accepts decimal (`1`) or hex (`0x1`) notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(DatapathId)
            .map_err(|_| ParseError::InvalidDatapathId(s.to_string()))
    }
}

impl From<u64> for DatapathId {
    fn from(raw: u64) -> Self {
        DatapathId(raw)
    }
}
