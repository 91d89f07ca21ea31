//! l2switchd - per-switch L2 learning controller for OpenFlow switches
//!
//! Learns host locations from packets that miss the switch flow table,
//! installs forwarding rules for known destinations, floods everything else,
//! and lets an operator block ports to break forwarding loops.
//!
//! # Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`mac_table`] | Host address to ingress port mapping |
//! | [`port_admission`] | Administratively blocked ports |
//! | [`classifier`] | Flood / forward / drop decision per frame |
//! | [`flow_installer`] | Flow-table add and delete commands |
//! | [`session`] | State bound to one switch connection |
//! | [`controller`] | Session registry and event routing |
//! | [`daemon`] | Sequential event loop and JSON-lines feed |
//!
//! # Example
//!
//! ```ignore
//! use sdn_l2switchd::{Controller, L2SwitchConfig};
//!
//! let mut controller = Controller::new(&L2SwitchConfig::default());
//! run_event_loop(&mut controller, events, outbound).await;
//! controller.disable_port(dpid, PortNo::new(3))?;
//! ```

pub mod classifier;
pub mod config;
pub mod controller;
pub mod daemon;
pub mod error;
pub mod flow_installer;
pub mod mac_table;
pub mod port_admission;
pub mod session;
mod types;

pub use config::{FlowConfig, L2SwitchConfig, LoggingConfig, SessionConfig, DEFAULT_CONFIG_PATH};
pub use controller::Controller;
pub use daemon::{feed_events, parse_event_line, run_event_loop, EVENT_QUEUE_DEPTH};
pub use error::{L2SwitchError, Result};
pub use flow_installer::FlowInstaller;
pub use mac_table::{LearnOutcome, MacTable};
pub use port_admission::PortAdmission;
pub use session::{LearnedState, SwitchSession};
pub use types::*;
