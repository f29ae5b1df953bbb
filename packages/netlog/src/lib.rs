#![cfg_attr(not(test), no_std)]

//! Connectivity event log and delivery core for the netwatch firmware.
//!
//! Everything here is hardware-free: the firmware feeds link notices, clock
//! syncs and a millisecond tick into [`Monitor`], and supplies the HTTP
//! [`Transport`] and reachability [`Probe`] implementations.

pub mod buffer;
pub mod clock;
pub mod config;
pub mod delivery;
pub mod event;
pub mod http;
pub mod monitor;
pub mod payload;
pub mod schedule;
pub mod tick;
pub mod tracker;

pub use buffer::{AppendOutcome, EventLog, Snapshot};
pub use clock::{ClockSync, Timestamp, WallClock};
pub use config::{DisconnectPolicy, MonitorConfig, StampPolicy};
pub use delivery::{FlushOutcome, FlushSkip, Probe, Transport, TransportError};
pub use event::{EncodeError, Event, EventRecord};
pub use http::{Endpoint, EndpointError};
pub use monitor::{Monitor, MonitorStats, TickReport};
pub use payload::{BatchPayload, Chunks, PayloadShape};
pub use schedule::{FlushTrigger, Schedule};
pub use tick::Millis;
pub use tracker::{
    ConnectivityFlags, ConnectivityTracker, LinkNotice, LinkTransition, Reachability,
};

/// Default log capacity, sized for one flush interval of heartbeats plus
/// transitions.
pub const DEFAULT_CAPACITY: usize = 180;
/// Events kept from each end of the log when it is trimmed.
pub const TRIM_EDGE: usize = 5;
/// Upper bound on one serialized event record.
pub const EVENT_RECORD_MAX: usize = 224;
/// Upper bound on an event message.
pub const MESSAGE_MAX: usize = 96;
