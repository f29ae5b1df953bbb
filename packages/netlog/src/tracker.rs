use statig::blocking::IntoStateMachineExt as _;

use crate::{config::DisconnectPolicy, tick::Millis};

mod machine;

use machine::{DispatchContext, LinkInput, LinkMachine};

/// Link status change reported by the WiFi driver task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkNotice {
    Connected,
    Disconnected,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reachability {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

impl Reachability {
    pub const fn from_probe(reachable: bool) -> Self {
        if reachable {
            Self::Reachable
        } else {
            Self::Unreachable
        }
    }

    pub const fn as_option(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Reachable => Some(true),
            Self::Unreachable => Some(false),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Reachable => "reachable",
            Self::Unreachable => "unreachable",
        }
    }
}

/// A change that produces a logged event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkTransition {
    Connected,
    Reconnected,
    Disconnected,
    Reachability(Reachability),
}

impl LinkTransition {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Connected => "WiFi connected",
            Self::Reconnected => "WiFi reconnected",
            Self::Disconnected => "WiFi disconnected",
            Self::Reachability(Reachability::Reachable) => "Internet reachable",
            Self::Reachability(Reachability::Unreachable) => "Internet unreachable",
            Self::Reachability(Reachability::Unknown) => "Internet reachability unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectivityFlags {
    pub link_up: bool,
    pub reachability: Reachability,
    pub has_disconnected_since_last_flush: bool,
    pub has_reconnected_since_disconnect: bool,
    pub disconnect_at: Option<Millis>,
}

impl ConnectivityFlags {
    pub const fn initial() -> Self {
        Self {
            link_up: false,
            reachability: Reachability::Unknown,
            has_disconnected_since_last_flush: false,
            has_reconnected_since_disconnect: false,
            disconnect_at: None,
        }
    }

    /// A full disconnect/reconnect cycle has not been delivered yet.
    pub const fn urgent_flush_pending(&self) -> bool {
        self.has_disconnected_since_last_flush && self.has_reconnected_since_disconnect
    }

    /// Time spent down, measured from the last recorded disconnect.
    pub fn downtime_ms(&self, now: Millis) -> Option<u32> {
        if self.link_up {
            return None;
        }
        self.disconnect_at.map(|at| now.since(at))
    }
}

/// Connectivity state machine. All flag mutation goes through dispatched
/// inputs so the state and the flags cannot disagree.
pub struct ConnectivityTracker {
    machine: statig::blocking::StateMachine<LinkMachine>,
}

impl ConnectivityTracker {
    pub fn new(policy: DisconnectPolicy, link_up: bool, now: Millis) -> Self {
        let mut tracker = Self {
            machine: LinkMachine::new(policy).state_machine(),
        };
        tracker.dispatch(LinkInput::Boot { link_up }, now);
        tracker
    }

    pub fn flags(&self) -> ConnectivityFlags {
        self.machine.inner().flags
    }

    pub fn is_link_up(&self) -> bool {
        self.flags().link_up
    }

    pub fn reachability(&self) -> Reachability {
        self.flags().reachability
    }

    pub fn on_notice(&mut self, notice: LinkNotice, now: Millis) -> Option<LinkTransition> {
        let input = match notice {
            LinkNotice::Connected => LinkInput::Connected,
            LinkNotice::Disconnected => LinkInput::Disconnected,
        };
        self.dispatch(input, now)
    }

    /// Records a probe result; yields a transition only when reachability changes.
    pub fn on_probe(&mut self, reachable: bool, now: Millis) -> Option<LinkTransition> {
        self.dispatch(LinkInput::Probe { reachable }, now)
    }

    pub fn acknowledge_flush(&mut self, now: Millis) {
        self.dispatch(LinkInput::FlushAcknowledged, now);
    }

    fn dispatch(&mut self, input: LinkInput, now: Millis) -> Option<LinkTransition> {
        let mut context = DispatchContext::at(now);
        self.machine.handle_with_context(&input, &mut context);
        context.transition
    }
}
