use statig::prelude::*;

use super::{ConnectivityFlags, LinkTransition, Reachability};
use crate::{config::DisconnectPolicy, tick::Millis};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum LinkInput {
    Boot { link_up: bool },
    Connected,
    Disconnected,
    Probe { reachable: bool },
    FlushAcknowledged,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct LinkMachine {
    pub(super) flags: ConnectivityFlags,
    policy: DisconnectPolicy,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) now: Millis,
    pub(super) transition: Option<LinkTransition>,
}

impl DispatchContext {
    pub(super) const fn at(now: Millis) -> Self {
        Self {
            now,
            transition: None,
        }
    }
}

impl LinkMachine {
    pub(super) fn new(policy: DisconnectPolicy) -> Self {
        Self {
            flags: ConnectivityFlags::initial(),
            policy,
        }
    }

    fn mark_disconnected(&mut self, now: Millis) -> LinkTransition {
        self.flags.link_up = false;
        self.flags.disconnect_at = Some(now);
        self.flags.has_disconnected_since_last_flush = true;
        self.flags.has_reconnected_since_disconnect = false;
        // Reachability is unproven until the link is back and probed again.
        self.flags.reachability = Reachability::Unknown;
        LinkTransition::Disconnected
    }

    fn record_probe(&mut self, reachable: bool) -> Option<LinkTransition> {
        let next = Reachability::from_probe(reachable);
        if self.flags.reachability == next {
            return None;
        }
        self.flags.reachability = next;
        Some(LinkTransition::Reachability(next))
    }

    fn acknowledge_flush(&mut self) {
        self.flags.has_disconnected_since_last_flush = false;
        self.flags.has_reconnected_since_disconnect = false;
    }
}

#[state_machine(initial = "State::initializing()")]
impl LinkMachine {
    #[state]
    fn initializing(&mut self, context: &mut DispatchContext, event: &LinkInput) -> Outcome<State> {
        match event {
            LinkInput::Boot { link_up: true } => {
                self.flags.link_up = true;
                Transition(State::link_up())
            }
            LinkInput::Boot { link_up: false } => {
                self.flags.link_up = false;
                self.flags.disconnect_at = Some(context.now);
                Transition(State::link_down())
            }
            _ => Handled,
        }
    }

    #[state]
    fn link_up(&mut self, context: &mut DispatchContext, event: &LinkInput) -> Outcome<State> {
        match event {
            LinkInput::Disconnected => {
                context.transition = Some(self.mark_disconnected(context.now));
                Transition(State::link_down())
            }
            LinkInput::Probe { reachable } => {
                context.transition = self.record_probe(*reachable);
                Handled
            }
            LinkInput::FlushAcknowledged => {
                self.acknowledge_flush();
                Handled
            }
            LinkInput::Boot { .. } | LinkInput::Connected => Handled,
        }
    }

    #[state]
    fn link_down(&mut self, context: &mut DispatchContext, event: &LinkInput) -> Outcome<State> {
        match event {
            LinkInput::Connected => {
                self.flags.link_up = true;
                context.transition = if self.flags.has_disconnected_since_last_flush {
                    self.flags.has_reconnected_since_disconnect = true;
                    Some(LinkTransition::Reconnected)
                } else {
                    Some(LinkTransition::Connected)
                };
                Transition(State::link_up())
            }
            LinkInput::Disconnected => {
                if matches!(self.policy, DisconnectPolicy::EveryNotice) {
                    context.transition = Some(self.mark_disconnected(context.now));
                }
                Handled
            }
            LinkInput::Probe { reachable } => {
                context.transition = self.record_probe(*reachable);
                Handled
            }
            LinkInput::FlushAcknowledged => {
                self.acknowledge_flush();
                Handled
            }
            LinkInput::Boot { .. } => Handled,
        }
    }
}
