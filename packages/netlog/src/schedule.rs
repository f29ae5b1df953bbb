use crate::{
    config::MonitorConfig,
    delivery::FlushOutcome,
    tick::{IntervalTimer, Millis},
    tracker::{ConnectivityFlags, Reachability},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushTrigger {
    Interval,
    /// A disconnect/reconnect cycle is waiting to be delivered.
    Urgent,
}

/// Last-fired instants for the three periodic jobs.
#[derive(Clone, Copy, Debug)]
pub struct Schedule {
    heartbeat: IntervalTimer,
    probe: IntervalTimer,
    flush: IntervalTimer,
    urgent_hold: Option<Millis>,
}

impl Schedule {
    pub const fn new(now: Millis) -> Self {
        Self {
            heartbeat: IntervalTimer::starting_at(now),
            probe: IntervalTimer::starting_at(now),
            flush: IntervalTimer::starting_at(now),
            urgent_hold: None,
        }
    }

    pub fn heartbeat_due(&self, now: Millis, config: &MonitorConfig) -> bool {
        self.heartbeat.is_due(now, config.heartbeat_interval_ms)
    }

    pub fn heartbeat_fired(&mut self, now: Millis) {
        self.heartbeat.fire(now);
    }

    /// Retry tier while reachability is not confirmed, unless a disconnect is
    /// still waiting to be flushed.
    pub fn probe_interval(config: &MonitorConfig, flags: &ConnectivityFlags) -> u32 {
        let unconfirmed = !matches!(flags.reachability, Reachability::Reachable);
        if unconfirmed && !flags.has_disconnected_since_last_flush {
            config.probe_retry_interval_ms
        } else {
            config.probe_interval_ms
        }
    }

    pub fn probe_due(
        &self,
        now: Millis,
        config: &MonitorConfig,
        flags: &ConnectivityFlags,
    ) -> bool {
        config.probe_enabled
            && flags.link_up
            && self.probe.is_due(now, Self::probe_interval(config, flags))
    }

    pub fn probe_fired(&mut self, now: Millis) {
        self.probe.fire(now);
    }

    pub fn flush_due(
        &self,
        now: Millis,
        config: &MonitorConfig,
        flags: &ConnectivityFlags,
    ) -> Option<FlushTrigger> {
        if !flags.link_up {
            return None;
        }
        let hold_elapsed = self
            .urgent_hold
            .map_or(true, |at| now.since(at) >= config.urgent_retry_ms);
        if flags.urgent_flush_pending() && hold_elapsed {
            Some(FlushTrigger::Urgent)
        } else if self.flush.is_due(now, config.flush_interval_ms) {
            Some(FlushTrigger::Interval)
        } else {
            None
        }
    }

    /// Resets the flush timer whatever the outcome. An urgent attempt the
    /// collector did not accept holds off the next urgent one; a skipped
    /// flush never contacted it and holds nothing.
    pub fn flush_fired(&mut self, now: Millis, trigger: FlushTrigger, outcome: &FlushOutcome) {
        self.flush.fire(now);
        if outcome.is_undelivered_attempt() && matches!(trigger, FlushTrigger::Urgent) {
            self.urgent_hold = Some(now);
        } else {
            self.urgent_hold = None;
        }
    }

    pub const fn last_flush(&self) -> Millis {
        self.flush.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{FlushSkip, TransportError};

    fn up() -> ConnectivityFlags {
        ConnectivityFlags {
            link_up: true,
            ..ConnectivityFlags::initial()
        }
    }

    fn urgent() -> ConnectivityFlags {
        ConnectivityFlags {
            has_disconnected_since_last_flush: true,
            has_reconnected_since_disconnect: true,
            ..up()
        }
    }

    #[test]
    fn heartbeat_fires_on_interval() {
        let config = MonitorConfig::defaults();
        let mut schedule = Schedule::new(Millis(0));
        assert!(!schedule.heartbeat_due(Millis(9_999), &config));
        assert!(schedule.heartbeat_due(Millis(10_000), &config));
        schedule.heartbeat_fired(Millis(10_000));
        assert!(!schedule.heartbeat_due(Millis(19_999), &config));
    }

    #[test]
    fn probe_uses_retry_tier_until_reachable() {
        let config = MonitorConfig::defaults();
        let schedule = Schedule::new(Millis(0));
        let mut flags = up();
        assert_eq!(Schedule::probe_interval(&config, &flags), 15_000);
        assert!(schedule.probe_due(Millis(15_000), &config, &flags));

        flags.reachability = Reachability::Reachable;
        assert_eq!(Schedule::probe_interval(&config, &flags), 900_000);
        assert!(!schedule.probe_due(Millis(15_000), &config, &flags));

        let pending = ConnectivityFlags {
            reachability: Reachability::Unreachable,
            has_disconnected_since_last_flush: true,
            ..up()
        };
        assert_eq!(Schedule::probe_interval(&config, &pending), 900_000);
    }

    #[test]
    fn probe_never_runs_while_down_or_disabled() {
        let schedule = Schedule::new(Millis(0));
        let config = MonitorConfig::defaults();
        assert!(!schedule.probe_due(Millis(1_000_000), &config, &ConnectivityFlags::initial()));

        let disabled = MonitorConfig {
            probe_enabled: false,
            ..MonitorConfig::defaults()
        };
        assert!(!schedule.probe_due(Millis(1_000_000), &disabled, &up()));
    }

    #[test]
    fn urgent_flush_ignores_interval() {
        let config = MonitorConfig::defaults();
        let schedule = Schedule::new(Millis(0));
        assert_eq!(schedule.flush_due(Millis(5_000), &config, &up()), None);
        assert_eq!(
            schedule.flush_due(Millis(5_000), &config, &urgent()),
            Some(FlushTrigger::Urgent)
        );
        assert_eq!(
            schedule.flush_due(Millis(300_000), &config, &up()),
            Some(FlushTrigger::Interval)
        );
    }

    #[test]
    fn flush_waits_for_link() {
        let config = MonitorConfig::defaults();
        let schedule = Schedule::new(Millis(0));
        let down = ConnectivityFlags::initial();
        assert_eq!(schedule.flush_due(Millis(600_000), &config, &down), None);
    }

    #[test]
    fn failed_urgent_attempt_is_held_off() {
        let config = MonitorConfig::defaults();
        let mut schedule = Schedule::new(Millis(0));
        schedule.flush_fired(
            Millis(5_000),
            FlushTrigger::Urgent,
            &FlushOutcome::Failed(TransportError::Timeout),
        );
        assert_eq!(schedule.last_flush(), Millis(5_000));
        assert_eq!(schedule.flush_due(Millis(6_000), &config, &urgent()), None);
        assert_eq!(
            schedule.flush_due(Millis(15_000), &config, &urgent()),
            Some(FlushTrigger::Urgent)
        );

        schedule.flush_fired(
            Millis(15_000),
            FlushTrigger::Urgent,
            &FlushOutcome::Delivered {
                events: 2,
                status: 201,
            },
        );
        assert_eq!(
            schedule.flush_due(Millis(15_100), &config, &urgent()),
            Some(FlushTrigger::Urgent)
        );
    }

    #[test]
    fn skipped_urgent_flush_sets_no_hold() {
        let config = MonitorConfig::defaults();
        let mut schedule = Schedule::new(Millis(0));
        schedule.flush_fired(
            Millis(5_000),
            FlushTrigger::Urgent,
            &FlushOutcome::Skipped(FlushSkip::Empty),
        );
        assert_eq!(
            schedule.flush_due(Millis(6_000), &config, &urgent()),
            Some(FlushTrigger::Urgent)
        );

        schedule.flush_fired(
            Millis(7_000),
            FlushTrigger::Urgent,
            &FlushOutcome::Rejected { status: 503 },
        );
        assert_eq!(schedule.flush_due(Millis(8_000), &config, &urgent()), None);
    }
}
