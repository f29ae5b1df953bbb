use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::{
    buffer::{AppendOutcome, EventLog},
    clock::{ClockSync, WallClock},
    config::MonitorConfig,
    delivery::{FlushOutcome, FlushSkip, Probe, Transport},
    event::{Event, Message},
    payload::BatchPayload,
    schedule::{FlushTrigger, Schedule},
    tick::{minutes_seconds, Millis},
    tracker::{ConnectivityFlags, ConnectivityTracker, LinkNotice, LinkTransition},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub logged: u32,
    pub dropped_unsynced: u32,
    pub dropped_encode: u32,
    pub trimmed: u32,
    pub flush_attempts: u32,
    pub flush_delivered: u32,
    pub flush_rejected: u32,
    pub flush_failed: u32,
    pub probes: u32,
}

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub transitions: u8,
    pub heartbeat: bool,
    pub probe: Option<bool>,
    pub flush: Option<(FlushTrigger, FlushOutcome)>,
}

/// Owns every piece of monitor state; driven by one task.
pub struct Monitor<const CAP: usize> {
    config: MonitorConfig,
    clock: WallClock,
    tracker: ConnectivityTracker,
    log: EventLog<CAP>,
    schedule: Schedule,
    stats: MonitorStats,
}

impl<const CAP: usize> Monitor<CAP> {
    pub fn new(config: MonitorConfig, link_up: bool, now: Millis) -> Self {
        let config = config.sanitized();
        Self {
            tracker: ConnectivityTracker::new(config.disconnect_policy, link_up, now),
            config,
            clock: WallClock::unsynced(),
            log: EventLog::new(),
            schedule: Schedule::new(now),
            stats: MonitorStats::default(),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn log(&self) -> &EventLog<CAP> {
        &self.log
    }

    pub fn flags(&self) -> ConnectivityFlags {
        self.tracker.flags()
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn sync_clock(&mut self, sync: ClockSync) {
        if !self.clock.is_synced() {
            info!("netlog: clock synced unix={}", sync.unix_seconds);
        }
        self.clock.sync(sync);
    }

    pub fn on_link_notice(&mut self, notice: LinkNotice, now: Millis) -> Option<LinkTransition> {
        let transition = self.tracker.on_notice(notice, now)?;
        info!("netlog: {}", transition.message());
        self.log_event(now, transition.message());
        Some(transition)
    }

    /// Stamps, encodes and appends one event. Returns `false` when the event
    /// was dropped (clock not synced, or record too large).
    pub fn log_event(&mut self, now: Millis, message: &str) -> bool {
        let Some(timestamp) = self.clock.stamp(now, self.config.stamp_policy) else {
            self.stats.dropped_unsynced = self.stats.dropped_unsynced.wrapping_add(1);
            debug!("netlog: dropped unsynced event message={}", message);
            return false;
        };
        let flags = self.tracker.flags();
        let reachable = if self.config.probe_enabled {
            flags.reachability.as_option()
        } else {
            None
        };

        let record = match Event::new(timestamp, flags.link_up, reachable, message).encode() {
            Ok(record) => record,
            Err(err) => {
                self.stats.dropped_encode = self.stats.dropped_encode.wrapping_add(1);
                warn!("netlog: dropped event err={} message={}", err, message);
                return false;
            }
        };

        if let AppendOutcome::Trimmed { dropped } = self.log.append(record) {
            self.stats.trimmed = self.stats.trimmed.wrapping_add(dropped as u32);
            warn!("netlog: log full, trimmed dropped={} cap={}", dropped, CAP);
        }
        self.stats.logged = self.stats.logged.wrapping_add(1);
        true
    }

    /// One scheduler pass: notices first, then heartbeat, probe and flush.
    pub async fn tick<T, P>(
        &mut self,
        now: Millis,
        notices: impl IntoIterator<Item = LinkNotice>,
        transport: &mut T,
        probe: &mut P,
    ) -> TickReport
    where
        T: Transport,
        P: Probe,
    {
        let mut report = TickReport::default();

        for notice in notices {
            if self.on_link_notice(notice, now).is_some() {
                report.transitions = report.transitions.saturating_add(1);
            }
        }

        if self.schedule.heartbeat_due(now, &self.config) {
            self.schedule.heartbeat_fired(now);
            self.heartbeat(now);
            report.heartbeat = true;
        }

        if self
            .schedule
            .probe_due(now, &self.config, &self.tracker.flags())
        {
            self.schedule.probe_fired(now);
            let reachable = probe.probe().await;
            self.stats.probes = self.stats.probes.wrapping_add(1);
            report.probe = Some(reachable);
            if let Some(transition) = self.tracker.on_probe(reachable, now) {
                info!("netlog: {}", transition.message());
                self.log_event(now, transition.message());
                report.transitions = report.transitions.saturating_add(1);
            }
        }

        if let Some(trigger) = self
            .schedule
            .flush_due(now, &self.config, &self.tracker.flags())
        {
            let outcome = self.flush(now, transport).await;
            self.schedule.flush_fired(now, trigger, &outcome);
            report.flush = Some((trigger, outcome));
        }

        report
    }

    /// Submits the whole log as one batch. The log is cleared only on an
    /// accepted status; otherwise it is left exactly as it was.
    pub async fn flush<T: Transport>(&mut self, now: Millis, transport: &mut T) -> FlushOutcome {
        if !self.tracker.is_link_up() {
            return FlushOutcome::Skipped(FlushSkip::LinkDown);
        }
        if self.log.is_empty() {
            // Nothing is waiting, so a pending reconnect has nothing left to deliver.
            self.tracker.acknowledge_flush(now);
            return FlushOutcome::Skipped(FlushSkip::Empty);
        }

        let payload = BatchPayload::new(self.log.snapshot(), self.config.payload_shape);
        let events = payload.event_count();
        self.stats.flush_attempts = self.stats.flush_attempts.wrapping_add(1);
        let result = transport.post_json(&payload).await;

        match result {
            Ok(status) if self.config.accepts(status) => {
                self.log.clear();
                self.tracker.acknowledge_flush(now);
                self.stats.flush_delivered = self.stats.flush_delivered.wrapping_add(1);
                info!("netlog: flushed events={} status={}", events, status);
                FlushOutcome::Delivered { events, status }
            }
            Ok(status) => {
                self.stats.flush_rejected = self.stats.flush_rejected.wrapping_add(1);
                warn!("netlog: flush rejected status={} kept={}", status, events);
                FlushOutcome::Rejected { status }
            }
            Err(err) => {
                self.stats.flush_failed = self.stats.flush_failed.wrapping_add(1);
                warn!("netlog: flush failed err={} kept={}", err, events);
                FlushOutcome::Failed(err)
            }
        }
    }

    fn heartbeat(&mut self, now: Millis) {
        let flags = self.tracker.flags();
        let mut message = Message::new();
        let _ = match flags.downtime_ms(now) {
            Some(down_ms) => {
                let (minutes, seconds) = minutes_seconds(down_ms);
                write!(
                    message,
                    "Heartbeat: WiFi has been down for {minutes} minutes and {seconds} seconds"
                )
            }
            None if !flags.link_up => message.write_str("Heartbeat: WiFi is down"),
            None if self.config.probe_enabled => write!(
                message,
                "Heartbeat: WiFi is up, internet {}",
                flags.reachability.label()
            ),
            None => message.write_str("Heartbeat: WiFi is up"),
        };
        debug!("netlog: {}", message);
        self.log_event(now, &message);
    }
}
