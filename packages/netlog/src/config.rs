use crate::payload::PayloadShape;

pub const HEARTBEAT_INTERVAL_DEFAULT_MS: u32 = 10_000;
pub const PROBE_INTERVAL_DEFAULT_MS: u32 = 15 * 60_000;
// Second tier of the probe schedule while the internet looks unreachable.
pub const PROBE_RETRY_INTERVAL_DEFAULT_MS: u32 = 15_000;
pub const FLUSH_INTERVAL_DEFAULT_MS: u32 = 5 * 60_000;
pub const URGENT_RETRY_DEFAULT_MS: u32 = 10_000;
pub const ACCEPTED_STATUS_DEFAULT: &[u16] = &[200, 201];

/// How repeated `Disconnected` notices are handled while the link is already down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisconnectPolicy {
    /// One "disconnected" event per outage.
    Guarded,
    /// Every notice logs an event and restarts the downtime clock.
    EveryNotice,
}

/// What to do with an event produced before the wall clock is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StampPolicy {
    /// Drop it.
    WallClockOnly,
    /// Keep it, stamped with seconds since boot.
    UptimeFallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub heartbeat_interval_ms: u32,
    pub probe_interval_ms: u32,
    pub probe_retry_interval_ms: u32,
    pub flush_interval_ms: u32,
    pub urgent_retry_ms: u32,
    pub probe_enabled: bool,
    pub disconnect_policy: DisconnectPolicy,
    pub stamp_policy: StampPolicy,
    pub payload_shape: PayloadShape,
    pub accepted_status: &'static [u16],
}

impl MonitorConfig {
    pub const fn defaults() -> Self {
        Self {
            heartbeat_interval_ms: HEARTBEAT_INTERVAL_DEFAULT_MS,
            probe_interval_ms: PROBE_INTERVAL_DEFAULT_MS,
            probe_retry_interval_ms: PROBE_RETRY_INTERVAL_DEFAULT_MS,
            flush_interval_ms: FLUSH_INTERVAL_DEFAULT_MS,
            urgent_retry_ms: URGENT_RETRY_DEFAULT_MS,
            probe_enabled: true,
            disconnect_policy: DisconnectPolicy::Guarded,
            stamp_policy: StampPolicy::WallClockOnly,
            payload_shape: PayloadShape::Wrapped,
            accepted_status: ACCEPTED_STATUS_DEFAULT,
        }
    }

    /// Clamps intervals into ranges the wrapping tick can represent and keeps
    /// the probe retry tier below the regular probe interval.
    pub const fn sanitized(self) -> Self {
        // Half the u32 range keeps wrapping comparisons unambiguous.
        const INTERVAL_MAX_MS: u32 = u32::MAX / 2;

        let heartbeat_interval_ms = clamp_u32(self.heartbeat_interval_ms, 1_000, INTERVAL_MAX_MS);
        let probe_interval_ms = clamp_u32(self.probe_interval_ms, 1_000, INTERVAL_MAX_MS);
        let mut probe_retry_interval_ms =
            clamp_u32(self.probe_retry_interval_ms, 1_000, INTERVAL_MAX_MS);
        if probe_retry_interval_ms > probe_interval_ms {
            probe_retry_interval_ms = probe_interval_ms;
        }
        let flush_interval_ms = clamp_u32(self.flush_interval_ms, 1_000, INTERVAL_MAX_MS);
        let urgent_retry_ms = clamp_u32(self.urgent_retry_ms, 0, INTERVAL_MAX_MS);
        let accepted_status = if self.accepted_status.is_empty() {
            ACCEPTED_STATUS_DEFAULT
        } else {
            self.accepted_status
        };
        Self {
            heartbeat_interval_ms,
            probe_interval_ms,
            probe_retry_interval_ms,
            flush_interval_ms,
            urgent_retry_ms,
            probe_enabled: self.probe_enabled,
            disconnect_policy: self.disconnect_policy,
            stamp_policy: self.stamp_policy,
            payload_shape: self.payload_shape,
            accepted_status,
        }
    }

    pub fn accepts(&self, status: u16) -> bool {
        self.accepted_status.contains(&status)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
