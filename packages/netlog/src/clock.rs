use core::fmt::Write as _;

use crate::{config::StampPolicy, tick::Millis};

const SECONDS_PER_DAY: u64 = 86_400;
const TIMESTAMP_MAX: usize = 24;

/// Wall-clock anchor: the UTC time observed at a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockSync {
    pub unix_seconds: u64,
    pub at: Millis,
}

/// Clock gate. Until a sync arrives no wall-clock timestamp can be produced.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock {
    sync: Option<ClockSync>,
}

impl WallClock {
    pub const fn unsynced() -> Self {
        Self { sync: None }
    }

    pub fn sync(&mut self, sync: ClockSync) {
        self.sync = Some(sync);
    }

    pub const fn is_synced(&self) -> bool {
        self.sync.is_some()
    }

    pub fn unix_seconds(&self, now: Millis) -> Option<u64> {
        let sync = self.sync?;
        let elapsed_s = u64::from(now.since(sync.at) / 1_000);
        Some(sync.unix_seconds.saturating_add(elapsed_s))
    }

    pub fn timestamp(&self, now: Millis) -> Option<Timestamp> {
        self.unix_seconds(now).map(Timestamp::from_unix)
    }

    /// Timestamp for a new event, or `None` when the event must be dropped.
    pub fn stamp(&self, now: Millis, policy: StampPolicy) -> Option<Timestamp> {
        match (self.timestamp(now), policy) {
            (Some(ts), _) => Some(ts),
            (None, StampPolicy::WallClockOnly) => None,
            (None, StampPolicy::UptimeFallback) => Some(Timestamp::uptime(now)),
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SS` in UTC, or `uptime+<s>s` under the fallback policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timestamp(heapless::String<TIMESTAMP_MAX>);

impl Timestamp {
    pub fn from_unix(unix_seconds: u64) -> Self {
        let days = unix_seconds / SECONDS_PER_DAY;
        let seconds_of_day = unix_seconds % SECONDS_PER_DAY;
        let (year, month, day) = civil_from_days(days);
        let hours = seconds_of_day / 3_600;
        let minutes = (seconds_of_day / 60) % 60;
        let seconds = seconds_of_day % 60;

        let mut out = heapless::String::new();
        let _ = write!(
            &mut out,
            "{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}"
        );
        Self(out)
    }

    pub fn uptime(now: Millis) -> Self {
        let mut out = heapless::String::new();
        let _ = write!(&mut out, "uptime+{}s", now.as_u32() / 1_000);
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: u64) -> (u64, u32, u32) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

pub mod sntp {
    //! Client-mode SNTP packet handling (RFC 4330).

    pub const PACKET_LEN: usize = 48;
    pub const PORT: u16 = 123;
    const NTP_UNIX_OFFSET: u64 = 2_208_988_800;
    const ERA_SECONDS: u64 = 1 << 32;
    const MODE_SERVER: u8 = 4;
    const MODE_BROADCAST: u8 = 5;

    /// LI = 0, VN = 3, Mode = 3 (client); everything else zero.
    pub const fn request() -> [u8; PACKET_LEN] {
        let mut packet = [0u8; PACKET_LEN];
        packet[0] = 0x1B;
        packet
    }

    /// Extracts the transmit timestamp as unix seconds.
    pub fn parse_reply(reply: &[u8]) -> Option<u64> {
        if reply.len() < PACKET_LEN {
            return None;
        }
        let mode = reply[0] & 0x07;
        if mode != MODE_SERVER && mode != MODE_BROADCAST {
            return None;
        }
        // Stratum 0 is a kiss-of-death reply.
        let stratum = reply[1];
        if stratum == 0 || stratum > 15 {
            return None;
        }
        let seconds = u32::from_be_bytes([reply[40], reply[41], reply[42], reply[43]]);
        if seconds == 0 {
            return None;
        }
        let mut seconds = u64::from(seconds);
        // Era 1 starts 2036-02-07; such values are below the unix offset.
        if seconds < NTP_UNIX_OFFSET {
            seconds += ERA_SECONDS;
        }
        Some(seconds - NTP_UNIX_OFFSET)
    }
}

#[cfg(test)]
mod tests;
