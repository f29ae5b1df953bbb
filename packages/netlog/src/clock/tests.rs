use super::{sntp, ClockSync, Timestamp, WallClock};
use crate::{config::StampPolicy, tick::Millis};

#[test]
fn formats_epoch_and_known_dates() {
    assert_eq!(Timestamp::from_unix(0).as_str(), "1970-01-01T00:00:00");
    assert_eq!(
        Timestamp::from_unix(951_782_400).as_str(),
        "2000-02-29T00:00:00"
    );
    assert_eq!(
        Timestamp::from_unix(1_700_000_000).as_str(),
        "2023-11-14T22:13:20"
    );
    assert_eq!(
        Timestamp::from_unix(1_735_689_599).as_str(),
        "2024-12-31T23:59:59"
    );
}

#[test]
fn unsynced_clock_yields_no_timestamp() {
    let clock = WallClock::unsynced();
    assert!(!clock.is_synced());
    assert!(clock.timestamp(Millis(5_000)).is_none());
    assert!(clock
        .stamp(Millis(5_000), StampPolicy::WallClockOnly)
        .is_none());
}

#[test]
fn uptime_fallback_stamps_unsynced_events() {
    let clock = WallClock::unsynced();
    let ts = clock
        .stamp(Millis(12_345), StampPolicy::UptimeFallback)
        .expect("fallback stamp");
    assert_eq!(ts.as_str(), "uptime+12s");
}

#[test]
fn synced_clock_advances_with_tick() {
    let mut clock = WallClock::unsynced();
    clock.sync(ClockSync {
        unix_seconds: 1_700_000_000,
        at: Millis(10_000),
    });
    assert!(clock.is_synced());
    assert_eq!(clock.unix_seconds(Millis(10_999)), Some(1_700_000_000));
    assert_eq!(clock.unix_seconds(Millis(75_000)), Some(1_700_000_065));
    assert_eq!(
        clock
            .stamp(Millis(75_000), StampPolicy::UptimeFallback)
            .expect("synced stamp")
            .as_str(),
        "2023-11-14T22:14:25"
    );
}

#[test]
fn synced_clock_survives_tick_rollover() {
    let mut clock = WallClock::unsynced();
    clock.sync(ClockSync {
        unix_seconds: 1_000,
        at: Millis(u32::MAX - 999),
    });
    assert_eq!(clock.unix_seconds(Millis(2_000)), Some(1_003));
}

fn reply_with(mode: u8, stratum: u8, seconds: u32) -> [u8; sntp::PACKET_LEN] {
    let mut reply = [0u8; sntp::PACKET_LEN];
    reply[0] = 0x18 | mode;
    reply[1] = stratum;
    reply[40..44].copy_from_slice(&seconds.to_be_bytes());
    reply
}

#[test]
fn sntp_request_is_client_mode_v3() {
    let request = sntp::request();
    assert_eq!(request[0], 0x1B);
    assert!(request[1..].iter().all(|&b| b == 0));
}

#[test]
fn sntp_reply_converts_to_unix() {
    let reply = reply_with(4, 2, 3_908_988_800);
    assert_eq!(sntp::parse_reply(&reply), Some(1_700_000_000));
}

#[test]
fn sntp_reply_rejects_kiss_of_death_and_short_packets() {
    assert_eq!(sntp::parse_reply(&reply_with(4, 0, 3_908_988_800)), None);
    assert_eq!(sntp::parse_reply(&reply_with(3, 2, 3_908_988_800)), None);
    assert_eq!(sntp::parse_reply(&reply_with(4, 2, 0)), None);
    assert_eq!(sntp::parse_reply(&[0x1C; 12]), None);
}

#[test]
fn sntp_reply_handles_era_rollover() {
    // 2040-01-01T00:00:00Z sits in NTP era 1.
    let unix = 2_208_988_800u64;
    let ntp_era1 = (unix + 2_208_988_800 - (1 << 32)) as u32;
    assert_eq!(
        sntp::parse_reply(&reply_with(4, 1, ntp_era1)),
        Some(unix)
    );
}
