use super::{AppendOutcome, EventLog};
use crate::{clock::Timestamp, event::Event, event::EventRecord};

fn record(n: u32) -> EventRecord {
    Event::new(Timestamp::from_unix(u64::from(n)), true, None, &format!("e{n}"))
        .encode()
        .expect("encode")
}

fn messages<const CAP: usize>(log: &EventLog<CAP>) -> Vec<String> {
    log.iter()
        .map(|record| {
            let value: serde_json::Value = serde_json::from_str(record.as_str()).expect("json");
            value["message"].as_str().expect("message").to_owned()
        })
        .collect()
}

fn names(range: impl IntoIterator<Item = u32>) -> Vec<String> {
    range.into_iter().map(|n| format!("e{n}")).collect()
}

#[test]
fn appends_preserve_insertion_order() {
    let mut log = EventLog::<8>::new();
    for n in 1..=3 {
        assert_eq!(log.append(record(n)), AppendOutcome::Appended);
    }
    assert_eq!(log.len(), 3);
    assert_eq!(messages(&log), names(1..=3));
}

#[test]
fn full_log_trims_before_insert_keeping_both_edges() {
    let mut log = EventLog::<180>::new();
    let mut trims = 0;
    for n in 1..=185 {
        if let AppendOutcome::Trimmed { dropped } = log.append(record(n)) {
            assert_eq!(n, 181);
            assert_eq!(dropped, 170);
            trims += 1;
        }
        assert!(log.len() <= log.capacity());
    }
    assert_eq!(trims, 1);
    assert_eq!(log.len(), 15);

    let mut expected = names(1..=5);
    expected.extend(names(176..=185));
    assert_eq!(messages(&log), expected);
}

#[test]
fn trim_result_is_oldest_then_newest_then_new() {
    let mut log = EventLog::<12>::new();
    for n in 1..=12 {
        log.append(record(n));
    }
    assert_eq!(log.append(record(13)), AppendOutcome::Trimmed { dropped: 2 });

    let mut expected = names(1..=5);
    expected.extend(names(8..=13));
    assert_eq!(messages(&log), expected);
}

#[test]
fn tiny_capacity_shrinks_edges() {
    let mut log = EventLog::<4>::new();
    for n in 1..=4 {
        log.append(record(n));
    }
    // Edge is (4 - 1) / 2 = 1 per side.
    assert_eq!(log.append(record(5)), AppendOutcome::Trimmed { dropped: 2 });
    assert_eq!(messages(&log), names([1, 4, 5]));

    let mut single = EventLog::<1>::new();
    single.append(record(1));
    assert_eq!(single.append(record(2)), AppendOutcome::Trimmed { dropped: 1 });
    assert_eq!(messages(&single), names([2]));
}

#[test]
fn snapshot_is_read_only_and_ordered_across_wrap() {
    let mut log = EventLog::<12>::new();
    for n in 1..=14 {
        log.append(record(n));
    }
    let snapshot = log.snapshot();
    assert_eq!(snapshot.len(), log.len());
    assert_eq!(
        snapshot.iter().map(EventRecord::as_str).collect::<Vec<_>>(),
        log.iter().map(EventRecord::as_str).collect::<Vec<_>>()
    );
    for (index, record) in log.iter().enumerate() {
        assert_eq!(snapshot.get(index), Some(record));
    }
    assert_eq!(snapshot.get(log.len()), None);
    assert_eq!(log.len(), 12);
}

#[test]
fn clear_empties_the_log() {
    let mut log = EventLog::<8>::new();
    log.append(record(1));
    log.append(record(2));
    log.clear();
    assert!(log.is_empty());
    assert!(log.snapshot().is_empty());
}
