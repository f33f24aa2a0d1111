// Counter table aggregation tests

mod common;

use bandwidth::config::InterfaceFilter;
use bandwidth::counters::{CounterSource, parse_table, wall_clock};
use bandwidth::error::SampleError;
use common::{dev_line, scenario_table, table};
use std::io::Write;

#[test]
fn test_explicit_filter_sums_both_interfaces() {
    let s = parse_table(
        &scenario_table(),
        &InterfaceFilter::parse_list("eth0,eth1"),
        0,
    )
    .unwrap();
    assert_eq!((s.received_bytes, s.transmitted_bytes), (1500, 3500));
}

#[test]
fn test_single_interface_filter() {
    let s = parse_table(&scenario_table(), &InterfaceFilter::parse_list("eth0"), 0).unwrap();
    assert_eq!((s.received_bytes, s.transmitted_bytes), (1000, 2000));
}

#[test]
fn test_empty_filter_takes_everything_but_loopback() {
    let s = parse_table(&scenario_table(), &InterfaceFilter::default(), 0).unwrap();
    assert_eq!((s.received_bytes, s.transmitted_bytes), (1500, 3500));
}

#[test]
fn test_loopback_excluded_even_when_named_in_filter() {
    let s = parse_table(&scenario_table(), &InterfaceFilter::parse_list("lo"), 0).unwrap();
    assert_eq!((s.received_bytes, s.transmitted_bytes), (0, 0));
}

#[test]
fn test_filter_name_not_present_yields_zero() {
    let s = parse_table(&scenario_table(), &InterfaceFilter::parse_list("wlan0"), 0).unwrap();
    assert_eq!((s.received_bytes, s.transmitted_bytes), (0, 0));
}

#[test]
fn test_aggregation_is_order_independent() {
    let lines = vec![
        dev_line("eth0", 1000, 2000),
        dev_line("lo", 5, 5),
        dev_line("wlan0", 31, 47),
        dev_line("eth1", 500, 1500),
    ];
    let forward = parse_table(&table(&lines), &InterfaceFilter::default(), 0).unwrap();

    let mut reversed = lines.clone();
    reversed.reverse();
    let backward = parse_table(&table(&reversed), &InterfaceFilter::default(), 0).unwrap();

    let mut rotated = lines;
    rotated.rotate_left(2);
    let rotated = parse_table(&table(&rotated), &InterfaceFilter::default(), 0).unwrap();

    assert_eq!(forward, backward);
    assert_eq!(forward, rotated);
    assert_eq!((forward.received_bytes, forward.transmitted_bytes), (1531, 3547));
}

#[test]
fn test_name_is_trimmed_before_matching() {
    let t = "   eth0:1 0 0 0 0 0 0 0 2\n";
    let s = parse_table(t, &InterfaceFilter::parse_list("eth0"), 0).unwrap();
    assert_eq!((s.received_bytes, s.transmitted_bytes), (1, 2));
}

#[test]
fn test_filtered_name_containing_pipe_contributes() {
    let t = table(&["   a|b: 7 0 0 0 0 0 0 0 9\n".to_string(), dev_line("eth0", 1, 1)]);
    let s = parse_table(&t, &InterfaceFilter::parse_list("a|b"), 0).unwrap();
    assert_eq!((s.received_bytes, s.transmitted_bytes), (7, 9));
}

#[test]
fn test_negative_field_is_a_parse_error() {
    let t = table(&["  eth0: -5 0 0 0 0 0 0 0 10\n".to_string()]);
    let err = parse_table(&t, &InterfaceFilter::default(), 0).unwrap_err();
    assert!(matches!(err, SampleError::Parse { field: 1, .. }));
}

#[test]
fn test_bad_transmitted_field_is_a_parse_error() {
    let t = table(&["  eth0: 5 0 0 0 0 0 0 0 ten\n".to_string()]);
    let err = parse_table(&t, &InterfaceFilter::default(), 0).unwrap_err();
    assert!(matches!(err, SampleError::Parse { field: 9, .. }));
    assert!(err.to_string().contains("eth0"));
}

#[test]
fn test_source_reads_file_and_stamps_timestamp() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(scenario_table().as_bytes()).unwrap();

    let source = CounterSource::new(file.path());
    let s = source
        .sample_at(&InterfaceFilter::parse_list("eth1"), 1_700_000_000)
        .unwrap();
    assert_eq!((s.received_bytes, s.transmitted_bytes), (500, 1500));
    assert_eq!(s.timestamp, 1_700_000_000);
}

#[test]
fn test_missing_source_is_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("net_dev");
    let err = CounterSource::new(&path)
        .sample(&InterfaceFilter::default())
        .unwrap_err();
    match err {
        SampleError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected Io error, got {other}"),
    }
}

#[test]
fn test_sample_is_stamped_with_wall_clock() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(scenario_table().as_bytes()).unwrap();

    let before = wall_clock();
    let s = CounterSource::new(file.path())
        .sample(&InterfaceFilter::default())
        .unwrap();
    let after = wall_clock();
    assert!(before <= s.timestamp && s.timestamp <= after);
}
