// Shared test helpers

#![allow(dead_code)]

use bandwidth::counters::CounterSnapshot;

pub const HEADER: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
";

/// One /proc/net/dev data line with the given received and transmitted byte counters.
pub fn dev_line(name: &str, rx: u64, tx: u64) -> String {
    format!(
        "{:>6}: {:>8} {:>7} 0 0 0 0 0 0 {:>8} {:>7} 0 0 0 0 0 0\n",
        name,
        rx,
        rx / 100,
        tx,
        tx / 100
    )
}

/// Header followed by the given data lines.
pub fn table(lines: &[String]) -> String {
    let mut out = HEADER.to_string();
    for l in lines {
        out.push_str(l);
    }
    out
}

/// The table used by the aggregation scenarios: eth0, eth1 and the loopback.
pub fn scenario_table() -> String {
    table(&[
        dev_line("lo", 777_777, 888_888),
        dev_line("eth0", 1000, 2000),
        dev_line("eth1", 500, 1500),
    ])
}

pub fn snapshot(rx: u64, tx: u64, timestamp: i64) -> CounterSnapshot {
    CounterSnapshot {
        received_bytes: rx,
        transmitted_bytes: tx,
        timestamp,
    }
}
