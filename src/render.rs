// Rate formatter: differences two snapshots and renders one markup token per direction.

use crate::config::{DisplayConfig, ThresholdSet};
use crate::counters::CounterSnapshot;
use crate::error::TimeError;

const SPAN_CLOSE: &str = "</span>";

/// Bytes per second between two counter readings over `elapsed` seconds.
///
/// A counter that went backwards (reset, wrap, interface replaced) yields 0 rather than a
/// negative or huge rate. The aggregate carries no per-interface state, so an interface that
/// appears between two samples is folded into the same rule.
pub fn byte_rate(prev: u64, curr: u64, elapsed: f64) -> f64 {
    curr.saturating_sub(prev) as f64 / elapsed
}

/// Color for a byte rate, critical first. Limits of 0 are disabled and comparison is strict.
pub fn classify<'a>(rate: f64, limits: &ThresholdSet, cfg: &'a DisplayConfig) -> Option<&'a str> {
    if limits.critical != 0 && rate > limits.critical as f64 {
        Some(cfg.critical_color.as_str())
    } else if limits.warning != 0 && rate > limits.warning as f64 {
        Some(cfg.warning_color.as_str())
    } else {
        None
    }
}

/// Scales `value` by powers of `base`, returning the scaled value and its suffix.
/// Values under one base unit get a single space in the suffix slot.
pub fn scale(value: f64, base: u64) -> (f64, &'static str) {
    let b = base as f64;
    if value < b {
        (value, " ")
    } else if value < b * b {
        (value / b, "K")
    } else if value < b * b * b {
        (value / (b * b), "M")
    } else {
        (value / (b * b * b), "G")
    }
}

/// Renders one direction. Classification uses the byte rate even when displaying bits.
pub fn format_rate(rate: f64, limits: &ThresholdSet, cfg: &DisplayConfig) -> String {
    let open = match classify(rate, limits, cfg) {
        Some(color) => format!("<span fallback='true' color='{}'>", color),
        None => "<span fallback='true'>".to_string(),
    };
    let (value, suffix) = scale(rate * cfg.unit.factor(), cfg.base.divisor());
    format!(
        "{}{:.1}{}{}/s{}",
        open,
        value,
        suffix,
        cfg.unit.symbol(),
        SPAN_CLOSE
    )
}

/// Renders the receive and transmit tokens for the interval `prev` -> `curr`.
pub fn render(
    prev: &CounterSnapshot,
    curr: &CounterSnapshot,
    cfg: &DisplayConfig,
) -> Result<(String, String), TimeError> {
    let elapsed = curr.timestamp - prev.timestamp;
    if elapsed <= 0 {
        return Err(TimeError { elapsed });
    }
    let dt = elapsed as f64;

    let rx = byte_rate(prev.received_bytes, curr.received_bytes, dt);
    let tx = byte_rate(prev.transmitted_bytes, curr.transmitted_bytes, dt);
    Ok((format_rate(rx, &cfg.rx, cfg), format_rate(tx, &cfg.tx, cfg)))
}

/// Joins the label and both tokens into one output line, without the trailing newline.
pub fn compose_line(label: Option<&str>, rx: &str, tx: &str) -> String {
    format!("{}{} {}", label.unwrap_or_default(), rx, tx)
}
