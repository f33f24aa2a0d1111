use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Interface name that never contributes to a snapshot.
pub const LOOPBACK: &str = "lo";

/// Linux per-interface counter table.
pub const DEFAULT_SOURCE: &str = "/proc/net/dev";

pub const DEFAULT_WARNING_COLOR: &str = "#FFA500";
pub const DEFAULT_CRITICAL_COLOR: &str = "#FF7373";

/// Longest accepted refresh interval (one day).
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Env var naming a TOML config file, used when no path is given explicitly.
pub const CONFIG_ENV: &str = "BANDWIDTH_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    Bits,
    #[default]
    Bytes,
}

impl UnitMode {
    /// Unit character printed after the scale suffix.
    pub fn symbol(self) -> char {
        match self {
            UnitMode::Bits => 'b',
            UnitMode::Bytes => 'B',
        }
    }

    /// Multiplier from a byte rate to the displayed quantity.
    pub fn factor(self) -> f64 {
        match self {
            UnitMode::Bits => 8.0,
            UnitMode::Bytes => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitBase {
    /// Decimal prefixes (1000).
    Si,
    /// Binary prefixes (1024).
    #[default]
    Binary,
}

impl UnitBase {
    pub fn divisor(self) -> u64 {
        match self {
            UnitBase::Si => 1000,
            UnitBase::Binary => 1024,
        }
    }
}

/// Per-direction limits in bytes per second. 0 disables a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdSet {
    pub warning: u64,
    pub critical: u64,
}

/// Interfaces to aggregate. Empty means every interface except the loopback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct InterfaceFilter(Vec<String>);

impl InterfaceFilter {
    /// Builds a filter keeping first-seen order; blank and repeated names are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !out.iter().any(|n| n == name) {
                out.push(name.to_string());
            }
        }
        Self(out)
    }

    /// Parses a comma-separated allowlist such as `"eth0, wlan0"`.
    pub fn parse_list(s: &str) -> Self {
        Self::new(s.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Whether a trimmed interface name contributes to the aggregate.
    pub fn admits(&self, name: &str) -> bool {
        if name == LOOPBACK {
            return false;
        }
        self.0.is_empty() || self.0.iter().any(|n| n == name)
    }
}

impl From<Vec<String>> for InterfaceFilter {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub unit: UnitMode,
    pub base: UnitBase,
    pub rx: ThresholdSet,
    pub tx: ThresholdSet,
    pub warning_color: String,
    pub critical_color: String,
    /// Seconds between two samples.
    pub interval_secs: u64,
    pub interfaces: InterfaceFilter,
    /// Printed verbatim in front of every line.
    pub label: Option<String>,
    /// Path of the counter table.
    pub source: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unit: UnitMode::default(),
            base: UnitBase::default(),
            rx: ThresholdSet::default(),
            tx: ThresholdSet::default(),
            warning_color: DEFAULT_WARNING_COLOR.into(),
            critical_color: DEFAULT_CRITICAL_COLOR.into(),
            interval_secs: 1,
            interfaces: InterfaceFilter::default(),
            label: None,
            source: PathBuf::from(DEFAULT_SOURCE),
        }
    }
}

impl DisplayConfig {
    /// Loads from an explicit TOML file, else from `$BANDWIDTH_CONFIG` when that file exists,
    /// else defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(p) = path {
            return Self::load_file(p);
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(p);
            if p.exists() {
                return Self::load_file(&p);
            }
            tracing::debug!(path = %p.display(), "config file from {} not found, using defaults", CONFIG_ENV);
        }
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::load_from_str(&s).with_context(|| format!("loading config file {}", path.display()))
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: DisplayConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies status-bar style environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = |key: &str| {
            lookup(key).is_some_and(|v| v.trim() == "1" || v.trim().eq_ignore_ascii_case("true"))
        };
        let number = |key: &str| -> anyhow::Result<Option<u64>> {
            lookup(key)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, v))
                })
                .transpose()
        };

        if enabled("USE_BITS") {
            self.unit = UnitMode::Bits;
        }
        if enabled("USE_BYTES") {
            self.unit = UnitMode::Bytes;
        }
        if enabled("USE_SI") {
            self.base = UnitBase::Si;
        }
        if let Some(n) = number("REFRESH_TIME")? {
            self.interval_secs = n;
        }
        if let Some(list) = lookup("INTERFACES") {
            self.interfaces = InterfaceFilter::parse_list(&list);
        }
        if let Some(n) = number("WARN_RX")? {
            self.rx.warning = n;
        }
        if let Some(n) = number("WARN_TX")? {
            self.tx.warning = n;
        }
        if let Some(n) = number("CRIT_RX")? {
            self.rx.critical = n;
        }
        if let Some(n) = number("CRIT_TX")? {
            self.tx.critical = n;
        }
        if let Some(c) = lookup("WARN_COLOR") {
            self.warning_color = c;
        }
        if let Some(c) = lookup("CRIT_COLOR") {
            self.critical_color = c;
        }
        if let Some(l) = lookup("LABEL") {
            self.label = Some(l).filter(|l| !l.is_empty());
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.interval_secs > 0 && self.interval_secs <= MAX_INTERVAL_SECS,
            "interval_secs must be between 1 and {}, got {}",
            MAX_INTERVAL_SECS,
            self.interval_secs
        );
        anyhow::ensure!(
            !self.warning_color.trim().is_empty(),
            "warning_color must be non-empty"
        );
        anyhow::ensure!(
            !self.critical_color.trim().is_empty(),
            "critical_color must be non-empty"
        );
        for (key, t) in [("rx", &self.rx), ("tx", &self.tx)] {
            if t.warning != 0 && t.critical != 0 && t.warning > t.critical {
                tracing::warn!(
                    direction = key,
                    warning = t.warning,
                    critical = t.critical,
                    "warning threshold exceeds critical; critical color takes precedence"
                );
            }
        }
        Ok(())
    }
}

/// Parses an `rx:tx` threshold pair. An empty side disables that direction.
pub fn parse_threshold_pair(s: &str) -> Result<(u64, u64), String> {
    let (rx, tx) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <rx>:<tx>, got {:?}", s))?;
    let side = |v: &str| -> Result<u64, String> {
        let v = v.trim();
        if v.is_empty() {
            return Ok(0);
        }
        v.parse::<u64>()
            .map_err(|e| format!("invalid byte rate {:?}: {}", v, e))
    };
    Ok((side(rx)?, side(tx)?))
}
