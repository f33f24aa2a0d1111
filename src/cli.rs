// Command-line surface, merged over the file and environment config.

use crate::config::{DisplayConfig, InterfaceFilter, UnitBase, UnitMode, parse_threshold_pair};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "bandwidth",
    version,
    about = "Print received and transmitted network rates for a status bar"
)]
#[must_use]
pub struct Cli {
    /// Use bits/s.
    #[arg(short = 'b', long, conflicts_with = "bytes")]
    pub bits: bool,
    /// Use Bytes/s. [default]
    #[arg(short = 'B', long)]
    pub bytes: bool,
    /// Use SI units (1000) instead of binary (1024).
    #[arg(short = 's', long)]
    pub si: bool,
    /// Refresh time in seconds. [default: 1]
    #[arg(short = 't', long = "time", value_name = "SECONDS")]
    pub interval_secs: Option<u64>,
    /// Interfaces to monitor, comma separated or repeated. [default: all but lo]
    #[arg(short = 'i', long = "interface", value_name = "IFACES")]
    pub interfaces: Vec<String>,
    /// Warning thresholds in Bytes/s for Rx:Tx.
    #[arg(short = 'w', long, value_name = "RX:TX", value_parser = parse_threshold_pair)]
    pub warning: Option<(u64, u64)>,
    /// Critical thresholds in Bytes/s for Rx:Tx.
    #[arg(short = 'c', long, value_name = "RX:TX", value_parser = parse_threshold_pair)]
    pub critical: Option<(u64, u64)>,
    /// Warning color. [default: #FFA500]
    #[arg(short = 'W', long, value_name = "COLOR")]
    pub warning_color: Option<String>,
    /// Critical color. [default: #FF7373]
    #[arg(short = 'C', long, value_name = "COLOR")]
    pub critical_color: Option<String>,
    /// Text printed before the rates.
    #[arg(short = 'l', long)]
    pub label: Option<String>,
    /// Counter table to read. [default: /proc/net/dev]
    #[arg(long, value_name = "PATH")]
    pub source: Option<PathBuf>,
    /// TOML config file. [env: BANDWIDTH_CONFIG]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Loads the base config (file, then process environment) and applies the flags on top.
    pub fn load(self) -> anyhow::Result<DisplayConfig> {
        let mut config = DisplayConfig::load(self.config.as_deref())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        self.apply(config)
    }

    /// Applies the flags to `config` and re-validates.
    pub fn apply(self, mut config: DisplayConfig) -> anyhow::Result<DisplayConfig> {
        if self.bits {
            config.unit = UnitMode::Bits;
        }
        if self.bytes {
            config.unit = UnitMode::Bytes;
        }
        if self.si {
            config.base = UnitBase::Si;
        }
        if let Some(secs) = self.interval_secs {
            config.interval_secs = secs;
        }
        if !self.interfaces.is_empty() {
            config.interfaces =
                InterfaceFilter::new(self.interfaces.iter().flat_map(|s| s.split(',')));
        }
        if let Some((rx, tx)) = self.warning {
            config.rx.warning = rx;
            config.tx.warning = tx;
        }
        if let Some((rx, tx)) = self.critical {
            config.rx.critical = rx;
            config.tx.critical = tx;
        }
        if let Some(c) = self.warning_color {
            config.warning_color = c;
        }
        if let Some(c) = self.critical_color {
            config.critical_color = c;
        }
        if let Some(l) = self.label {
            config.label = Some(l).filter(|l| !l.is_empty());
        }
        if let Some(p) = self.source {
            config.source = p;
        }
        config.validate()?;
        Ok(config)
    }
}
