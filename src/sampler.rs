// Sampling loop driver.
// Owns the single previous snapshot; each tick reads a new one, renders the interval and
// rotates the new snapshot into the previous slot.

use crate::config::DisplayConfig;
use crate::counters::{CounterSnapshot, CounterSource, wall_clock};
use crate::error::SampleError;
use crate::render::{compose_line, render};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

pub struct Sampler {
    source: CounterSource,
    config: DisplayConfig,
    previous: CounterSnapshot,
    clock: fn() -> i64,
}

impl Sampler {
    pub fn new(source: CounterSource, config: DisplayConfig, initial: CounterSnapshot) -> Self {
        Self {
            source,
            config,
            previous: initial,
            clock: wall_clock,
        }
    }

    /// Reads the initial snapshot from the configured source.
    pub fn start(config: DisplayConfig) -> Result<Self, SampleError> {
        let source = CounterSource::new(config.source.clone());
        let initial = source.sample_at(&config.interfaces, wall_clock())?;
        Ok(Self::new(source, config, initial))
    }

    /// Replaces the timestamp source used by [`Sampler::tick`].
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn previous(&self) -> &CounterSnapshot {
        &self.previous
    }

    /// Renders `previous -> current` into one output line and rotates the snapshots.
    ///
    /// Returns `None` when the elapsed time is not positive. With zero elapsed time the
    /// previous snapshot is kept so the next tick covers both intervals; when the clock went
    /// backwards `current` becomes the new baseline.
    pub fn step(&mut self, current: CounterSnapshot) -> Option<String> {
        match render(&self.previous, &current, &self.config) {
            Ok((rx, tx)) => {
                self.previous = current;
                Some(compose_line(self.config.label.as_deref(), &rx, &tx))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "render",
                    "skipping emission for this cycle"
                );
                if e.elapsed < 0 {
                    self.previous = current;
                }
                None
            }
        }
    }

    /// Samples the source and steps. Sampling failures are returned to the caller.
    pub fn tick(&mut self) -> Result<Option<String>, SampleError> {
        let current = self
            .source
            .sample_at(&self.config.interfaces, (self.clock)())?;
        Ok(self.step(current))
    }
}

/// Emits one line per interval to `out` until `shutdown` fires or a tick fails.
/// Every line is newline-terminated and flushed immediately.
pub async fn run<W>(
    mut sampler: Sampler,
    out: &mut W,
    mut shutdown: tokio::sync::oneshot::Receiver<()>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let period = Duration::from_secs(sampler.config().interval_secs);
    let first = Instant::now().checked_add(period).ok_or_else(|| {
        anyhow::anyhow!(
            "interval_secs {} is too large for the timer",
            sampler.config().interval_secs
        )
    })?;
    let mut tick = interval_at(first, period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::debug!(
        interval_secs = sampler.config().interval_secs,
        source = %sampler.source.path().display(),
        "Sampler started"
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let line = match sampler.tick() {
                    Ok(Some(line)) => line,
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            operation = "sample",
                            "counter sampling failed"
                        );
                        return Err(e.into());
                    }
                };
                out.write_all(line.as_bytes()).await?;
                out.write_all(b"\n").await?;
                out.flush().await?;
            }
            _ = &mut shutdown => {
                tracing::debug!("Sampler shutting down");
                break;
            }
        }
    }
    Ok(())
}
