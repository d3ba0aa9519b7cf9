// Polling driver: baseline sample, then one sample + report per second until shutdown.
// The previous snapshot is threaded through the loop; nothing is shared across cycles.

use std::io::Write;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::instrument;

use crate::aggregator::{CounterSource, aggregate};
use crate::config::{AppConfig, ErrorPolicy};
use crate::error::ProbeError;
use crate::models::{CounterDelta, IntervalReport, NetworkMetrics};
use crate::report::{self, ReportFormat};
use crate::sysctl_repo::InterfaceTable;

/// Fixed sampling cadence.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct Sampler {
    table: Arc<dyn InterfaceTable>,
    source: CounterSource,
}

impl Sampler {
    pub fn new(table: Arc<dyn InterfaceTable>, source: CounterSource) -> Self {
        Self { table, source }
    }

    pub fn source(&self) -> CounterSource {
        self.source
    }

    /// One blocking sample: fetch the interface table, then aggregate it.
    #[instrument(skip(self), fields(source = ?self.source))]
    pub fn sample_blocking(&self) -> Result<NetworkMetrics, ProbeError> {
        let buffer = self.table.fetch_interface_table()?;
        aggregate(&buffer, self.source, self.table.as_ref())
    }

    /// Same as `sample_blocking`, off the async worker threads.
    pub async fn sample(&self) -> anyhow::Result<NetworkMetrics> {
        let this = self.clone();
        let metrics = tokio::task::spawn_blocking(move || this.sample_blocking())
            .await
            .map_err(|e| anyhow::anyhow!("sampler task join: {}", e))??;
        Ok(metrics)
    }
}

/// Driver settings taken from the app config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplerConfig {
    pub on_error: ErrorPolicy,
    pub format: ReportFormat,
}

impl From<&AppConfig> for SamplerConfig {
    fn from(c: &AppConfig) -> Self {
        Self {
            on_error: c.sampling.on_error,
            format: c.output.format,
        }
    }
}

/// Outcome of one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// New sample taken; `report` compares it with the previous one.
    Reported { report: IntervalReport },
    /// Sample failed under `ErrorPolicy::Skip`; the previous snapshot carries over.
    Skipped,
}

/// Advance the driver by one interval. Returns the step and the snapshot to
/// compare against next time.
pub fn next_interval(
    previous: NetworkMetrics,
    sample: anyhow::Result<NetworkMetrics>,
    policy: ErrorPolicy,
) -> anyhow::Result<(Step, NetworkMetrics)> {
    match sample {
        Ok(current) => {
            let report = IntervalReport::between(&previous, &current);
            Ok((Step::Reported { report }, current))
        }
        Err(e) => match policy {
            ErrorPolicy::Abort => Err(e),
            ErrorPolicy::Skip => {
                tracing::warn!(error = %e, operation = "sample", "sample failed; interval skipped");
                Ok((Step::Skipped, previous))
            }
        },
    }
}

fn log_wraps(report: &IntervalReport) {
    let counters = [
        ("input_bytes", &report.input_bytes),
        ("output_bytes", &report.output_bytes),
        ("input_packets", &report.input_packets),
        ("output_packets", &report.output_packets),
    ];
    for (counter, delta) in counters {
        if let CounterDelta::Wrapped {
            before,
            after,
            difference,
        } = delta
        {
            tracing::warn!(
                counter,
                before,
                after,
                difference,
                "counter went backwards (kernel truncation)"
            );
        }
    }
}

/// Run until `shutdown_rx` fires. Returns the number of intervals reported.
///
/// A failed baseline sample always aborts; later failures follow `config.on_error`.
#[instrument(skip_all, fields(source = ?sampler.source(), format = ?config.format))]
pub async fn run<W: Write>(
    sampler: &Sampler,
    config: SamplerConfig,
    out: &mut W,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> anyhow::Result<u64> {
    let mut previous = sampler.sample().await?;
    tracing::debug!(baseline = ?previous, "baseline sample taken");

    let mut tick = interval_at(Instant::now() + SAMPLE_INTERVAL, SAMPLE_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut reported: u64 = 0;
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let sample = sampler.sample().await;
                let (step, next) = next_interval(previous, sample, config.on_error)?;
                previous = next;
                if let Step::Reported { report } = step {
                    if report.has_overflow() {
                        log_wraps(&report);
                    }
                    out.write_all(report::render(&report, config.format)?.as_bytes())?;
                    out.flush()?;
                    reported += 1;
                }
            }
            _ = &mut shutdown_rx => {
                tracing::debug!("Sampler shutting down");
                break;
            }
        }
    }
    Ok(reported)
}
