use anyhow::Result;
use ifstat_probe::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = config::AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&app_config.logging.filter));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        source = ?app_config.sampling.source,
        on_error = ?app_config.sampling.on_error,
        "Starting interface probe"
    );

    let sampler = sampler::Sampler::new(
        Arc::new(sysctl_repo::SysctlRepo::new()),
        app_config.sampling.source,
    );
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            let mut sigterm = match tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            ) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    let _ = shutdown_tx.send(());
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    });

    let mut stdout = std::io::stdout();
    let reported = sampler::run(
        &sampler,
        sampler::SamplerConfig::from(&app_config),
        &mut stdout,
        shutdown_rx,
    )
    .await?;

    tracing::info!(intervals = reported, "Interface probe stopped");
    Ok(())
}
