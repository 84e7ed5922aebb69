use std::path::Path;
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber: stdout always, plus a daily-rotated file
/// when `log_dir` is given. Keep the returned guard alive for the life of
/// the process or buffered file output is lost.
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    // `log` records from the client modules are forwarded into tracing.
    let _ = LogTracer::init();

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "playlist-proxy.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(non_blocking)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);

    tracing_subscriber_global::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("failed to set global tracing subscriber: {}", e))?;
    Ok(guard)
}
