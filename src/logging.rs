use std::str::FromStr;
use tracing::Level;

/// Installs the global `tracing` subscriber.
///
/// `level` accepts `trace`, `debug`, `info`, `warn` or `error` (case-insensitive);
/// anything else falls back to `info`. Calling this more than once is harmless.
pub fn init(level: Option<&str>) {
    let level = level
        .and_then(|l| Level::from_str(l.trim()).ok())
        .unwrap_or(Level::INFO);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
