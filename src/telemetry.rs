use tracing::Level;

/// Installs the global fmt subscriber with an RFC 3339 local timer.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(level: Level) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
