use tracing_subscriber::EnvFilter;

use crate::error::BillflowError;

/// Installs the global subscriber writing human-readable logs to stderr.
///
/// `directive` is an `EnvFilter` directive such as `"warn"` or
/// `"billflow=debug"`.
pub fn init(directive: &str) -> Result<(), BillflowError> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| BillflowError::Config(format!("invalid log level {directive:?}: {e}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| BillflowError::Config(format!("logging already initialized: {e}")))?;
    tracing::debug!(directive, "logging initialized");
    Ok(())
}
