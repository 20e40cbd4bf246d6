// [library] Structured logging framework - subscriber setup for binaries and tests
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// [business] Used when RUST_LOG is not set
const DEFAULT_FILTER: &str = "lightbnb=info";

// [library] Installs a global fmt subscriber filtered by RUST_LOG
// Returns an error if another subscriber was installed first
pub fn init() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
