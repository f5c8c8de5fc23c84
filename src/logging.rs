//! Structured logging setup: `tracing-subscriber`'s `EnvFilter` plus a
//! formatting layer. `RUST_LOG` controls verbosity; absent that, this
//! crate's own default scopes logging to itself and request tracing
//! through `tower_http`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "campus_spider_proxy=info,tower_http=debug";

/// Installs the global tracing subscriber. Must be called once, before any
/// other part of the crate logs.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
