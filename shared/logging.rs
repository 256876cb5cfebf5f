use crate::config::DocsConfig;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for a binary.
///
/// Honors `RUST_LOG`; without it the filter is `shared=info`, or
/// `shared=debug` when `DEBUG_DOCS=true`. A second call is a no-op so warm
/// serverless invocations and tests can call it freely.
pub fn init() {
    init_with(&DocsConfig::from_env());
}

pub fn init_with(config: &DocsConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(config.debug_mode).into()),
        )
        .with_target(false)
        .try_init();
}

fn default_filter(debug_mode: bool) -> &'static str {
    if debug_mode {
        "shared=debug"
    } else {
        "shared=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_mode_raises_default_filter() {
        assert_eq!(default_filter(false), "shared=info");
        assert_eq!(default_filter(true), "shared=debug");
    }
}
