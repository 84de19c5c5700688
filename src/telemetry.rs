//! Telemetry helpers for applications embedding `chart-graphic`.
//!
//! The reconciler reports one-shot warnings and flush activity through
//! `tracing`. Hosts either call `init_default_tracing` or install their own
//! subscriber and filters.

/// Initializes a compact `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when the feature is disabled or a global subscriber was
/// already installed by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::init_default_tracing;

    #[test]
    #[cfg(not(feature = "telemetry"))]
    fn disabled_feature_installs_nothing() {
        assert!(!init_default_tracing());
    }

    #[test]
    #[cfg(feature = "telemetry")]
    fn second_initialization_is_rejected() {
        let _ = init_default_tracing();
        assert!(!init_default_tracing());
    }
}
