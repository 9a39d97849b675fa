use std::sync::Once;

use env_logger::{Builder, Env};

/// Filter applied when `RUST_LOG` is unset.
///
/// Per-frame diagnostics in this crate sit at debug and stay quiet; wgpu's
/// startup chatter is pushed down to warn.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn";

static INIT: Once = Once::new();

/// Installs the global logger with the crate's default filter.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`], so hosts can turn on frame
/// diagnostics (`RUST_LOG=kinema_render=debug`) without recompiling.
/// Idempotent; later calls are no-ops.
pub fn init_logging() {
    init_logging_from(Env::default().default_filter_or(DEFAULT_FILTER));
}

/// Variant for hosts that bring their own `env_logger` environment
/// (custom variable names or defaults).
pub fn init_logging_from(env: Env<'static>) {
    INIT.call_once(|| {
        Builder::from_env(env).format_timestamp_millis().init();
        log::debug!("logger installed");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging();
        init_logging();
        init_logging_from(Env::default());
    }
}
