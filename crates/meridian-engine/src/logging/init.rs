use std::sync::Once;

/// Settings for [`init_logging`].
///
/// `env_filter` uses `env_logger` directives such as
/// `"meridian_engine=debug,wgpu_core=warn"`; `None` defers to `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the `log` backend. Only the first call has an
/// effect.
///
/// Without a configured or `RUST_LOG` filter, `info` is logged with wgpu and
/// naga internals held at `warn`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(directives) => {
                builder.parse_filters(&directives);
            }
            None => {
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }
        }
        builder.write_style(config.write_style);

        // A test harness may own the global logger already.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

/// Explicit directives win over `RUST_LOG`; blank values count as unset.
fn resolve_filter(configured: Option<String>, env: Option<String>) -> Option<String> {
    configured
        .into_iter()
        .chain(env)
        .find(|directives| !directives.trim().is_empty())
}
