//! Log facade and diagnostic sink setup.
//!
//! Every user-facing diagnostic line goes through [`log`], which tags it with
//! [`APP_TAG`] and picks the sink channel from the [`Severity`].

use crate::config::LogConfig;

/// Fixed tag attached to every line written through the facade.
pub const APP_TAG: &str = "MyGame";

/// Channel a facade message is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Write one line to the diagnostic sink.
///
/// Holds no state and never fails; delivery is the sink's concern.
pub fn log(severity: Severity, message: &str) {
    match severity {
        Severity::Info => tracing::info!(target: APP_TAG, "{message}"),
        Severity::Warning => tracing::warn!(target: APP_TAG, "{message}"),
        Severity::Error => tracing::error!(target: APP_TAG, "{message}"),
    }
}

/// Install the diagnostic sink with the default configuration.
pub fn init() {
    init_with(&LogConfig::default());
}

/// Install the diagnostic sink.
///
/// Repeated calls are ignored.
#[cfg(not(target_os = "android"))]
pub fn init_with(config: &LogConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.as_str()));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::trace!("diagnostic sink already installed");
    }
}

/// Install the diagnostic sink.
///
/// No tracing subscriber is installed here: `tracing` forwards events to the
/// `log` facade, which `android_logger` writes to logcat under `config.tag`.
#[cfg(target_os = "android")]
pub fn init_with(config: &LogConfig) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag(config.tag.as_str()),
    );
}

static_assertions::assert_impl_all!(Severity: Send, Sync, Copy);
