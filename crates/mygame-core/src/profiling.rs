//! Profiling utilities based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the scope macros compile to nothing
//! and [`init_profiling`] only logs.

use crate::config::ProfilingConfig;

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
pub use crate::{__noop_profile as profile_function, __noop_profile as profile_scope};

#[cfg(not(feature = "profiling"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __noop_profile {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Start collecting scopes and serve them to `puffin_viewer`.
///
/// Does nothing when `config.enabled` is false. A server that fails to bind
/// is logged and otherwise ignored.
pub fn init_profiling(config: &ProfilingConfig) {
    if !config.enabled {
        return;
    }

    #[cfg(feature = "profiling")]
    {
        puffin::set_scopes_on(true);

        match puffin_http::Server::new(&config.address) {
            Ok(server) => {
                tracing::info!("Puffin profiler server started on http://{}", config.address);
                let _ = PROFILING_SERVER.set(server);
            }
            Err(e) => {
                tracing::error!("Failed to start puffin server: {}", e);
            }
        }
    }

    #[cfg(not(feature = "profiling"))]
    tracing::warn!("profiling requested but the `profiling` feature is disabled");
}

/// Mark the start of a new profiling frame.
#[inline]
pub fn new_frame() {
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}
