//! Builder for the MyGame activity.
//!
//! Collects the window, bridge, logging and profiling settings and runs the
//! surface bridge on a winit event loop.

use std::sync::Arc;

use mygame_activity::app::run_activity_on;
use mygame_activity::{
    Activity, ActivityConfig, BridgeError, NativeLibrary, NativeLibraryCell, NativeRegistry,
    PROCESS_LIBRARY, RunError, SurfaceBridge, WindowDescriptor,
};
use mygame_core::config::{LogConfig, ProfilingConfig};
use winit::event_loop::EventLoop;

use crate::engine::GameEngine;

/// High-level builder for the MyGame activity.
///
/// The built-in [`GameEngine`] is registered by default; more libraries can
/// be added with [`ActivityBuilder::with_native_library`].
///
/// # Example
///
/// ```ignore
/// use mygame::prelude::*;
///
/// ActivityBuilder::new()
///     .with_title("My Game")
///     .with_size(1280, 720)
///     .with_config(ActivityConfig::default().with_reapply_immersive_on_insets(false))
///     .run()?;
/// ```
pub struct ActivityBuilder {
    title: String,
    size: Option<(u32, u32)>,
    config: ActivityConfig,
    log: LogConfig,
    profiling: ProfilingConfig,
    registry: NativeRegistry,
}

impl Default for ActivityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityBuilder {
    /// Creates a builder with default settings.
    ///
    /// Defaults:
    /// - Title: "MyGame"
    /// - Size: chosen by the platform
    /// - Native libraries: [`GameEngine`]
    pub fn new() -> Self {
        let mut registry = NativeRegistry::new();
        GameEngine::register(&mut registry);

        Self {
            title: "MyGame".to_string(),
            size: None,
            config: ActivityConfig::default(),
            log: LogConfig::default(),
            profiling: ProfilingConfig::default(),
            registry,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the window size in physical pixels. Ignored on Android.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn with_config(mut self, config: ActivityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn with_profiling(mut self, profiling: ProfilingConfig) -> Self {
        self.profiling = profiling;
        self
    }

    /// Registers an additional native library factory.
    ///
    /// Select it with [`ActivityConfig::with_library_name`].
    pub fn with_native_library<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn NativeLibrary> + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    /// Builds the bridge against the process-wide native library.
    pub fn build(self) -> Result<SurfaceBridge, BridgeError> {
        self.build_with(&PROCESS_LIBRARY)
    }

    /// Builds the bridge, loading the native library through `cell`.
    pub fn build_with(self, cell: &NativeLibraryCell) -> Result<SurfaceBridge, BridgeError> {
        SurfaceBridge::new(cell, &self.registry, self.config)
    }

    /// Runs on a new event loop.
    pub fn run(self) -> Result<(), RunError> {
        let event_loop = EventLoop::new()?;
        self.run_on(event_loop)
    }

    /// Initialises logging and profiling, then runs on `event_loop` until the
    /// activity is destroyed or fails.
    pub fn run_on(self, event_loop: EventLoop<()>) -> Result<(), RunError> {
        self.init_ambient();

        let descriptor = WindowDescriptor {
            title: self.title.clone(),
            size: self
                .size
                .map(|(width, height)| winit::dpi::PhysicalSize::new(width, height)),
            visible: true,
        };

        let Self {
            config, registry, ..
        } = self;

        run_activity_on(event_loop, descriptor, move || {
            let bridge = SurfaceBridge::new(&PROCESS_LIBRARY, &registry, config)?;
            Ok(Box::new(bridge) as Box<dyn Activity>)
        })
    }

    fn init_ambient(&self) {
        mygame_core::logging::init_with(&self.log);
        mygame_core::profiling::init_profiling(&self.profiling);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mygame_activity::LifecycleState;
    use mygame_test_utils::MockNativeLibrary;

    #[test]
    fn default_builder_loads_game_engine() {
        let cell = NativeLibraryCell::new();
        let bridge = ActivityBuilder::new().build_with(&cell).unwrap();

        assert_eq!(bridge.state(), LifecycleState::Ready);
        assert_eq!(bridge.native().name(), crate::engine::LIBRARY_NAME);
        assert!(cell.is_loaded());
    }

    #[test]
    fn unknown_library_name_is_fatal() {
        let cell = NativeLibraryCell::new();
        let err = ActivityBuilder::new()
            .with_config(ActivityConfig::default().with_library_name("missing"))
            .build_with(&cell)
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(!cell.is_loaded());
    }

    #[test]
    fn extra_library_can_be_selected() {
        let cell = NativeLibraryCell::new();
        let bridge = ActivityBuilder::new()
            .with_native_library("other", || {
                Arc::new(MockNativeLibrary::new("other")) as Arc<dyn NativeLibrary>
            })
            .with_config(ActivityConfig::default().with_library_name("other"))
            .build_with(&cell)
            .unwrap();

        assert_eq!(bridge.native().name(), "other");
    }
}
