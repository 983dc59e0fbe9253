//! Built-in native game engine.
//!
//! The engine owns at most one window surface. The first surface it sees
//! initialises it; a surface arriving while initialised replaces the old one
//! and counts as a recreation. Rendering itself lives elsewhere.

use std::sync::Arc;

use mygame_activity::native::{NATIVE_ABI_VERSION, REQUIRED_EXPORTS};
use mygame_activity::{
    InsetState, NativeLibrary, NativeRegistry, PhysicalSize, PixelFormat, SurfaceId, TrimLevel,
};
use parking_lot::Mutex;

/// Name the engine registers under.
pub const LIBRARY_NAME: &str = "mygame";

const GREETING: &str = "Hello from MyGame";

/// Observable engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStatus {
    /// Surface the engine currently renders into.
    pub window: Option<SurfaceId>,
    pub initialized: bool,
    /// Last reported format and size of `window`.
    pub configuration: Option<(PixelFormat, PhysicalSize)>,
    /// Times the surface was replaced after initialisation.
    pub recreations: u32,
    pub insets: InsetState,
    pub last_trim: Option<TrimLevel>,
}

#[derive(Debug, Default)]
pub struct GameEngine {
    status: Mutex<EngineStatus>,
}

impl GameEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh engine in `registry` under [`LIBRARY_NAME`].
    pub fn register(registry: &mut NativeRegistry) {
        registry.register(LIBRARY_NAME, || {
            Arc::new(GameEngine::new()) as Arc<dyn NativeLibrary>
        });
    }

    pub fn status(&self) -> EngineStatus {
        *self.status.lock()
    }

    fn init(status: &mut EngineStatus, surface: SurfaceId) {
        status.window = Some(surface);
        status.initialized = true;
        tracing::debug!("engine initialised with surface {:?}", surface);
    }

    fn reset(status: &mut EngineStatus, surface: SurfaceId) {
        status.window = Some(surface);
        status.configuration = None;
        status.recreations += 1;
        tracing::debug!(
            "engine surface replaced by {:?} (recreation {})",
            surface,
            status.recreations
        );
    }

    fn cleanup(status: &mut EngineStatus) {
        if let Some(surface) = status.window.take() {
            tracing::debug!("engine released surface {:?}", surface);
        }
        status.configuration = None;
    }
}

impl NativeLibrary for GameEngine {
    fn name(&self) -> &str {
        LIBRARY_NAME
    }

    fn abi_version(&self) -> u32 {
        NATIVE_ABI_VERSION
    }

    fn exports(&self) -> &[&'static str] {
        REQUIRED_EXPORTS
    }

    fn diagnostic_string(&self) -> String {
        GREETING.to_string()
    }

    fn surface_created(&self, surface: SurfaceId) {
        let mut status = self.status.lock();
        if status.initialized {
            Self::reset(&mut status, surface);
        } else {
            Self::init(&mut status, surface);
        }
    }

    fn surface_changed(&self, surface: SurfaceId, format: PixelFormat, size: PhysicalSize) {
        let mut status = self.status.lock();
        if status.window != Some(surface) {
            tracing::warn!("ignoring change for unknown surface {:?}", surface);
            return;
        }
        status.configuration = Some((format, size));
    }

    fn surface_destroyed(&self, surface: SurfaceId) {
        let mut status = self.status.lock();
        if status.window == Some(surface) {
            Self::cleanup(&mut status);
        }
    }

    fn insets_changed(&self, _surface: SurfaceId, insets: &InsetState) {
        self.status.lock().insets = *insets;
    }

    fn trim_memory(&self, level: TrimLevel) {
        tracing::debug!("engine trim memory {:?}", level);
        self.status.lock().last_trim = Some(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_surface_initialises() {
        let engine = GameEngine::new();
        engine.surface_created(SurfaceId(1));

        let status = engine.status();
        assert!(status.initialized);
        assert_eq!(status.window, Some(SurfaceId(1)));
        assert_eq!(status.recreations, 0);
    }

    #[test]
    fn later_surface_resets() {
        let engine = GameEngine::new();
        engine.surface_created(SurfaceId(1));
        engine.surface_destroyed(SurfaceId(1));
        engine.surface_created(SurfaceId(2));

        let status = engine.status();
        assert_eq!(status.window, Some(SurfaceId(2)));
        assert_eq!(status.recreations, 1);
    }

    #[test]
    fn destroy_releases_window_and_configuration() {
        let engine = GameEngine::new();
        let size = PhysicalSize::new(800, 600);
        engine.surface_created(SurfaceId(1));
        engine.surface_changed(SurfaceId(1), PixelFormat::Rgba8888, size);
        assert_eq!(
            engine.status().configuration,
            Some((PixelFormat::Rgba8888, size))
        );

        engine.surface_destroyed(SurfaceId(1));
        let status = engine.status();
        assert_eq!(status.window, None);
        assert_eq!(status.configuration, None);
        assert!(status.initialized);
    }

    #[test]
    fn stale_surface_events_are_ignored() {
        let engine = GameEngine::new();
        engine.surface_created(SurfaceId(2));
        engine.surface_changed(SurfaceId(1), PixelFormat::Rgb565, PhysicalSize::new(1, 1));
        engine.surface_destroyed(SurfaceId(1));

        let status = engine.status();
        assert_eq!(status.window, Some(SurfaceId(2)));
        assert_eq!(status.configuration, None);
    }

    #[test]
    fn registers_under_library_name() {
        let mut registry = NativeRegistry::new();
        GameEngine::register(&mut registry);

        let library = registry.load(LIBRARY_NAME, NATIVE_ABI_VERSION).unwrap();
        assert_eq!(library.diagnostic_string(), GREETING);
    }
}
