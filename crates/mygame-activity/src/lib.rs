//! Surface lifecycle bridge for the MyGame activity host.
//!
//! The host drives an [`Activity`] through its lifecycle callbacks. The
//! [`SurfaceBridge`] activity loads the native library once per process,
//! attaches a drawable surface and a diagnostic overlay to the host's view
//! tree, forwards surface and inset notifications to the native layer, and
//! keeps the window immersive while focused.
//!
//! [`app::run_activity`] hosts any activity on a winit event loop.

pub mod activity;
pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod native;
pub mod surface;
pub mod view;
pub mod window;

pub use activity::{Activity, ActivityCtx};
pub use bridge::{LifecycleState, SurfaceBridge};
pub use config::{ActivityConfig, OverlayText};
pub use error::{BridgeError, NativeError, RunError, SurfaceError, ViewError};
pub use event::{SavedState, TrimLevel};
pub use native::{NativeLibrary, NativeLibraryCell, NativeRegistry, PROCESS_LIBRARY};
pub use surface::{ListenerId, PixelFormat, SurfaceEvent, SurfaceHandle, SurfaceId, SurfaceState};
pub use view::{LayoutSpec, ViewId, ViewKind, ViewTree};
pub use window::{HostWindow, SystemUiFlags, WindowDescriptor};

// Re-export geometry used throughout the callback surface
pub use mygame_core::geometry::{InsetState, Insets, PhysicalSize};
