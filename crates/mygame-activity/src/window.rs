use std::sync::Arc;

use mygame_core::geometry::PhysicalSize;
pub use winit::window::Fullscreen;
pub use winit::window::Window as WinitWindowInner;
use winit::{error::OsError, event_loop::ActiveEventLoop};

use crate::error::SurfaceError;
use crate::surface::SurfaceId;

bitflags::bitflags! {
    /// System-bar visibility flags, bit-compatible with the host's values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SystemUiFlags: u32 {
        const LOW_PROFILE = 0x0000_0001;
        const HIDE_NAVIGATION = 0x0000_0002;
        const FULLSCREEN = 0x0000_0004;
        const LAYOUT_STABLE = 0x0000_0100;
        const LAYOUT_HIDE_NAVIGATION = 0x0000_0200;
        const LAYOUT_FULLSCREEN = 0x0000_0400;
        const IMMERSIVE = 0x0000_0800;
        const IMMERSIVE_STICKY = 0x0000_1000;
    }
}

impl SystemUiFlags {
    /// Hide status and navigation chrome with a stable fullscreen layout.
    /// Swiping from an edge reveals the bars temporarily.
    pub const IMMERSIVE_FULLSCREEN: Self = Self::IMMERSIVE_STICKY
        .union(Self::LAYOUT_STABLE)
        .union(Self::LAYOUT_HIDE_NAVIGATION)
        .union(Self::LAYOUT_FULLSCREEN)
        .union(Self::HIDE_NAVIGATION)
        .union(Self::FULLSCREEN);

    /// Whether these flags hide any system chrome.
    pub const fn hides_chrome(&self) -> bool {
        self.intersects(Self::FULLSCREEN.union(Self::HIDE_NAVIGATION))
    }
}

/// The host window the bridge presents into.
///
/// Implemented by the platform host; the bridge never owns the window.
pub trait HostWindow {
    /// Current inner size in physical pixels.
    fn size(&self) -> PhysicalSize;

    fn system_ui_visibility(&self) -> SystemUiFlags;

    fn set_system_ui_visibility(&mut self, flags: SystemUiFlags);

    /// Allocate a native-drawable surface bound to this window.
    fn allocate_surface(&mut self) -> Result<SurfaceId, SurfaceError>;

    /// Give a surface back to the host.
    fn release_surface(&mut self, surface: SurfaceId);
}

pub struct WindowDescriptor {
    pub title: String,
    pub size: Option<winit::dpi::PhysicalSize<u32>>,
    pub visible: bool,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "MyGame".to_string(),
            size: None,
            visible: true,
        }
    }
}

/// [`HostWindow`] backed by a winit window.
///
/// A winit window backs exactly one surface at a time. Chrome-hiding flags
/// map to borderless fullscreen.
pub struct WinitWindow {
    pub window: Arc<WinitWindowInner>,
    flags: SystemUiFlags,
    surface: Option<SurfaceId>,
}

impl WinitWindow {
    pub fn id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    pub(crate) fn new(
        event_loop: &ActiveEventLoop,
        descriptor: WindowDescriptor,
    ) -> Result<Self, OsError> {
        let mut attributes = WinitWindowInner::default_attributes()
            .with_title(descriptor.title)
            .with_visible(descriptor.visible);

        if let Some(size) = descriptor.size {
            attributes = attributes.with_inner_size(size);
        }

        let window = Arc::new(event_loop.create_window(attributes)?);

        Ok(WinitWindow {
            window,
            flags: SystemUiFlags::empty(),
            surface: None,
        })
    }
}

impl HostWindow for WinitWindow {
    fn size(&self) -> PhysicalSize {
        let size = self.window.inner_size();
        PhysicalSize::new(size.width, size.height)
    }

    fn system_ui_visibility(&self) -> SystemUiFlags {
        self.flags
    }

    fn set_system_ui_visibility(&mut self, flags: SystemUiFlags) {
        self.flags = flags;
        let fullscreen = flags
            .hides_chrome()
            .then_some(Fullscreen::Borderless(None));
        self.window.set_fullscreen(fullscreen);
    }

    fn allocate_surface(&mut self) -> Result<SurfaceId, SurfaceError> {
        if let Some(existing) = self.surface {
            return Err(SurfaceError::AllocationFailed {
                reason: format!("window already backs surface {:?}", existing),
            });
        }
        let surface = SurfaceId(u64::from(self.window.id()));
        self.surface = Some(surface);
        Ok(surface)
    }

    fn release_surface(&mut self, surface: SurfaceId) {
        if self.surface == Some(surface) {
            self.surface = None;
        }
    }
}
