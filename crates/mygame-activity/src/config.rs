use crate::native::NATIVE_ABI_VERSION;
use crate::view::LayoutSpec;
use crate::window::SystemUiFlags;

/// Anchor of the container that hosts the surface in the default layout.
pub const DEFAULT_CONTAINER_ANCHOR: &str = "frame_layout";

/// Text shown by the diagnostic overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayText {
    /// Ask the native library for its diagnostic string.
    Native,
    Fixed(String),
}

/// Configuration for the surface bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityConfig {
    /// Name the native library is registered under.
    pub library_name: String,
    /// ABI version the native library must report.
    pub required_abi: u32,
    /// Layout installed as the activity content.
    pub content_layout: LayoutSpec,
    /// Anchor of the container inside `content_layout` that receives the surface.
    pub container_anchor: String,
    pub overlay: OverlayText,
    /// Flags applied when the window gains focus.
    pub immersive_flags: SystemUiFlags,
    /// Re-apply `immersive_flags` when insets report visible system bars
    /// while the window is focused.
    pub reapply_immersive_on_insets: bool,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        ActivityConfig {
            library_name: "mygame".to_string(),
            required_abi: NATIVE_ABI_VERSION,
            content_layout: LayoutSpec::frame().with_anchor(DEFAULT_CONTAINER_ANCHOR),
            container_anchor: DEFAULT_CONTAINER_ANCHOR.to_string(),
            overlay: OverlayText::Native,
            immersive_flags: SystemUiFlags::IMMERSIVE_FULLSCREEN,
            reapply_immersive_on_insets: true,
        }
    }
}

impl ActivityConfig {
    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = name.into();
        self
    }

    pub fn with_required_abi(mut self, abi: u32) -> Self {
        self.required_abi = abi;
        self
    }

    pub fn with_content_layout(mut self, layout: LayoutSpec) -> Self {
        self.content_layout = layout;
        self
    }

    pub fn with_container_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.container_anchor = anchor.into();
        self
    }

    pub fn with_overlay(mut self, overlay: OverlayText) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_immersive_flags(mut self, flags: SystemUiFlags) -> Self {
        self.immersive_flags = flags;
        self
    }

    pub fn with_reapply_immersive_on_insets(mut self, reapply: bool) -> Self {
        self.reapply_immersive_on_insets = reapply;
        self
    }
}
