use mygame_core::geometry::InsetState;

use crate::error::BridgeError;
use crate::event::{SavedState, TrimLevel};
use crate::surface::SurfaceEvent;
use crate::view::ViewTree;
use crate::window::HostWindow;

/// Host collaborators handed to every lifecycle callback.
pub struct ActivityCtx<'a> {
    pub window: &'a mut dyn HostWindow,
    pub views: &'a mut ViewTree,
}

impl<'a> ActivityCtx<'a> {
    pub fn new(window: &'a mut dyn HostWindow, views: &'a mut ViewTree) -> Self {
        Self { window, views }
    }
}

/// Lifecycle callbacks the host invokes on an activity.
///
/// All callbacks run on the host's UI thread, one at a time.
pub trait Activity {
    /// Called once when the host creates the activity.
    fn on_create(
        &mut self,
        ctx: &mut ActivityCtx<'_>,
        saved_state: Option<&SavedState>,
    ) -> Result<(), BridgeError>;

    /// Called when the host wants the drawable surface placed in the view tree.
    fn on_create_surface_view(&mut self, ctx: &mut ActivityCtx<'_>) -> Result<(), BridgeError>;

    fn on_window_focus_changed(&mut self, ctx: &mut ActivityCtx<'_>, has_focus: bool);

    #[allow(unused_variables)]
    fn on_trim_memory(&mut self, ctx: &mut ActivityCtx<'_>, level: TrimLevel) {}

    /// Holder callback notification for the attached surface.
    #[allow(unused_variables)]
    fn on_surface_event(&mut self, ctx: &mut ActivityCtx<'_>, event: SurfaceEvent) {}

    /// Called when the window insets change. Returns the insets left for
    /// other listeners.
    #[allow(unused_variables)]
    fn on_apply_window_insets(
        &mut self,
        ctx: &mut ActivityCtx<'_>,
        insets: InsetState,
    ) -> InsetState {
        insets
    }

    /// Called when the host tears the activity down.
    #[allow(unused_variables)]
    fn on_destroy(&mut self, ctx: &mut ActivityCtx<'_>) {}
}
