//! Surface lifecycle bridge.
//!
//! [`SurfaceBridge`] takes the host from activity creation to an attached,
//! native-backed surface and keeps the window immersive while focused.
//!
//! ```text
//! Uninitialized --load--> Ready --on_create--> Created
//!     Created --on_create_surface_view--> SurfaceAttached
//!     Created | SurfaceAttached --on_destroy--> Destroyed
//! ```
//!
//! `Uninitialized` never escapes: a bridge only exists once the native
//! library is loaded.

use std::fmt;
use std::sync::Arc;

use mygame_core::geometry::InsetState;
use mygame_core::logging::{Severity, log};
use mygame_core::profiling::{profile_function, profile_scope};

use crate::activity::{Activity, ActivityCtx};
use crate::config::{ActivityConfig, OverlayText};
use crate::error::{BridgeError, BridgeResult};
use crate::event::{SavedState, TrimLevel};
use crate::native::{NativeLibrary, NativeLibraryCell, NativeRegistry};
use crate::surface::{ListenerId, SurfaceEvent, SurfaceHandle, SurfaceId, SurfaceState};
use crate::view::{ViewId, ViewKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The native library is not loaded yet.
    Uninitialized,
    Ready,
    Created,
    SurfaceAttached,
    Destroyed,
}

/// Everything the bridge added for one surface.
struct Attachment {
    container: ViewId,
    surface_view: ViewId,
    overlay: ViewId,
    surface: SurfaceHandle,
    holder_callback: ListenerId,
    inset_listener: ListenerId,
}

/// What a failed attachment has to undo.
///
/// Views added under the container go with the content layout.
#[derive(Default)]
struct PendingAttachment {
    content_installed: bool,
    surface: Option<SurfaceId>,
}

impl PendingAttachment {
    fn rollback(self, ctx: &mut ActivityCtx<'_>) {
        if let Some(surface) = self.surface {
            ctx.window.release_surface(surface);
        }
        if self.content_installed {
            ctx.views.clear_content();
        }
    }
}

pub struct SurfaceBridge {
    config: ActivityConfig,
    native: Arc<dyn NativeLibrary>,
    state: LifecycleState,
    attachment: Option<Attachment>,
    has_focus: bool,
}

impl SurfaceBridge {
    /// Load the native library through `cell` and create a bridge in the
    /// `Ready` state.
    ///
    /// A load failure is fatal and returned as [`BridgeError::NativeLoad`].
    pub fn new(
        cell: &NativeLibraryCell,
        registry: &NativeRegistry,
        config: ActivityConfig,
    ) -> BridgeResult<Self> {
        let native = cell
            .get_or_load(registry, &config.library_name, config.required_abi)
            .inspect_err(|err| {
                log(
                    Severity::Error,
                    &format!("failed to load native library: {}", err),
                )
            })?;

        Ok(Self {
            config,
            native,
            state: LifecycleState::Ready,
            attachment: None,
            has_focus: false,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    pub fn native(&self) -> &Arc<dyn NativeLibrary> {
        &self.native
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn surface(&self) -> Option<&SurfaceHandle> {
        self.attachment.as_ref().map(|attachment| &attachment.surface)
    }

    pub fn container(&self) -> Option<ViewId> {
        self.attachment.as_ref().map(|attachment| attachment.container)
    }

    pub fn surface_view(&self) -> Option<ViewId> {
        self.attachment
            .as_ref()
            .map(|attachment| attachment.surface_view)
    }

    pub fn overlay(&self) -> Option<ViewId> {
        self.attachment.as_ref().map(|attachment| attachment.overlay)
    }

    fn expect_state(&self, event: &'static str, allowed: &[LifecycleState]) -> BridgeResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(BridgeError::InvalidState {
                event,
                state: self.state,
            })
        }
    }

    fn overlay_text(&self) -> String {
        match &self.config.overlay {
            OverlayText::Native => self.native.diagnostic_string(),
            OverlayText::Fixed(text) => text.clone(),
        }
    }

    fn apply_immersive(&self, ctx: &mut ActivityCtx<'_>) {
        tracing::debug!("applying system ui flags {:?}", self.config.immersive_flags);
        ctx.window.set_system_ui_visibility(self.config.immersive_flags);
    }

    /// Run the attachment steps in order, recording in `pending` what has to
    /// be undone if a later step fails.
    fn attach(
        &self,
        ctx: &mut ActivityCtx<'_>,
        pending: &mut PendingAttachment,
    ) -> BridgeResult<Attachment> {
        profile_function!();

        ctx.views.set_content(&self.config.content_layout);
        pending.content_installed = true;
        let container = ctx
            .views
            .find_by_anchor(&self.config.container_anchor)
            .ok_or_else(|| BridgeError::ContainerNotFound {
                anchor: self.config.container_anchor.clone(),
            })?;

        let surface_id = ctx
            .window
            .allocate_surface()
            .map_err(BridgeError::SurfaceAllocation)?;
        pending.surface = Some(surface_id);
        let mut surface = SurfaceHandle::new(surface_id);

        let surface_view = ctx
            .views
            .add_view(container, ViewKind::Surface(surface_id))
            .map_err(BridgeError::ViewInsertion)?;

        let overlay = ctx
            .views
            .add_view(container, ViewKind::Text(self.overlay_text()))
            .map_err(BridgeError::ViewInsertion)?;

        ctx.views
            .request_focus(container)
            .map_err(BridgeError::ViewInsertion)?;

        let native = Arc::clone(&self.native);
        let holder_callback = surface
            .add_holder_callback(move |id, event| forward_surface_event(native.as_ref(), id, event))
            .map_err(BridgeError::CallbackRegistration)?;

        let native = Arc::clone(&self.native);
        let inset_listener = surface
            .add_inset_listener(move |id, insets| native.insets_changed(id, insets))
            .map_err(BridgeError::CallbackRegistration)?;

        Ok(Attachment {
            container,
            surface_view,
            overlay,
            surface,
            holder_callback,
            inset_listener,
        })
    }

    /// Undo an attachment: tell the native layer the surface is gone if it
    /// still thinks otherwise, drop the registrations, and remove our views.
    fn detach(&mut self, ctx: &mut ActivityCtx<'_>) {
        profile_function!();

        let Some(mut attachment) = self.attachment.take() else {
            return;
        };
        let surface = &mut attachment.surface;

        if matches!(
            surface.state(),
            SurfaceState::Created | SurfaceState::Ready { .. }
        ) {
            surface.dispatch_surface_event(SurfaceEvent::Destroyed);
        }

        surface.remove_holder_callback(attachment.holder_callback);
        surface.remove_inset_listener(attachment.inset_listener);
        surface.release();
        ctx.window.release_surface(surface.id());

        for view in [attachment.overlay, attachment.surface_view] {
            if ctx.views.remove_view(view).is_err() {
                tracing::trace!("view {:?} was already removed by the host", view);
            }
        }

        tracing::debug!("detached surface {:?}", surface.id());
    }
}

fn forward_surface_event(native: &dyn NativeLibrary, surface: SurfaceId, event: &SurfaceEvent) {
    match *event {
        SurfaceEvent::Created => native.surface_created(surface),
        SurfaceEvent::Changed { format, size } => native.surface_changed(surface, format, size),
        SurfaceEvent::Destroyed => native.surface_destroyed(surface),
    }
}

impl Activity for SurfaceBridge {
    fn on_create(
        &mut self,
        _ctx: &mut ActivityCtx<'_>,
        saved_state: Option<&SavedState>,
    ) -> BridgeResult<()> {
        log(Severity::Info, "calling onCreate");
        self.expect_state("onCreate", &[LifecycleState::Ready])?;

        if let Some(saved_state) = saved_state {
            tracing::debug!("restoring {} saved entries", saved_state.len());
        }

        self.state = LifecycleState::Created;
        Ok(())
    }

    fn on_create_surface_view(&mut self, ctx: &mut ActivityCtx<'_>) -> BridgeResult<()> {
        log(Severity::Info, "calling onCreateSurfaceView");
        self.expect_state(
            "onCreateSurfaceView",
            &[LifecycleState::Created, LifecycleState::SurfaceAttached],
        )?;

        if self.state == LifecycleState::SurfaceAttached {
            profile_scope!("replace_attachment");
            self.detach(ctx);
            self.state = LifecycleState::Created;
        }

        let mut pending = PendingAttachment::default();
        match self.attach(ctx, &mut pending) {
            Ok(attachment) => {
                tracing::debug!(
                    "attached surface {:?} to container {:?}",
                    attachment.surface.id(),
                    attachment.container
                );
                self.attachment = Some(attachment);
                self.state = LifecycleState::SurfaceAttached;
                Ok(())
            }
            Err(err) => {
                pending.rollback(ctx);
                log(Severity::Error, &err.to_string());
                Err(err)
            }
        }
    }

    fn on_window_focus_changed(&mut self, ctx: &mut ActivityCtx<'_>, has_focus: bool) {
        if self.state == LifecycleState::Destroyed {
            tracing::trace!("ignoring focus change after destroy");
            return;
        }

        self.has_focus = has_focus;
        // Losing focus leaves the current flags in place.
        if has_focus {
            self.apply_immersive(ctx);
        }
    }

    fn on_trim_memory(&mut self, _ctx: &mut ActivityCtx<'_>, level: TrimLevel) {
        tracing::debug!("trim memory: {:?}", level);
        self.native.trim_memory(level);
    }

    fn on_surface_event(&mut self, _ctx: &mut ActivityCtx<'_>, event: SurfaceEvent) {
        match self.attachment.as_mut() {
            Some(attachment) => attachment.surface.dispatch_surface_event(event),
            None => tracing::warn!("dropping {:?}: no surface attached", event),
        }
    }

    fn on_apply_window_insets(
        &mut self,
        ctx: &mut ActivityCtx<'_>,
        insets: InsetState,
    ) -> InsetState {
        let Some(attachment) = self.attachment.as_mut() else {
            return insets;
        };
        attachment.surface.dispatch_insets(&insets);

        if self.config.reapply_immersive_on_insets
            && self.has_focus
            && insets.system_bars_visible()
        {
            self.apply_immersive(ctx);
        }

        insets
    }

    fn on_destroy(&mut self, ctx: &mut ActivityCtx<'_>) {
        if self.state == LifecycleState::Destroyed {
            return;
        }
        self.detach(ctx);
        self.has_focus = false;
        self.state = LifecycleState::Destroyed;
        tracing::debug!("activity destroyed");
    }
}

impl fmt::Debug for SurfaceBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceBridge")
            .field("library", &self.native.name())
            .field("state", &self.state)
            .field("surface", &self.surface())
            .field("has_focus", &self.has_focus)
            .finish()
    }
}
