//! winit-driven host for an [`Activity`].
//!
//! Maps the event loop onto the activity lifecycle:
//!
//! - first `resumed`: create the window, `on_create`, `on_create_surface_view`,
//!   then surface `Created` + `Changed`
//! - later `resumed`: retry `on_create_surface_view` if it failed before, then
//!   surface `Created` + `Changed` again
//! - `suspended`: surface `Destroyed`
//! - `Resized`: surface `Changed`
//! - `Focused`: `on_window_focus_changed`
//! - `memory_warning`: `on_trim_memory(RunningLow)`
//! - `CloseRequested`: `on_destroy`, then exit
//!
//! Only fatal activity errors stop the loop. A surface attach that fails
//! otherwise is logged and retried on the next `resumed`.
//!
//! winit does not report window insets, so this host never calls
//! `on_apply_window_insets`.
//!
//! Each loop iteration closes a profiler frame.

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use mygame_core::logging::{Severity, log};

use crate::activity::{Activity, ActivityCtx};
use crate::error::{BridgeError, RunError};
use crate::event::TrimLevel;
use crate::surface::{PixelFormat, SurfaceEvent};
use crate::view::ViewTree;
use crate::window::{WindowDescriptor, WinitWindow};

/// Builds the activity once the event loop is running.
pub type ActivityFactory = Box<dyn FnOnce() -> Result<Box<dyn Activity>, BridgeError>>;

struct ActivityProxy {
    factory: Option<ActivityFactory>,
    descriptor: Option<WindowDescriptor>,
    activity: Option<Box<dyn Activity>>,
    window: Option<WinitWindow>,
    views: ViewTree,
    surface_attached: bool,
    destroyed: bool,
    error: Option<RunError>,
}

impl ActivityProxy {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RunError) {
        tracing::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) {
        let Some(factory) = self.factory.take() else {
            return;
        };

        let activity = match factory() {
            Ok(activity) => activity,
            Err(err) => return self.fail(event_loop, RunError::Activity(err)),
        };

        let descriptor = self.descriptor.take().unwrap_or_default();
        let window = match WinitWindow::new(event_loop, descriptor) {
            Ok(window) => window,
            Err(err) => return self.fail(event_loop, RunError::Os(err)),
        };

        let activity = self.activity.insert(activity);
        let window = self.window.insert(window);
        let mut ctx = ActivityCtx::new(window, &mut self.views);

        if let Err(err) = activity.on_create(&mut ctx, None) {
            return self.fail(event_loop, RunError::Activity(err));
        }

        self.resume_surface(event_loop);
    }

    /// Attach the surface if no attempt has succeeded yet, then report it
    /// available.
    fn resume_surface(&mut self, event_loop: &ActiveEventLoop) {
        if self.destroyed {
            return;
        }

        if !self.surface_attached {
            let (Some(activity), Some(window)) = (self.activity.as_mut(), self.window.as_mut())
            else {
                return;
            };
            let mut ctx = ActivityCtx::new(window, &mut self.views);
            match attach_surface(&mut **activity, &mut ctx) {
                Ok(attached) => self.surface_attached = attached,
                Err(err) => return self.fail(event_loop, RunError::Activity(err)),
            }
        }

        if self.surface_attached {
            self.surface_available();
        }
    }

    /// Run `f` with the activity and a context over the host window.
    fn with_activity(&mut self, f: impl FnOnce(&mut dyn Activity, &mut ActivityCtx<'_>)) {
        if self.destroyed {
            return;
        }
        let (Some(activity), Some(window)) = (self.activity.as_mut(), self.window.as_mut()) else {
            return;
        };
        let mut ctx = ActivityCtx::new(window, &mut self.views);
        f(&mut **activity, &mut ctx);
    }

    fn surface_available(&mut self) {
        self.with_activity(|activity, ctx| {
            let size = ctx.window.size();
            activity.on_surface_event(ctx, SurfaceEvent::Created);
            activity.on_surface_event(
                ctx,
                SurfaceEvent::Changed {
                    format: PixelFormat::Rgba8888,
                    size,
                },
            );
        });
    }

    fn destroy(&mut self) {
        self.with_activity(|activity, ctx| activity.on_destroy(ctx));
        self.destroyed = true;
    }
}

impl ApplicationHandler for ActivityProxy {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.activity.is_none() {
            self.start(event_loop);
        } else {
            self.resume_surface(event_loop);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.with_activity(|activity, ctx| {
            activity.on_surface_event(ctx, SurfaceEvent::Destroyed)
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(WinitWindow::id) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::Resized(size) => self.with_activity(|activity, ctx| {
                activity.on_surface_event(
                    ctx,
                    SurfaceEvent::Changed {
                        format: PixelFormat::Rgba8888,
                        size: mygame_core::geometry::PhysicalSize::new(size.width, size.height),
                    },
                )
            }),
            WindowEvent::Focused(has_focus) => self.with_activity(|activity, ctx| {
                activity.on_window_focus_changed(ctx, has_focus)
            }),
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested for window {:?}", window_id);
                self.destroy();
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        mygame_core::profiling::new_frame();
    }

    fn memory_warning(&mut self, _event_loop: &ActiveEventLoop) {
        self.with_activity(|activity, ctx| activity.on_trim_memory(ctx, TrimLevel::RunningLow));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.destroy();
    }
}

/// Ask `activity` to attach its surface.
///
/// Returns `Ok(false)` when the attempt failed but may be retried, and the
/// error only when it is fatal.
pub(crate) fn attach_surface(
    activity: &mut dyn Activity,
    ctx: &mut ActivityCtx<'_>,
) -> Result<bool, BridgeError> {
    match activity.on_create_surface_view(ctx) {
        Ok(()) => Ok(true),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            log(
                Severity::Warning,
                &format!("surface attach failed, retrying on resume: {}", err),
            );
            Ok(false)
        }
    }
}

/// Drive the activity built by `factory` on a new event loop.
pub fn run_activity<F>(factory: F) -> Result<(), RunError>
where
    F: FnOnce() -> Result<Box<dyn Activity>, BridgeError> + 'static,
{
    run_activity_on(EventLoop::new()?, WindowDescriptor::default(), factory)
}

/// Drive the activity built by `factory` on `event_loop`.
///
/// Returns the first error the activity could not continue from.
pub fn run_activity_on<F>(
    event_loop: EventLoop<()>,
    descriptor: WindowDescriptor,
    factory: F,
) -> Result<(), RunError>
where
    F: FnOnce() -> Result<Box<dyn Activity>, BridgeError> + 'static,
{
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut proxy = ActivityProxy {
        factory: Some(Box::new(factory)),
        descriptor: Some(descriptor),
        activity: None,
        window: None,
        views: ViewTree::new(),
        surface_attached: false,
        destroyed: false,
        error: None,
    };
    event_loop.run_app(&mut proxy)?;

    match proxy.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NativeError, SurfaceError};
    use crate::event::SavedState;
    use crate::surface::SurfaceId;
    use crate::window::{HostWindow, SystemUiFlags};
    use mygame_core::geometry::PhysicalSize;

    struct NullWindow;

    impl HostWindow for NullWindow {
        fn size(&self) -> PhysicalSize {
            PhysicalSize::new(1, 1)
        }
        fn system_ui_visibility(&self) -> SystemUiFlags {
            SystemUiFlags::empty()
        }
        fn set_system_ui_visibility(&mut self, _: SystemUiFlags) {}
        fn allocate_surface(&mut self) -> Result<SurfaceId, SurfaceError> {
            Ok(SurfaceId(1))
        }
        fn release_surface(&mut self, _: SurfaceId) {}
    }

    /// Fails `on_create_surface_view` with each queued error, then succeeds.
    struct ScriptedActivity {
        failures: Vec<BridgeError>,
        attempts: usize,
    }

    impl Activity for ScriptedActivity {
        fn on_create(
            &mut self,
            _: &mut ActivityCtx<'_>,
            _: Option<&SavedState>,
        ) -> Result<(), BridgeError> {
            Ok(())
        }

        fn on_create_surface_view(&mut self, _: &mut ActivityCtx<'_>) -> Result<(), BridgeError> {
            self.attempts += 1;
            match self.failures.pop() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn on_window_focus_changed(&mut self, _: &mut ActivityCtx<'_>, _: bool) {}
    }

    fn attempt(activity: &mut ScriptedActivity) -> Result<bool, BridgeError> {
        let mut window = NullWindow;
        let mut views = ViewTree::new();
        let mut ctx = ActivityCtx::new(&mut window, &mut views);
        attach_surface(activity, &mut ctx)
    }

    #[test]
    fn recoverable_attach_failure_is_retried() {
        let mut activity = ScriptedActivity {
            failures: vec![BridgeError::ContainerNotFound {
                anchor: "frame_layout".to_string(),
            }],
            attempts: 0,
        };

        assert_eq!(attempt(&mut activity), Ok(false));
        assert_eq!(attempt(&mut activity), Ok(true));
        assert_eq!(activity.attempts, 2);
    }

    #[test]
    fn fatal_attach_failure_stops() {
        let fatal = BridgeError::NativeLoad(NativeError::NotFound {
            name: "mygame".to_string(),
        });
        let mut activity = ScriptedActivity {
            failures: vec![fatal.clone()],
            attempts: 0,
        };

        assert_eq!(attempt(&mut activity), Err(fatal));
    }
}
