//! Mock host window.

use std::sync::Arc;

use mygame_activity::{HostWindow, PhysicalSize, SurfaceError, SurfaceId, SystemUiFlags};
use parking_lot::Mutex;

/// Records a host window call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    AllocateSurface(SurfaceId),
    AllocateSurfaceFailed,
    ReleaseSurface(SurfaceId),
    SetSystemUiVisibility(SystemUiFlags),
}

#[derive(Debug)]
struct MockWindowState {
    calls: Vec<HostCall>,
    flags: SystemUiFlags,
    size: PhysicalSize,
    live_surfaces: Vec<SurfaceId>,
    next_surface: u64,
    fail_next_allocation: bool,
}

/// [`HostWindow`] that allocates numbered surfaces and records every call.
///
/// Clones share state, so a test can keep one handle while the bridge
/// drives another.
///
/// ```rust
/// use mygame_activity::HostWindow;
/// use mygame_test_utils::MockWindow;
///
/// let window = MockWindow::new();
/// let mut host = window.clone();
/// let surface = host.allocate_surface().unwrap();
///
/// assert_eq!(window.live_surfaces(), vec![surface]);
/// ```
#[derive(Debug, Clone)]
pub struct MockWindow {
    state: Arc<Mutex<MockWindowState>>,
}

impl MockWindow {
    pub fn new() -> Self {
        Self::with_size(PhysicalSize::new(1080, 2340))
    }

    pub fn with_size(size: PhysicalSize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockWindowState {
                calls: Vec::new(),
                flags: SystemUiFlags::empty(),
                size,
                live_surfaces: Vec::new(),
                next_surface: 1,
                fail_next_allocation: false,
            })),
        }
    }

    /// Make the next [`HostWindow::allocate_surface`] call fail.
    pub fn fail_next_allocation(&self) {
        self.state.lock().fail_next_allocation = true;
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Every flag set applied, in order.
    pub fn applied_flags(&self) -> Vec<SystemUiFlags> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::SetSystemUiVisibility(flags) => Some(*flags),
                _ => None,
            })
            .collect()
    }

    /// Surfaces allocated and not yet released.
    pub fn live_surfaces(&self) -> Vec<SurfaceId> {
        self.state.lock().live_surfaces.clone()
    }
}

impl Default for MockWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl HostWindow for MockWindow {
    fn size(&self) -> PhysicalSize {
        self.state.lock().size
    }

    fn system_ui_visibility(&self) -> SystemUiFlags {
        self.state.lock().flags
    }

    fn set_system_ui_visibility(&mut self, flags: SystemUiFlags) {
        let mut state = self.state.lock();
        state.flags = flags;
        state.calls.push(HostCall::SetSystemUiVisibility(flags));
    }

    fn allocate_surface(&mut self) -> Result<SurfaceId, SurfaceError> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next_allocation) {
            state.calls.push(HostCall::AllocateSurfaceFailed);
            return Err(SurfaceError::AllocationFailed {
                reason: "mock allocation failure".to_string(),
            });
        }

        let id = SurfaceId(state.next_surface);
        state.next_surface += 1;
        state.live_surfaces.push(id);
        state.calls.push(HostCall::AllocateSurface(id));
        Ok(id)
    }

    fn release_surface(&mut self, surface: SurfaceId) {
        let mut state = self.state.lock();
        state.live_surfaces.retain(|live| *live != surface);
        state.calls.push(HostCall::ReleaseSurface(surface));
    }
}
