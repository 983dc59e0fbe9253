//! Native-drawable surface handle and its listener tables.
//!
//! A [`SurfaceHandle`] owns every callback registered against it. Listeners are
//! removed explicitly with the [`ListenerId`] returned at registration, and all
//! of them are dropped when the handle is released.

use mygame_core::geometry::{InsetState, PhysicalSize};

use crate::error::SurfaceError;

/// Host-assigned identifier of a drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Registration token for a surface listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Pixel format reported with a surface change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba8888,
    Rgbx8888,
    Rgb888,
    Rgb565,
    Other(i32),
}

impl PixelFormat {
    pub fn from_raw(format: i32) -> Self {
        match format {
            1 => PixelFormat::Rgba8888,
            2 => PixelFormat::Rgbx8888,
            3 => PixelFormat::Rgb888,
            4 => PixelFormat::Rgb565,
            other => PixelFormat::Other(other),
        }
    }
}

/// Holder callback notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Created,
    Changed {
        format: PixelFormat,
        size: PhysicalSize,
    },
    Destroyed,
}

/// Lifecycle of the drawable behind a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Allocated, no holder notification yet.
    Pending,
    /// Created but not yet sized.
    Created,
    Ready {
        format: PixelFormat,
        size: PhysicalSize,
    },
    /// The drawable is gone. A later `Created` brings it back.
    Destroyed,
}

type HolderCallback = Box<dyn FnMut(SurfaceId, &SurfaceEvent)>;
type InsetListener = Box<dyn FnMut(SurfaceId, &InsetState)>;

/// Drawable surface owned by the bridge for the lifetime of an attachment.
pub struct SurfaceHandle {
    id: SurfaceId,
    state: SurfaceState,
    holder_callbacks: Vec<(ListenerId, HolderCallback)>,
    inset_listeners: Vec<(ListenerId, InsetListener)>,
    next_listener: u64,
    released: bool,
}

impl SurfaceHandle {
    pub fn new(id: SurfaceId) -> Self {
        Self {
            id,
            state: SurfaceState::Pending,
            holder_callbacks: Vec::new(),
            inset_listeners: Vec::new(),
            next_listener: 0,
            released: false,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn next_listener_id(&mut self) -> Result<ListenerId, SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released(self.id));
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        Ok(id)
    }

    /// Register a holder callback for created/changed/destroyed notifications.
    pub fn add_holder_callback<F>(&mut self, callback: F) -> Result<ListenerId, SurfaceError>
    where
        F: FnMut(SurfaceId, &SurfaceEvent) + 'static,
    {
        let id = self.next_listener_id()?;
        self.holder_callbacks.push((id, Box::new(callback)));
        Ok(id)
    }

    /// Returns `false` if the id was not registered.
    pub fn remove_holder_callback(&mut self, id: ListenerId) -> bool {
        let before = self.holder_callbacks.len();
        self.holder_callbacks.retain(|(listener, _)| *listener != id);
        self.holder_callbacks.len() != before
    }

    /// Register a listener for window inset changes.
    pub fn add_inset_listener<F>(&mut self, listener: F) -> Result<ListenerId, SurfaceError>
    where
        F: FnMut(SurfaceId, &InsetState) + 'static,
    {
        let id = self.next_listener_id()?;
        self.inset_listeners.push((id, Box::new(listener)));
        Ok(id)
    }

    /// Returns `false` if the id was not registered.
    pub fn remove_inset_listener(&mut self, id: ListenerId) -> bool {
        let before = self.inset_listeners.len();
        self.inset_listeners.retain(|(listener, _)| *listener != id);
        self.inset_listeners.len() != before
    }

    pub fn holder_callback_count(&self) -> usize {
        self.holder_callbacks.len()
    }

    pub fn inset_listener_count(&self) -> usize {
        self.inset_listeners.len()
    }

    /// Track the event and notify holder callbacks in registration order.
    ///
    /// Released handles ignore events.
    pub fn dispatch_surface_event(&mut self, event: SurfaceEvent) {
        if self.released {
            tracing::trace!("dropping {:?} for released surface {:?}", event, self.id);
            return;
        }

        self.state = match event {
            SurfaceEvent::Created => SurfaceState::Created,
            SurfaceEvent::Changed { format, size } => SurfaceState::Ready { format, size },
            SurfaceEvent::Destroyed => SurfaceState::Destroyed,
        };

        let id = self.id;
        for (_, callback) in &mut self.holder_callbacks {
            callback(id, &event);
        }
    }

    /// Notify inset listeners in registration order.
    pub fn dispatch_insets(&mut self, insets: &InsetState) {
        if self.released {
            return;
        }

        let id = self.id;
        for (_, listener) in &mut self.inset_listeners {
            listener(id, insets);
        }
    }

    /// Drop every registration. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.holder_callbacks.clear();
        self.inset_listeners.clear();
        self.released = true;
        tracing::debug!("released surface {:?}", self.id);
    }
}

impl std::fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("holder_callbacks", &self.holder_callbacks.len())
            .field("inset_listeners", &self.inset_listeners.len())
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn callbacks_run_in_registration_order() {
        let mut surface = SurfaceHandle::new(SurfaceId(1));
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = order.clone();
        surface
            .add_holder_callback(move |_, _| first.borrow_mut().push("first"))
            .unwrap();
        let second = order.clone();
        surface
            .add_holder_callback(move |_, _| second.borrow_mut().push("second"))
            .unwrap();

        surface.dispatch_surface_event(SurfaceEvent::Created);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn state_follows_events() {
        let mut surface = SurfaceHandle::new(SurfaceId(1));
        assert_eq!(surface.state(), SurfaceState::Pending);

        surface.dispatch_surface_event(SurfaceEvent::Created);
        assert_eq!(surface.state(), SurfaceState::Created);

        let size = PhysicalSize::new(1080, 2400);
        surface.dispatch_surface_event(SurfaceEvent::Changed {
            format: PixelFormat::Rgba8888,
            size,
        });
        assert_eq!(
            surface.state(),
            SurfaceState::Ready {
                format: PixelFormat::Rgba8888,
                size
            }
        );

        surface.dispatch_surface_event(SurfaceEvent::Destroyed);
        assert_eq!(surface.state(), SurfaceState::Destroyed);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let mut surface = SurfaceHandle::new(SurfaceId(3));
        let calls = Rc::new(RefCell::new(0));

        let counter = calls.clone();
        let id = surface
            .add_inset_listener(move |_, _| *counter.borrow_mut() += 1)
            .unwrap();
        assert!(surface.remove_inset_listener(id));
        assert!(!surface.remove_inset_listener(id));

        surface.dispatch_insets(&InsetState::default());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn release_clears_and_rejects_registrations() {
        let mut surface = SurfaceHandle::new(SurfaceId(4));
        surface.add_holder_callback(|_, _| {}).unwrap();
        surface.add_inset_listener(|_, _| {}).unwrap();

        surface.release();
        surface.release();

        assert!(surface.is_released());
        assert_eq!(surface.holder_callback_count(), 0);
        assert_eq!(surface.inset_listener_count(), 0);
        assert_eq!(
            surface.add_holder_callback(|_, _| {}),
            Err(SurfaceError::Released(SurfaceId(4)))
        );
    }

    #[test]
    fn released_handle_ignores_events() {
        let mut surface = SurfaceHandle::new(SurfaceId(5));
        surface.release();
        surface.dispatch_surface_event(SurfaceEvent::Created);
        assert_eq!(surface.state(), SurfaceState::Pending);
    }

    #[test]
    fn pixel_format_from_raw() {
        assert_eq!(PixelFormat::from_raw(1), PixelFormat::Rgba8888);
        assert_eq!(PixelFormat::from_raw(4), PixelFormat::Rgb565);
        assert_eq!(PixelFormat::from_raw(0x22), PixelFormat::Other(0x22));
    }
}
