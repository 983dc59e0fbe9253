//! Error types for the surface lifecycle bridge.

use std::fmt;

use crate::bridge::LifecycleState;
use crate::surface::SurfaceId;
use crate::view::ViewId;

/// Errors raised while loading the native library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    /// No library is registered under this name.
    NotFound {
        /// The requested library name.
        name: String,
    },

    /// The factory registered under `registered` produced a library that
    /// reports another name.
    NameMismatch {
        registered: String,
        reported: String,
    },

    /// The library was built against a different ABI.
    AbiMismatch {
        name: String,
        expected: u32,
        found: u32,
    },

    /// The library does not export a symbol the host calls.
    MissingExport {
        name: String,
        symbol: &'static str,
    },

    /// A different library already occupies the process-wide slot.
    AlreadyLoaded {
        /// Name of the library that is loaded.
        loaded: String,
        /// Name that was requested.
        requested: String,
    },
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeError::NotFound { name } => {
                write!(f, "native library '{}' not found", name)
            }
            NativeError::NameMismatch {
                registered,
                reported,
            } => write!(
                f,
                "native library registered as '{}' reports name '{}'",
                registered, reported
            ),
            NativeError::AbiMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "native library '{}' has ABI version {}, expected {}",
                name, found, expected
            ),
            NativeError::MissingExport { name, symbol } => {
                write!(f, "native library '{}' does not export '{}'", name, symbol)
            }
            NativeError::AlreadyLoaded { loaded, requested } => write!(
                f,
                "cannot load native library '{}': '{}' is already loaded",
                requested, loaded
            ),
        }
    }
}

impl std::error::Error for NativeError {}

/// Errors raised by view tree mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The view is not part of the tree.
    UnknownView(ViewId),

    /// Children can only be inserted into containers.
    NotAContainer(ViewId),

    /// The surface is already parented somewhere in the tree.
    SurfaceAlreadyParented { surface: SurfaceId, parent: ViewId },

    /// The container already hosts a surface.
    ContainerOccupied {
        container: ViewId,
        surface: SurfaceId,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::UnknownView(id) => write!(f, "view {:?} is not in the tree", id),
            ViewError::NotAContainer(id) => write!(f, "view {:?} cannot have children", id),
            ViewError::SurfaceAlreadyParented { surface, parent } => write!(
                f,
                "surface {:?} is already parented to view {:?}",
                surface, parent
            ),
            ViewError::ContainerOccupied { container, surface } => write!(
                f,
                "container {:?} already hosts surface {:?}",
                container, surface
            ),
        }
    }
}

impl std::error::Error for ViewError {}

/// Errors raised by surface handles and their allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The handle has been released and accepts no more registrations.
    Released(SurfaceId),

    /// The host window could not provide a surface.
    AllocationFailed {
        /// Host-provided reason.
        reason: String,
    },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Released(id) => write!(f, "surface {:?} has been released", id),
            SurfaceError::AllocationFailed { reason } => {
                write!(f, "surface allocation failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Errors surfaced by the bridge to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The native library could not be loaded. The activity cannot start.
    NativeLoad(NativeError),

    /// The content layout has no node with the configured anchor.
    ContainerNotFound {
        /// Anchor that was looked up.
        anchor: String,
    },

    /// The host could not allocate a surface.
    SurfaceAllocation(SurfaceError),

    /// A view could not be inserted or focused.
    ViewInsertion(ViewError),

    /// A holder callback or inset listener could not be registered.
    CallbackRegistration(SurfaceError),

    /// A lifecycle event arrived in a state that does not accept it.
    InvalidState {
        event: &'static str,
        state: LifecycleState,
    },
}

impl BridgeError {
    /// Whether the activity must stop. Every other error leaves the bridge
    /// in a state the host can retry from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BridgeError::NativeLoad(_))
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::NativeLoad(err) => write!(f, "fatal: {}", err),
            BridgeError::ContainerNotFound { anchor } => {
                write!(f, "container not found: no view anchored '{}'", anchor)
            }
            BridgeError::SurfaceAllocation(err) => write!(f, "{}", err),
            BridgeError::ViewInsertion(err) => write!(f, "view insertion failed: {}", err),
            BridgeError::CallbackRegistration(err) => {
                write!(f, "callback registration failed: {}", err)
            }
            BridgeError::InvalidState { event, state } => {
                write!(f, "{} is not valid in state {:?}", event, state)
            }
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::NativeLoad(err) => Some(err),
            BridgeError::SurfaceAllocation(err) | BridgeError::CallbackRegistration(err) => {
                Some(err)
            }
            BridgeError::ViewInsertion(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NativeError> for BridgeError {
    fn from(err: NativeError) -> Self {
        BridgeError::NativeLoad(err)
    }
}

/// Errors that stop the host runner.
#[derive(Debug)]
pub enum RunError {
    /// The event loop could not be created or failed while running.
    EventLoop(winit::error::EventLoopError),

    /// The host window could not be created.
    Os(winit::error::OsError),

    /// The activity reported an error it cannot continue from.
    Activity(BridgeError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(err) => write!(f, "event loop error: {}", err),
            RunError::Os(err) => write!(f, "window creation failed: {}", err),
            RunError::Activity(err) => write!(f, "activity failed: {}", err),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(err) => Some(err),
            RunError::Os(err) => Some(err),
            RunError::Activity(err) => Some(err),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(err: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(err)
    }
}

impl From<BridgeError> for RunError {
    fn from(err: BridgeError) -> Self {
        RunError::Activity(err)
    }
}

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_native_load_is_fatal() {
        let fatal = BridgeError::NativeLoad(NativeError::NotFound {
            name: "mygame".to_string(),
        });
        assert!(fatal.is_fatal());

        let recoverable = BridgeError::ContainerNotFound {
            anchor: "frame_layout".to_string(),
        };
        assert!(!recoverable.is_fatal());
    }

    #[test]
    fn container_not_found_message() {
        let err = BridgeError::ContainerNotFound {
            anchor: "frame_layout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "container not found: no view anchored 'frame_layout'"
        );
    }

    #[test]
    fn native_load_exposes_source() {
        use std::error::Error;

        let err = BridgeError::from(NativeError::MissingExport {
            name: "mygame".to_string(),
            symbol: "stringFromJNI",
        });
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("fatal:"));
    }
}
