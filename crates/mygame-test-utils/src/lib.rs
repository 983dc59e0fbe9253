//! Test utilities for MyGame.
//!
//! Provides recording stand-ins for the two collaborators of the surface
//! bridge, plus a tracing layer that captures log output.
//!
//! - [`MockWindow`]: a [`HostWindow`](mygame_activity::HostWindow) that
//!   records every call (requires `mock` feature)
//! - [`MockNativeLibrary`]: a [`NativeLibrary`](mygame_activity::NativeLibrary)
//!   that records every callback (requires `mock` feature)
//! - [`LogCapture`]: collects tracing events for assertions
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use mygame_activity::{HostWindow, SystemUiFlags};
//! use mygame_test_utils::{HostCall, MockWindow};
//!
//! let mut window = MockWindow::new();
//! window.set_system_ui_visibility(SystemUiFlags::FULLSCREEN);
//!
//! assert_eq!(
//!     window.calls(),
//!     vec![HostCall::SetSystemUiVisibility(SystemUiFlags::FULLSCREEN)]
//! );
//! # }
//! ```
//!
//! Mocks use `Mutex` for interior mutability so a shared handle can be
//! inspected while the bridge holds another.

pub mod log_capture;
#[cfg(feature = "mock")]
pub mod mock_host;
#[cfg(feature = "mock")]
pub mod mock_native;

pub use log_capture::*;
#[cfg(feature = "mock")]
pub use mock_host::*;
#[cfg(feature = "mock")]
pub use mock_native::*;
