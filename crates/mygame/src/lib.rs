//! MyGame - native game host
//!
//! Glues the built-in native [`GameEngine`] to a host activity through the
//! surface lifecycle bridge:
//!
//! - **Native library**: [`GameEngine`], registered under `"mygame"`
//! - **Surface bridge**: attaches a drawable surface and keeps the window
//!   immersive while focused
//! - **Log facade**: one-call logging under the application tag
//!
//! # Quick Start
//!
//! ```ignore
//! use mygame::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     ActivityBuilder::new()
//!         .with_title("My Game")
//!         .run()
//! }
//! ```
//!
//! On Android the `android_main` entry point does the same with the
//! GameActivity backend.

#[cfg(target_os = "android")]
pub mod android;
pub mod application;
pub mod engine;

pub use mygame_activity as activity;
pub use mygame_core as core;

pub use application::ActivityBuilder;
pub use engine::GameEngine;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::application::ActivityBuilder;
    pub use crate::engine::GameEngine;

    pub use mygame_core::config::{LogConfig, ProfilingConfig};
    pub use mygame_core::logging::{Severity, log};

    pub use mygame_activity::{
        Activity, ActivityConfig, ActivityCtx, BridgeError, OverlayText, RunError,
        SurfaceBridge, SystemUiFlags,
    };
}

/// Run the default activity on a desktop window.
pub fn run() -> Result<(), mygame_activity::RunError> {
    ActivityBuilder::new().run()
}
