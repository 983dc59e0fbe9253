//! MyGame Core
//!
//! Shared utilities for the MyGame activity host: the log facade, logging and
//! profiling setup, and the geometry types exchanged with the host window.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod profiling;

pub use logging::{APP_TAG, Severity, log};
