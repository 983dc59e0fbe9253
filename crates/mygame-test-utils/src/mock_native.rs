//! Mock native library.

use std::sync::Arc;

use mygame_activity::native::{NATIVE_ABI_VERSION, REQUIRED_EXPORTS};
use mygame_activity::{
    InsetState, NativeLibrary, NativeRegistry, PhysicalSize, PixelFormat, SurfaceId, TrimLevel,
};
use parking_lot::Mutex;

/// Records a native callback for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    SurfaceCreated(SurfaceId),
    SurfaceChanged {
        surface: SurfaceId,
        format: PixelFormat,
        size: PhysicalSize,
    },
    SurfaceDestroyed(SurfaceId),
    InsetsChanged {
        surface: SurfaceId,
        insets: InsetState,
    },
    TrimMemory(TrimLevel),
    DiagnosticString,
}

/// [`NativeLibrary`] that records every callback it receives.
///
/// ```rust
/// use mygame_activity::{NativeLibrary, SurfaceId};
/// use mygame_test_utils::{MockNativeLibrary, NativeCall};
///
/// let native = MockNativeLibrary::new("mygame");
/// native.surface_created(SurfaceId(1));
///
/// assert_eq!(native.calls(), vec![NativeCall::SurfaceCreated(SurfaceId(1))]);
/// ```
#[derive(Debug)]
pub struct MockNativeLibrary {
    name: String,
    abi_version: u32,
    exports: Vec<&'static str>,
    diagnostic: String,
    calls: Mutex<Vec<NativeCall>>,
}

impl MockNativeLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abi_version: NATIVE_ABI_VERSION,
            exports: REQUIRED_EXPORTS.to_vec(),
            diagnostic: "Hello from native".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_abi_version(mut self, abi_version: u32) -> Self {
        self.abi_version = abi_version;
        self
    }

    pub fn with_exports(mut self, exports: &[&'static str]) -> Self {
        self.exports = exports.to_vec();
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = diagnostic.into();
        self
    }

    /// Wrap in an `Arc` and return a registry serving that same instance.
    pub fn into_registry(self) -> (Arc<Self>, NativeRegistry) {
        let library = Arc::new(self);
        let mut registry = NativeRegistry::new();
        let shared = Arc::clone(&library);
        registry.register(library.name.clone(), move || {
            Arc::clone(&shared) as Arc<dyn NativeLibrary>
        });
        (library, registry)
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().clone()
    }

    /// Recorded surface lifecycle calls only.
    pub fn surface_calls(&self) -> Vec<NativeCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    NativeCall::SurfaceCreated(_)
                        | NativeCall::SurfaceChanged { .. }
                        | NativeCall::SurfaceDestroyed(_)
                )
            })
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: NativeCall) {
        self.calls.lock().push(call);
    }
}

impl NativeLibrary for MockNativeLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn abi_version(&self) -> u32 {
        self.abi_version
    }

    fn exports(&self) -> &[&'static str] {
        &self.exports
    }

    fn diagnostic_string(&self) -> String {
        self.record(NativeCall::DiagnosticString);
        self.diagnostic.clone()
    }

    fn surface_created(&self, surface: SurfaceId) {
        self.record(NativeCall::SurfaceCreated(surface));
    }

    fn surface_changed(&self, surface: SurfaceId, format: PixelFormat, size: PhysicalSize) {
        self.record(NativeCall::SurfaceChanged {
            surface,
            format,
            size,
        });
    }

    fn surface_destroyed(&self, surface: SurfaceId) {
        self.record(NativeCall::SurfaceDestroyed(surface));
    }

    fn insets_changed(&self, surface: SurfaceId, insets: &InsetState) {
        self.record(NativeCall::InsetsChanged {
            surface,
            insets: *insets,
        });
    }

    fn trim_memory(&self, level: TrimLevel) {
        self.record(NativeCall::TrimMemory(level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_serves_the_same_instance() {
        let (native, registry) = MockNativeLibrary::new("mygame").into_registry();
        let loaded = registry.load("mygame", NATIVE_ABI_VERSION).unwrap();

        loaded.surface_destroyed(SurfaceId(3));
        assert_eq!(native.calls(), vec![NativeCall::SurfaceDestroyed(SurfaceId(3))]);
    }
}
