//! Boundary to the native game library.
//!
//! Libraries are linked statically and register a factory in a
//! [`NativeRegistry`]. Loading checks the ABI version and the exports the host
//! calls. [`NativeLibraryCell`] holds the loaded library for the rest of the
//! process and is the barrier every bridge passes before it exists.

use std::fmt;
use std::sync::{Arc, OnceLock};

use mygame_core::alloc::HashMap;
use mygame_core::geometry::{InsetState, PhysicalSize};

use crate::error::NativeError;
use crate::event::TrimLevel;
use crate::surface::{PixelFormat, SurfaceId};

/// ABI version this host speaks.
pub const NATIVE_ABI_VERSION: u32 = 1;

/// Export providing the string shown by the diagnostic overlay.
pub const DIAGNOSTIC_EXPORT: &str = "stringFromJNI";

/// Exports every library must provide.
pub const REQUIRED_EXPORTS: &[&str] = &[DIAGNOSTIC_EXPORT];

/// The native rendering layer as seen from the host.
///
/// Callbacks arrive on the UI thread, in host order.
pub trait NativeLibrary: Send + Sync {
    fn name(&self) -> &str;

    fn abi_version(&self) -> u32 {
        NATIVE_ABI_VERSION
    }

    /// Symbols this library exports to the host.
    fn exports(&self) -> &[&'static str];

    /// Backs [`DIAGNOSTIC_EXPORT`].
    fn diagnostic_string(&self) -> String;

    fn surface_created(&self, surface: SurfaceId);

    fn surface_changed(&self, surface: SurfaceId, format: PixelFormat, size: PhysicalSize);

    fn surface_destroyed(&self, surface: SurfaceId);

    fn insets_changed(&self, surface: SurfaceId, insets: &InsetState);

    #[allow(unused_variables)]
    fn trim_memory(&self, level: TrimLevel) {}
}

type NativeFactory = Box<dyn Fn() -> Arc<dyn NativeLibrary> + Send + Sync>;

/// Named factories for statically linked native libraries.
#[derive(Default)]
pub struct NativeRegistry {
    factories: HashMap<String, NativeFactory>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a library factory. A later registration under the same name wins.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn NativeLibrary> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn NativeLibrary> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiate `name` and verify its reported name, `required_abi` and
    /// [`REQUIRED_EXPORTS`].
    pub fn load(
        &self,
        name: &str,
        required_abi: u32,
    ) -> Result<Arc<dyn NativeLibrary>, NativeError> {
        let factory = self.factories.get(name).ok_or_else(|| NativeError::NotFound {
            name: name.to_string(),
        })?;
        let library = factory();

        if library.name() != name {
            return Err(NativeError::NameMismatch {
                registered: name.to_string(),
                reported: library.name().to_string(),
            });
        }

        let found = library.abi_version();
        if found != required_abi {
            return Err(NativeError::AbiMismatch {
                name: name.to_string(),
                expected: required_abi,
                found,
            });
        }

        let exports = library.exports();
        if let Some(symbol) = REQUIRED_EXPORTS
            .iter()
            .copied()
            .find(|symbol| !exports.contains(symbol))
        {
            return Err(NativeError::MissingExport {
                name: name.to_string(),
                symbol,
            });
        }

        tracing::debug!("loaded native library '{}' (abi {})", name, found);
        Ok(library)
    }
}

impl fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRegistry")
            .field("libraries", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Init-once slot for the loaded native library.
///
/// Successful loads are kept for the life of the cell. Failures are not
/// cached: every caller gets the error.
pub struct NativeLibraryCell {
    library: OnceLock<Arc<dyn NativeLibrary>>,
}

/// The process-wide native library.
pub static PROCESS_LIBRARY: NativeLibraryCell = NativeLibraryCell::new();

impl NativeLibraryCell {
    pub const fn new() -> Self {
        Self {
            library: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Option<&Arc<dyn NativeLibrary>> {
        self.library.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.library.get().is_some()
    }

    /// Return the loaded library, loading `name` from `registry` on first use.
    pub fn get_or_load(
        &self,
        registry: &NativeRegistry,
        name: &str,
        required_abi: u32,
    ) -> Result<Arc<dyn NativeLibrary>, NativeError> {
        if let Some(library) = self.library.get() {
            return Self::check_loaded(library, name, required_abi);
        }

        let loaded = registry.load(name, required_abi)?;
        // A concurrent loader may have won; its library is the one kept.
        let library = self.library.get_or_init(|| loaded);
        Self::check_loaded(library, name, required_abi)
    }

    /// The cached library must match every request, not just the first.
    fn check_loaded(
        library: &Arc<dyn NativeLibrary>,
        name: &str,
        required_abi: u32,
    ) -> Result<Arc<dyn NativeLibrary>, NativeError> {
        if library.name() != name {
            return Err(NativeError::AlreadyLoaded {
                loaded: library.name().to_string(),
                requested: name.to_string(),
            });
        }

        let found = library.abi_version();
        if found != required_abi {
            return Err(NativeError::AbiMismatch {
                name: name.to_string(),
                expected: required_abi,
                found,
            });
        }

        Ok(Arc::clone(library))
    }
}

impl Default for NativeLibraryCell {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NativeLibraryCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeLibraryCell")
            .field("loaded", &self.library.get().map(|library| library.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubLibrary {
        name: &'static str,
        abi: u32,
        exports: &'static [&'static str],
    }

    impl NativeLibrary for StubLibrary {
        fn name(&self) -> &str {
            self.name
        }
        fn abi_version(&self) -> u32 {
            self.abi
        }
        fn exports(&self) -> &[&'static str] {
            self.exports
        }
        fn diagnostic_string(&self) -> String {
            "stub".to_string()
        }
        fn surface_created(&self, _: SurfaceId) {}
        fn surface_changed(&self, _: SurfaceId, _: PixelFormat, _: PhysicalSize) {}
        fn surface_destroyed(&self, _: SurfaceId) {}
        fn insets_changed(&self, _: SurfaceId, _: &InsetState) {}
    }

    fn stub(
        name: &'static str,
        abi: u32,
        exports: &'static [&'static str],
    ) -> Arc<dyn NativeLibrary> {
        Arc::new(StubLibrary { name, abi, exports })
    }

    #[test]
    fn missing_library_is_not_found() {
        let registry = NativeRegistry::new();
        assert_eq!(
            registry.load("mygame", NATIVE_ABI_VERSION).err(),
            Some(NativeError::NotFound {
                name: "mygame".to_string()
            })
        );
    }

    #[test]
    fn library_must_report_registered_name() {
        let registry =
            NativeRegistry::new().with("mygame", || stub("other", 1, REQUIRED_EXPORTS));
        assert_eq!(
            registry.load("mygame", 1).err(),
            Some(NativeError::NameMismatch {
                registered: "mygame".to_string(),
                reported: "other".to_string()
            })
        );
    }

    #[test]
    fn abi_mismatch_is_rejected() {
        let registry =
            NativeRegistry::new().with("mygame", || stub("mygame", 2, REQUIRED_EXPORTS));
        assert_eq!(
            registry.load("mygame", 1).err(),
            Some(NativeError::AbiMismatch {
                name: "mygame".to_string(),
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn missing_export_is_rejected() {
        let registry = NativeRegistry::new().with("mygame", || stub("mygame", 1, &[]));
        assert_eq!(
            registry.load("mygame", 1).err(),
            Some(NativeError::MissingExport {
                name: "mygame".to_string(),
                symbol: DIAGNOSTIC_EXPORT
            })
        );
    }

    #[test]
    fn cell_loads_once() {
        static LOADS: AtomicUsize = AtomicUsize::new(0);
        let registry = NativeRegistry::new().with("mygame", || {
            LOADS.fetch_add(1, Ordering::SeqCst);
            stub("mygame", 1, REQUIRED_EXPORTS)
        });
        let cell = NativeLibraryCell::new();

        let first = cell.get_or_load(&registry, "mygame", 1).unwrap();
        let second = cell.get_or_load(&registry, "mygame", 1).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(LOADS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cell_does_not_cache_failures() {
        let cell = NativeLibraryCell::new();
        let empty = NativeRegistry::new();
        assert!(cell.get_or_load(&empty, "mygame", 1).is_err());
        assert!(!cell.is_loaded());

        let registry =
            NativeRegistry::new().with("mygame", || stub("mygame", 1, REQUIRED_EXPORTS));
        assert!(cell.get_or_load(&registry, "mygame", 1).is_ok());
        assert!(cell.is_loaded());
    }

    #[test]
    fn cell_rejects_second_library_name() {
        let registry = NativeRegistry::new()
            .with("mygame", || stub("mygame", 1, REQUIRED_EXPORTS))
            .with("other", || stub("other", 1, REQUIRED_EXPORTS));
        let cell = NativeLibraryCell::new();
        cell.get_or_load(&registry, "mygame", 1).unwrap();

        assert_eq!(
            cell.get_or_load(&registry, "other", 1).err(),
            Some(NativeError::AlreadyLoaded {
                loaded: "mygame".to_string(),
                requested: "other".to_string()
            })
        );
    }

    #[test]
    fn cached_library_is_checked_against_required_abi() {
        let registry =
            NativeRegistry::new().with("mygame", || stub("mygame", 1, REQUIRED_EXPORTS));
        let cell = NativeLibraryCell::new();
        cell.get_or_load(&registry, "mygame", 1).unwrap();

        assert_eq!(
            cell.get_or_load(&registry, "mygame", 2).err(),
            Some(NativeError::AbiMismatch {
                name: "mygame".to_string(),
                expected: 2,
                found: 1
            })
        );
        assert!(cell.get_or_load(&registry, "mygame", 1).is_ok());
    }
}
