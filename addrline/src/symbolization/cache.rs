//! Shared cache of loaded modules
//!
//! Parsing a binary is the expensive part of symbolization, so modules are
//! loaded once per path and shared. Parse failures are remembered as well:
//! asking again for a stripped binary returns the recorded error without
//! reading the file a second time.
//!
//! ## Concurrency
//!
//! Each path owns a slot holding a [`OnceLock`]. The cache mutex is only
//! held while a slot is looked up or inserted, never during a parse. The
//! parse runs inside the slot's `OnceLock`, so concurrent first callers for
//! one path wait for a single load, while loads of different paths proceed
//! in parallel. Loaded modules are immutable and shared through [`Arc`];
//! queries against them need no locking.

use super::module::LoadedModule;
use crate::domain::{ErrorKind, SymbolizeError};
use log::{debug, info};
use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

type LoadOutcome = Result<Arc<LoadedModule>, SymbolizeError>;
type Slot = Arc<OnceLock<LoadOutcome>>;

/// Modules keyed by path, together with the paths that failed to parse
#[derive(Default)]
pub struct ModuleCache {
    slots: Mutex<HashMap<String, Slot>>,
    load_attempts: AtomicUsize,
}

impl ModuleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the module at `path`, loading it from disk on first use
    ///
    /// # Errors
    /// Returns the load error, or the recorded error if `path` already failed
    /// to parse
    pub fn get_or_load(&self, path: &str) -> LoadOutcome {
        self.get_or_insert_with(path, || LoadedModule::load(path))
    }

    /// Return the module cached under `path`, parsing it from `reader` on first use
    ///
    /// The reader is left untouched when `path` is already cached.
    ///
    /// # Errors
    /// Returns the load error, or the recorded error if `path` already failed
    /// to parse
    pub fn get_or_load_at<R: Read>(&self, reader: R, path: &str) -> LoadOutcome {
        self.get_or_insert_with(path, || LoadedModule::from_reader(reader, path))
    }

    /// Whether `path` is recorded as having failed to parse
    #[must_use]
    pub fn is_failed(&self, path: &str) -> bool {
        self.lock()
            .get(path)
            .and_then(|slot| slot.get())
            .is_some_and(|outcome| outcome.is_err())
    }

    /// Number of paths with a recorded outcome, successful or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().values().filter(|slot| slot.get().is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times a module load was actually started
    #[must_use]
    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::Relaxed)
    }

    fn get_or_insert_with<F>(&self, path: &str, load: F) -> LoadOutcome
    where
        F: FnOnce() -> Result<LoadedModule, SymbolizeError>,
    {
        let slot = Arc::clone(self.lock().entry(path.to_string()).or_default());

        let outcome = slot.get_or_init(|| {
            self.load_attempts.fetch_add(1, Ordering::Relaxed);
            let outcome = load().map(Arc::new);
            match &outcome {
                Ok(_) => info!("Cached module {path}"),
                Err(err) => info!("Failed to load {path}: {err}"),
            }
            outcome
        });

        // Open failures may be transient; forget them so the next call retries
        if let Err(err) = outcome {
            if err.kind() == ErrorKind::Open {
                let mut slots = self.lock();
                if slots.get(path).is_some_and(|current| Arc::ptr_eq(current, &slot)) {
                    debug!("Not caching open failure for {path}");
                    slots.remove(path);
                }
            }
        }

        outcome.clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // The map is never left half-updated, so a poisoned lock is still usable
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
