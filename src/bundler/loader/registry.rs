//! Name-to-loader lookup used when resolving rules.

use super::{COPY_LOADER, CopyLoader, IGNORE_LOADER, IgnoreLoader, Loader};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of loaders referenced by name from `.npmbundlerrc` rules.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn Loader>>,
}

impl LoaderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in loaders.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(COPY_LOADER, Arc::new(CopyLoader));
        registry.register(IGNORE_LOADER, Arc::new(IgnoreLoader));
        registry
    }

    /// Registers a loader, returning the one previously registered under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        loader: Arc<dyn Loader>,
    ) -> Option<Arc<dyn Loader>> {
        self.loaders.insert(name.into(), loader)
    }

    /// Looks a loader up by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Loader>> {
        self.loaders.get(name).cloned()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("loaders", &self.names())
            .finish()
    }
}
