//! A schema registry that can be replaced while directives are being parsed.

use std::sync::Arc;

use arc_swap::ArcSwap;
use log::info;

use pareto_core::schema::SchemaRegistry;

/// Atomically swappable handle to the current [`SchemaRegistry`].
///
/// Readers take a snapshot with [`load`](Self::load) and keep using it for
/// the whole operation, so a parse that started before a
/// [`swap`](Self::swap) finishes against the registry it started with.
#[derive(Debug)]
pub struct SharedRegistry {
    current: ArcSwap<SchemaRegistry>,
}

impl SharedRegistry {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
        }
    }

    /// A snapshot of the current registry.
    pub fn load(&self) -> Arc<SchemaRegistry> {
        self.current.load_full()
    }

    /// Install `registry` and return the one it replaces.
    pub fn swap(&self, registry: SchemaRegistry) -> Arc<SchemaRegistry> {
        let families = registry.families().count();
        let functions = registry.function_count();
        let previous = self.current.swap(Arc::new(registry));
        info!(families, functions; "Registry swapped");
        previous
    }
}

impl From<SchemaRegistry> for SharedRegistry {
    fn from(registry: SchemaRegistry) -> Self {
        Self::new(registry)
    }
}
