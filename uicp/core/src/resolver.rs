//! Component Resolver - Renderer Lookup by Identifier
//!
//! Maps a component identifier to the renderer that knows how to display it.
//! The resolver is deliberately separate from the [`Registry`](crate::Registry):
//! the registry says what data a component accepts, the resolver says whether
//! this surface can draw it.
//!
//! # Thread Safety
//!
//! The resolver uses `Arc<RwLock<>>` so lookups from concurrent render passes
//! proceed in parallel while registrations serialize. Registrations happen at
//! start-up or when a surface wires in a late renderer; lookups happen on every
//! render pass. Clones share the same map.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::registry::JsonMap;

/// Something that can turn a component's data into displayable output
///
/// Any `Fn(&JsonMap) -> String + Send + Sync` closure is a renderer.
pub trait ComponentRenderer: Send + Sync {
    /// Render the component's data
    fn render(&self, data: &JsonMap) -> String;
}

impl<F> ComponentRenderer for F
where
    F: Fn(&JsonMap) -> String + Send + Sync,
{
    fn render(&self, data: &JsonMap) -> String {
        self(data)
    }
}

/// Shared, thread-safe identifier -> renderer map
#[derive(Clone, Default)]
pub struct ComponentResolver {
    inner: Arc<RwLock<HashMap<String, Arc<dyn ComponentRenderer>>>>,
}

impl ComponentResolver {
    /// Create an empty resolver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer, replacing any existing one for the identifier
    ///
    /// Returns `true` if a renderer was replaced.
    pub fn register<R>(&self, uid: impl Into<String>, renderer: R) -> bool
    where
        R: ComponentRenderer + 'static,
    {
        self.register_shared(uid, Arc::new(renderer))
    }

    /// Register an already shared renderer
    pub fn register_shared(
        &self,
        uid: impl Into<String>,
        renderer: Arc<dyn ComponentRenderer>,
    ) -> bool {
        let uid = uid.into();
        let replaced = self.inner.write().insert(uid.clone(), renderer).is_some();
        tracing::debug!(uid = %uid, replaced, "Component renderer registered");
        replaced
    }

    /// Look up the renderer for an identifier
    #[must_use]
    pub fn lookup(&self, uid: &str) -> Option<Arc<dyn ComponentRenderer>> {
        self.inner.read().get(uid).cloned()
    }

    /// Check if a renderer is registered for an identifier
    #[must_use]
    pub fn contains(&self, uid: &str) -> bool {
        self.inner.read().contains_key(uid)
    }

    /// All identifiers with a renderer, sorted
    #[must_use]
    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered renderers
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no renderer is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl fmt::Debug for ComponentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentResolver")
            .field("registered", &self.registered_ids())
            .finish()
    }
}
