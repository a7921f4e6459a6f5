use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::value::Value;

/// A lexically-chained environment frame.
///
/// Lookup walks the outer chain; writes always land in this frame.
/// The per-frame lock keeps environments shared with spawned tasks
/// safe to touch from both sides. Outer links are only ever assigned
/// at construction from an existing frame, so chains cannot cycle.
pub struct Scope {
    store: RwLock<HashMap<String, Value>>,
    outer: Option<Arc<Scope>>,
}

impl Scope {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            store: RwLock::new(HashMap::new()),
            outer: None,
        })
    }

    /// A child frame whose lookups fall back to `outer`.
    pub fn enclosed(outer: Arc<Scope>) -> Arc<Self> {
        Arc::new(Self {
            store: RwLock::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.read().expect("scope lock poisoned").get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Bind `name` in this frame, silently overwriting any previous
    /// binding here. Outer frames are never written through.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.store
            .write()
            .expect("scope lock poisoned")
            .insert(name.into(), value);
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({:p})", self)
    }
}
