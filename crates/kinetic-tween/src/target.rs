//! Shared animation target.
//!
//! A `Target` is a cheaply-cloneable handle to a named property map. The
//! caller keeps one clone and hands another to a tween; the tween writes
//! interpolated values through the handle every tick, so mutations are
//! visible to the caller immediately. Handles are `Send`, which lets a
//! scheduler move to a driver thread while the host keeps reading.

use kinetic_interp::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A shared, named property map mutated in place by tweens.
#[derive(Debug, Clone, Default)]
pub struct Target {
    inner: Arc<Mutex<HashMap<String, Value>>>,
}

impl Target {
    /// Create an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a target from initial properties.
    ///
    /// ```
    /// use kinetic_tween::Target;
    ///
    /// let target = Target::with([("x", 0.0), ("y", 10.0)]);
    /// assert_eq!(target.number("y"), Some(10.0));
    /// ```
    pub fn with<K, V, I>(props: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = props
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set a property.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock().insert(key.into(), value.into());
    }

    /// Read a property.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    /// Read a property as a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.lock().get(key).and_then(Value::as_number)
    }

    /// Snapshot the whole property map.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.lock().clone()
    }

    /// Property names, unordered.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }
}

static_assertions::assert_impl_all!(Target: Send, Sync);
