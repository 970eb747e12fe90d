use std::sync::Arc;

// ---------------------------------------------------------------------------
// Input: a value that knows when it changed
// ---------------------------------------------------------------------------

/// A user-controlled value with a change counter.
///
/// The version only moves when the stored value actually changes, so
/// re-applying the same value does not invalidate anything downstream.
#[derive(Debug, Clone)]
pub struct Input<T> {
    value: T,
    version: u64,
}

impl<T: PartialEq> Input<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the value. Returns whether it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version += 1;
        true
    }

    /// Mutate in place. Returns whether the value changed.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let before = self.value.clone();
        f(&mut self.value);
        if self.value == before {
            return false;
        }
        self.version += 1;
        true
    }
}

// ---------------------------------------------------------------------------
// Memo: a lazily recomputed derived value
// ---------------------------------------------------------------------------

/// Caches the result of a pure computation, keyed by the versions of the
/// inputs it reads.
///
/// Reading with an unchanged key hands out the same `Arc`, so every consumer
/// between two input changes sees one snapshot.
#[derive(Debug)]
pub struct Memo<K, V> {
    cached: Option<(K, Arc<V>)>,
    recomputes: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            cached: None,
            recomputes: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value if it was computed for `key`, otherwise run
    /// `compute` and cache its result.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some((cached_key, value)) = &self.cached {
            if *cached_key == key {
                return Arc::clone(value);
            }
        }
        let value = Arc::new(compute());
        self.recomputes += 1;
        self.cached = Some((key, Arc::clone(&value)));
        value
    }

    /// Key the cached value was computed for, if `value` is that value.
    /// A snapshot taken before the last recompute has no key here.
    pub fn key_of(&self, value: &Arc<V>) -> Option<&K> {
        match &self.cached {
            Some((key, cached)) if Arc::ptr_eq(cached, value) => Some(key),
            _ => None,
        }
    }

    /// How many times the computation has run.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}
