/// Observer list with stable removal keys.
///
/// Observers are stored in a SlotMap so that removing one observer never
/// invalidates the key of another. Used by render targets to signal
/// "after render" events to the render loop's listeners.
///
/// # Example
///
/// ```ignore
/// let mut on_after_render = Observable::new();
/// let key = on_after_render.add(|face: &u32| println!("face {} done", face));
/// on_after_render.notify(&0);
/// on_after_render.remove(key);
/// ```

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable key of an observer within an Observable.
    pub struct ObserverKey;
}

/// A list of callbacks notified with a value of type `T`
pub struct Observable<T> {
    observers: SlotMap<ObserverKey, Box<dyn FnMut(&T) + Send>>,
}

impl<T> Observable<T> {
    /// Create an empty observable
    pub fn new() -> Self {
        Self {
            observers: SlotMap::with_key(),
        }
    }

    /// Register a callback. The returned key removes it again.
    pub fn add<F>(&mut self, callback: F) -> ObserverKey
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.observers.insert(Box::new(callback))
    }

    /// Unregister a callback. Returns false if the key is unknown.
    pub fn remove(&mut self, key: ObserverKey) -> bool {
        self.observers.remove(key).is_some()
    }

    /// Invoke every registered callback with `value`
    pub fn notify(&mut self, value: &T) {
        for observer in self.observers.values_mut() {
            observer(value);
        }
    }

    /// Remove every callback
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no callback is registered
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "observable_tests.rs"]
mod tests;
