//! Registry of live windows
//!
//! Maps each native handle to the [`WindowData`] it owns. The registry has no
//! locking: it belongs to the [`WindowSystem`](crate::WindowSystem) that owns
//! the platform event loop and is only touched from that thread.

use crate::{WindowData, WindowError, WindowHandle, WindowResult};
use std::collections::HashMap;

/// Owning map from window handle to window state
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowHandle, WindowData>,
}

impl WindowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a new record
    ///
    /// Fails without touching the existing entry if the handle is already present.
    pub fn insert(&mut self, handle: WindowHandle, data: WindowData) -> WindowResult<()> {
        if self.windows.contains_key(&handle) {
            return Err(WindowError::DuplicateHandle(handle));
        }
        self.windows.insert(handle, data);
        Ok(())
    }

    /// Look up a window. `None` is the normal answer for stale handles.
    pub fn get(&self, handle: WindowHandle) -> Option<&WindowData> {
        self.windows.get(&handle)
    }

    /// Look up a window for mutation
    pub fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut WindowData> {
        self.windows.get_mut(&handle)
    }

    /// Remove and return a record; `None` if it was not registered
    pub fn remove(&mut self, handle: WindowHandle) -> Option<WindowData> {
        self.windows.remove(&handle)
    }

    /// Whether the handle is registered
    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.windows.contains_key(&handle)
    }

    /// Number of live windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no windows are registered
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Snapshot of every registered handle, sorted
    pub fn handles(&self) -> Vec<WindowHandle> {
        let mut handles: Vec<_> = self.windows.keys().copied().collect();
        handles.sort_unstable();
        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(raw: u64) -> (WindowHandle, WindowData) {
        let handle = WindowHandle::from_raw(raw);
        (handle, WindowData::new(handle, "window", 640, 480))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = WindowRegistry::new();
        let (handle, data) = record(1);
        registry.insert(handle, data).unwrap();

        assert!(registry.contains(handle));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(handle).unwrap().title(), "window");
    }

    #[test]
    fn test_lookup_unknown_handle_is_none() {
        let mut registry = WindowRegistry::new();
        assert!(registry.get(WindowHandle::from_raw(42)).is_none());
        assert!(registry.get_mut(WindowHandle::NULL).is_none());
    }

    #[test]
    fn test_duplicate_insert_keeps_original() {
        let mut registry = WindowRegistry::new();
        let (handle, data) = record(3);
        registry.insert(handle, data).unwrap();

        let replacement = WindowData::new(handle, "other", 10, 10);
        let result = registry.insert(handle, replacement);
        assert!(matches!(result, Err(WindowError::DuplicateHandle(h)) if h == handle));
        assert_eq!(registry.get(handle).unwrap().title(), "window");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut registry = WindowRegistry::new();
        let (handle, data) = record(5);
        registry.insert(handle, data).unwrap();

        assert!(registry.remove(handle).is_some());
        assert!(registry.remove(handle).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handles_snapshot_sorted() {
        let mut registry = WindowRegistry::new();
        for raw in [9, 2, 5] {
            let (handle, data) = record(raw);
            registry.insert(handle, data).unwrap();
        }
        let raws: Vec<u64> = registry.handles().into_iter().map(WindowHandle::as_raw).collect();
        assert_eq!(raws, vec![2, 5, 9]);
    }
}
