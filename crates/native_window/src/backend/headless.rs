//! In-memory backend
//!
//! Windows exist only as entries in a map. Tests and display-less runs use it
//! to script native events, key presses and backend outages.

use super::{KeyState, PlatformBackend};
use crate::{dispatch::NativeEvent, WindowError, WindowHandle, WindowResult};
use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Default)]
struct HeadlessWindow {
    title: String,
    visible: bool,
    pending: VecDeque<NativeEvent>,
}

/// Backend with no OS windows behind it
#[derive(Debug)]
pub struct HeadlessBackend {
    next_id: u64,
    windows: HashMap<WindowHandle, HeadlessWindow>,
    pressed: HashSet<i32>,
    available: bool,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// Create a backend that accepts window creation
    pub fn new() -> Self {
        Self {
            next_id: 1,
            windows: HashMap::new(),
            pressed: HashSet::new(),
            available: true,
        }
    }

    /// Create a backend that behaves like an unreachable display server
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Queue a native event for a window. Ignored for unknown handles.
    pub fn inject(&mut self, handle: WindowHandle, event: NativeEvent) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.pending.push_back(event);
        }
    }

    /// Hold or release a key by virtual-key code
    pub fn set_key_pressed(&mut self, code: i32, pressed: bool) {
        if pressed {
            self.pressed.insert(code);
        } else {
            self.pressed.remove(&code);
        }
    }

    /// Whether `show` was called for a live window
    pub fn is_visible(&self, handle: WindowHandle) -> bool {
        self.windows.get(&handle).is_some_and(|window| window.visible)
    }

    /// Title as the "native" side last saw it
    pub fn native_title(&self, handle: WindowHandle) -> Option<&str> {
        self.windows.get(&handle).map(|window| window.title.as_str())
    }

    /// Number of native windows not yet destroyed
    pub fn live_windows(&self) -> usize {
        self.windows.len()
    }

    /// Number of undrained events for a window
    pub fn pending_events(&self, handle: WindowHandle) -> usize {
        self.windows.get(&handle).map_or(0, |window| window.pending.len())
    }
}

impl PlatformBackend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn create(&mut self, title: &str, _width: u32, _height: u32) -> WindowResult<WindowHandle> {
        if !self.available {
            return Err(WindowError::BackendUnavailable(
                "headless backend configured as unavailable".to_string(),
            ));
        }

        let handle = WindowHandle::from_raw(self.next_id);
        self.next_id += 1;
        self.windows.insert(
            handle,
            HeadlessWindow {
                title: title.to_string(),
                ..HeadlessWindow::default()
            },
        );
        Ok(handle)
    }

    fn show(&mut self, handle: WindowHandle) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.visible = true;
        }
    }

    fn drain_events(&mut self, handle: WindowHandle, events: &mut Vec<NativeEvent>) {
        if let Some(window) = self.windows.get_mut(&handle) {
            events.extend(window.pending.drain(..));
        }
    }

    fn set_title(&mut self, handle: WindowHandle, title: &str) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.title = title.to_string();
        }
    }

    fn destroy(&mut self, handle: WindowHandle) {
        self.windows.remove(&handle);
    }

    fn key_state(&mut self, code: i32) -> KeyState {
        if self.pressed.contains(&code) {
            KeyState::Pressed
        } else {
            KeyState::Released
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique_and_non_null() {
        let mut backend = HeadlessBackend::new();
        let a = backend.create("a", 1, 1).unwrap();
        let b = backend.create("b", 1, 1).unwrap();
        assert_ne!(a, b);
        assert!(!a.is_null());
        assert_eq!(backend.live_windows(), 2);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut backend = HeadlessBackend::new();
        let handle = backend.create("a", 1, 1).unwrap();
        backend.inject(handle, NativeEvent::Expose);
        backend.inject(handle, NativeEvent::CloseRequested);

        let mut events = Vec::new();
        backend.drain_events(handle, &mut events);
        assert_eq!(events, vec![NativeEvent::Expose, NativeEvent::CloseRequested]);
        assert_eq!(backend.pending_events(handle), 0);
    }

    #[test]
    fn test_inject_unknown_handle_ignored() {
        let mut backend = HeadlessBackend::new();
        backend.inject(WindowHandle::from_raw(99), NativeEvent::CloseRequested);
        assert_eq!(backend.pending_events(WindowHandle::from_raw(99)), 0);
    }

    #[test]
    fn test_unavailable_backend_refuses_creation() {
        let mut backend = HeadlessBackend::unavailable();
        assert!(matches!(
            backend.create("a", 1, 1),
            Err(WindowError::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_key_state() {
        let mut backend = HeadlessBackend::new();
        assert_eq!(backend.key_state(32), KeyState::Released);
        backend.set_key_pressed(32, true);
        assert_eq!(backend.key_state(32), KeyState::Pressed);
        backend.set_key_pressed(32, false);
        assert_eq!(backend.key_state(32), KeyState::Released);
    }
}
