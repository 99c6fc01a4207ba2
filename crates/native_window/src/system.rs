//! The window system context
//!
//! [`WindowSystem`] owns the registry and the platform backend together, so
//! every window's record and native resource are created and torn down in
//! one place.

use crate::backend::{self, HeadlessBackend, KeyState, PlatformBackend};
use crate::config::{BackendKind, WindowConfig, WindowSystemConfig};
use crate::dispatch::{self, NativeEvent};
use crate::registry::WindowRegistry;
use crate::{WindowData, WindowError, WindowHandle, WindowResult, WindowState};

/// Owner of all live windows and the backend that drives them
///
/// Holds a `Box<dyn PlatformBackend>` without a `Send` bound, so the system
/// stays on the thread that created it, which is the thread the native event
/// queue belongs to.
pub struct WindowSystem {
    backend: Box<dyn PlatformBackend>,
    registry: WindowRegistry,
    // Reused across polls to avoid a fresh allocation per frame
    scratch: Vec<NativeEvent>,
}

impl WindowSystem {
    /// Build a window system from configuration
    pub fn new(config: &WindowSystemConfig) -> Self {
        match config.backend {
            BackendKind::Native => Self::native(),
            BackendKind::Headless => Self::headless(),
        }
    }

    /// Window system on this platform's native backend
    pub fn native() -> Self {
        Self::with_backend(backend::native())
    }

    /// Window system on the in-memory backend
    pub fn headless() -> Self {
        Self::with_backend(Box::new(HeadlessBackend::new()))
    }

    /// Window system on a caller-supplied backend
    pub fn with_backend(backend: Box<dyn PlatformBackend>) -> Self {
        log::info!("Window system using {} backend", backend.name());
        Self {
            backend,
            registry: WindowRegistry::new(),
            scratch: Vec::new(),
        }
    }

    /// Name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Downcast the backend to its concrete type
    pub fn backend<T: PlatformBackend + 'static>(&self) -> Option<&T> {
        self.backend.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast the backend to its concrete type
    pub fn backend_mut<T: PlatformBackend + 'static>(&mut self) -> Option<&mut T> {
        self.backend.as_any_mut().downcast_mut::<T>()
    }

    /// Create a window, reporting why it failed
    ///
    /// The window starts hidden; call [`show_window`](Self::show_window) to map
    /// it. On success the returned handle is registered with a record holding
    /// the requested title and size, and stays registered until
    /// [`destroy_window`](Self::destroy_window).
    ///
    /// # Arguments
    /// * `title` - Initial window title
    /// * `width` - Client-area width in pixels, must be non-zero
    /// * `height` - Client-area height in pixels, must be non-zero
    ///
    /// # Errors
    /// * [`WindowError::InvalidDimensions`] if either dimension is zero. The
    ///   backend is not called.
    /// * [`WindowError::BackendUnavailable`] if the native window service
    ///   cannot be reached (no display, library missing).
    /// * [`WindowError::CreationFailed`] if the OS rejected the request or the
    ///   backend handed back a null handle.
    /// * [`WindowError::Unsupported`] on platforms without window creation.
    /// * [`WindowError::DuplicateHandle`] if the backend reused a handle that is
    ///   still registered. The newly created native window is released before
    ///   returning.
    pub fn try_create_window(&mut self, title: &str, width: u32, height: u32) -> WindowResult<WindowHandle> {
        if width == 0 || height == 0 {
            return Err(WindowError::InvalidDimensions { width, height });
        }

        let handle = self.backend.create(title, width, height)?;
        if handle.is_null() {
            return Err(WindowError::CreationFailed(format!(
                "{} backend returned a null handle",
                self.backend.name()
            )));
        }

        // The native window must not outlive a failed registration
        if let Err(e) = self.registry.insert(handle, WindowData::new(handle, title, width, height)) {
            self.backend.destroy(handle);
            return Err(e);
        }

        log::debug!("Created window {} \"{}\" ({}x{})", handle, title, width, height);
        Ok(handle)
    }

    /// Create a window, returning [`WindowHandle::NULL`] on failure
    ///
    /// The failure reason is logged at error level.
    pub fn create_window(&mut self, title: &str, width: u32, height: u32) -> WindowHandle {
        match self.try_create_window(title, width, height) {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("Failed to create window \"{}\": {}", title, e);
                WindowHandle::NULL
            }
        }
    }

    /// Create a window from its configuration
    pub fn create_window_from(&mut self, config: &WindowConfig) -> WindowHandle {
        self.create_window(&config.title, config.width, config.height)
    }

    /// Make a window visible
    pub fn show_window(&mut self, handle: WindowHandle) {
        if self.registry.contains(handle) {
            self.backend.show(handle);
        }
    }

    /// Drain native events for a window and report whether it should stay open
    ///
    /// Returns `false` without touching the backend when the handle is not
    /// registered. Never blocks.
    pub fn poll_events(&mut self, handle: WindowHandle) -> bool {
        let Some(data) = self.registry.get_mut(handle) else {
            return false;
        };

        self.scratch.clear();
        self.backend.drain_events(handle, &mut self.scratch);
        dispatch::apply_events(data, self.scratch.drain(..))
    }

    /// Change a window's title, natively and in the cached record
    pub fn set_title(&mut self, handle: WindowHandle, title: &str) {
        let Some(data) = self.registry.get_mut(handle) else {
            return;
        };
        data.set_title(title);
        self.backend.set_title(handle, title);
    }

    /// Remove a window's record and release the native window
    pub fn destroy_window(&mut self, handle: WindowHandle) {
        if self.registry.remove(handle).is_some() {
            self.backend.destroy(handle);
            log::debug!("Destroyed window {}", handle);
        }
    }

    /// Whether a key is held down; unsupported queries read as `false`
    pub fn is_key_pressed(&mut self, code: i32) -> bool {
        self.key_state(code).is_pressed()
    }

    /// Keyboard query that distinguishes "unsupported" from "released"
    pub fn key_state(&mut self, code: i32) -> KeyState {
        self.backend.key_state(code)
    }

    /// State record for a live window
    pub fn window(&self, handle: WindowHandle) -> Option<&WindowData> {
        self.registry.get(handle)
    }

    /// Lifecycle stage of a handle
    pub fn window_state(&self, handle: WindowHandle) -> WindowState {
        self.registry
            .get(handle)
            .map_or(WindowState::Gone, WindowData::state)
    }

    /// Whether the window is registered and has not seen a close signal
    pub fn is_open(&self, handle: WindowHandle) -> bool {
        self.registry.get(handle).is_some_and(|data| !data.should_close())
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    /// Handles of every live window
    pub fn handles(&self) -> Vec<WindowHandle> {
        self.registry.handles()
    }
}

impl Drop for WindowSystem {
    fn drop(&mut self) {
        for handle in self.registry.handles() {
            log::warn!("Window {} was never destroyed, releasing it now", handle);
            self.destroy_window(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> WindowSystem {
        WindowSystem::headless()
    }

    fn inject(system: &mut WindowSystem, handle: WindowHandle, event: NativeEvent) {
        system
            .backend_mut::<HeadlessBackend>()
            .expect("headless backend")
            .inject(handle, event);
    }

    #[test]
    fn test_create_registers_window() {
        let mut system = system();
        let handle = system.create_window("T", 800, 600);

        assert!(!handle.is_null());
        assert_eq!(system.window_count(), 1);
        let data = system.window(handle).unwrap();
        assert_eq!(data.handle(), handle);
        assert_eq!(data.title(), "T");
        assert_eq!(data.size(), (800, 600));
        assert_eq!(system.window_state(handle), WindowState::Created);
    }

    #[test]
    fn test_zero_size_returns_null() {
        let mut system = system();
        assert!(system.create_window("T", 0, 600).is_null());
        assert!(matches!(
            system.try_create_window("T", 800, 0),
            Err(WindowError::InvalidDimensions { width: 800, height: 0 })
        ));
        assert_eq!(system.window_count(), 0);
        assert_eq!(system.backend::<HeadlessBackend>().unwrap().live_windows(), 0);
    }

    #[test]
    fn test_unavailable_backend_returns_null() {
        let mut system = WindowSystem::with_backend(Box::new(HeadlessBackend::unavailable()));
        assert!(system.create_window("T", 800, 600).is_null());
        assert!(matches!(
            system.try_create_window("T", 800, 600),
            Err(WindowError::BackendUnavailable(_))
        ));
        assert_eq!(system.window_count(), 0);
    }

    #[test]
    fn test_show_marks_native_window_visible() {
        let mut system = system();
        let handle = system.create_window("T", 800, 600);
        system.show_window(handle);
        assert!(system.backend::<HeadlessBackend>().unwrap().is_visible(handle));
    }

    #[test]
    fn test_poll_unknown_handle_does_not_drain() {
        let mut system = system();
        let handle = system.create_window("T", 800, 600);
        inject(&mut system, handle, NativeEvent::Expose);

        assert!(!system.poll_events(WindowHandle::from_raw(999)));
        assert!(!system.poll_events(WindowHandle::NULL));
        assert_eq!(system.backend::<HeadlessBackend>().unwrap().pending_events(handle), 1);
    }

    #[test]
    fn test_resize_updates_size() {
        let mut system = system();
        let handle = system.create_window("T", 800, 600);
        inject(&mut system, handle, NativeEvent::Resized { width: 1280, height: 720 });

        assert!(system.poll_events(handle));
        assert_eq!(system.window(handle).unwrap().size(), (1280, 720));
        assert_eq!(system.window_state(handle), WindowState::Open);
    }

    #[test]
    fn test_set_title_updates_cache_and_native() {
        let mut system = system();
        let handle = system.create_window("T", 800, 600);
        system.set_title(handle, "Renamed");

        assert_eq!(system.window(handle).unwrap().title(), "Renamed");
        assert_eq!(
            system.backend::<HeadlessBackend>().unwrap().native_title(handle),
            Some("Renamed")
        );
    }

    #[test]
    fn test_unknown_handle_operations_are_noops() {
        let mut system = system();
        let live = system.create_window("T", 800, 600);
        let stale = WindowHandle::from_raw(77);

        system.show_window(stale);
        system.set_title(stale, "nope");
        system.destroy_window(stale);

        assert_eq!(system.window_count(), 1);
        assert_eq!(system.window(live).unwrap().title(), "T");
        assert_eq!(system.window_state(stale), WindowState::Gone);
    }

    #[test]
    fn test_key_queries() {
        let mut system = system();
        assert!(!system.is_key_pressed(27));
        system.backend_mut::<HeadlessBackend>().unwrap().set_key_pressed(27, true);
        assert!(system.is_key_pressed(27));
        assert_eq!(system.key_state(27), KeyState::Pressed);
    }

    #[test]
    fn test_stub_backend_key_query_is_false() {
        let mut system = WindowSystem::with_backend(Box::new(backend::StubBackend::new("cocoa")));
        assert_eq!(system.key_state(32), KeyState::Unsupported);
        assert!(!system.is_key_pressed(32));
        assert!(system.create_window("T", 800, 600).is_null());
    }

    #[test]
    fn test_config_selects_headless() {
        let config = WindowSystemConfig::new().with_backend(BackendKind::Headless);
        let mut system = WindowSystem::new(&config);
        assert_eq!(system.backend_name(), "headless");
        let handle = system.create_window_from(&config.window);
        assert_eq!(system.window(handle).unwrap().title(), config.window.title);
    }
}
