//! Platform backends
//!
//! [`PlatformBackend`] is the contract each native window layer implements.
//! The registry and the close/resize state machine live in
//! [`WindowSystem`](crate::WindowSystem) and are shared by every backend.
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application Code            │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │  WindowSystem   │ ← registry + dispatch
//!      └────────┬────────┘
//!               │ Box<dyn PlatformBackend>
//!   ┌───────────▼───────────┐
//!   │ win32::Win32Backend   │ ← cfg(windows)
//!   │ x11::X11Backend       │ ← cfg(unix, not macOS)
//!   │ stub::StubBackend     │ ← macOS and everything else
//!   │ HeadlessBackend       │ ← runtime choice, tests
//!   └───────────────────────┘
//! ```

mod headless;
mod stub;

#[cfg(windows)]
pub mod win32;

#[cfg(all(unix, not(target_os = "macos")))]
pub mod x11;

pub use headless::HeadlessBackend;
pub use stub::StubBackend;

use crate::{dispatch::NativeEvent, WindowHandle, WindowResult};
use std::any::Any;

/// Answer to a keyboard query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// The key is currently held down
    Pressed,
    /// The key is currently up
    Released,
    /// The backend cannot answer for this key
    Unsupported,
}

impl KeyState {
    /// Collapse to a plain bool; unsupported reads as not pressed
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// Native window layer for one platform
///
/// Handles passed in may be stale. Implementations treat unknown handles as
/// a no-op and never panic on them.
///
/// # Thread Safety
/// Not `Send`. Native window APIs must be driven from the thread that created
/// the windows.
pub trait PlatformBackend {
    /// Short backend name for diagnostics
    fn name(&self) -> &'static str;

    /// Create a hidden native window with the given client-area size
    ///
    /// The window is not shown until [`show`](Self::show) is called. The
    /// returned handle must be unique among this backend's live windows.
    ///
    /// # Arguments
    /// * `title` - Initial title; interior NUL characters are dropped
    /// * `width` - Client-area width in pixels, already checked non-zero
    /// * `height` - Client-area height in pixels, already checked non-zero
    ///
    /// # Errors
    /// * [`WindowError::BackendUnavailable`](crate::WindowError::BackendUnavailable)
    ///   if the window service cannot be reached
    /// * [`WindowError::CreationFailed`](crate::WindowError::CreationFailed)
    ///   if the OS rejects the request
    /// * [`WindowError::Unsupported`](crate::WindowError::Unsupported) on
    ///   platforms without a native layer
    fn create(&mut self, title: &str, width: u32, height: u32) -> WindowResult<WindowHandle>;

    /// Make a window visible
    fn show(&mut self, handle: WindowHandle);

    /// Move every queued event for `handle` into `events` without blocking
    ///
    /// Events are appended in the order the platform delivered them. Events
    /// for other windows stay queued for their own drain.
    ///
    /// # Arguments
    /// * `handle` - Window to drain; unknown handles append nothing
    /// * `events` - Output buffer, appended to and never cleared
    fn drain_events(&mut self, handle: WindowHandle, events: &mut Vec<NativeEvent>);

    /// Push a new title to the native window
    fn set_title(&mut self, handle: WindowHandle, title: &str);

    /// Release the native window
    ///
    /// Anything still queued for the window is discarded, so a later window
    /// that reuses the handle starts with an empty queue.
    fn destroy(&mut self, handle: WindowHandle);

    /// Query global keyboard state for a virtual-key code
    ///
    /// Must not block or open new connections to the window service.
    ///
    /// # Arguments
    /// * `code` - Win32 virtual-key number, see [`KeyCode`](crate::input::KeyCode)
    ///
    /// # Returns
    /// [`KeyState::Unsupported`] when the platform cannot answer for this key
    /// at the moment, rather than guessing [`KeyState::Released`].
    fn key_state(&mut self, code: i32) -> KeyState;

    /// Access to the concrete type for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable access to the concrete type for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The native backend for the platform this crate was built for
#[cfg(windows)]
pub fn native() -> Box<dyn PlatformBackend> {
    Box::new(win32::Win32Backend::new())
}

/// The native backend for the platform this crate was built for
#[cfg(all(unix, not(target_os = "macos")))]
pub fn native() -> Box<dyn PlatformBackend> {
    Box::new(x11::X11Backend::new())
}

/// The native backend for the platform this crate was built for
#[cfg(target_os = "macos")]
pub fn native() -> Box<dyn PlatformBackend> {
    Box::new(StubBackend::new("cocoa"))
}

/// The native backend for the platform this crate was built for
#[cfg(not(any(windows, unix)))]
pub fn native() -> Box<dyn PlatformBackend> {
    Box::new(StubBackend::new(std::env::consts::OS))
}
