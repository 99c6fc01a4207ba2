//! Window handles and the per-window state record

use std::fmt;

/// Opaque identifier for a native window
///
/// Wraps whatever the platform hands out (an `HWND` on Win32, an XID on X11,
/// a counter on the headless backend). The core only compares and hashes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(u64);

impl WindowHandle {
    /// The invalid handle returned when creation fails
    pub const NULL: Self = Self(0);

    /// Wrap a raw platform value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw platform value
    pub const fn as_raw(self) -> u64 {
        self.0
    }

    /// Whether this is the invalid handle
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Lifecycle stage of a window, derived from its record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Registered but never polled
    Created,
    /// Polled at least once and no close signal observed
    Open,
    /// A close or destroy signal was observed; waiting for `destroy_window`
    Closing,
    /// Not registered (destroyed or never created)
    Gone,
}

/// State tracked for one live window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowData {
    handle: WindowHandle,
    should_close: bool,
    title: String,
    width: u32,
    height: u32,
    polls: u64,
}

impl WindowData {
    /// Create the record for a freshly created native window
    pub fn new(handle: WindowHandle, title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            handle,
            should_close: false,
            title: title.into(),
            width,
            height,
            polls: 0,
        }
    }

    /// The handle this record belongs to
    pub const fn handle(&self) -> WindowHandle {
        self.handle
    }

    /// Whether a close or destroy signal has been observed
    pub const fn should_close(&self) -> bool {
        self.should_close
    }

    /// Latch the close flag. There is no way to clear it.
    pub fn request_close(&mut self) {
        self.should_close = true;
    }

    /// Last title pushed to the native layer
    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Last known client-area width
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Last known client-area height
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Last known client-area size as `(width, height)`
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Number of completed polls
    pub const fn polls(&self) -> u64 {
        self.polls
    }

    pub(crate) fn record_poll(&mut self) {
        self.polls += 1;
    }

    /// Lifecycle stage of this window
    pub const fn state(&self) -> WindowState {
        if self.should_close {
            WindowState::Closing
        } else if self.polls == 0 {
            WindowState::Created
        } else {
            WindowState::Open
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle() {
        assert!(WindowHandle::NULL.is_null());
        assert!(!WindowHandle::from_raw(7).is_null());
        assert_eq!(WindowHandle::from_raw(7).as_raw(), 7);
    }

    #[test]
    fn test_handle_display_is_hex() {
        assert_eq!(WindowHandle::from_raw(255).to_string(), "0xff");
    }

    #[test]
    fn test_close_flag_is_latched() {
        let mut data = WindowData::new(WindowHandle::from_raw(1), "T", 800, 600);
        assert!(!data.should_close());
        data.request_close();
        data.request_close();
        assert!(data.should_close());
    }

    #[test]
    fn test_state_progression() {
        let mut data = WindowData::new(WindowHandle::from_raw(1), "T", 800, 600);
        assert_eq!(data.state(), WindowState::Created);
        data.record_poll();
        assert_eq!(data.state(), WindowState::Open);
        data.request_close();
        assert_eq!(data.state(), WindowState::Closing);
    }
}
