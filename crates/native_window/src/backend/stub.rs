//! Placeholder backend for platforms without a native implementation
//!
//! Used for Cocoa. Creation always fails, so no handle from this backend is
//! ever registered and every other call is a no-op.

use super::{KeyState, PlatformBackend};
use crate::{dispatch::NativeEvent, WindowError, WindowHandle, WindowResult};
use std::any::Any;

/// Backend that reports every capability as missing
#[derive(Debug, Clone)]
pub struct StubBackend {
    platform: &'static str,
}

impl StubBackend {
    /// Create a stub for the named platform
    pub const fn new(platform: &'static str) -> Self {
        Self { platform }
    }
}

impl PlatformBackend for StubBackend {
    fn name(&self) -> &'static str {
        self.platform
    }

    fn create(&mut self, _title: &str, _width: u32, _height: u32) -> WindowResult<WindowHandle> {
        log::warn!("{} window creation is not implemented", self.platform);
        Err(WindowError::Unsupported("window creation"))
    }

    fn show(&mut self, _handle: WindowHandle) {}

    fn drain_events(&mut self, _handle: WindowHandle, _events: &mut Vec<NativeEvent>) {}

    fn set_title(&mut self, _handle: WindowHandle, _title: &str) {}

    fn destroy(&mut self, _handle: WindowHandle) {}

    fn key_state(&mut self, _code: i32) -> KeyState {
        KeyState::Unsupported
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
