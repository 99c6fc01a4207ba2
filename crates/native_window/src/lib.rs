//! # Native Window
//!
//! A minimal cross-platform window layer. Windows are created through a
//! [`WindowSystem`], which owns the registry of live windows and the platform
//! backend that talks to the OS.
//!
//! ## Features
//!
//! - **Uniform polling**: Win32 messages and X11 events are drained into the
//!   same [`WindowData`] record through one `poll_events` call
//! - **Explicit ownership**: the registry lives in the context object, not in a global
//! - **Headless backend**: scripted windows for tests and display-less machines
//! - **Sentinel errors**: public calls never panic, failures surface as
//!   [`WindowHandle::NULL`] or `false` plus a log record
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use native_window::prelude::*;
//!
//! native_window::logging::init("info");
//!
//! let mut system = WindowSystem::native();
//! let window = system.create_window("Hello", 800, 600);
//! system.show_window(window);
//!
//! while system.poll_events(window) {
//!     if system.is_key_pressed(KeyCode::Escape.code()) {
//!         break;
//!     }
//!     native_window::time::sleep(16);
//! }
//!
//! system.destroy_window(window);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod input;
pub mod logging;
pub mod registry;
pub mod time;

mod error;
mod handle;
mod system;

#[cfg(test)]
mod tests;

pub use error::{WindowError, WindowResult};
pub use handle::{WindowData, WindowHandle, WindowState};
pub use system::WindowSystem;

/// Common imports for window users
pub mod prelude {
    pub use crate::{
        backend::{HeadlessBackend, KeyState, PlatformBackend},
        config::{BackendKind, Config, WindowConfig, WindowSystemConfig},
        dispatch::NativeEvent,
        input::KeyCode,
        WindowData, WindowError, WindowHandle, WindowResult, WindowState, WindowSystem,
    };
}
