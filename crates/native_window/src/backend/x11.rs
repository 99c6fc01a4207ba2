//! X11 backend
//!
//! libX11 is loaded at runtime, so a machine without it still builds and runs
//! the headless backend. The display connection is opened on first use and
//! shared by every window; it closes when the backend is dropped.

#![allow(unsafe_code)]

use super::{KeyState, PlatformBackend};
use crate::{dispatch::NativeEvent, input::KeyCode, WindowError, WindowHandle, WindowResult};
use std::any::Any;
use std::collections::HashSet;
use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_long, c_uint};
use std::{mem, ptr};
use x11_dl::{keysym, xlib};

const EVENT_MASK: c_long = xlib::ExposureMask
    | xlib::KeyPressMask
    | xlib::KeyReleaseMask
    | xlib::ButtonPressMask
    | xlib::StructureNotifyMask;

// The default Xlib handler exits the process on any protocol error
unsafe extern "C" fn log_x_error(_display: *mut xlib::Display, event: *mut xlib::XErrorEvent) -> c_int {
    if let Some(event) = event.as_ref() {
        log::warn!(
            "X11 error {} for request {} on resource {:#x}",
            event.error_code,
            event.request_code,
            event.resourceid
        );
    }
    0
}

fn keysym_for(key: KeyCode) -> c_uint {
    match key {
        KeyCode::Enter => keysym::XK_Return,
        KeyCode::Escape => keysym::XK_Escape,
        KeyCode::Space => keysym::XK_space,
        KeyCode::Left => keysym::XK_Left,
        KeyCode::Up => keysym::XK_Up,
        KeyCode::Right => keysym::XK_Right,
        KeyCode::Down => keysym::XK_Down,
    }
}

fn c_string(text: &str) -> CString {
    CString::new(text.replace('\0', "")).unwrap_or_default()
}

/// Translate one Xlib event for a window whose delete atom is `wm_delete_window`
fn translate(event: xlib::XEvent, wm_delete_window: xlib::Atom) -> NativeEvent {
    match event.get_type() {
        xlib::ConfigureNotify => {
            let configure = xlib::XConfigureEvent::from(event);
            NativeEvent::Resized {
                width: u32::try_from(configure.width).unwrap_or(0),
                height: u32::try_from(configure.height).unwrap_or(0),
            }
        }
        xlib::Expose => NativeEvent::Expose,
        xlib::DestroyNotify => NativeEvent::Destroyed,
        xlib::ClientMessage => {
            let message = xlib::XClientMessageEvent::from(event);
            if message.data.get_long(0) as xlib::Atom == wm_delete_window {
                NativeEvent::CloseRequested
            } else {
                NativeEvent::Other
            }
        }
        _ => NativeEvent::Other,
    }
}

struct Connection {
    xlib: xlib::Xlib,
    display: *mut xlib::Display,
    screen: c_int,
    wm_delete_window: xlib::Atom,
}

impl Connection {
    fn open() -> WindowResult<Self> {
        let xlib = xlib::Xlib::open()
            .map_err(|e| WindowError::BackendUnavailable(format!("cannot load libX11: {e}")))?;

        let display = unsafe { (xlib.XOpenDisplay)(ptr::null()) };
        if display.is_null() {
            return Err(WindowError::BackendUnavailable("cannot open X display".to_string()));
        }

        let atom_name = c_string("WM_DELETE_WINDOW");
        let (screen, wm_delete_window) = unsafe {
            (xlib.XSetErrorHandler)(Some(log_x_error));
            (
                (xlib.XDefaultScreen)(display),
                (xlib.XInternAtom)(display, atom_name.as_ptr(), xlib::False),
            )
        };

        log::info!("Opened X display connection (screen {})", screen);
        Ok(Self {
            xlib,
            display,
            screen,
            wm_delete_window,
        })
    }

    /// Pop every queued event for `window` and hand it to `sink`
    ///
    /// Client messages cannot be selected by mask, so they get a second pass
    /// after the masked events.
    fn take_queued(&self, window: xlib::Window, mut sink: impl FnMut(xlib::XEvent)) {
        let mut event: xlib::XEvent = unsafe { mem::zeroed() };
        while unsafe { (self.xlib.XCheckWindowEvent)(self.display, window, EVENT_MASK, &mut event) } != 0 {
            sink(event);
        }
        while unsafe {
            (self.xlib.XCheckTypedWindowEvent)(self.display, window, xlib::ClientMessage, &mut event)
        } != 0
        {
            sink(event);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        unsafe { (self.xlib.XCloseDisplay)(self.display) };
        log::debug!("Closed X display connection");
    }
}

/// Native windows through Xlib
#[derive(Default)]
pub struct X11Backend {
    connection: Option<Connection>,
    windows: HashSet<xlib::Window>,
}

impl X11Backend {
    /// Create the backend. No connection is made until the first window.
    ///
    /// Key queries before that point report [`KeyState::Unsupported`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the display connection has been opened
    pub const fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&mut self) -> WindowResult<&mut Connection> {
        let connection = match self.connection.take() {
            Some(connection) => connection,
            None => Connection::open()?,
        };
        Ok(self.connection.insert(connection))
    }

    // Only windows this backend created are ever handed to Xlib
    fn live(&self, handle: WindowHandle) -> Option<(&Connection, xlib::Window)> {
        let window = handle.as_raw() as xlib::Window;
        let connection = self.connection.as_ref()?;
        self.windows.contains(&window).then_some((connection, window))
    }
}

impl PlatformBackend for X11Backend {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn create(&mut self, title: &str, width: u32, height: u32) -> WindowResult<WindowHandle> {
        let window = {
            let conn = self.connection()?;
            let (xlib, display, screen) = (&conn.xlib, conn.display, conn.screen);
            let title = c_string(title);
            let mut protocols = [conn.wm_delete_window];

            unsafe {
                let root = (xlib.XRootWindow)(display, screen);
                let window = (xlib.XCreateSimpleWindow)(
                    display,
                    root,
                    0,
                    0,
                    width,
                    height,
                    1,
                    (xlib.XBlackPixel)(display, screen),
                    (xlib.XWhitePixel)(display, screen),
                );
                if window == 0 {
                    return Err(WindowError::CreationFailed(
                        "XCreateSimpleWindow returned no window".to_string(),
                    ));
                }

                (xlib.XStoreName)(display, window, title.as_ptr());
                (xlib.XSelectInput)(display, window, EVENT_MASK);
                (xlib.XSetWMProtocols)(display, window, protocols.as_mut_ptr(), 1);
                window
            }
        };

        self.windows.insert(window);
        Ok(WindowHandle::from_raw(u64::from(window)))
    }

    fn show(&mut self, handle: WindowHandle) {
        if let Some((conn, window)) = self.live(handle) {
            unsafe {
                (conn.xlib.XMapWindow)(conn.display, window);
                (conn.xlib.XFlush)(conn.display);
            }
        }
    }

    fn drain_events(&mut self, handle: WindowHandle, events: &mut Vec<NativeEvent>) {
        let Some((conn, window)) = self.live(handle) else {
            return;
        };

        let wm_delete_window = conn.wm_delete_window;
        conn.take_queued(window, |event| events.push(translate(event, wm_delete_window)));
    }

    fn set_title(&mut self, handle: WindowHandle, title: &str) {
        if let Some((conn, window)) = self.live(handle) {
            let title = c_string(title);
            unsafe {
                (conn.xlib.XStoreName)(conn.display, window, title.as_ptr());
                (conn.xlib.XFlush)(conn.display);
            }
        }
    }

    fn destroy(&mut self, handle: WindowHandle) {
        if let Some((conn, window)) = self.live(handle) {
            unsafe {
                (conn.xlib.XDestroyWindow)(conn.display, window);
                // Round-trip so the Unmap/DestroyNotify for this window are queued
                (conn.xlib.XSync)(conn.display, xlib::False);
            }
            // Nothing drains a destroyed window again; drop what it left behind
            let mut discarded = 0_usize;
            conn.take_queued(window, |_| discarded += 1);
            log::trace!("Discarded {} queued events for window {:#x}", discarded, window);
            self.windows.remove(&window);
        }
    }

    fn key_state(&mut self, code: i32) -> KeyState {
        let Some(key) = KeyCode::from_code(code) else {
            return KeyState::Unsupported;
        };
        // Connecting can block on a remote display; only windows open one
        let Some(conn) = self.connection.as_ref() else {
            return KeyState::Unsupported;
        };

        let keycode = unsafe { (conn.xlib.XKeysymToKeycode)(conn.display, xlib::KeySym::from(keysym_for(key))) };
        if keycode == 0 {
            return KeyState::Unsupported;
        }

        let mut keys: [c_char; 32] = [0; 32];
        unsafe { (conn.xlib.XQueryKeymap)(conn.display, keys.as_mut_ptr()) };
        let bits = keys[usize::from(keycode / 8)] as u8;
        if bits & (1 << (keycode % 8)) != 0 {
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
