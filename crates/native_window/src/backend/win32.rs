//! Win32 backend
//!
//! Win32 delivers events by calling the window procedure from inside
//! `DispatchMessageW`, and some messages (`WM_SIZE` during `ShowWindow`,
//! `WM_DESTROY` during `DestroyWindow`) arrive outside any pump at all. The
//! procedure therefore only translates and queues; `drain_events` pumps the
//! window's posted messages and then hands over whatever was queued for it.

#![allow(unsafe_code)]

use super::{KeyState, PlatformBackend};
use crate::{dispatch::NativeEvent, WindowError, WindowHandle, WindowResult};
use std::any::Any;
use std::cell::RefCell;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::{iter, mem, ptr};
use winapi::shared::minwindef::{DWORD, FALSE, HINSTANCE, HIWORD, LOWORD, LPARAM, LRESULT, UINT, WPARAM};
use winapi::shared::windef::{HBRUSH, HWND, RECT};
use winapi::shared::winerror::ERROR_CLASS_ALREADY_EXISTS;
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::libloaderapi::GetModuleHandleW;
use winapi::um::winuser::{
    AdjustWindowRect, CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW,
    GetAsyncKeyState, IsWindow, LoadCursorW, LoadIconW, PeekMessageW, RegisterClassW,
    SetWindowTextW, ShowWindow, TranslateMessage, UpdateWindow, COLOR_WINDOW, CS_HREDRAW,
    CS_VREDRAW, CW_USEDEFAULT, IDC_ARROW, IDI_APPLICATION, MSG, PM_REMOVE, SW_SHOW, WM_CLOSE,
    WM_DESTROY, WM_PAINT, WM_SIZE, WNDCLASSW, WS_OVERLAPPEDWINDOW,
};

const CLASS_NAME: &str = "NativeWindowClass";

thread_local! {
    // Events produced by the window procedure, keyed by raw HWND
    static PENDING: RefCell<Vec<(usize, NativeEvent)>> = const { RefCell::new(Vec::new()) };
}

fn queue_event(hwnd: HWND, event: NativeEvent) {
    PENDING.with(|pending| pending.borrow_mut().push((hwnd as usize, event)));
}

fn take_events(hwnd: HWND, events: &mut Vec<NativeEvent>) {
    let owner = hwnd as usize;
    PENDING.with(|pending| {
        pending.borrow_mut().retain(|&(target, event)| {
            if target == owner {
                events.push(event);
                false
            } else {
                true
            }
        });
    });
}

fn discard_events(hwnd: HWND) {
    let owner = hwnd as usize;
    PENDING.with(|pending| pending.borrow_mut().retain(|&(target, _)| target != owner));
}

fn translate_message(msg: UINT, lparam: LPARAM) -> Option<NativeEvent> {
    match msg {
        WM_CLOSE => Some(NativeEvent::CloseRequested),
        WM_DESTROY => Some(NativeEvent::Destroyed),
        WM_SIZE => {
            // Client width in the low word, height in the high word
            let packed = lparam as DWORD;
            Some(NativeEvent::Resized {
                width: u32::from(LOWORD(packed)),
                height: u32::from(HIWORD(packed)),
            })
        }
        WM_PAINT => Some(NativeEvent::Expose),
        _ => None,
    }
}

unsafe extern "system" fn window_proc(hwnd: HWND, msg: UINT, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let Some(event) = translate_message(msg, lparam) else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };
    queue_event(hwnd, event);

    match msg {
        // Validation of the update region is left to DefWindowProc
        WM_PAINT => DefWindowProcW(hwnd, msg, wparam, lparam),
        // Returning 0 from WM_CLOSE keeps DefWindowProc from destroying the
        // window; the caller decides when to call destroy_window.
        _ => 0,
    }
}

fn to_wide(text: &str) -> Vec<u16> {
    OsStr::new(text).encode_wide().chain(iter::once(0)).collect()
}

fn to_hwnd(handle: WindowHandle) -> HWND {
    handle.as_raw() as usize as HWND
}

fn is_live(hwnd: HWND) -> bool {
    !hwnd.is_null() && unsafe { IsWindow(hwnd) } != 0
}

/// Native windows through user32
pub struct Win32Backend {
    instance: HINSTANCE,
    class_registered: bool,
}

impl Default for Win32Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl Win32Backend {
    /// Create the backend for the current module
    pub fn new() -> Self {
        Self {
            instance: unsafe { GetModuleHandleW(ptr::null()) },
            class_registered: false,
        }
    }

    fn register_class(&mut self) -> WindowResult<()> {
        if self.class_registered {
            return Ok(());
        }

        let class_name = to_wide(CLASS_NAME);
        let class = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(window_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: self.instance,
            hIcon: unsafe { LoadIconW(ptr::null_mut(), IDI_APPLICATION) },
            hCursor: unsafe { LoadCursorW(ptr::null_mut(), IDC_ARROW) },
            hbrBackground: (COLOR_WINDOW + 1) as usize as HBRUSH,
            lpszMenuName: ptr::null(),
            lpszClassName: class_name.as_ptr(),
        };

        if unsafe { RegisterClassW(&class) } == 0 {
            // Another backend in this process may have registered it already
            let code = unsafe { GetLastError() };
            if code != ERROR_CLASS_ALREADY_EXISTS {
                return Err(WindowError::CreationFailed(format!(
                    "RegisterClassW failed with error {code}"
                )));
            }
        }

        log::debug!("Registered window class {}", CLASS_NAME);
        self.class_registered = true;
        Ok(())
    }
}

impl PlatformBackend for Win32Backend {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn create(&mut self, title: &str, width: u32, height: u32) -> WindowResult<WindowHandle> {
        self.register_class()?;

        let invalid = || WindowError::InvalidDimensions { width, height };
        // Requested size is the client area; grow the outer rect for decorations
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: i32::try_from(width).map_err(|_| invalid())?,
            bottom: i32::try_from(height).map_err(|_| invalid())?,
        };
        unsafe { AdjustWindowRect(&mut rect, WS_OVERLAPPEDWINDOW, FALSE) };

        let class_name = to_wide(CLASS_NAME);
        let title = to_wide(title);
        let hwnd = unsafe {
            CreateWindowExW(
                0,
                class_name.as_ptr(),
                title.as_ptr(),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                rect.right - rect.left,
                rect.bottom - rect.top,
                ptr::null_mut(),
                ptr::null_mut(),
                self.instance,
                ptr::null_mut(),
            )
        };

        if hwnd.is_null() {
            let code = unsafe { GetLastError() };
            return Err(WindowError::CreationFailed(format!(
                "CreateWindowExW failed with error {code}"
            )));
        }

        Ok(WindowHandle::from_raw(hwnd as usize as u64))
    }

    fn show(&mut self, handle: WindowHandle) {
        let hwnd = to_hwnd(handle);
        if is_live(hwnd) {
            unsafe {
                ShowWindow(hwnd, SW_SHOW);
                UpdateWindow(hwnd);
            }
        }
    }

    fn drain_events(&mut self, handle: WindowHandle, events: &mut Vec<NativeEvent>) {
        let hwnd = to_hwnd(handle);
        if is_live(hwnd) {
            let mut msg: MSG = unsafe { mem::zeroed() };
            while unsafe { PeekMessageW(&mut msg, hwnd, 0, 0, PM_REMOVE) } != 0 {
                unsafe {
                    TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
        }
        // A window destroyed elsewhere still has its WM_DESTROY queued here
        take_events(hwnd, events);
    }

    fn set_title(&mut self, handle: WindowHandle, title: &str) {
        let hwnd = to_hwnd(handle);
        if is_live(hwnd) {
            let title = to_wide(title);
            unsafe { SetWindowTextW(hwnd, title.as_ptr()) };
        }
    }

    fn destroy(&mut self, handle: WindowHandle) {
        let hwnd = to_hwnd(handle);
        if is_live(hwnd) {
            unsafe { DestroyWindow(hwnd) };
        }
        discard_events(hwnd);
    }

    fn key_state(&mut self, code: i32) -> KeyState {
        let state = unsafe { GetAsyncKeyState(code) };
        if state as u16 & 0x8000 != 0 {
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
    fn test_wide_string_is_nul_terminated() {
        assert_eq!(to_wide("ab"), vec![u16::from(b'a'), u16::from(b'b'), 0]);
    }

    #[test]
    fn test_size_message_unpacks_client_area() {
        let lparam = (600 << 16) | 800;
        assert_eq!(
            translate_message(WM_SIZE, lparam),
            Some(NativeEvent::Resized { width: 800, height: 600 })
        );
        assert_eq!(
            translate_message(WM_SIZE, 0xFFFF_FFFF_u32 as LPARAM),
            Some(NativeEvent::Resized { width: 65535, height: 65535 })
        );
    }

    #[test]
    fn test_lifecycle_messages() {
        assert_eq!(translate_message(WM_CLOSE, 0), Some(NativeEvent::CloseRequested));
        assert_eq!(translate_message(WM_DESTROY, 0), Some(NativeEvent::Destroyed));
        assert_eq!(translate_message(WM_PAINT, 0), Some(NativeEvent::Expose));
    }

    #[test]
    fn test_unhandled_messages_fall_through() {
        // WM_MOUSEMOVE
        assert_eq!(translate_message(0x0200, 0), None);
    }

    #[test]
    fn test_pending_queue_is_per_window() {
        let a = 0x10 as HWND;
        let b = 0x20 as HWND;
        queue_event(a, NativeEvent::Expose);
        queue_event(b, NativeEvent::CloseRequested);
        queue_event(a, NativeEvent::Resized { width: 4, height: 3 });

        let mut events = Vec::new();
        take_events(a, &mut events);
        assert_eq!(
            events,
            vec![NativeEvent::Expose, NativeEvent::Resized { width: 4, height: 3 }]
        );

        discard_events(b);
        events.clear();
        take_events(b, &mut events);
        assert!(events.is_empty());
    }
}
