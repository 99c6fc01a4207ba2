//! Event dispatch
//!
//! Every backend translates its own event model (Win32 window procedure
//! callbacks, the X11 event queue, scripted headless events) into
//! [`NativeEvent`]s. This module applies them to a [`WindowData`] record the
//! same way regardless of where they came from.

use crate::WindowData;

/// A native event after platform translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeEvent {
    /// Close button pressed or the window manager asked to delete the window
    CloseRequested,
    /// Client area changed size
    Resized {
        /// New client-area width
        width: u32,
        /// New client-area height
        height: u32,
    },
    /// Part of the window needs repainting
    Expose,
    /// The native window was torn down by someone else
    Destroyed,
    /// Anything the dispatcher does not model
    Other,
}

/// Apply one event to a window record
pub fn apply_event(data: &mut WindowData, event: NativeEvent) {
    match event {
        NativeEvent::CloseRequested | NativeEvent::Destroyed => {
            if !data.should_close() {
                log::debug!("Window {} received {:?}, marking for close", data.handle(), event);
            }
            data.request_close();
        }
        NativeEvent::Resized { width, height } => {
            data.set_size(width, height);
        }
        // Painting belongs to the renderer
        NativeEvent::Expose | NativeEvent::Other => {}
    }
}

/// Apply a drained batch in order and report whether the window stays open
pub fn apply_events<I>(data: &mut WindowData, events: I) -> bool
where
    I: IntoIterator<Item = NativeEvent>,
{
    for event in events {
        apply_event(data, event);
    }
    data.record_poll();
    !data.should_close()
}
