#[cfg(windows)]
pub mod user32;

use anyhow::Result;
use std::fmt;

/// Opaque handle of a top-level window, as handed out by the window manager.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process and thread that created a window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowOwner {
    pub process_id: u32,
    pub thread_id: u32,
}

/// The three window-manager queries the poller needs.
pub trait WindowSystem {
    /// Window with keyboard focus, or `None` when nothing is focused.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Title text of `hwnd`. A stale handle yields whatever the OS returns,
    /// usually an empty string.
    fn window_title(&self, hwnd: WindowHandle) -> String;

    fn window_owner(&self, hwnd: WindowHandle) -> Result<WindowOwner>;
}

impl<W: WindowSystem + ?Sized> WindowSystem for &W {
    fn foreground_window(&self) -> Option<WindowHandle> {
        (**self).foreground_window()
    }

    fn window_title(&self, hwnd: WindowHandle) -> String {
        (**self).window_title(hwnd)
    }

    fn window_owner(&self, hwnd: WindowHandle) -> Result<WindowOwner> {
        (**self).window_owner(hwnd)
    }
}
