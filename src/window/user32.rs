use super::{WindowHandle, WindowOwner, WindowSystem};
use crate::utils::window::read_title_with;
use anyhow::{Result, anyhow};
use windows::Win32::Foundation::{GetLastError, HMODULE};
use windows::Win32::System::LibraryLoader::{FreeLibrary, GetProcAddress, LoadLibraryW};
use windows::core::{PCSTR, s, w};

type GetForegroundWindowFn = unsafe extern "system" fn() -> isize;
type GetWindowTextLengthWFn = unsafe extern "system" fn(hwnd: isize) -> i32;
type GetWindowTextWFn = unsafe extern "system" fn(hwnd: isize, text: *mut u16, max: i32) -> i32;
type GetWindowThreadProcessIdFn = unsafe extern "system" fn(hwnd: isize, pid: *mut u32) -> u32;

/// `user32.dll` with the window queries resolved once at startup.
///
/// The module stays loaded for as long as this value lives, which keeps the
/// resolved function pointers valid.
pub struct User32 {
    module: HMODULE,
    get_foreground_window: GetForegroundWindowFn,
    get_window_text_length: GetWindowTextLengthWFn,
    get_window_text: GetWindowTextWFn,
    get_window_thread_process_id: GetWindowThreadProcessIdFn,
}

impl User32 {
    pub fn load() -> Result<Self> {
        let module = unsafe { LoadLibraryW(w!("user32.dll")) }
            .map_err(|e| anyhow!("Failed to load user32.dll: {e}"))?;

        let resolved = unsafe {
            (|| -> Result<_> {
                Ok((
                    resolve::<GetForegroundWindowFn>(module, s!("GetForegroundWindow"))?,
                    resolve::<GetWindowTextLengthWFn>(module, s!("GetWindowTextLengthW"))?,
                    resolve::<GetWindowTextWFn>(module, s!("GetWindowTextW"))?,
                    resolve::<GetWindowThreadProcessIdFn>(module, s!("GetWindowThreadProcessId"))?,
                ))
            })()
        };

        match resolved {
            Ok((
                get_foreground_window,
                get_window_text_length,
                get_window_text,
                get_window_thread_process_id,
            )) => {
                log::debug!("Resolved window queries from user32.dll");
                Ok(Self {
                    module,
                    get_foreground_window,
                    get_window_text_length,
                    get_window_text,
                    get_window_thread_process_id,
                })
            }
            Err(e) => {
                let _ = unsafe { FreeLibrary(module) };
                Err(e)
            }
        }
    }
}

/// Looks up an export of `module` and reinterprets it as `F`.
///
/// # Safety
/// `F` must be a function pointer type matching the export's real signature.
unsafe fn resolve<F: Copy>(module: HMODULE, name: PCSTR) -> Result<F> {
    let proc = unsafe { GetProcAddress(module, name) }.ok_or_else(|| {
        let name = unsafe { name.to_string() }.unwrap_or_default();
        anyhow!("user32.dll does not export {name}")
    })?;
    Ok(unsafe { std::mem::transmute_copy::<_, F>(&proc) })
}

impl WindowSystem for User32 {
    fn foreground_window(&self) -> Option<WindowHandle> {
        let hwnd = WindowHandle(unsafe { (self.get_foreground_window)() });
        (!hwnd.is_null()).then_some(hwnd)
    }

    fn window_title(&self, hwnd: WindowHandle) -> String {
        read_title_with(
            || unsafe { (self.get_window_text_length)(hwnd.0) },
            |buf| unsafe {
                let max = i32::try_from(buf.len()).unwrap_or(i32::MAX);
                (self.get_window_text)(hwnd.0, buf.as_mut_ptr(), max)
            },
        )
    }

    fn window_owner(&self, hwnd: WindowHandle) -> Result<WindowOwner> {
        let mut process_id = 0u32;
        let thread_id = unsafe { (self.get_window_thread_process_id)(hwnd.0, &mut process_id) };
        if thread_id == 0 {
            let err = windows::core::Error::from(unsafe { GetLastError() }.to_hresult());
            return Err(anyhow!("{err}"));
        }
        Ok(WindowOwner {
            process_id,
            thread_id,
        })
    }
}

impl Drop for User32 {
    fn drop(&mut self) {
        if let Err(e) = unsafe { FreeLibrary(self.module) } {
            log::warn!("Failed to release user32.dll: {e}");
        }
    }
}
