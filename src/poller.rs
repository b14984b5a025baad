use crate::window::{WindowHandle, WindowOwner, WindowSystem};
use anyhow::Result;
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tokio::sync::watch;

/// One observation of the focused window.
#[derive(Debug)]
pub struct Sample {
    pub hwnd: WindowHandle,
    pub title: String,
    pub owner: Result<WindowOwner>,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window :{}# hwnd:{}", self.title, self.hwnd)?;
        match &self.owner {
            Ok(owner) => write!(
                f,
                " ProcessId :  {}  ThreadId :  {}",
                owner.process_id, owner.thread_id
            ),
            Err(e) => write!(f, " Failed to find proc :  {e}"),
        }
    }
}

/// Samples the foreground window on a fixed interval and writes one report
/// line per sample to `out`.
pub struct ForegroundPoller<W, O> {
    windows: W,
    out: O,
    interval: Duration,
}

impl<W: WindowSystem, O: Write> ForegroundPoller<W, O> {
    pub fn new(windows: W, out: O, interval: Duration) -> Self {
        Self {
            windows,
            out,
            interval,
        }
    }

    /// Queries the focused window, its title and its owner. Returns `None`
    /// without touching the title or owner queries when nothing has focus.
    pub fn sample(&self) -> Option<Sample> {
        let hwnd = self.windows.foreground_window()?;
        let title = self.windows.window_title(hwnd);
        let owner = self.windows.window_owner(hwnd);
        Some(Sample { hwnd, title, owner })
    }

    /// Runs one sampling step and reports the result.
    pub fn tick(&mut self) {
        let Some(sample) = self.sample() else {
            log::trace!("No foreground window");
            return;
        };
        match &sample.owner {
            Ok(owner) => log::debug!("hwnd {} owned by pid {}", sample.hwnd, owner.process_id),
            Err(e) => log::debug!("hwnd {} owner lookup failed: {e}", sample.hwnd),
        }
        if let Err(e) = writeln!(self.out, "{sample}").and_then(|_| self.out.flush()) {
            log::warn!("Failed to write report line: {e}");
        }
    }

    /// Samples immediately, then once per interval, until `stop` flips to
    /// `true` or its sender goes away.
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>) {
        log::info!("Polling foreground window every {:?}", self.interval);
        while !*stop.borrow_and_update() {
            self.tick();
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        log::info!("Poller stopped");
    }

    #[cfg(test)]
    pub fn into_output(self) -> O {
        self.out
    }
}
