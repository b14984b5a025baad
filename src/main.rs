mod config;
mod poller;
mod utils;
mod window;

use anyhow::Result;
use poller::ForegroundPoller;
use simple_logger::SimpleLogger;
use tokio::sync::watch;
use window::WindowSystem;

#[tokio::main]
async fn main() -> Result<()> {
    // The logger passes everything; verbosity is governed by the global max level.
    SimpleLogger::new()
        .with_level(log::LevelFilter::Trace)
        .init()?;
    log::set_max_level(log::LevelFilter::Info);
    let cfg = config::load_user_config()?;
    log::set_max_level(cfg.log_level.into());
    log::debug!("Log level set to {}", cfg.log_level);

    #[cfg(windows)]
    let result = watch_foreground(&cfg, window::user32::User32::load()?).await;
    #[cfg(not(windows))]
    let result = Err(anyhow::anyhow!(
        "Foreground window polling needs the Win32 window manager"
    ));
    result
}

#[cfg_attr(not(windows), allow(dead_code))]
async fn watch_foreground<W: WindowSystem>(cfg: &config::Config, windows: W) -> Result<()> {
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // keep the sender alive so polling continues until the process is killed
            log::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        log::info!("Shutting down...");
        let _ = stop_tx.send(true);
    });

    log::info!("Application started. Press Ctrl+C to exit.");
    let mut poller = ForegroundPoller::new(windows, std::io::stdout(), cfg.poll_interval());
    poller.run(stop_rx).await;
    Ok(())
}
