//! Host tray adapters.
//!
//! Linux talks StatusNotifierItem over D-Bus, so the icon is resolved from
//! the user's icon theme by name and no GTK main loop is needed. Other
//! platforms use `tray-icon` driven by a `winit` event loop on the main thread.

#[cfg(not(target_os = "linux"))]
mod desktop;
#[cfg(target_os = "linux")]
mod linux;

use tracing::warn;

use crate::config::Config;
use crate::error::NotifierError;
use crate::notifier::Notifier;
use crate::outcome::Outcome;

/// Shows the tray icon and blocks until the user decides.
pub async fn run(config: &Config, notifier: Notifier) -> Result<Outcome, NotifierError> {
    #[cfg(target_os = "linux")]
    {
        linux::run(config, notifier).await
    }

    #[cfg(not(target_os = "linux"))]
    {
        desktop::run(config, notifier)
    }
}

/// Routes SIGINT/SIGTERM into the backend's event stream.
fn watch_interrupts<F>(on_interrupt: F)
where
    F: FnMut() + Send + 'static,
{
    if let Err(e) = ctrlc::set_handler(on_interrupt) {
        warn!("failed to install signal handler: {}", e);
    }
}
