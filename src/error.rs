use thiserror::Error;

/// Exit status when the tray could not be brought up.
pub const STARTUP_FAILURE: u8 = 3;
/// Exit status when the backend fails after startup.
pub const EVENT_LOOP_FAILURE: u8 = 4;
/// Exit status after SIGINT/SIGTERM, following the shell's 128 + SIGINT.
pub const INTERRUPTED: u8 = 130;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("system tray unavailable: {0}")]
    TrayUnavailable(String),

    #[error("invalid configuration: {0:#}")]
    Config(#[from] anyhow::Error),

    #[error("tray event loop failed: {0}")]
    EventLoop(String),

    #[error("interrupted before a choice was made")]
    Interrupted,
}

impl NotifierError {
    /// Exit status for this failure. Never collides with an outcome code.
    pub fn exit_code(&self) -> u8 {
        match self {
            NotifierError::TrayUnavailable(_) | NotifierError::Config(_) => STARTUP_FAILURE,
            NotifierError::EventLoop(_) => EVENT_LOOP_FAILURE,
            NotifierError::Interrupted => INTERRUPTED,
        }
    }
}
