use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod menu;
mod notifier;
mod outcome;
mod tray;

use config::Config;
use error::{NotifierError, STARTUP_FAILURE};
use notifier::Notifier;
use outcome::Outcome;

#[derive(Parser, Debug)]
#[command(name = "sboui-systray", version)]
#[command(about = "tray notifier for pending SlackBuilds.org updates")]
#[command(
    after_help = "exit status: 0 launch updater, 1 ignore for now, 2 don't remind me again,\n\
                  3 tray unavailable or bad arguments (also after --help/--version),\n\
                  4 tray failed, 130 interrupted"
)]
struct Cli {
    /// read settings from this file instead of the per-user config
    #[arg(long, value_name = "path")]
    config: Option<PathBuf>,

    /// icon theme name for the tray icon
    #[arg(long, value_name = "name")]
    icon_name: Option<String>,

    /// tooltip shown when hovering the icon
    #[arg(long, value_name = "text")]
    tooltip: Option<String>,

    /// log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(cli_exit_code(&e));
        }
    };

    init_logging(cli.verbose);
    info!("starting sboui-systray v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(outcome) => {
            info!(%outcome, code = outcome.exit_code(), "exiting");
            outcome.into()
        }
        Err(err) => {
            debug!(?err, "notifier failed");
            ExitCode::from(report(&err, &mut std::io::stderr()))
        }
    }
}

/// clap exits with 2 on usage errors and 0 for `--help`/`--version`, which
/// the caller would read as "quit" and "accept". Neither ran the notifier.
fn cli_exit_code(_err: &clap::Error) -> u8 {
    STARTUP_FAILURE
}

/// Writes the failure for the user and returns the exit status.
fn report(err: &NotifierError, out: &mut impl Write) -> u8 {
    let _ = writeln!(out, "sboui-systray: {}", err);
    err.exit_code()
}

async fn run(cli: Cli) -> Result<Outcome, NotifierError> {
    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.icon_name, cli.tooltip);
    config.validate()?;
    debug!(?config, "effective config");

    tray::run(&config, Notifier::new()).await
}

// stdout stays clean for the calling script
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sboui_systray=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sboui_systray=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["sboui-systray"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.icon_name.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn usage_errors_go_to_stderr() {
        let err = Cli::try_parse_from(["sboui-systray", "--bogus"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn help_and_version_do_not_exit_as_accept() {
        for flag in ["--help", "--version"] {
            let err = Cli::try_parse_from(["sboui-systray", flag]).unwrap_err();
            assert!(!err.use_stderr());
            assert_eq!(cli_exit_code(&err), STARTUP_FAILURE);
        }
        let err = Cli::try_parse_from(["sboui-systray", "--bogus"]).unwrap_err();
        assert_eq!(cli_exit_code(&err), STARTUP_FAILURE);
    }

    #[test]
    fn tray_failure_is_reported_with_startup_code() {
        let err = NotifierError::TrayUnavailable("no StatusNotifierWatcher".into());
        let mut out = Vec::new();

        let code = report(&err, &mut out);

        assert_eq!(code, STARTUP_FAILURE);
        assert!(![0, 1, 2].contains(&code));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "sboui-systray: system tray unavailable: no StatusNotifierWatcher\n"
        );
    }

    #[test]
    fn interrupt_is_reported_with_its_own_code() {
        let mut out = Vec::new();
        assert_eq!(report(&NotifierError::Interrupted, &mut out), 130);
        assert!(String::from_utf8(out).unwrap().contains("interrupted"));
    }

    #[tokio::test]
    async fn missing_config_is_a_startup_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "sboui-systray".into(),
            "--config".into(),
            dir.path().join("missing.toml").into_os_string(),
        ])
        .unwrap();

        let err = run(cli).await.unwrap_err();
        assert_eq!(err.exit_code(), STARTUP_FAILURE);
    }

    #[tokio::test]
    async fn blank_icon_override_is_a_startup_failure() {
        let cli = Cli::try_parse_from(["sboui-systray", "--icon-name", " "]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(matches!(err, NotifierError::Config(_)));
    }
}
