#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use net64_settings::config::JsonFileStore;
use net64_settings::devices::{self, displayable, EvdevDevices, InputDevices};
use net64_settings::gui::run_gui;
use net64_settings::ipc;

#[derive(Parser, Debug)]
#[command(name = "net64-settings", version, about = "Edit Net64 player settings")]
struct Cli {
    /// Settings file to read and write
    #[arg(long, global = true, value_name = "PATH")]
    save_file: Option<PathBuf>,

    /// Unix socket of the running session
    #[arg(long, global = true, value_name = "PATH")]
    session_socket: Option<PathBuf>,

    /// trace, debug, info, warn or error (overrides LOG_LEVEL)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Open the settings editor window (default)
    Edit,
    /// Print the persisted settings as JSON
    Show,
    /// List connected gamepads
    Devices,
}

fn parse_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn init_logging(cli_level: Option<&str>) -> Result<()> {
    let level = match cli_level {
        Some(level) => parse_level(level),
        None => parse_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())),
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")?;
    Ok(())
}

fn show(store: &JsonFileStore) -> Result<()> {
    let data = store.load()?;
    let json = serde_json::to_string_pretty(&data).context("Failed to serialize settings")?;
    println!("{json}");
    Ok(())
}

fn list_devices() -> Result<()> {
    if !devices::check_permissions() {
        devices::print_permission_error();
    }

    let snapshot = EvdevDevices::new().connected();
    let shown = displayable(&snapshot);
    if shown.is_empty() {
        println!("No gamepads connected");
    }
    for device in shown {
        println!("{}\t{}", device.id, device.path.display());
    }

    let unresolved = snapshot.len() - displayable(&snapshot).len();
    if unresolved > 0 {
        info!(count = unresolved, "Skipped gamepads without a name");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let store = JsonFileStore::new(cli.save_file.unwrap_or_else(JsonFileStore::default_path));
    info!(path = %store.path().display(), "Using settings file");

    match cli.command.unwrap_or(Command::Edit) {
        Command::Show => show(&store),
        Command::Devices => list_devices(),
        Command::Edit => {
            let socket_path = match cli.session_socket {
                Some(path) => path,
                None => ipc::default_socket_path()?,
            };

            if !devices::check_permissions() {
                devices::print_permission_error();
            }

            run_gui(store, socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), TraceLevel::DEBUG);
        assert_eq!(parse_level("warn"), TraceLevel::WARN);
        assert_eq!(parse_level("bogus"), TraceLevel::INFO);
    }

    #[test]
    fn test_cli_defaults_to_editor() {
        let cli = Cli::parse_from(["net64-settings"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.save_file, None);
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "net64-settings",
            "show",
            "--save-file",
            "/tmp/settings.json",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.command, Some(Command::Show));
        assert_eq!(cli.save_file, Some(PathBuf::from("/tmp/settings.json")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
