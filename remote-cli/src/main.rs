use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sonos_remote::button::spawn_line_button;
use sonos_remote::logging::{init_logging_with_filter, LoggingMode};
use sonos_remote::{ControllerStatus, RemoteConfig, RemoteToggleController};
use tracing::{error, info};

mod app;

/// One-button remote for a speaker behind the HTTP control API
///
/// Without a physical button, press Enter to toggle playback and type `q`
/// to quit.
#[derive(Parser, Debug)]
#[command(name = "sonos-remote")]
#[command(version)]
pub struct Args {
    /// Config file (default: <config dir>/sonos-remote/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the control server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the control server port
    #[arg(long)]
    pub port: Option<u16>,

    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Verbose diagnostics with source locations
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the button loop (default)
    Run,
    /// Press the button once and exit
    Toggle,
    /// Query the current playback state and exit
    State,
    /// Print the effective configuration as TOML
    Config,
}

impl Args {
    /// Resolve the configuration from the file, environment, and flags, in that order
    pub fn load_config(&self) -> Result<RemoteConfig> {
        let mut config = match &self.config {
            Some(path) => RemoteConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => RemoteConfig::load_or_default().context("Failed to load default config")?,
        };

        if let Ok(host) = std::env::var("SONOS_REMOTE_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("SONOS_REMOTE_PORT") {
            config.server.port = port
                .parse()
                .context("Invalid SONOS_REMOTE_PORT environment variable")?;
        }

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }

        if let Some(port) = self.port {
            config.server.port = port;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn logging_mode(&self) -> LoggingMode {
        if self.verbose {
            LoggingMode::Debug
        } else {
            LoggingMode::from_env(LoggingMode::Development)
        }
    }
}

fn print_summary(config: &RemoteConfig) {
    info!("Configuration:");
    info!("  Server: {}:{}", config.server.host, config.server.port);
    info!("  Station: {}", config.endpoints.station_name);
    info!("  State URL: {}", config.endpoints.state_url);
    info!("  Play URL: {}", config.endpoints.play_url);
    info!("  Pause URL: {}", config.endpoints.pause_url);
    info!("  LED pin: {}", config.led.pin);
    if !config.wifi.ssid.is_empty() {
        info!("  WiFi SSID: {}", config.wifi.ssid);
    }
    info!("  Request timeout: {}ms", config.timing.request_timeout_ms);
    info!("  Poll interval: {}ms", config.timing.poll_interval_ms);
}

fn run_button_loop(config: &RemoteConfig) -> Result<()> {
    let mut controller =
        RemoteToggleController::from_config(config).context("Failed to build controller")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl+C handler")?;
    }

    let (tx, rx) = mpsc::channel();
    // Detached: the reader blocks on stdin and ends with the process
    let _reader = spawn_line_button(std::io::BufReader::new(std::io::stdin()), tx);

    println!("Press Enter to toggle {}, q to quit.", config.endpoints.station_name);

    let summary = app::run_loop(&mut controller, &rx, &shutdown, config.poll_interval());
    info!(
        presses = summary.presses,
        ignored = summary.ignored,
        stop = ?summary.stop,
        "remote stopped"
    );
    Ok(())
}

/// Exit code 0 on Ok, 2 otherwise
fn report(status: ControllerStatus, state: sonos_remote::PlaybackState) -> i32 {
    println!("{} ({})", state, status);
    if status.is_ok() {
        0
    } else {
        2
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging_with_filter(args.logging_mode(), args.log_level.as_deref())
        .context("Failed to initialize logging")?;

    let config = args.load_config()?;
    let command = args.command.unwrap_or(Command::Run);

    let code = match command {
        Command::Config => {
            let mut shown = config.clone();
            if !shown.wifi.password.is_empty() {
                shown.wifi.password = "<redacted>".to_string();
            }
            print!("{}", shown.to_toml_string()?);
            0
        }
        Command::State => {
            let mut controller = RemoteToggleController::from_config(&config)?;
            let (state, status) = controller.query_state();
            report(status, state)
        }
        Command::Toggle => {
            let mut controller = RemoteToggleController::from_config(&config)?;
            let led = controller.on_button_press();
            info!(led = %led, "LED");
            let status = controller
                .last_status()
                .unwrap_or(ControllerStatus::UnexpectedResponse);
            report(status, controller.state())
        }
        Command::Run => {
            print_summary(&config);
            if let Err(e) = run_button_loop(&config) {
                error!("Remote failed: {:#}", e);
                1
            } else {
                0
            }
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
