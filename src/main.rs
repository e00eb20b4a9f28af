use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use sensplot::{build_loop, discover_resources, run_until_shutdown, save_config_to, AppConfig};
use sensplot_core::StartupConfigError;
use sensplot_types::{RenderKind, SensorKind};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status for a configuration the sampling loop refuses to start with
const EXIT_BAD_CONFIG: u8 = 2;

/// Poll a CoAP climate sensor and plot its recent history
#[derive(Parser, Debug, Clone)]
#[command(name = "sensplot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the default location
    #[arg(value_name = "CONFIG_FILE")]
    config_file: Option<PathBuf>,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Sensor address, e.g. [fd00::1] or coap://[fd00::1]:5683
    #[arg(short = 's', long = "sensor", value_name = "ADDRESS")]
    sensor: Option<String>,

    /// History length kept per channel
    #[arg(short = 'n', long = "max-samples", value_name = "COUNT")]
    max_samples: Option<usize>,

    /// Render every N cycles
    #[arg(short = 'r', long = "render-period", value_name = "CYCLES")]
    render_period: Option<u64>,

    /// Seconds between cycles
    #[arg(short = 'i', long = "interval", value_name = "SECONDS")]
    interval: Option<f64>,

    /// Start with empty buffers instead of zero-filled ones
    #[arg(short = 'g', long = "grow")]
    grow: bool,

    /// Use the simulated sensor instead of CoAP
    #[arg(long = "simulate")]
    simulate: bool,

    /// Renderer to use (log, json, png)
    #[arg(long = "renderer", value_name = "KIND", value_parser = parse_renderer)]
    renderer: Option<RenderKind>,

    /// Output file for the json and png renderers
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stop after this many cycles
    #[arg(short = 'c', long = "cycles", value_name = "N")]
    cycles: Option<u64>,

    /// List the resources the sensor advertises and exit
    #[arg(long = "discover")]
    discover: bool,

    /// Save the effective configuration to the default location
    #[arg(long = "save-config")]
    save_config: bool,
}

fn parse_renderer(s: &str) -> Result<RenderKind, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "log" => Ok(RenderKind::Log),
        "json" => Ok(RenderKind::Json),
        "png" | "graph" => Ok(RenderKind::Png),
        other => Err(format!("Expected one of log, json, png, got: {}", other)),
    }
}

impl Cli {
    /// Overlay command line options onto a loaded configuration
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(sensor) = &self.sensor {
            config.poll.sensor_address = sensor.clone();
        }
        if let Some(max_samples) = self.max_samples {
            config.poll.max_samples = max_samples;
        }
        if let Some(render_period) = self.render_period {
            config.poll.render_period = render_period;
        }
        if let Some(interval) = self.interval {
            config.poll.cycle_interval_seconds = interval;
        }
        if self.grow {
            config.poll.steady_window_mode = false;
        }
        if self.simulate {
            config.sensor.kind = SensorKind::Simulated;
        }
        if let Some(kind) = self.renderer {
            config.render.kind = kind;
        }
        if let Some(output) = &self.output {
            config.render.output_path = Some(output.clone());
        }
    }

    /// Load the named config file, or the default one.
    ///
    /// Only a broken default file falls back to defaults; a file named on the
    /// command line must load.
    fn load_config(&self) -> Result<AppConfig> {
        match &self.config_file {
            Some(path) => AppConfig::load_from_path(path),
            None => Ok(AppConfig::load().unwrap_or_else(|e| {
                warn!("Failed to load config: {:#}, using defaults", e);
                AppConfig::default()
            })),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info (accepted readings)
    // Level 2: debug
    // Level 3+: trace (state transitions, CoAP traffic)
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting sensplot v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };
    cli.apply_to(&mut config);

    if cli.save_config {
        match AppConfig::config_path().and_then(|path| save_config_to(&config, &path)) {
            Ok(()) => info!("Configuration saved"),
            Err(e) => warn!("Not saving config: {:#}", e),
        }
    }

    if cli.discover {
        return match discover_resources(&config).await {
            Ok(resources) => {
                for resource in resources {
                    println!("{}", resource);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{:#}", e);
                ExitCode::FAILURE
            }
        };
    }

    let mut poll = match build_loop(&config) {
        Ok(poll) => poll,
        Err(e) => {
            error!("{:#}", e);
            return match e.downcast_ref::<StartupConfigError>() {
                Some(_) => ExitCode::from(EXIT_BAD_CONFIG),
                None => ExitCode::FAILURE,
            };
        }
    };

    let result = run_until_shutdown(&mut poll, cli.cycles).await;

    let stats = poll.stats();
    warn!(
        "Stopped after {} cycles: {} succeeded, {} failed, {} renders",
        stats.cycles, stats.successes, stats.failures, stats.renders
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
