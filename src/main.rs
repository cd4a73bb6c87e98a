//! Dive Planner - command-line front end
//!
//! Plans a single recreational dive and prints the report as JSON.
//!
//! ```bash
//! dive-planner plan --depth 30 --bottom-time 25
//! dive-planner plan --depth 30 --bottom-time 25 --gas-type nitrox --oxygen 32 --nitrogen 68
//! dive-planner plan --input dive.json
//! dive-planner table --gas-type nitrox --oxygen 32 --nitrogen 68
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dive_planner::config::Config;
use dive_planner::deco::gas::ndl_for_gas;
use dive_planner::deco::tables::NDL_TABLE;
use dive_planner::deco::{DiveProfileRequest, GasMixture, GasType, PressureGroup};
use dive_planner::logbook::CylinderSample;
use dive_planner::report::{plan, PlanRequest};

/// Recreational dive planner
#[derive(Parser)]
#[command(name = "dive-planner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a dive and print its profile
    Plan(PlanArgs),

    /// Print the no-decompression limit per table depth for a gas
    Table {
        #[command(flatten)]
        gas: GasArgs,
    },
}

#[derive(Args)]
struct GasArgs {
    /// Oxygen percentage
    #[arg(long, default_value = "21")]
    oxygen: f64,

    /// Nitrogen percentage
    #[arg(long, default_value = "79")]
    nitrogen: f64,

    /// Helium percentage
    #[arg(long, default_value = "0")]
    helium: f64,

    /// Gas type (air or nitrox)
    #[arg(long, default_value = "air")]
    gas_type: GasType,
}

impl GasArgs {
    fn mixture(&self) -> GasMixture {
        GasMixture {
            oxygen_pct: self.oxygen,
            nitrogen_pct: self.nitrogen,
            helium_pct: self.helium,
            gas_type: self.gas_type,
        }
    }
}

#[derive(Args)]
struct PlanArgs {
    /// Read a JSON plan request from a file ("-" for stdin)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["depth", "bottom_time"])]
    input: Option<PathBuf>,

    /// Maximum depth in meters
    #[arg(short, long, required_unless_present = "input")]
    depth: Option<f64>,

    /// Bottom time in minutes
    #[arg(short, long, required_unless_present = "input")]
    bottom_time: Option<u32>,

    #[command(flatten)]
    gas: GasArgs,

    /// Pressure group after the previous dive
    #[arg(long, default_value = "A")]
    previous_group: PressureGroup,

    /// Minutes since the previous dive
    #[arg(long, default_value = "720")]
    surface_interval: u32,

    /// Cylinder start pressure in bar
    #[arg(long, requires_all = ["end_pressure", "tank_volume", "water_temp"])]
    start_pressure: Option<f64>,

    /// Cylinder end pressure in bar
    #[arg(long)]
    end_pressure: Option<f64>,

    /// Cylinder volume in liters
    #[arg(long)]
    tank_volume: Option<f64>,

    /// Water temperature in Celsius
    #[arg(long)]
    water_temp: Option<f64>,

    /// Include the depth/time chart
    #[arg(long)]
    chart: bool,
}

impl PlanArgs {
    fn into_request(self) -> Result<PlanRequest> {
        if let Some(path) = &self.input {
            return read_request(path);
        }

        let gas = self.gas.mixture();
        let dive = DiveProfileRequest {
            max_depth: self.depth.context("--depth is required")?,
            bottom_time: self.bottom_time.context("--bottom-time is required")?,
            oxygen_pct: gas.oxygen_pct,
            nitrogen_pct: gas.nitrogen_pct,
            helium_pct: gas.helium_pct,
            gas_type: gas.gas_type,
            previous_group: self.previous_group,
            surface_interval: self.surface_interval,
        };

        let cylinder = match (
            self.start_pressure,
            self.end_pressure,
            self.tank_volume,
            self.water_temp,
        ) {
            (Some(start_pressure), Some(end_pressure), Some(tank_volume), Some(water_temp)) => {
                Some(CylinderSample {
                    start_pressure,
                    end_pressure,
                    tank_volume,
                    water_temp,
                })
            }
            _ => None,
        };

        Ok(PlanRequest {
            dive,
            cylinder,
            include_chart: self.chart,
        })
    }
}

fn read_request(path: &Path) -> Result<PlanRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Failed to parse plan request JSON")
}

#[derive(Serialize)]
struct TableRow {
    depth: f64,
    no_deco_limit: u32,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;

    let default_filter = match cli.verbose {
        0 => config.log_filter.clone(),
        1 => "dive_planner=debug".to_string(),
        _ => "dive_planner=trace".to_string(),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Plan(args) => {
            let request = args.into_request()?;
            tracing::info!(
                max_depth = request.dive.max_depth,
                bottom_time = request.dive.bottom_time,
                gas_type = %request.dive.gas_type,
                "Planning dive"
            );

            let report = match plan(&request, &config.limits) {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!("Rejected dive: {}", e);
                    return Err(dive_planner::AppError::from(e).into());
                }
            };

            if report.profile.no_deco_limit.is_exceeded() {
                tracing::warn!(
                    max_depth = request.dive.max_depth,
                    "Depth is beyond the no-decompression table"
                );
            }
            for warning in &report.profile.gas_info.warnings {
                tracing::warn!("{}", warning);
            }
            print_json(&report, config.pretty)?;
        }
        Commands::Table { gas } => {
            let mixture = gas.mixture();
            let rows: Vec<TableRow> = NDL_TABLE
                .iter()
                .map(|&(depth, _)| TableRow {
                    depth,
                    no_deco_limit: ndl_for_gas(depth, &mixture).minutes(),
                })
                .collect();
            print_json(&rows, config.pretty)?;
        }
    }

    Ok(())
}
