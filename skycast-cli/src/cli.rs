use std::io::IsTerminal;

use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use inquire::{Confirm, CustomType, Text};
use skycast_core::{
    Config, FetchOutcome, FixedLocation, Forecast, ForecastMode, ForecastSession, OpenMeteoClient,
    RealFeelInputs,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather forecasts with real feel and advice")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a default location and display preferences.
    Configure {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Optional label shown next to forecasts.
        #[arg(long)]
        name: Option<String>,

        /// How real feel inputs are prepared.
        #[arg(long, value_enum)]
        real_feel: Option<RealFeelArg>,
    },

    /// Current conditions with real feel and a recommendation.
    Current {
        #[command(flatten)]
        opts: ShowOpts,

        /// Short view: temperature, raw wind speed and precipitation only.
        #[arg(long)]
        brief: bool,
    },

    /// 5-day forecast.
    Daily {
        #[command(flatten)]
        opts: ShowOpts,
    },

    /// Hour-by-hour forecast for today.
    Hourly {
        #[command(flatten)]
        opts: ShowOpts,
    },
}

#[derive(Debug, Args)]
pub struct ShowOpts {
    /// Latitude; falls back to the configured location.
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude; falls back to the configured location.
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    /// Print normalized records as JSON.
    #[arg(long)]
    json: bool,

    /// Compute real feel from unrounded values.
    #[arg(long)]
    precise: bool,

    /// Do not offer to try again after a failure.
    #[arg(long)]
    no_retry: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RealFeelArg {
    Rounded,
    FullPrecision,
}

impl From<RealFeelArg> for RealFeelInputs {
    fn from(arg: RealFeelArg) -> Self {
        match arg {
            RealFeelArg::Rounded => RealFeelInputs::Rounded,
            RealFeelArg::FullPrecision => RealFeelInputs::FullPrecision,
        }
    }
}

/// How a successful forecast is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Rich,
    Brief,
    Json,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure {
                lat,
                lon,
                name,
                real_feel,
            } => configure(lat, lon, name, real_feel),
            Command::Current { opts, brief } => {
                let view = if opts.json {
                    View::Json
                } else if brief {
                    View::Brief
                } else {
                    View::Rich
                };
                show(ForecastMode::Current, &opts, view).await
            }
            Command::Daily { opts } => show(ForecastMode::Daily, &opts, view_for(&opts)).await,
            Command::Hourly { opts } => show(ForecastMode::Hourly, &opts, view_for(&opts)).await,
        }
    }
}

fn view_for(opts: &ShowOpts) -> View {
    if opts.json { View::Json } else { View::Rich }
}

fn configure(
    lat: Option<f64>,
    lon: Option<f64>,
    name: Option<String>,
    real_feel: Option<RealFeelArg>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let lat = match lat {
        Some(v) => v,
        None => prompt_axis("Latitude:")?,
    };
    let lon = match lon {
        Some(v) => v,
        None => prompt_axis("Longitude:")?,
    };
    let name = match name {
        Some(n) => Some(n),
        None => Text::new("Name (optional):")
            .prompt_skippable()
            .context("Failed to read location name")?
            .filter(|n| !n.trim().is_empty()),
    };

    config.set_location(lat, lon, name)?;
    if let Some(rf) = real_feel {
        config.real_feel = rf.into();
    }

    let path = config.save()?;
    println!("Saved default location ({lat}, {lon}) to {}", path.display());

    Ok(())
}

fn prompt_axis(label: &str) -> anyhow::Result<f64> {
    CustomType::<f64>::new(label)
        .with_error_message("Please type a decimal number")
        .prompt()
        .with_context(|| format!("Failed to read {label}"))
}

async fn show(mode: ForecastMode, opts: &ShowOpts, view: View) -> anyhow::Result<()> {
    let config = Config::load()?;

    let location = match (opts.lat, opts.lon) {
        (Some(lat), Some(lon)) => FixedLocation::new(lat, lon),
        _ => {
            let c = config.default_location()?;
            FixedLocation::new(c.latitude(), c.longitude())
        }
    };
    let inputs = if opts.precise {
        RealFeelInputs::FullPrecision
    } else {
        config.real_feel
    };

    let source = OpenMeteoClient::new(config.api.base_url.clone());
    let session = ForecastSession::with_timeouts(source, location, config.timeouts());

    if view != View::Json {
        eprintln!("Loading weather data...");
    }
    let mut outcome = session.fetch(mode).await;

    loop {
        match outcome {
            FetchOutcome::Ready(forecast) => {
                print_forecast(&forecast, inputs, view)?;
                return Ok(());
            }
            FetchOutcome::Failed(err) => {
                let message = err.user_message();
                if view == View::Json {
                    println!("{}", serde_json::to_string_pretty(&render::error_json(&message))?);
                } else {
                    eprintln!("{message}");
                }

                if !offer_retry(opts.no_retry, std::io::stdin().is_terminal()) || !ask_retry()? {
                    return Err(anyhow::Error::from(err).context(message));
                }

                tracing::info!(%mode, "user requested retry");
                outcome = session
                    .retry()
                    .await
                    .ok_or_else(|| anyhow!("Nothing to retry"))?;
            }
            FetchOutcome::Superseded => bail!("Forecast request was superseded"),
        }
    }
}

/// Whether to prompt after a failure; prompts need an interactive stdin.
fn offer_retry(no_retry: bool, interactive: bool) -> bool {
    if no_retry {
        tracing::debug!("retry prompt disabled by --no-retry");
        return false;
    }
    if !interactive {
        tracing::debug!("stdin is not a terminal, skipping retry prompt");
        return false;
    }
    true
}

fn ask_retry() -> anyhow::Result<bool> {
    Confirm::new("Try again?")
        .with_default(true)
        .prompt()
        .context("Failed to read retry answer")
}

fn print_forecast(forecast: &Forecast, inputs: RealFeelInputs, view: View) -> anyhow::Result<()> {
    let out = match (forecast, view) {
        (_, View::Json) => serde_json::to_string_pretty(&render::forecast_json(forecast, inputs))?,
        (Forecast::Current(obs), View::Brief) => render::current_brief(obs),
        (Forecast::Current(obs), _) => render::current_rich(obs, inputs),
        (Forecast::Daily(records), _) => render::daily(records),
        (Forecast::Hourly(records), _) => render::hourly(records, inputs),
    };
    println!("{out}");
    Ok(())
}
