use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use weather_core::{Config, Weather, WeatherClient, icon_url};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Paris" or "London,GB".
        city: String,

        /// OpenWeatherMap API key; overrides the config file.
        #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Print the full client state as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the image URL for an OpenWeatherMap icon code.
    Icon {
        /// Icon code, e.g. "01d".
        code: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city, api_key, json } => {
                let mut config = match &self.config {
                    Some(path) => Config::load_from(path)?,
                    None => Config::load()?,
                };
                if let Some(key) = api_key {
                    config.api_key = Some(key);
                }
                debug!(endpoint = %config.endpoint, "loaded configuration");

                let client = WeatherClient::new(&config);
                let ok = client.fetch_weather(&city).await;

                if json {
                    let state = serde_json::to_string_pretty(&client.state())
                        .context("Failed to serialize weather state")?;
                    println!("{state}");
                } else if let Some(weather) = client.weather() {
                    let mut out = String::new();
                    render(&mut out, &weather, &client.icon_url(&weather.icon))
                        .context("Failed to format weather")?;
                    print!("{out}");
                }

                if !ok {
                    bail!("{}", client.error());
                }
            }
            Command::Icon { code } => {
                println!("{}", icon_url(&code));
            }
        }

        Ok(())
    }
}

fn render(out: &mut impl fmt::Write, weather: &Weather, icon: &str) -> fmt::Result {
    let visibility = if weather.visibility == "N/A" {
        weather.visibility.clone()
    } else {
        format!("{} km", weather.visibility)
    };

    writeln!(out, "{}, {}", weather.city_name, weather.country)?;
    writeln!(out, "  {} ({})", weather.condition, weather.description)?;
    writeln!(
        out,
        "  Temperature: {}°C (feels like {}°C, min {}°C, max {}°C)",
        weather.temperature, weather.feels_like, weather.temp_min, weather.temp_max
    )?;
    writeln!(
        out,
        "  Humidity: {}%  Wind: {} m/s  Pressure: {} hPa  Visibility: {}",
        weather.humidity, weather.wind_speed, weather.pressure, visibility
    )?;
    if !icon.is_empty() {
        writeln!(out, "  Icon: {icon}")?;
    }
    Ok(())
}
