use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{FetchError, Weather};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self {
            api_key,
            endpoint,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<Weather, FetchError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // The status alone decides the message; the body is only logged.
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %truncate_body(&body), "OpenWeather request failed");
            return Err(FetchError::HttpStatus(status));
        }

        let body = res.text().await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        debug!(city = %parsed.name, "OpenWeather response parsed");

        normalize(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<f64>,
}

fn normalize(parsed: OwCurrentResponse) -> Result<Weather, FetchError> {
    let OwCurrentResponse {
        name,
        sys,
        main,
        weather,
        wind,
        visibility,
    } = parsed;

    let condition = weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::MalformedResponse("no weather conditions".to_string()))?;

    Ok(Weather {
        city_name: name,
        country: sys.country,
        temperature: round_half_up(main.temp),
        feels_like: round_half_up(main.feels_like),
        temp_min: round_half_up(main.temp_min),
        temp_max: round_half_up(main.temp_max),
        condition: condition.main,
        description: condition.description,
        icon: condition.icon,
        humidity: main.humidity,
        wind_speed: wind.speed,
        pressure: main.pressure,
        visibility: format_visibility(visibility),
    })
}

/// Nearest integer, halves towards positive infinity (-2.5 -> -2).
fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// Metres to kilometres with one decimal; missing or zero is "N/A".
fn format_visibility(metres: Option<f64>) -> String {
    match metres.filter(|m| *m != 0.0 && !m.is_nan()) {
        Some(m) => format!("{:.1}", m / 1000.0),
        None => "N/A".to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
