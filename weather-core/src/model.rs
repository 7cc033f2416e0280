use serde::{Deserialize, Serialize};

/// Current conditions for a city, normalized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub city_name: String,
    pub country: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub temp_min: i64,
    pub temp_max: i64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub pressure: u32,
    /// Kilometres with one decimal place, or `"N/A"`.
    pub visibility: String,
}

/// Snapshot of everything a UI observes on a [`crate::WeatherClient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherState {
    pub weather: Option<Weather>,
    pub loading: bool,
    /// Empty when there is no error.
    pub error: String,
}

impl WeatherState {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}
