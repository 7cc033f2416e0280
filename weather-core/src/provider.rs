use crate::{Config, FetchError, Weather, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current weather for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<Weather, FetchError>;
}

/// Construct the OpenWeather provider from config.
///
/// Fails with [`FetchError::MissingApiKey`] when the config holds no usable credential.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, FetchError> {
    let api_key = config.credential().ok_or(FetchError::MissingApiKey)?;

    Ok(Box::new(OpenWeatherProvider::new(
        api_key.to_owned(),
        config.endpoint.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PLACEHOLDER_API_KEY;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let err = provider_from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, FetchError::MissingApiKey));
    }

    #[test]
    fn provider_from_config_rejects_placeholder_key() {
        let cfg = Config::default().with_api_key(PLACEHOLDER_API_KEY);
        assert!(provider_from_config(&cfg).is_err());
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let cfg = Config::default().with_api_key("KEY");
        assert!(provider_from_config(&cfg).is_ok());
    }
}
