//! The observable weather component a UI binds to.
//!
//! [`WeatherClient`] owns a [`WeatherState`] and is the only thing that mutates it. Readers
//! take snapshots through the accessors or follow changes with [`WeatherClient::subscribe`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_ICON_BASE_URL;
use crate::{Config, FetchError, Weather, WeatherProvider, WeatherState, provider_from_config};

#[derive(Debug)]
pub struct WeatherClient {
    provider: Option<Box<dyn WeatherProvider>>,
    timeout: Duration,
    icon_base_url: String,
    state: watch::Sender<WeatherState>,
    /// Ticket of the most recently started fetch.
    latest: AtomicU64,
}

impl WeatherClient {
    /// Build a client talking to OpenWeatherMap as described by `config`.
    ///
    /// A missing credential is not an error here: the client is created and every fetch
    /// reports the configuration problem through [`WeatherClient::error`].
    pub fn new(config: &Config) -> Self {
        let provider = match provider_from_config(config) {
            Ok(provider) => Some(provider),
            Err(err) => {
                warn!("OpenWeatherMap credential missing, fetches will fail: {err}");
                None
            }
        };

        Self::build(provider, config)
    }

    /// Build a client around an arbitrary provider, taking timeout and icon settings from `config`.
    pub fn with_provider(provider: Box<dyn WeatherProvider>, config: &Config) -> Self {
        Self::build(Some(provider), config)
    }

    fn build(provider: Option<Box<dyn WeatherProvider>>, config: &Config) -> Self {
        let (state, _) = watch::channel(WeatherState::default());

        Self {
            provider,
            timeout: config.timeout(),
            icon_base_url: config.icon_base_url.clone(),
            state,
            latest: AtomicU64::new(0),
        }
    }

    /// Fetch current weather for `city_name` and publish the outcome.
    ///
    /// Returns `true` only when `weather` was populated. Every failure lands in `error`
    /// instead of being returned. If another fetch starts before this one finishes, this
    /// one's result is discarded and `false` is returned.
    pub async fn fetch_weather(&self, city_name: &str) -> bool {
        let city = city_name.trim();
        if city.is_empty() {
            self.reject(FetchError::EmptyCity);
            return false;
        }

        let Some(provider) = self.provider.as_deref() else {
            self.reject(FetchError::MissingApiKey);
            return false;
        };

        // The ticket is taken under the state write lock, so no newer fetch can
        // complete between claiming it and raising `loading`.
        let mut ticket = 0;
        self.state.send_modify(|state| {
            ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error.clear();
            state.weather = None;
        });
        let _in_flight = InFlight {
            client: self,
            ticket,
        };

        info!(city, "fetching current weather");

        // Dropping the provider future on expiry aborts the underlying request.
        let request = provider.current_weather(city);
        let outcome = tokio::time::timeout(self.timeout, request)
            .await
            .unwrap_or_else(|_| Err(FetchError::Timeout));

        let (weather, error) = match outcome {
            Ok(weather) => {
                debug!(city, temperature = weather.temperature, "weather fetched");
                (Some(weather), String::new())
            }
            Err(err) => {
                warn!(city, error = %err, "weather fetch failed");
                (None, err.to_string())
            }
        };
        let succeeded = weather.is_some();

        let applied = self.state.send_if_modified(|state| {
            if !self.is_latest(ticket) {
                return false;
            }
            state.loading = false;
            state.weather = weather;
            state.error = error;
            true
        });

        if !applied {
            debug!(city, "discarding result superseded by a newer fetch");
            return false;
        }

        succeeded
    }

    /// Drop the current result and error. `loading` is left alone.
    pub fn clear_weather(&self) {
        self.state.send_if_modified(|state| {
            let changed = state.weather.is_some() || state.has_error();
            state.weather = None;
            state.error.clear();
            changed
        });
    }

    pub fn icon_url(&self, icon_code: &str) -> String {
        icon_url_from(&self.icon_base_url, icon_code)
    }

    pub fn state(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    pub fn weather(&self) -> Option<Weather> {
        self.state.borrow().weather.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> String {
        self.state.borrow().error.clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    fn reject(&self, err: FetchError) {
        debug!(error = %err, "fetch rejected before request");
        self.state.send_modify(|state| state.error = err.to_string());
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

/// Clears `loading` if a fetch future is dropped before it completes.
struct InFlight<'a> {
    client: &'a WeatherClient,
    ticket: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.client.state.send_if_modified(|state| {
            self.client.is_latest(self.ticket) && std::mem::replace(&mut state.loading, false)
        });
    }
}

/// Icon image URL for an OpenWeatherMap icon code, or an empty string for no code.
pub fn icon_url(icon_code: &str) -> String {
    icon_url_from(DEFAULT_ICON_BASE_URL, icon_code)
}

pub fn icon_url_from(base_url: &str, icon_code: &str) -> String {
    if icon_code.is_empty() {
        return String::new();
    }

    format!("{}/{icon_code}@4x.png", base_url.trim_end_matches('/'))
}
