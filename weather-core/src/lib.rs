//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider abstraction and its OpenWeatherMap implementation
//! - [`WeatherClient`], observable loading/error/result state around a single fetch
//!
//! It is used by `weather-cli`, but can also back any other front end.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;

#[cfg(test)]
mod test_support;

pub use client::{WeatherClient, icon_url};
pub use config::Config;
pub use error::FetchError;
pub use model::{Weather, WeatherState};
pub use provider::{WeatherProvider, provider_from_config};
