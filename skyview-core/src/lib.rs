//! Core library for the `skyview` weather lookup.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The OpenWeatherMap query service behind an injectable HTTP seam
//! - Derived display values (city-local clock times, map embed URLs)
//! - The lookup controller and its view state
//!
//! It is used by `skyview-cli`, but any front end that can render a
//! [`ViewState`] can drive a [`LookupController`].

pub mod config;
pub mod controller;
pub mod error;
pub mod map;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod time;

pub use config::{Config, Credential};
pub use controller::{LookupController, SearchTicket, ViewState};
pub use error::LookupError;
pub use map::{MapMode, MapView, build_map_url};
pub use model::{Coordinates, WeatherRecord};
pub use provider::{
    HttpFetch, LookupResult, ReqwestFetch, WeatherLookup, lookup_from_config,
    openweather::OpenWeatherClient,
};
pub use time::local_time;
