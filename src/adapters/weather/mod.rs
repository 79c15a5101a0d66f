//! Weather provider adapters.

pub mod open_weather;

pub use open_weather::OpenWeatherAdapter;
