//! Weather lookup for Weathlytics
//!
//! Current conditions by city name via OpenWeatherMap, a bounded
//! recent-search list, and the query controller that ties them together.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod history;
pub mod types;

pub use controller::{ControllerOptions, ControllerState, QueryController};
pub use error::{FetchError, FetchErrorKind, GatewayError};
pub use gateway::{OpenWeatherGateway, WeatherGateway};
pub use history::HistoryList;
pub use types::*;
