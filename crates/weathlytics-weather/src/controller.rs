//! Search/fetch/history state machine behind the weather views.
//!
//! Every intent updates state synchronously when called (loading flag set,
//! previous error cleared) and hands back a future that performs the single
//! gateway request and settles the outcome. Fetches may overlap; each one
//! captures a request epoch and only the most recently issued fetch is allowed
//! to settle state. Older responses are dropped on arrival.

use std::future::Future;

use parking_lot::Mutex;
use weathlytics_core::config::DEFAULT_CITY;

use crate::error::{FetchError, GatewayError};
use crate::gateway::WeatherGateway;
use crate::history::{HistoryList, DEFAULT_HISTORY_LIMIT};
use crate::types::WeatherResult;

/// Everything a view needs to render. Views only ever see clones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    /// Search input text
    pub query: String,
    pub weather: Option<WeatherResult>,
    pub loading: bool,
    /// Set alongside `loading` for refresh-triggered fetches
    pub refreshing: bool,
    pub error: Option<FetchError>,
    pub history: HistoryList,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// City fetched by [`QueryController::start`] when the gateway has a credential
    pub startup_city: String,
    pub history_limit: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            startup_city: DEFAULT_CITY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ControllerState,
    /// Epoch of the most recently issued fetch; 0 before the first one
    latest_epoch: u64,
}

pub struct QueryController<G> {
    gateway: G,
    inner: Mutex<Inner>,
    startup_city: String,
}

impl<G: WeatherGateway> QueryController<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_options(gateway, ControllerOptions::default())
    }

    pub fn with_options(gateway: G, options: ControllerOptions) -> Self {
        let state = ControllerState {
            history: HistoryList::new(options.history_limit),
            ..ControllerState::default()
        };

        Self {
            gateway,
            inner: Mutex::new(Inner {
                state,
                latest_epoch: 0,
            }),
            startup_city: options.startup_city,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Clone of the current state for rendering.
    pub fn snapshot(&self) -> ControllerState {
        self.inner.lock().state.clone()
    }

    /// Run the one-off startup fetch for the configured default city.
    ///
    /// Skipped silently (apart from a log line) when the gateway has no
    /// credential. Returns whether a fetch was made.
    pub async fn start(&self) -> bool {
        if !self.gateway.has_credential() {
            tracing::warn!(
                "Skipping startup fetch for {}: no API key configured",
                self.startup_city
            );
            return false;
        }

        let city = self.startup_city.clone();
        self.fetch_weather(&city).await;
        true
    }

    /// Replace the search input text without fetching.
    pub fn set_query(&self, text: &str) {
        self.inner.lock().state.query = text.to_string();
    }

    /// Record `raw` as the input text and search for it, trimmed.
    ///
    /// Returns `None` without fetching when the trimmed input is empty.
    #[must_use = "the search does nothing unless the returned fetch is awaited"]
    pub fn submit_search(&self, raw: &str) -> Option<impl Future<Output = ()> + '_> {
        self.set_query(raw);

        let city = raw.trim();
        if city.is_empty() {
            tracing::debug!("Ignoring blank search");
            return None;
        }
        Some(self.fetch_weather(city))
    }

    /// Re-fetch the city currently on display.
    ///
    /// Uses the displayed location name rather than the input text. Returns
    /// `None` when nothing is displayed; no request is made in that case.
    #[must_use = "the refresh does nothing unless the returned fetch is awaited"]
    pub fn refresh(&self) -> Option<impl Future<Output = ()> + '_> {
        let city = self.inner.lock().state.weather.as_ref()?.location_name.clone();
        Some(self.run_fetch(&city, true))
    }

    /// Search for a city picked from the recent-search list.
    pub fn select_history_entry(&self, city: &str) -> impl Future<Output = ()> + '_ {
        self.fetch_weather(city)
    }

    /// Start a fetch for `city`.
    ///
    /// `loading` is set and any previous error cleared before this returns.
    /// Awaiting the future sends exactly one gateway request and settles the
    /// outcome; dropping it early still clears the loading flags.
    pub fn fetch_weather(&self, city: &str) -> impl Future<Output = ()> + '_ {
        self.run_fetch(city, false)
    }

    fn run_fetch(&self, city: &str, refreshing: bool) -> impl Future<Output = ()> + '_ {
        let in_flight = self.begin(refreshing);
        let city = city.to_string();

        async move {
            tracing::info!("Fetching weather for {} (epoch {})", city, in_flight.epoch);
            let outcome = self.gateway.current_weather(&city).await;
            in_flight.settle(&city, outcome);
        }
    }

    fn begin(&self, refreshing: bool) -> InFlight<'_> {
        let mut inner = self.inner.lock();
        inner.latest_epoch += 1;
        inner.state.loading = true;
        inner.state.refreshing = refreshing;
        inner.state.error = None;

        InFlight {
            inner: &self.inner,
            epoch: inner.latest_epoch,
            settled: false,
        }
    }
}

/// Settlement handle for one fetch. Clears the loading flags on drop if the
/// fetch never settled and is still the latest.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    epoch: u64,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, city: &str, outcome: Result<WeatherResult, GatewayError>) {
        self.settled = true;

        let mut inner = self.inner.lock();
        if inner.latest_epoch != self.epoch {
            tracing::debug!(
                "Discarding stale response for {} (epoch {}, latest {})",
                city,
                self.epoch,
                inner.latest_epoch
            );
            return;
        }

        let state = &mut inner.state;
        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Weather for {} resolved to {}",
                    city,
                    result.location_name
                );
                state.weather = Some(result);
                state.history.push(city);
                state.query.clear();
            }
            Err(e) => {
                tracing::warn!("Weather fetch for {} failed: {}", city, e);
                state.error = Some(FetchError::from(&e));
                state.weather = None;
            }
        }

        state.loading = false;
        state.refreshing = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut inner = self.inner.lock();
        if inner.latest_epoch == self.epoch {
            tracing::debug!("Fetch (epoch {}) dropped before settling", self.epoch);
            inner.state.loading = false;
            inner.state.refreshing = false;
        }
    }
}
