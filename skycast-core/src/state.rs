use crate::model::{CurrentConditions, ForecastSeries};
use crate::provider::FetchError;
use tracing::debug;

/// Lifecycle marker governing what the view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Identifies one fetch. Ids increase monotonically per [`AppState`], so a
/// completed fetch can be recognized as stale and its result discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(u64);

/// The single place weather data lives. Transitions:
/// idle → loading → success | error, and any submit restarts at loading.
/// Outside loading/idle, exactly one of {weather, error} is set.
#[derive(Debug, Default)]
pub struct AppState {
    load: LoadState,
    weather: Option<(CurrentConditions, ForecastSeries)>,
    error: Option<String>,
    latest: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn weather(&self) -> Option<&(CurrentConditions, ForecastSeries)> {
        self.weather.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Enter the loading state and issue an id for the new fetch.
    ///
    /// Previous data is kept until the fetch completes, so a no-op submit
    /// elsewhere can leave it displayed; the error message is cleared
    /// immediately since a new attempt is underway.
    pub fn begin_fetch(&mut self) -> RequestId {
        self.latest += 1;
        self.load = LoadState::Loading;
        self.error = None;
        debug!(request_id = self.latest, "fetch started");
        RequestId(self.latest)
    }

    /// Apply a completed fetch. Returns `false` (and changes nothing) when a
    /// newer fetch has been issued since `id`; only the most recent fetch may
    /// update displayed state.
    pub fn complete(
        &mut self,
        id: RequestId,
        result: Result<(CurrentConditions, ForecastSeries), FetchError>,
    ) -> bool {
        if id.0 != self.latest {
            debug!(request_id = id.0, latest = self.latest, "discarding stale fetch result");
            return false;
        }

        match result {
            Ok(data) => {
                self.weather = Some(data);
                self.error = None;
                self.load = LoadState::Success;
            }
            Err(err) => {
                debug!(error = %err, "fetch failed");
                self.weather = None;
                self.error = Some(err.user_message().to_string());
                self.load = LoadState::Error;
            }
        }

        true
    }
}
