//! Fetch lifecycle for one coordinate context.
//!
//! `Idle -> Validating -> Requesting -> {Succeeded | Failed}`. A manual
//! [`ForecastSession::retry`] re-enters `Validating` from either terminal
//! state; nothing is retried or polled automatically.
//!
//! Every fetch takes a new request token. Only the holder of the newest token
//! may move the state machine, so a slow response that was overtaken by a
//! newer fetch is discarded instead of overwriting fresher data.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    WeatherError,
    coordinate,
    location::LocationProvider,
    model::{Forecast, ForecastMode, ForecastQuery},
    provider::ForecastSource,
    schema,
};

/// Per-mode bound on how long one request may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTimeouts {
    pub current: Duration,
    pub daily: Duration,
    pub hourly: Duration,
}

impl Default for FetchTimeouts {
    fn default() -> Self {
        Self {
            current: Duration::from_secs(30),
            daily: Duration::from_secs(10),
            hourly: Duration::from_secs(30),
        }
    }
}

impl FetchTimeouts {
    pub fn uniform(limit: Duration) -> Self {
        Self {
            current: limit,
            daily: limit,
            hourly: limit,
        }
    }

    pub fn for_mode(&self, mode: ForecastMode) -> Duration {
        match mode {
            ForecastMode::Current => self.current,
            ForecastMode::Daily => self.daily,
            ForecastMode::Hourly => self.hourly,
        }
    }
}

/// Coarse status for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Validating,
    Requesting,
    Succeeded(Arc<Forecast>),
    Failed(Arc<WeatherError>),
}

impl FetchState {
    /// `Idle` reports `Loading`: a session is created to fetch.
    pub fn status(&self) -> Status {
        match self {
            FetchState::Idle | FetchState::Validating | FetchState::Requesting => Status::Loading,
            FetchState::Succeeded(_) => Status::Ready,
            FetchState::Failed(_) => Status::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Succeeded(_) | FetchState::Failed(_))
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            FetchState::Succeeded(forecast) => Some(forecast.as_ref()),
            _ => None,
        }
    }

    /// User-facing message when the last fetch failed.
    pub fn error_message(&self) -> Option<String> {
        match self {
            FetchState::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }
}

/// What a single fetch call ended with.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Ready(Arc<Forecast>),
    Failed(Arc<WeatherError>),
    /// A newer fetch started before this one finished; its result was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct Inner {
    state: FetchState,
    token: u64,
    last_mode: Option<ForecastMode>,
}

#[derive(Debug)]
pub struct ForecastSession<S, L> {
    source: S,
    locator: L,
    timeouts: FetchTimeouts,
    inner: Mutex<Inner>,
}

impl<S, L> ForecastSession<S, L>
where
    S: ForecastSource,
    L: LocationProvider,
{
    pub fn new(source: S, locator: L) -> Self {
        Self::with_timeouts(source, locator, FetchTimeouts::default())
    }

    pub fn with_timeouts(source: S, locator: L, timeouts: FetchTimeouts) -> Self {
        Self {
            source,
            locator,
            timeouts,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn state(&self) -> FetchState {
        self.inner.lock().state.clone()
    }

    /// Start a new fetch for `mode`, superseding any fetch still in flight.
    pub async fn fetch(&self, mode: ForecastMode) -> FetchOutcome {
        let token = self.begin(mode);
        let result = self.run(token, mode).await;
        self.finish(token, mode, result)
    }

    /// Repeat the last fetch. Returns `None` unless the session is in a
    /// terminal state.
    pub async fn retry(&self) -> Option<FetchOutcome> {
        let mode = {
            let inner = self.inner.lock();
            if !inner.state.is_terminal() {
                return None;
            }
            inner.last_mode?
        };

        tracing::info!(%mode, "retrying forecast fetch");
        Some(self.fetch(mode).await)
    }

    fn begin(&self, mode: ForecastMode) -> u64 {
        let mut inner = self.inner.lock();
        inner.token += 1;
        inner.last_mode = Some(mode);
        inner.state = FetchState::Validating;
        inner.token
    }

    /// Move to `state` if `token` is still the newest request.
    fn transition(&self, token: u64, state: FetchState) -> bool {
        let mut inner = self.inner.lock();
        if inner.token != token {
            return false;
        }
        inner.state = state;
        true
    }

    async fn run(&self, token: u64, mode: ForecastMode) -> Result<Forecast, WeatherError> {
        let (latitude, longitude) = self.locator.locate().await?;
        let coordinate = coordinate::validate(latitude, longitude)?;
        let query = ForecastQuery::new(coordinate, mode);

        if !self.transition(token, FetchState::Requesting) {
            // Superseded already; skip the network call.
            return Err(WeatherError::transport("request superseded"));
        }

        let limit = self.timeouts.for_mode(mode);
        let body = match tokio::time::timeout(limit, self.source.fetch(&query)).await {
            Ok(body) => body?,
            Err(elapsed) => {
                return Err(WeatherError::transport_with(
                    format!("{mode} request timed out after {}s", limit.as_secs_f64()),
                    elapsed,
                ));
            }
        };

        schema::parse_forecast(mode, &body)
    }

    fn finish(
        &self,
        token: u64,
        mode: ForecastMode,
        result: Result<Forecast, WeatherError>,
    ) -> FetchOutcome {
        let (state, outcome) = match result {
            Ok(forecast) => {
                let forecast = Arc::new(forecast);
                (
                    FetchState::Succeeded(Arc::clone(&forecast)),
                    FetchOutcome::Ready(forecast),
                )
            }
            Err(err) => {
                let err = Arc::new(err);
                (
                    FetchState::Failed(Arc::clone(&err)),
                    FetchOutcome::Failed(err),
                )
            }
        };

        if !self.transition(token, state) {
            tracing::warn!(%mode, token, "discarding stale forecast response");
            return FetchOutcome::Superseded;
        }

        match &outcome {
            FetchOutcome::Ready(forecast) => {
                tracing::info!(%mode, records = forecast.len(), "forecast ready");
            }
            FetchOutcome::Failed(err) => {
                tracing::error!(%mode, error = %err, "forecast fetch failed");
            }
            FetchOutcome::Superseded => {}
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::FixedLocation;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::{
        collections::VecDeque,
        sync::atomic::{AtomicUsize, Ordering},
    };

    type Scripted = (Duration, Result<Value, WeatherError>);

    #[derive(Debug, Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Scripted>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Scripted>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ForecastSource for ScriptedSource {
        async fn fetch(&self, _query: &ForecastQuery) -> Result<Value, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.responses.lock().pop_front();
            let (delay, response) = next.expect("no scripted response left");
            tokio::time::sleep(delay).await;
            response
        }
    }

    #[derive(Debug)]
    struct DeniedLocation;

    #[async_trait]
    impl LocationProvider for DeniedLocation {
        async fn locate(&self) -> Result<(f64, f64), WeatherError> {
            Err(WeatherError::PermissionDenied("user declined".into()))
        }
    }

    fn daily_body(first_day: &str) -> Value {
        json!({
            "daily": {
                "time": [first_day],
                "temperature_2m_max": [10.0],
                "temperature_2m_min": [0.0],
                "precipitation_sum": [0.0]
            }
        })
    }

    fn ok(body: Value) -> Scripted {
        (Duration::ZERO, Ok(body))
    }

    fn first_date(outcome: &FetchOutcome) -> String {
        match outcome {
            FetchOutcome::Ready(forecast) => match forecast.as_ref() {
                Forecast::Daily(records) => records[0].date.clone(),
                other => panic!("unexpected forecast: {other:?}"),
            },
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn new_session_is_idle_and_loading() {
        let session = ForecastSession::new(ScriptedSource::default(), FixedLocation::new(0.0, 0.0));
        assert!(matches!(session.state(), FetchState::Idle));
        assert_eq!(session.state().status(), Status::Loading);
        assert!(session.retry().await.is_none());
    }

    #[tokio::test]
    async fn successful_daily_fetch() {
        let session = ForecastSession::new(
            ScriptedSource::new(vec![ok(daily_body("2024-01-01"))]),
            FixedLocation::new(49.28, -123.12),
        );

        let outcome = session.fetch(ForecastMode::Daily).await;
        assert_eq!(first_date(&outcome), "2024-01-01");

        let state = session.state();
        assert_eq!(state.status(), Status::Ready);
        assert_eq!(state.forecast().map(Forecast::len), Some(1));
        assert!(state.error_message().is_none());
    }

    #[tokio::test]
    async fn invalid_coordinate_never_reaches_the_source() {
        for (lat, lon) in [(f64::NAN, 0.0), (91.0, 0.0), (0.0, 181.0)] {
            let session =
                ForecastSession::new(ScriptedSource::default(), FixedLocation::new(lat, lon));

            let outcome = session.fetch(ForecastMode::Daily).await;
            let FetchOutcome::Failed(err) = outcome else {
                panic!("expected failure for ({lat}, {lon})");
            };
            assert!(matches!(
                *err,
                WeatherError::InvalidCoordinate { .. } | WeatherError::CoordinateOutOfRange { .. }
            ));
            assert_eq!(session.source.calls(), 0);
            assert_eq!(session.state().status(), Status::Error);
        }
    }

    #[tokio::test]
    async fn permission_denied_passes_through() {
        let session = ForecastSession::new(ScriptedSource::default(), DeniedLocation);

        let FetchOutcome::Failed(err) = session.fetch(ForecastMode::Current).await else {
            panic!("expected failure");
        };
        assert!(matches!(*err, WeatherError::PermissionDenied(_)));
        assert_eq!(
            session.state().error_message().as_deref(),
            Some("Permission to access location was denied.")
        );
    }

    #[tokio::test]
    async fn missing_section_fails_whole_fetch() {
        let session = ForecastSession::new(
            ScriptedSource::new(vec![ok(json!({"hourly": {}}))]),
            FixedLocation::new(10.0, 10.0),
        );

        let FetchOutcome::Failed(err) = session.fetch(ForecastMode::Daily).await else {
            panic!("expected failure");
        };
        assert!(matches!(*err, WeatherError::MalformedResponse { .. }));
        assert!(session.state().forecast().is_none());
    }

    #[tokio::test]
    async fn slow_source_times_out_as_transport_error() {
        let session = ForecastSession::with_timeouts(
            ScriptedSource::new(vec![(Duration::from_secs(5), Ok(daily_body("2024-01-01")))]),
            FixedLocation::new(10.0, 10.0),
            FetchTimeouts::uniform(Duration::from_millis(20)),
        );

        let FetchOutcome::Failed(err) = session.fetch(ForecastMode::Daily).await else {
            panic!("expected timeout");
        };
        assert!(matches!(*err, WeatherError::Transport { source: Some(_), .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn transport_errors_are_not_retried_automatically() {
        let session = ForecastSession::new(
            ScriptedSource::new(vec![
                (Duration::ZERO, Err(WeatherError::transport("connection reset"))),
                ok(daily_body("2024-02-02")),
            ]),
            FixedLocation::new(10.0, 10.0),
        );

        let outcome = session.fetch(ForecastMode::Daily).await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(session.source.calls(), 1);

        let retried = session.retry().await.expect("failed session is retryable");
        assert_eq!(first_date(&retried), "2024-02-02");
        assert_eq!(session.source.calls(), 2);
    }

    #[tokio::test]
    async fn retry_from_success_refetches_same_mode() {
        let session = ForecastSession::new(
            ScriptedSource::new(vec![
                ok(daily_body("2024-01-01")),
                ok(daily_body("2024-01-02")),
            ]),
            FixedLocation::new(10.0, 10.0),
        );

        session.fetch(ForecastMode::Daily).await;
        let retried = session.retry().await.expect("succeeded session is retryable");
        assert_eq!(first_date(&retried), "2024-01-02");
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let session = ForecastSession::new(
            ScriptedSource::new(vec![
                (Duration::from_millis(200), Ok(daily_body("2024-01-01"))),
                ok(daily_body("2024-01-05")),
            ]),
            FixedLocation::new(10.0, 10.0),
        );

        let (older, newer) = tokio::join!(session.fetch(ForecastMode::Daily), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.fetch(ForecastMode::Daily).await
        });

        assert!(matches!(older, FetchOutcome::Superseded));
        assert_eq!(first_date(&newer), "2024-01-05");

        let state = session.state();
        let Some(Forecast::Daily(records)) = state.forecast() else {
            panic!("expected daily forecast in state");
        };
        assert_eq!(records[0].date, "2024-01-05");
    }
}
