//! Request handler - Per-request orchestration shared by every transport
//!
//! Each inbound request goes through the same pipeline: artificial latency,
//! failure injection, the termination counter, the bound strategy, and
//! finally request-id stamping on the response.

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use domain::{Request, Response};
use rand::Rng;
use tracing::{debug, instrument, warn};

use super::termination::TerminationSignal;
use crate::{config::ServiceConfig, error::ApplicationError, ports::StrategyPort};

/// Orchestrates a single request for a node
///
/// Constructed before the strategy, because servers need a handler to
/// dispatch into while the strategy needs the servers. The strategy is
/// bound exactly once with [`RequestHandler::bind_strategy`].
pub struct RequestHandler {
    config: Arc<ServiceConfig>,
    strategy: OnceLock<Arc<dyn StrategyPort>>,
    termination: TerminationSignal,
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("config", &self.config)
            .field("bound", &self.is_bound())
            .field("termination", &self.termination)
            .finish_non_exhaustive()
    }
}

impl RequestHandler {
    /// Create a handler with no strategy bound yet
    pub fn new(config: Arc<ServiceConfig>) -> Self {
        let termination = TerminationSignal::new(config.terminate_after);
        Self {
            config,
            strategy: OnceLock::new(),
            termination,
        }
    }

    /// The node configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Attach the strategy; a second call is rejected
    pub fn bind_strategy(&self, strategy: Arc<dyn StrategyPort>) -> Result<(), ApplicationError> {
        self.strategy.set(strategy).map_err(|_| {
            ApplicationError::Construction(format!(
                "a strategy is already bound to node [{}]",
                self.config.id
            ))
        })
    }

    /// Whether a strategy has been bound
    pub fn is_bound(&self) -> bool {
        self.strategy.get().is_some()
    }

    /// The termination counter
    pub fn termination(&self) -> &TerminationSignal {
        &self.termination
    }

    /// Wait until the termination threshold has been reached
    pub async fn stopped(&self) {
        self.termination.triggered().await;
    }

    /// Run a request through latency, failure injection, counting and the strategy
    #[instrument(skip(self, request), fields(node = %self.config.id, request_id = %request.request_id))]
    pub async fn handle(&self, request: &Request) -> Result<Response, ApplicationError> {
        if !self.config.sleep.is_zero() {
            debug!(sleep = ?self.config.sleep, "Delaying request");
            tokio::time::sleep(self.config.sleep).await;
        }

        if should_fail(draw_roll(), self.config.percent_failure) {
            warn!(
                percent_failure = self.config.percent_failure,
                "Injecting failure"
            );
            return Err(ApplicationError::InjectedFailure {
                node_id: self.config.id.clone(),
            });
        }

        let strategy = self.strategy.get().ok_or_else(|| {
            ApplicationError::Internal(format!(
                "no strategy bound to node [{}]",
                self.config.id
            ))
        })?;

        self.termination.record_request();

        let mut response = strategy.execute(request).await?;
        response.request_id = request.request_id.clone();
        debug!(payload_len = response.payload.len(), "Request handled");
        Ok(response)
    }
}

/// Uniform draw in `0..100`
fn draw_roll() -> u8 {
    rand::rng().random_range(0..100)
}

/// A roll fails when it falls below the configured percentage
const fn should_fail(roll: u8, percent_failure: u8) -> bool {
    roll < percent_failure
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use proptest::prelude::*;

    use super::*;
    use crate::ports::MockStrategyPort;

    fn handler_with(config: ServiceConfig) -> RequestHandler {
        RequestHandler::new(Arc::new(config))
    }

    fn echo_strategy() -> MockStrategyPort {
        let mut strategy = MockStrategyPort::new();
        strategy
            .expect_execute()
            .returning(|request| Ok(Response::from_payload(request.payload.clone())));
        strategy
    }

    #[tokio::test]
    async fn stamps_inbound_request_id() {
        let mut strategy = MockStrategyPort::new();
        strategy
            .expect_execute()
            .returning(|_| Ok(Response::new("something-else", "BANANA")));

        let handler = handler_with(ServiceConfig::new("terminus"));
        handler.bind_strategy(Arc::new(strategy)).unwrap();

        let response = handler.handle(&Request::with_id("req-42")).await.unwrap();
        assert_eq!(response.request_id.as_str(), "req-42");
        assert_eq!(response.payload, "BANANA");
    }

    #[tokio::test]
    async fn zero_percent_never_fails() {
        let handler = handler_with(ServiceConfig::new("a").with_percent_failure(0));
        handler.bind_strategy(Arc::new(echo_strategy())).unwrap();

        for _ in 0..200 {
            assert!(handler.handle(&Request::with_id("r")).await.is_ok());
        }
    }

    #[tokio::test]
    async fn full_percent_always_fails_without_calling_strategy() {
        let mut strategy = MockStrategyPort::new();
        strategy.expect_execute().never();

        let handler = handler_with(ServiceConfig::new("flaky").with_percent_failure(100));
        handler.bind_strategy(Arc::new(strategy)).unwrap();

        for _ in 0..100 {
            let err = handler.handle(&Request::with_id("r")).await.unwrap_err();
            assert_eq!(err.to_string(), "this error was injected by [flaky]");
        }
    }

    #[tokio::test]
    async fn failure_rate_tracks_percentage() {
        let handler = handler_with(ServiceConfig::new("a").with_percent_failure(50));
        handler.bind_strategy(Arc::new(echo_strategy())).unwrap();

        let mut failures = 0;
        for _ in 0..2000 {
            if handler.handle(&Request::with_id("r")).await.is_err() {
                failures += 1;
            }
        }
        assert!((700..=1300).contains(&failures), "failures = {failures}");
    }

    #[tokio::test]
    async fn strategy_errors_propagate_unchanged() {
        let mut strategy = MockStrategyPort::new();
        strategy
            .expect_execute()
            .returning(|_| Err(ApplicationError::Transport("refused".to_string())));

        let handler = handler_with(ServiceConfig::new("a"));
        handler.bind_strategy(Arc::new(strategy)).unwrap();

        let err = handler.handle(&Request::with_id("r")).await.unwrap_err();
        assert_eq!(err, ApplicationError::Transport("refused".to_string()));
    }

    #[tokio::test]
    async fn unbound_handler_reports_internal_error() {
        let handler = handler_with(ServiceConfig::new("a").with_terminate_after(1));
        let err = handler.handle(&Request::with_id("r")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Internal(_)));
        assert_eq!(handler.termination().served(), 0);
    }

    #[test]
    fn strategy_binds_only_once() {
        let handler = handler_with(ServiceConfig::new("a"));
        assert!(!handler.is_bound());
        handler.bind_strategy(Arc::new(echo_strategy())).unwrap();
        assert!(handler.is_bound());

        let err = handler
            .bind_strategy(Arc::new(echo_strategy()))
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Construction(_)));
    }

    #[tokio::test]
    async fn sleeps_before_handling() {
        let handler = handler_with(ServiceConfig::new("a").with_sleep(Duration::from_millis(50)));
        handler.bind_strategy(Arc::new(echo_strategy())).unwrap();

        let started = Instant::now();
        handler.handle(&Request::with_id("r")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_sleep_is_fast() {
        let handler = handler_with(ServiceConfig::new("a"));
        handler.bind_strategy(Arc::new(echo_strategy())).unwrap();

        let started = Instant::now();
        handler.handle(&Request::with_id("r")).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn termination_fires_after_threshold() {
        let handler = handler_with(ServiceConfig::new("a").with_terminate_after(2));
        handler.bind_strategy(Arc::new(echo_strategy())).unwrap();

        handler.handle(&Request::with_id("1")).await.unwrap();
        assert!(!handler.termination().is_triggered());
        handler.handle(&Request::with_id("2")).await.unwrap();
        assert!(handler.termination().is_triggered());

        tokio::time::timeout(Duration::from_millis(100), handler.stopped())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn injected_failures_do_not_count_towards_termination() {
        let handler = handler_with(
            ServiceConfig::new("a")
                .with_percent_failure(100)
                .with_terminate_after(1),
        );
        handler.bind_strategy(Arc::new(echo_strategy())).unwrap();

        for _ in 0..10 {
            let _ = handler.handle(&Request::with_id("r")).await;
        }
        assert_eq!(handler.termination().served(), 0);
        assert!(!handler.termination().is_triggered());
    }

    #[test]
    fn debug_shows_binding_state() {
        let handler = handler_with(ServiceConfig::new("node-x"));
        let debug = format!("{handler:?}");
        assert!(debug.contains("RequestHandler"));
        assert!(debug.contains("node-x"));
        assert!(debug.contains("bound: false"));
    }

    proptest! {
        #[test]
        fn zero_percent_never_injects(roll in 0u8..100) {
            prop_assert!(!should_fail(roll, 0));
        }

        #[test]
        fn hundred_percent_always_injects(roll in 0u8..100) {
            prop_assert!(should_fail(roll, 100));
        }

        #[test]
        fn injection_is_monotonic_in_percentage(roll in 0u8..100, low in 0u8..=100, high in 0u8..=100) {
            let (low, high) = if low <= high { (low, high) } else { (high, low) };
            if should_fail(roll, low) {
                prop_assert!(should_fail(roll, high));
            }
        }

        #[test]
        fn draws_stay_in_range(_seed in any::<u8>()) {
            prop_assert!(draw_roll() < 100);
        }
    }
}
