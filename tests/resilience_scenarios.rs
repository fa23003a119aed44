//! End-to-end scenarios for the request-execution core.
//!
//! These drive `RequestExecutor` against a scripted transport under a
//! paused clock, so backoff durations and recovery windows are exact.

use std::sync::Arc;
use std::time::Duration;

use posthog_driver::config::ResilienceConfig;
use posthog_driver::lifecycle::Cancellation;
use posthog_driver::resilience::{CircuitState, ExecuteError, RequestExecutor};
use posthog_driver::transport::RequestSpec;

mod common;
use common::{MockTransport, Scripted};

fn executor_with(
    transport: &Arc<MockTransport>,
    config: &ResilienceConfig,
) -> RequestExecutor {
    RequestExecutor::new(transport.clone(), config, Cancellation::new())
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_recover_within_budget() {
    // Two connection errors, then success: exactly three transport calls
    // and two suspensions of computeWait(0) and computeWait(1).
    let transport = Arc::new(MockTransport::new(vec![
        Scripted::ConnectError,
        Scripted::ConnectError,
        Scripted::Status(200, r#"{"ok": true}"#),
    ]));
    let config = ResilienceConfig {
        max_attempts: 3,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);

    let started = tokio::time::Instant::now();
    let response = executor
        .execute("query", RequestSpec::get("/api/test"))
        .await
        .expect("should succeed on the third attempt");
    let elapsed = started.elapsed();

    assert_eq!(response.status, 200);
    assert_eq!(transport.calls(), 3);

    // Waits are 1s and 2s plus up to 10% jitter each; under the paused
    // clock nothing else advances time.
    assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
    assert!(elapsed <= Duration::from_millis(3300), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_client_error_fails_fast() {
    // A 404 is permanent: one transport call, no suspension.
    let transport = Arc::new(MockTransport::new(vec![Scripted::Status(
        404,
        r#"{"detail": "not found"}"#,
    )]));
    let config = ResilienceConfig {
        max_attempts: 3,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);

    let started = tokio::time::Instant::now();
    let err = executor
        .execute("persons", RequestSpec::get("/api/missing"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExecuteError::NonRetryable {
            status: Some(404),
            ..
        }
    ));
    assert_eq!(transport.calls(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO, "no backoff for 4xx");
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_is_retried() {
    let transport = Arc::new(MockTransport::new(vec![
        Scripted::Status(429, r#"{"detail": "rate limited"}"#),
        Scripted::Status(200, r#"{"ok": true}"#),
    ]));
    let config = ResilienceConfig {
        max_attempts: 3,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);

    let response = executor
        .execute("query", RequestSpec::get("/api/test"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_retried() {
    let transport = Arc::new(MockTransport::new(vec![
        Scripted::TimeoutError,
        Scripted::Status(200, r#"{"ok": true}"#),
    ]));
    let config = ResilienceConfig {
        max_attempts: 2,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);

    let response = executor
        .execute("query", RequestSpec::get("/api/test"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_surfaces_last_cause() {
    let transport = Arc::new(MockTransport::always(Scripted::Status(
        503,
        r#"{"detail": "unavailable"}"#,
    )));
    let config = ResilienceConfig {
        max_attempts: 3,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);

    let err = executor
        .execute("query", RequestSpec::get("/api/test"))
        .await
        .unwrap_err();

    match err {
        ExecuteError::RetryExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert_eq!(last.status(), Some(503));
        }
        other => panic!("expected RetryExhausted, got {other:?}"),
    }
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_breaker_opens_after_consecutive_failures() {
    // Three failing calls trip a threshold-3 breaker; the fourth call is
    // denied without touching the transport.
    let transport = Arc::new(MockTransport::always(Scripted::ConnectError));
    let config = ResilienceConfig {
        max_attempts: 1,
        failure_threshold: 3,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);
    let spec = RequestSpec::get("/api/test");

    for _ in 0..3 {
        let err = executor.execute("query", spec.clone()).await.unwrap_err();
        assert!(matches!(err, ExecuteError::RetryExhausted { .. }));
    }
    assert_eq!(executor.breaker_state("query"), Some(CircuitState::Open));

    let err = executor.execute("query", spec.clone()).await.unwrap_err();
    assert!(matches!(err, ExecuteError::CircuitOpen { .. }));
    assert_eq!(transport.calls(), 3, "open breaker made no transport call");
}

#[tokio::test(start_paused = true)]
async fn test_recovery_window_restarts_on_failed_trial() {
    let transport = Arc::new(MockTransport::always(Scripted::ConnectError));
    let config = ResilienceConfig {
        max_attempts: 1,
        failure_threshold: 1,
        recovery_timeout_secs: 60,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);
    let spec = RequestSpec::get("/api/test");

    // Trip the breaker.
    executor.execute("query", spec.clone()).await.unwrap_err();
    assert_eq!(executor.breaker_state("query"), Some(CircuitState::Open));
    assert_eq!(transport.calls(), 1);

    // Within the window: denied, no transport call.
    tokio::time::advance(Duration::from_secs(30)).await;
    let err = executor.execute("query", spec.clone()).await.unwrap_err();
    assert!(matches!(err, ExecuteError::CircuitOpen { .. }));
    assert_eq!(transport.calls(), 1);

    // Past the window: a trial is admitted; it fails and re-opens.
    tokio::time::advance(Duration::from_secs(31)).await;
    executor.execute("query", spec.clone()).await.unwrap_err();
    assert_eq!(transport.calls(), 2);
    assert_eq!(executor.breaker_state("query"), Some(CircuitState::Open));

    // The window restarted at the trial's failure, not the original one.
    tokio::time::advance(Duration::from_secs(30)).await;
    let err = executor.execute("query", spec.clone()).await.unwrap_err();
    assert!(matches!(err, ExecuteError::CircuitOpen { .. }));
    assert_eq!(transport.calls(), 2);

    tokio::time::advance(Duration::from_secs(31)).await;
    executor.execute("query", spec.clone()).await.unwrap_err();
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_successful_trial_closes_breaker() {
    let transport = Arc::new(MockTransport::new(vec![
        Scripted::ConnectError,
        Scripted::Status(200, r#"{"ok": true}"#),
        Scripted::Status(200, r#"{"ok": true}"#),
    ]));
    let config = ResilienceConfig {
        max_attempts: 1,
        failure_threshold: 1,
        recovery_timeout_secs: 60,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);
    let spec = RequestSpec::get("/api/test");

    executor.execute("query", spec.clone()).await.unwrap_err();
    assert_eq!(executor.breaker_state("query"), Some(CircuitState::Open));

    tokio::time::advance(Duration::from_secs(61)).await;
    let response = executor.execute("query", spec.clone()).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(executor.breaker_state("query"), Some(CircuitState::Closed));

    // Normal traffic resumes.
    executor.execute("query", spec.clone()).await.unwrap();
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_breakers_are_per_endpoint() {
    let transport = Arc::new(MockTransport::always(Scripted::ConnectError));
    let config = ResilienceConfig {
        max_attempts: 1,
        failure_threshold: 1,
        ..Default::default()
    };
    let executor = executor_with(&transport, &config);

    executor
        .execute("query", RequestSpec::get("/api/query"))
        .await
        .unwrap_err();
    assert_eq!(executor.breaker_state("query"), Some(CircuitState::Open));

    // A different endpoint is unaffected by query's open breaker.
    let err = executor
        .execute("persons", RequestSpec::get("/api/persons"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::RetryExhausted { .. }));
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_cancellation_aborts_backoff() {
    // Long base wait on a real clock: only cancellation can finish this
    // test quickly.
    let transport = Arc::new(MockTransport::always(Scripted::ConnectError));
    let config = ResilienceConfig {
        max_attempts: 5,
        base_wait_ms: 60_000,
        ..Default::default()
    };
    let cancel = Cancellation::new();
    let executor = RequestExecutor::new(transport.clone(), &config, cancel.clone());

    let handle = tokio::spawn(async move {
        executor
            .execute("query", RequestSpec::get("/api/test"))
            .await
    });

    // Let the first attempt fail and the backoff start.
    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.trigger();

    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(err, ExecuteError::Cancelled));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_cancelled_before_start_fails_fast() {
    let transport = Arc::new(MockTransport::always(Scripted::Status(200, "{}")));
    let config = ResilienceConfig::default();
    let cancel = Cancellation::new();
    let executor = RequestExecutor::new(transport.clone(), &config, cancel.clone());

    cancel.trigger();

    let err = executor
        .execute("query", RequestSpec::get("/api/test"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::Cancelled));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_calls_share_one_breaker() {
    // Ten concurrent failing calls against a threshold-5 breaker must not
    // race past the threshold; the breaker ends Open and every terminal
    // error is either exhaustion or a breaker denial.
    let transport = Arc::new(MockTransport::always(Scripted::ConnectError));
    let config = ResilienceConfig {
        max_attempts: 1,
        failure_threshold: 5,
        ..Default::default()
    };
    let executor = Arc::new(executor_with(&transport, &config));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let executor = executor.clone();
        handles.push(tokio::spawn(async move {
            executor
                .execute("query", RequestSpec::get("/api/test"))
                .await
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(matches!(
            result,
            Err(ExecuteError::RetryExhausted { .. }) | Err(ExecuteError::CircuitOpen { .. })
        ));
    }

    assert_eq!(executor.breaker_state("query"), Some(CircuitState::Open));
}
