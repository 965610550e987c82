//! Bounded retries with exponential backoff and server-directed delays.
//!
//! The loop gives every attempt, including ones answered with a
//! server-specified retry delay, a slot in the same attempt budget, so a
//! server that always asks to retry can never keep a caller waiting forever.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, error, warn};

use crate::{AiError, RetryHint};

/// Attempt budget and delay schedule for one logical request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each attempt after that.
    pub base_delay: Duration,
    /// Upper bound on any backoff delay, jitter included.
    pub max_delay: Duration,
    /// Random extra delay drawn from `[0, jitter)`.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: Duration::from_millis(300),
        }
    }
}

impl RetryPolicy {
    /// Build a policy from the float-seconds form used in config files.
    ///
    /// Negative or non-finite values are treated as zero.
    pub fn from_secs(max_attempts: u32, base: f64, max: f64, jitter: f64) -> Self {
        Self {
            max_attempts,
            base_delay: secs_to_duration(base),
            max_delay: secs_to_duration(max),
            jitter: secs_to_duration(jitter),
        }
    }

    /// Delay after the failed attempt numbered `attempt` (zero-based):
    /// `min(base * 2^attempt + U[0, jitter), max_delay)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = 2f64.powi(attempt.min(62) as i32);
        let jitter = if self.jitter.is_zero() {
            0.0
        } else {
            rand::thread_rng().gen_range(0.0..self.jitter.as_secs_f64())
        };
        let secs = self.base_delay.as_secs_f64() * exp + jitter;
        secs_to_duration(secs.min(self.max_delay.as_secs_f64()))
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Parse a `Retry-After` header given in (possibly fractional) seconds.
///
/// Negative values clamp to zero. Returns `None` for anything that is not a
/// finite number, so such responses fall back to plain API errors.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    if !secs.is_finite() {
        return None;
    }
    Some(secs_to_duration(secs))
}

/// Transport failure classes. Only the first four are worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    ConnectionLost,
    NotConnected,
    CannotConnectToHost,
    BadUrl,
    Other,
}

impl TransportErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ConnectionLost | Self::NotConnected | Self::CannotConnectToHost
        )
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Timeout => "timeout",
            Self::ConnectionLost => "connection lost",
            Self::NotConnected => "not connected",
            Self::CannotConnectToHost => "cannot connect to host",
            Self::BadUrl => "bad url",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Message of the connector error hyper reports for failed name lookups.
const RESOLVER_ERROR: &str = "dns error";

/// Classify a reqwest failure by walking its source chain.
pub fn classify(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        return TransportErrorKind::Timeout;
    }
    if err.is_builder() {
        return TransportErrorKind::BadUrl;
    }
    classify_chain(std::error::Error::source(err), err.is_connect())
}

/// A host that does not resolve is not retried; an unreachable one is.
fn classify_chain(
    mut source: Option<&(dyn std::error::Error + 'static)>,
    is_connect: bool,
) -> TransportErrorKind {
    while let Some(inner) = source {
        if inner.to_string().starts_with(RESOLVER_ERROR) {
            return TransportErrorKind::Other;
        }
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            if let Some(kind) = classify_io(io.kind()) {
                return kind;
            }
        }
        source = inner.source();
    }

    if is_connect {
        return TransportErrorKind::CannotConnectToHost;
    }
    TransportErrorKind::Other
}

fn classify_io(kind: std::io::ErrorKind) -> Option<TransportErrorKind> {
    use std::io::ErrorKind;
    match kind {
        ErrorKind::TimedOut => Some(TransportErrorKind::Timeout),
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::UnexpectedEof => Some(TransportErrorKind::ConnectionLost),
        ErrorKind::NotConnected => Some(TransportErrorKind::NotConnected),
        ErrorKind::ConnectionRefused | ErrorKind::AddrNotAvailable => {
            Some(TransportErrorKind::CannotConnectToHost)
        }
        _ => None,
    }
}

/// Wrap a reqwest failure as an [`AiError::Network`].
pub fn network_error(err: reqwest::Error) -> AiError {
    AiError::Network {
        kind: classify(&err),
        message: err.to_string(),
    }
}

/// Run `op` until it succeeds, fails fatally, or the attempt budget is spent.
///
/// `op` receives the zero-based attempt number. Server-directed delays are
/// slept exactly, without jitter; retryable transport failures sleep the
/// policy's backoff. No sleep happens after the final attempt.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, AiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let mut last: Option<AiError> = None;

    for attempt in 0..policy.max_attempts {
        debug!(attempt, max_attempts = policy.max_attempts, "issuing request");

        let err = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        let is_last = attempt + 1 >= policy.max_attempts;

        let delay = match err.retry_hint() {
            RetryHint::Fatal => {
                error!(attempt, error = %err, "request failed, not retrying");
                return Err(err);
            }
            RetryHint::After(delay) => {
                warn!(
                    attempt,
                    delay_secs = delay.as_secs_f64(),
                    error = %err,
                    "server asked to retry later"
                );
                delay
            }
            RetryHint::Backoff => {
                let delay = policy.backoff_delay(attempt);
                warn!(
                    attempt,
                    delay_secs = delay.as_secs_f64(),
                    error = %err,
                    "transient failure, backing off"
                );
                delay
            }
        };

        last = Some(err);
        if !is_last {
            tokio::time::sleep(delay).await;
        }
    }

    match last {
        Some(err) => {
            error!(attempts = policy.max_attempts, error = %err, "retries exhausted");
            Err(AiError::RetriesExhausted {
                attempts: policy.max_attempts,
                last: Box::new(err),
            })
        }
        None => Err(AiError::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn no_jitter() -> RetryPolicy {
        RetryPolicy {
            jitter: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    fn transient() -> AiError {
        AiError::Network {
            kind: TransportErrorKind::ConnectionLost,
            message: "connection reset by peer".into(),
        }
    }

    fn directed(secs: u64) -> AiError {
        AiError::Api {
            status: 503,
            message: "busy".into(),
            retry_after: Some(Duration::from_secs(secs)),
        }
    }

    // -- backoff_delay --------------------------------------------------------

    #[test]
    fn backoff_doubles_without_jitter() {
        let policy = no_jitter();
        assert_eq!(policy.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(6), Duration::from_secs(60));
        assert_eq!(policy.backoff_delay(40), Duration::from_secs(60));
        assert_eq!(policy.backoff_delay(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn jitter_stays_in_range() {
        let policy = RetryPolicy::default();
        for _ in 0..200 {
            let d0 = policy.backoff_delay(0).as_secs_f64();
            assert!((1.0..1.3).contains(&d0), "attempt 0 delay {d0}");
            let d1 = policy.backoff_delay(1).as_secs_f64();
            assert!((2.0..2.3).contains(&d1), "attempt 1 delay {d1}");
        }
    }

    #[test]
    fn from_secs_clamps_bad_values() {
        let policy = RetryPolicy::from_secs(3, -1.0, f64::NAN, 0.5);
        assert_eq!(policy.base_delay, Duration::ZERO);
        assert_eq!(policy.max_delay, Duration::ZERO);
        assert_eq!(policy.jitter, Duration::from_millis(500));
    }

    // -- parse_retry_after ----------------------------------------------------

    #[test]
    fn parses_integer_and_fractional_seconds() {
        assert_eq!(parse_retry_after("2"), Some(Duration::from_secs(2)));
        assert_eq!(parse_retry_after(" 0.5 "), Some(Duration::from_millis(500)));
        assert_eq!(parse_retry_after("0"), Some(Duration::ZERO));
    }

    #[test]
    fn negative_retry_after_clamps_to_zero() {
        assert_eq!(parse_retry_after("-3"), Some(Duration::ZERO));
    }

    #[test]
    fn rejects_non_numeric_retry_after() {
        assert_eq!(parse_retry_after("soon"), None);
        assert_eq!(parse_retry_after("inf"), None);
        assert_eq!(parse_retry_after("NaN"), None);
        assert_eq!(parse_retry_after(""), None);
    }

    // -- classification -------------------------------------------------------

    #[test]
    fn retryable_kinds() {
        assert!(TransportErrorKind::Timeout.is_retryable());
        assert!(TransportErrorKind::ConnectionLost.is_retryable());
        assert!(TransportErrorKind::NotConnected.is_retryable());
        assert!(TransportErrorKind::CannotConnectToHost.is_retryable());
        assert!(!TransportErrorKind::BadUrl.is_retryable());
        assert!(!TransportErrorKind::Other.is_retryable());
    }

    #[derive(Debug)]
    struct Connector {
        msg: &'static str,
        cause: std::io::Error,
    }

    impl fmt::Display for Connector {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.msg)
        }
    }

    impl std::error::Error for Connector {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.cause)
        }
    }

    #[test]
    fn unresolvable_host_is_not_retried() {
        let err = Connector {
            msg: "dns error",
            cause: std::io::Error::other("failed to lookup address information"),
        };
        let kind = classify_chain(Some(&err), true);
        assert_eq!(kind, TransportErrorKind::Other);
        assert!(!kind.is_retryable());
    }

    #[test]
    fn refused_connection_is_retried() {
        let err = Connector {
            msg: "tcp connect error",
            cause: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        let kind = classify_chain(Some(&err), true);
        assert_eq!(kind, TransportErrorKind::CannotConnectToHost);
        assert!(kind.is_retryable());
    }

    #[test]
    fn bare_connect_failure_is_retried() {
        assert_eq!(
            classify_chain(None, true),
            TransportErrorKind::CannotConnectToHost
        );
        assert_eq!(classify_chain(None, false), TransportErrorKind::Other);
    }

    #[test]
    fn io_kinds_map_to_transport_kinds() {
        use std::io::ErrorKind;
        assert_eq!(
            classify_io(ErrorKind::ConnectionReset),
            Some(TransportErrorKind::ConnectionLost)
        );
        assert_eq!(
            classify_io(ErrorKind::ConnectionRefused),
            Some(TransportErrorKind::CannotConnectToHost)
        );
        assert_eq!(
            classify_io(ErrorKind::NotConnected),
            Some(TransportErrorKind::NotConnected)
        );
        assert_eq!(classify_io(ErrorKind::PermissionDenied), None);
    }

    // -- run_with_retry -------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn succeeds_first_try_without_sleeping() {
        let start = Instant::now();
        let result = run_with_retry(&RetryPolicy::default(), |_| async { Ok::<_, AiError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_errors_use_three_attempts_with_backoff() {
        let calls = AtomicU32::new(0);
        let stamps = Mutex::new(Vec::new());
        let start = Instant::now();

        let result: Result<(), AiError> = run_with_retry(&RetryPolicy::default(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            stamps.lock().unwrap().push(start.elapsed());
            async { Err(transient()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let stamps = stamps.into_inner().unwrap();
        let first_gap = (stamps[1] - stamps[0]).as_secs_f64();
        let second_gap = (stamps[2] - stamps[1]).as_secs_f64();
        // The paused clock advances in whole milliseconds.
        assert!((1.0..=1.301).contains(&first_gap), "first gap {first_gap}");
        assert!((2.0..=2.301).contains(&second_gap), "second gap {second_gap}");
        // No sleep after the final attempt.
        assert_eq!(start.elapsed(), stamps[2]);

        match result.unwrap_err() {
            AiError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(
                    *last,
                    AiError::Network {
                        kind: TransportErrorKind::ConnectionLost,
                        ..
                    }
                ));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_error_is_a_single_attempt() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), AiError> = run_with_retry(&RetryPolicy::default(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(AiError::Network {
                    kind: TransportErrorKind::BadUrl,
                    message: "builder error".into(),
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(matches!(
            result.unwrap_err(),
            AiError::Network {
                kind: TransportErrorKind::BadUrl,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn api_error_without_retry_after_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), AiError> = run_with_retry(&RetryPolicy::default(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(AiError::Api {
                    status: 500,
                    message: "boom".into(),
                    retry_after: None,
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err().status(), Some(500));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_waits_exactly_and_consumes_an_attempt() {
        let stamps = Mutex::new(Vec::new());
        let start = Instant::now();

        let result = run_with_retry(&RetryPolicy::default(), |attempt| {
            stamps.lock().unwrap().push(start.elapsed());
            async move {
                if attempt == 0 {
                    Err(directed(2))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        // The success arrived on the second of the three attempts.
        assert_eq!(result.unwrap(), 1);
        let stamps = stamps.into_inner().unwrap();
        assert_eq!(stamps[1] - stamps[0], Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn endless_retry_after_is_bounded_by_the_budget() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), AiError> = run_with_retry(&RetryPolicy::default(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(directed(2)) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
        let err = result.unwrap_err();
        assert!(matches!(err, AiError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retry_after_does_not_sleep() {
        let start = Instant::now();
        let result = run_with_retry(&RetryPolicy::default(), |attempt| async move {
            if attempt == 0 {
                Err(directed(0))
            } else {
                Ok(())
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn mixed_failures_report_the_last_one() {
        let result: Result<(), AiError> = run_with_retry(&no_jitter(), |attempt| async move {
            match attempt {
                0 => Err(directed(1)),
                _ => Err(transient()),
            }
        })
        .await;

        match result.unwrap_err() {
            AiError::RetriesExhausted { last, .. } => {
                assert!(matches!(*last, AiError::Network { .. }));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_is_unknown_error() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let result: Result<(), AiError> = run_with_retry(&policy, |_| async { Ok(()) }).await;
        assert!(matches!(result.unwrap_err(), AiError::Unknown));
    }
}
