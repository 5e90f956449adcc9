//! Fixed-delay retry for page fetches.
//!
//! The listing endpoint fails transiently under load and sometimes answers
//! with an empty body instead of an error status. Both are retried after a
//! constant delay; malformed JSON and client-side errors are not.

use std::future::Future;
use std::time::Duration;

use crate::error::DouyinError;

/// Returns `true` for errors worth retrying after the fixed delay.
///
/// Retriable: network timeouts and connection failures, HTTP 5xx, and empty
/// response bodies (the API's throttling signal). Everything else is a hard
/// stop.
pub(crate) fn is_retriable(err: &DouyinError) -> bool {
    match err {
        DouyinError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        DouyinError::EmptyBody { .. } => true,
        DouyinError::Deserialize { .. }
        | DouyinError::UserIdMissing { .. }
        | DouyinError::ProfileUnavailable { .. }
        | DouyinError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// retriable errors, sleeping `delay` between attempts. No back-off or
/// jitter: the API responds to pacing, not escalation.
pub(crate) async fn retry_fixed<T, F, Fut>(
    max_retries: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, DouyinError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DouyinError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "transient listing error, retrying after fixed delay"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
