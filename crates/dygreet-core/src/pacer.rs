//! Minimum-interval pacing between remote calls.
//!
//! The orchestrator and the video lister consult a [`Pacer`] before each
//! remote call instead of sprinkling fixed sleeps inline. The pacing contract
//! lives in one injectable value, so tests can run with `Pacer::unlimited()`.

use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum interval between consecutive calls to [`Pacer::wait`].
///
/// The first call never sleeps. Subsequent calls sleep only for the remainder
/// of the configured interval since the previous call returned.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Pacer {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// A pacer that never sleeps. For tests and dry runs.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Sleeps until at least `min_interval` has elapsed since the previous
    /// `wait` returned, then records the new call time.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
