//! Bounded, condition-based waits
//!
//! Every wait polls its markers until one holds or the deadline passes.
//! There are no fixed sleeps between scenario steps.

use std::time::Duration;

use tokio::time::Instant;

use crate::common::{Error, Result};

use super::{Marker, Target};

/// Wait until one of `markers` holds, returning its index
///
/// Markers are probed in order on every poll, so when several hold at once
/// the earliest wins. Probe errors abort the wait. Each probe only gets the
/// time left before the deadline, so a probe that never answers still ends
/// the wait. Returns `Error::ScenarioTimeout` when the deadline passes first.
pub async fn wait_for_any(
    target: &mut dyn Target,
    markers: &[&Marker],
    timeout: Duration,
    poll: Duration,
    scenario: &str,
) -> Result<usize> {
    let started = Instant::now();
    let deadline = started + timeout;

    loop {
        for (index, marker) in markers.iter().enumerate() {
            let probe = tokio::time::timeout_at(deadline, marker.observe(&mut *target)).await;
            let Ok(held) = probe else {
                tracing::warn!(scenario, %marker, "marker probe did not answer before the deadline");
                return Err(Error::scenario_timeout(scenario, timeout));
            };
            if held? {
                tracing::debug!(
                    scenario,
                    %marker,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "marker observed"
                );
                return Ok(index);
            }
        }

        let now = Instant::now();
        if now >= deadline {
            let waiting: Vec<String> = markers.iter().map(|m| m.to_string()).collect();
            tracing::warn!(scenario, markers = ?waiting, "timed out waiting for marker");
            return Err(Error::scenario_timeout(scenario, timeout));
        }
        tokio::time::sleep(poll.min(deadline - now)).await;
    }
}

/// Wait until a single marker holds
pub async fn wait_for_marker(
    target: &mut dyn Target,
    marker: &Marker,
    timeout: Duration,
    poll: Duration,
    scenario: &str,
) -> Result<()> {
    wait_for_any(target, &[marker], timeout, poll, scenario)
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Locator;
    use async_trait::async_trait;

    /// Answers every probe after `delay`, or never
    struct SlowTarget {
        delay: Option<Duration>,
        url: String,
    }

    impl SlowTarget {
        async fn stall(&self) {
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => std::future::pending::<()>().await,
            }
        }
    }

    #[async_trait]
    impl Target for SlowTarget {
        async fn goto(&mut self, url: &str) -> Result<()> {
            self.url = url.to_string();
            Ok(())
        }

        async fn send_keys(&mut self, _locator: &Locator, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn click(&mut self, _locator: &Locator) -> Result<()> {
            Ok(())
        }

        async fn text(&mut self, _locator: &Locator) -> Result<String> {
            Ok(String::new())
        }

        async fn is_visible(&mut self, _locator: &Locator) -> Result<bool> {
            self.stall().await;
            Ok(false)
        }

        async fn current_url(&mut self) -> Result<String> {
            self.stall().await;
            Ok(self.url.clone())
        }
    }

    #[tokio::test]
    async fn test_hung_marker_check_times_out() {
        let mut target = SlowTarget {
            delay: None,
            url: String::new(),
        };
        let marker = Marker::Visible(Locator::id("inventory_container"));

        let started = Instant::now();
        let err = wait_for_marker(
            &mut target,
            &marker,
            Duration::from_millis(200),
            Duration::from_millis(10),
            "login",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ScenarioTimeout { .. }), "{err}");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_first_holding_marker_wins() {
        let mut target = SlowTarget {
            delay: Some(Duration::from_millis(1)),
            url: "https://shop.test/checkout-step-two.html".to_string(),
        };
        let error = Marker::Visible(Locator::id("error"));
        let success = Marker::UrlContains("/checkout-step-two.html".to_string());

        let index = wait_for_any(
            &mut target,
            &[&error, &success],
            Duration::from_secs(1),
            Duration::from_millis(5),
            "checkout",
        )
        .await
        .unwrap();
        assert_eq!(index, 1);
    }
}
