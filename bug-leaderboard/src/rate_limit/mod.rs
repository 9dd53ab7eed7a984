//! Rate limiting utilities for GitHub API.
//!
//! Checks the remaining budget of a resource and sleeps until its window
//! resets when only a handful of requests are left.

mod info;

pub use info::{RateLimitInfo, Resource};

use octocrab::Octocrab;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum time to wait for rate limit reset (1 hour).
const MAX_WAIT_SECS: u64 = 3600;

/// Minimum remaining requests before proactively waiting.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Checks the current rate limit status for `resource`.
///
/// A missing GraphQL bucket is reported as unlimited.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_rate_limit(
    octocrab: &Octocrab,
    resource: Resource,
) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let info = match resource {
        Resource::Core => RateLimitInfo::from(&rate_limit.resources.core),
        Resource::GraphQl => rate_limit.resources.graphql.as_ref().map_or(
            RateLimitInfo {
                remaining: u32::MAX,
                reset: 0,
                limit: u32::MAX,
            },
            RateLimitInfo::from,
        ),
    };
    debug!(
        resource = resource.as_str(),
        remaining = info.remaining,
        limit = info.limit,
        "Rate limit checked"
    );
    Ok(info)
}

/// Returns how long to wait before the next call, if at all.
///
/// No wait is needed while at least `MIN_REMAINING_THRESHOLD` requests are
/// left or once the reset time has passed. Waits are capped at
/// `MAX_WAIT_SECS`.
#[must_use]
pub fn wait_duration(info: &RateLimitInfo, now_secs: u64) -> Option<Duration> {
    if info.remaining >= MIN_REMAINING_THRESHOLD || info.reset <= now_secs {
        return None;
    }

    let wait_secs = info.reset - now_secs;
    if wait_secs > MAX_WAIT_SECS {
        warn!(
            wait_secs,
            max_wait = MAX_WAIT_SECS,
            "Rate limit reset too far in future, capping wait time"
        );
    }

    Some(Duration::from_secs(wait_secs.min(MAX_WAIT_SECS)))
}

/// Waits if the rate limit is low, returning true if we waited.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let Some(wait) = wait_duration(info, now) else {
        return false;
    };

    info!(
        remaining = info.remaining,
        wait_secs = wait.as_secs(),
        "Rate limit low, waiting for reset"
    );
    tokio::time::sleep(wait).await;
    true
}

/// Ensures sufficient rate limit before calling the API on `resource`.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_rate_limit(
    octocrab: &Octocrab,
    resource: Resource,
) -> Result<(), octocrab::Error> {
    let info = check_rate_limit(octocrab, resource).await?;
    wait_if_needed(&info).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(remaining: u32, reset: u64) -> RateLimitInfo {
        RateLimitInfo {
            remaining,
            reset,
            limit: 5000,
        }
    }

    #[test]
    fn no_wait_with_enough_budget() {
        assert_eq!(wait_duration(&info(100, 2_000), 1_000), None);
        assert_eq!(wait_duration(&info(MIN_REMAINING_THRESHOLD, 2_000), 1_000), None);
    }

    #[test]
    fn no_wait_once_reset_passed() {
        assert_eq!(wait_duration(&info(1, 1_000), 1_000), None);
        assert_eq!(wait_duration(&info(0, 0), 1_000), None);
    }

    #[test]
    fn waits_until_reset_when_low() {
        assert_eq!(
            wait_duration(&info(2, 1_030), 1_000),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn wait_is_capped() {
        assert_eq!(
            wait_duration(&info(0, 1_000 + 10 * MAX_WAIT_SECS), 1_000),
            Some(Duration::from_secs(MAX_WAIT_SECS))
        );
    }

    #[tokio::test]
    async fn test_wait_if_needed_no_wait() {
        let waited = wait_if_needed(&info(100, 0)).await;
        assert!(!waited);
    }

    #[tokio::test]
    async fn test_wait_if_needed_reset_passed() {
        let waited = wait_if_needed(&info(1, 0)).await;
        assert!(!waited);
    }
}
