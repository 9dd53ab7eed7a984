//! Rate limit information.

use octocrab::models::Rate;

/// GitHub rate limit bucket a call is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// REST calls: issue lookup and the report issue update.
    Core,
    /// GraphQL calls: issue pages.
    GraphQl,
}

impl Resource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::GraphQl => "graphql",
        }
    }
}

/// Rate limit information for a specific resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl From<&Rate> for RateLimitInfo {
    fn from(rate: &Rate) -> Self {
        Self {
            remaining: u32::try_from(rate.remaining).unwrap_or(u32::MAX),
            reset: rate.reset,
            limit: u32::try_from(rate.limit).unwrap_or(u32::MAX),
        }
    }
}
