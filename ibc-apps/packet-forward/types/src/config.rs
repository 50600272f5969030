//! Static configuration of the middleware.

use core::time::Duration;

/// Retries when the metadata does not set `retries`.
pub const DEFAULT_RETRIES_ON_TIMEOUT: u8 = 0;

/// Timeout of forwarded packets when the metadata does not set one.
pub const DEFAULT_FORWARD_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Upper bound of the timeout a sender may request.
pub const DEFAULT_REFUND_TIMEOUT: Duration = Duration::from_secs(28 * 24 * 60 * 60);

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForwardConfig {
    pub retries_on_timeout: u8,
    pub forward_timeout: Duration,
    /// Longest time funds may stay in flight on this chain; longer forward
    /// timeouts requested in the memo are capped to it.
    pub refund_timeout: Duration,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            retries_on_timeout: DEFAULT_RETRIES_ON_TIMEOUT,
            forward_timeout: DEFAULT_FORWARD_TIMEOUT,
            refund_timeout: DEFAULT_REFUND_TIMEOUT,
        }
    }
}

impl ForwardConfig {
    /// Timeout applied to a forward: the requested one if set, else the
    /// default, never more than the refund timeout.
    pub fn effective_timeout(&self, requested: Option<Duration>) -> Duration {
        requested
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(self.forward_timeout)
            .min(self.refund_timeout)
    }

    pub fn effective_retries(&self, requested: Option<u8>) -> u8 {
        requested.unwrap_or(self.retries_on_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_metadata_is_silent() {
        let config = ForwardConfig::default();
        assert_eq!(config.effective_timeout(None), DEFAULT_FORWARD_TIMEOUT);
        assert_eq!(config.effective_timeout(Some(Duration::ZERO)), DEFAULT_FORWARD_TIMEOUT);
        assert_eq!(
            config.effective_timeout(Some(Duration::from_secs(30))),
            Duration::from_secs(30)
        );
        assert_eq!(
            config.effective_timeout(Some(Duration::from_secs(365 * 24 * 60 * 60))),
            DEFAULT_REFUND_TIMEOUT
        );
        assert_eq!(config.effective_retries(None), 0);
        assert_eq!(config.effective_retries(Some(3)), 3);
    }
}
