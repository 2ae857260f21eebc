//! Rate-limiting utilities for event dispatch.

mod debounce;
mod throttle;

pub use debounce::Debouncer;
pub use throttle::Throttler;

use std::time::Duration;

/// Convert a configured millisecond delay into a duration.
///
/// Negative delays clamp to zero rather than erroring.
pub fn clamp_delay_millis(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_delay_millis() {
        assert_eq!(clamp_delay_millis(250), Duration::from_millis(250));
        assert_eq!(clamp_delay_millis(0), Duration::ZERO);
        assert_eq!(clamp_delay_millis(-40), Duration::ZERO);
    }
}
