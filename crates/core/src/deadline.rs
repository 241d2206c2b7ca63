use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Soft wall-clock limit checked between search steps.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// No limit; runs stop on their own step bounds.
    pub fn none() -> Self {
        Self { at: None }
    }

    pub fn at(instant: Instant) -> Self {
        Self { at: Some(instant) }
    }

    pub fn after(budget: Duration) -> Self {
        Self::at(Instant::now() + budget)
    }

    /// Absolute deadline given as milliseconds since the Unix epoch.
    /// A point already in the past yields an expired deadline.
    pub fn from_epoch_millis(ms: u64) -> Self {
        let target = UNIX_EPOCH + Duration::from_millis(ms);
        let left = target
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO);
        Self::after(left)
    }

    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_never_expires() {
        let d = Deadline::none();
        assert!(!d.is_expired());
        assert_eq!(d.remaining(), None);
    }

    #[test]
    fn past_epoch_is_expired() {
        assert!(Deadline::from_epoch_millis(0).is_expired());
    }

    #[test]
    fn future_epoch_is_live() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let d = Deadline::from_epoch_millis(now + 60_000);
        assert!(!d.is_expired());
        assert!(d.remaining().unwrap() > Duration::from_secs(30));
    }

    #[test]
    fn zero_budget_expires_immediately() {
        assert!(Deadline::after(Duration::ZERO).is_expired());
    }
}
