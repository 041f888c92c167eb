use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Caller-side bounds for a single call: an optional deadline and a
/// cancellation token.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl Context {
    /// No deadline, never cancelled unless the token is triggered
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Time left for a call capped at `ceiling`; the tighter bound wins
    pub fn effective_timeout(&self, ceiling: Duration) -> Duration {
        match self.deadline {
            Some(deadline) => ceiling.min(deadline.saturating_duration_since(Instant::now())),
            None => ceiling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CEILING: Duration = Duration::from_secs(20);

    #[test]
    fn test_no_deadline_uses_ceiling() {
        assert_eq!(Context::background().effective_timeout(CEILING), CEILING);
    }

    #[test]
    fn test_tighter_deadline_wins() {
        let ctx = Context::background().with_timeout(Duration::from_secs(2));
        let timeout = ctx.effective_timeout(CEILING);
        assert!(timeout <= Duration::from_secs(2));
        assert!(timeout > Duration::from_secs(1));
    }

    #[test]
    fn test_looser_deadline_capped() {
        let ctx = Context::background().with_timeout(Duration::from_secs(600));
        assert_eq!(ctx.effective_timeout(CEILING), CEILING);
    }

    #[test]
    fn test_expired_deadline_is_zero() {
        let ctx = Context::background().with_deadline(Instant::now() - Duration::from_secs(1));
        assert_eq!(ctx.effective_timeout(CEILING), Duration::ZERO);
    }

    #[test]
    fn test_shared_token() {
        let token = CancellationToken::new();
        let ctx = Context::background().with_cancellation(token.clone());
        token.cancel();
        assert!(ctx.cancellation().is_cancelled());
    }
}
