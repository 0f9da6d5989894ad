use std::time::{Duration, Instant};

/// How long parameter changes are coalesced before the live selection is recomputed
pub const LIVE_UPDATE_DEBOUNCE: Duration = Duration::from_millis(50);

/// Cancel-and-reschedule debouncing with a generation counter.
///
/// Each `schedule` supersedes the previous one and bumps the generation. A
/// run started for generation `g` may only commit while `is_current(g)`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: u64,
    due: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(LIVE_UPDATE_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            due: None,
        }
    }

    /// Schedule a run `window` after `now`, replacing any pending one.
    /// Returns the new generation.
    pub fn schedule(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        self.due = Some(now + self.window);
        self.generation
    }

    /// If the pending run is due, consume it and return its generation
    pub fn take_due(&mut self, now: Instant) -> Option<u64> {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                Some(self.generation)
            }
            _ => None,
        }
    }

    /// Drop the pending run and invalidate anything already in flight
    pub fn cancel(&mut self) {
        self.due = None;
        self.generation += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time left until the pending run is due, zero if overdue
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesces_rapid_changes() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(20));
        let last = debouncer.schedule(start + Duration::from_millis(40));

        // 50ms after the first change is not enough, the last one reset the timer
        assert_eq!(debouncer.take_due(start + Duration::from_millis(60)), None);
        assert_eq!(debouncer.take_due(start + Duration::from_millis(90)), Some(last));
        // Consumed
        assert_eq!(debouncer.take_due(start + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_newer_schedule_invalidates_older_generation() {
        let now = Instant::now();
        let mut debouncer = Debouncer::default();
        let first = debouncer.schedule(now);
        let second = debouncer.schedule(now);
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));

        debouncer.cancel();
        assert!(!debouncer.is_current(second));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_time_until_due() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        assert_eq!(debouncer.time_until_due(now), None);
        debouncer.schedule(now);
        assert_eq!(
            debouncer.time_until_due(now + Duration::from_millis(10)),
            Some(Duration::from_millis(40))
        );
        assert_eq!(
            debouncer.time_until_due(now + Duration::from_millis(80)),
            Some(Duration::ZERO)
        );
    }
}
