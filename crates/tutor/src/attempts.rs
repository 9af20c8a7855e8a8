use serde::{Deserialize, Serialize};
use spelldrill_domain::TaskType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry { attempt: u32 },
    Exhausted,
}

/// Per-word attempt counter; always within `1..=max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptTracker {
    attempt: u32,
    max: u32,
}

impl AttemptTracker {
    pub fn new(max: u32) -> Self {
        Self {
            attempt: 1,
            max: max.max(1),
        }
    }

    pub fn for_task(task_type: TaskType) -> Self {
        Self::new(task_type.max_attempts())
    }

    pub fn current(&self) -> u32 {
        self.attempt
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn remaining(&self) -> u32 {
        self.max - self.attempt
    }

    pub fn register_miss(&mut self) -> RetryDecision {
        if self.attempt < self.max {
            self.attempt += 1;
            RetryDecision::Retry {
                attempt: self.attempt,
            }
        } else {
            RetryDecision::Exhausted
        }
    }

    pub fn reset(&mut self) {
        self.attempt = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practice_allows_two_retries() {
        let mut tracker = AttemptTracker::for_task(TaskType::Practice);
        assert_eq!(tracker.current(), 1);
        assert_eq!(tracker.register_miss(), RetryDecision::Retry { attempt: 2 });
        assert_eq!(tracker.register_miss(), RetryDecision::Retry { attempt: 3 });
        assert_eq!(tracker.register_miss(), RetryDecision::Exhausted);
        assert_eq!(tracker.current(), 3);
        tracker.reset();
        assert_eq!(tracker.remaining(), 2);
    }

    #[test]
    fn test_mode_exhausts_immediately() {
        let mut tracker = AttemptTracker::for_task(TaskType::Test);
        assert_eq!(tracker.max(), 1);
        assert_eq!(tracker.register_miss(), RetryDecision::Exhausted);
        assert_eq!(tracker.current(), 1);
    }

    #[test]
    fn attempt_never_exceeds_max() {
        for max in 0..5 {
            let mut tracker = AttemptTracker::new(max);
            for _ in 0..10 {
                tracker.register_miss();
                assert!((1..=tracker.max()).contains(&tracker.current()));
            }
        }
    }
}
