use serde::{Deserialize, Serialize};
use spelldrill_domain::{CompletedResults, SessionResults};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyTier {
    Strong,
    Fair,
    Weak,
}

impl AccuracyTier {
    pub fn from_percentage(percentage: f32) -> Self {
        if percentage >= 80.0 {
            AccuracyTier::Strong
        } else if percentage >= 50.0 {
            AccuracyTier::Fair
        } else {
            AccuracyTier::Weak
        }
    }
}

/// Summary view over the backend's verdict for a finished session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionAnalytics {
    pub results: CompletedResults,
}

impl SessionAnalytics {
    pub fn new(results: CompletedResults) -> Self {
        Self { results }
    }

    pub fn tier(&self) -> AccuracyTier {
        AccuracyTier::from_percentage(self.results.accuracy_percentage)
    }

    pub fn is_task_complete(&self) -> bool {
        self.results.mastered || self.results.accuracy_percentage >= 100.0
    }

    pub fn suggests_retry(&self) -> bool {
        !self.is_task_complete() && self.results.accuracy_percentage < 70.0
    }

    pub fn headline(&self) -> &'static str {
        if self.is_task_complete() {
            return "Task mastered!";
        }
        match self.tier() {
            AccuracyTier::Strong => "Great work!",
            AccuracyTier::Fair => "Good effort, keep practicing.",
            AccuracyTier::Weak => "Let's try this one again.",
        }
    }
}

/// Percentage of words counted correct on this device.
pub fn local_accuracy(results: &SessionResults) -> f32 {
    if results.total == 0 {
        return 0.0;
    }
    results.correct as f32 * 100.0 / results.total as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn analytics(accuracy: f32, mastered: bool) -> SessionAnalytics {
        SessionAnalytics::new(CompletedResults {
            accuracy_percentage: accuracy,
            total_words: 4,
            mastered,
            ..CompletedResults::default()
        })
    }

    #[test]
    fn tiers_follow_accuracy() {
        assert_eq!(analytics(95.0, false).tier(), AccuracyTier::Strong);
        assert_eq!(analytics(80.0, false).tier(), AccuracyTier::Strong);
        assert_eq!(analytics(50.0, false).tier(), AccuracyTier::Fair);
        assert_eq!(analytics(49.9, false).tier(), AccuracyTier::Weak);
    }

    #[test]
    fn mastery_completes_the_task() {
        assert!(analytics(100.0, false).is_task_complete());
        assert!(analytics(60.0, true).is_task_complete());
        assert!(!analytics(60.0, true).suggests_retry());
        assert!(analytics(60.0, false).suggests_retry());
        assert!(!analytics(75.0, false).suggests_retry());
        assert_eq!(analytics(100.0, true).headline(), "Task mastered!");
    }

    #[test]
    fn local_accuracy_handles_empty_sessions() {
        assert_relative_eq!(local_accuracy(&SessionResults::default()), 0.0);
        let results = SessionResults {
            correct: 3,
            total: 4,
            attempts: Vec::new(),
        };
        assert_relative_eq!(local_accuracy(&results), 75.0);
    }
}
