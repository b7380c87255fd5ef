use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many questions for a single quiz: {len}")]
    TooManyQuestions { len: usize },
}

/// Rounded percentage of `correct` over `total`, half rounding up.
///
/// A `total` of zero yields 0 instead of dividing by zero.
#[must_use]
pub fn accuracy_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let percent = (correct * 200 + total) / (total * 2);
    u8::try_from(percent).unwrap_or(100)
}

/// How a single quiz question ended up, as input to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome<'a> {
    pub topic: &'a str,
    /// `None` when the question was never graded.
    pub correct: Option<bool>,
}

/// Accuracy for one topic, over the questions actually answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicAccuracy {
    pub topic: String,
    pub answered: u32,
    pub correct: u32,
    pub accuracy: u8,
}

/// Aggregate result of a finished (or abandoned) quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: u32,
    answered: u32,
    correct: u32,
    accuracy: u8,
    per_topic: Vec<TopicAccuracy>,
    total_time_used: u32,
}

impl QuizSummary {
    /// Aggregate per-question outcomes.
    ///
    /// Overall accuracy is measured against every question in the quiz;
    /// per-topic accuracy only against the questions that were answered.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SummaryError::TooManyQuestions` if the outcome count cannot fit in `u32`.
    pub fn from_outcomes(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        outcomes: &[AnswerOutcome<'_>],
        total_time_used: u32,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        let total = u32::try_from(outcomes.len())
            .map_err(|_| SummaryError::TooManyQuestions { len: outcomes.len() })?;

        let mut per_topic: Vec<TopicAccuracy> = Vec::new();
        let mut answered = 0_u32;
        let mut correct = 0_u32;

        for outcome in outcomes {
            let slot = match per_topic.iter().position(|t| t.topic == outcome.topic) {
                Some(pos) => pos,
                None => {
                    per_topic.push(TopicAccuracy {
                        topic: outcome.topic.to_string(),
                        answered: 0,
                        correct: 0,
                        accuracy: 0,
                    });
                    per_topic.len() - 1
                }
            };
            let Some(was_correct) = outcome.correct else {
                continue;
            };
            let entry = &mut per_topic[slot];
            entry.answered += 1;
            answered += 1;
            if was_correct {
                entry.correct += 1;
                correct += 1;
            }
        }

        for entry in &mut per_topic {
            entry.accuracy = accuracy_percent(entry.correct, entry.answered);
        }

        Ok(Self {
            started_at,
            completed_at,
            total,
            answered,
            correct,
            accuracy: accuracy_percent(correct, total),
            per_topic,
            total_time_used,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Overall accuracy in percent.
    #[must_use]
    pub fn accuracy(&self) -> u8 {
        self.accuracy
    }

    #[must_use]
    pub fn per_topic(&self) -> &[TopicAccuracy] {
        &self.per_topic
    }

    #[must_use]
    pub fn accuracy_for(&self, topic: &str) -> Option<u8> {
        self.per_topic
            .iter()
            .find(|t| t.topic == topic)
            .map(|t| t.accuracy)
    }

    /// Seconds spent on submitted questions.
    #[must_use]
    pub fn total_time_used(&self) -> u32 {
        self.total_time_used
    }
}
