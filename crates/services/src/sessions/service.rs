use chrono::{DateTime, Utc};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use quiz_core::model::{Question, QuestionId, TopicIndex};
use quiz_core::{Countdown, CountdownTick};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where a running quiz currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// A question is shown and its countdown runs.
    InQuestion,
    /// The current question was submitted; its result is shown.
    Feedback,
    /// Every question was passed; only `restart` or a topic change leave this.
    Results,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuizPhase::InQuestion => "question",
            QuizPhase::Feedback => "feedback",
            QuizPhase::Results => "results",
        })
    }
}

/// Effect of a timer tick on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Running { remaining: u32 },
    /// The countdown ran out and the answer was submitted automatically.
    Expired,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz over the questions of a single topic.
///
/// Steps through the questions in order. Every answer is graded when it is
/// submitted; submitting the same question again replaces its grade instead
/// of adding to the score.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    topic: String,
    questions: Vec<Question>,
    current: usize,
    phase: QuizPhase,
    answers: BTreeMap<usize, usize>,
    graded: BTreeMap<usize, bool>,
    flagged: BTreeSet<QuestionId>,
    total_time_used: u32,
    countdown: Countdown,
    time_limit: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a quiz over every question of `topic`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyTopic` if the topic has no questions.
    pub fn start(
        index: &TopicIndex<'_>,
        topic: &str,
        time_limit: u32,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::from_questions(topic, index.questions_for(topic), time_limit, started_at)
    }

    /// Start a quiz over an explicit question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyTopic` if `questions` is empty.
    pub fn from_questions(
        topic: impl Into<String>,
        questions: Vec<Question>,
        time_limit: u32,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let topic = topic.into();
        if questions.is_empty() {
            return Err(SessionError::EmptyTopic { topic });
        }

        let mut countdown = Countdown::new(time_limit);
        countdown.start(time_limit);
        debug!(
            "[Session] Started {:?} with {} questions",
            topic,
            questions.len()
        );

        Ok(Self {
            topic,
            questions,
            current: 0,
            phase: QuizPhase::InQuestion,
            answers: BTreeMap::new(),
            graded: BTreeMap::new(),
            flagged: BTreeSet::new(),
            total_time_used: 0,
            countdown,
            time_limit,
            started_at,
            completed_at: None,
        })
    }

    /// Start over on the same topic, dropping every answer, grade and flag.
    pub fn restart(&mut self, started_at: DateTime<Utc>) {
        self.countdown.stop();
        self.current = 0;
        self.phase = QuizPhase::InQuestion;
        self.answers.clear();
        self.graded.clear();
        self.flagged.clear();
        self.total_time_used = 0;
        self.started_at = started_at;
        self.completed_at = None;
        self.countdown.start(self.time_limit);
        debug!("[Session] Restarted {:?}", self.topic);
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions in this session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the current question; equals `len()` once the quiz is over.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Results
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Option recorded for the current question, if any.
    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        self.answers.get(&self.current).copied()
    }

    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    /// Grade of the last submission for `index`, `None` if never submitted.
    #[must_use]
    pub fn grade_for(&self, index: usize) -> Option<bool> {
        self.graded.get(&index).copied()
    }

    /// Correct answers as of each question's last submission.
    ///
    /// Selecting a different option on a reviewed question does not change
    /// the score until that question is submitted again.
    #[must_use]
    pub fn score(&self) -> usize {
        self.graded.values().filter(|correct| **correct).count()
    }

    /// Number of questions submitted at least once.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.graded.len()
    }

    #[must_use]
    pub fn flagged(&self) -> &BTreeSet<QuestionId> {
        &self.flagged
    }

    #[must_use]
    pub fn is_flagged(&self, id: &QuestionId) -> bool {
        self.flagged.contains(id)
    }

    /// Seconds spent on submitted questions.
    #[must_use]
    pub fn total_time_used(&self) -> u32 {
        self.total_time_used
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(
            self.current,
            self.questions.len(),
            self.answered_count(),
            self.is_complete(),
        )
    }

    fn ensure_phase(&self, expected: QuizPhase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                phase: self.phase,
            })
        }
    }

    /// Record `option` as the answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InQuestion` and
    /// `SessionError::OptionOutOfRange` if the option does not exist.
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        self.ensure_phase(QuizPhase::InQuestion, "select an option")?;
        let len = self
            .current_question()
            .map_or(0, Question::option_count);
        if option >= len {
            return Err(SessionError::OptionOutOfRange { index: option, len });
        }
        self.answers.insert(self.current, option);
        Ok(())
    }

    /// Grade the recorded answer of the current question and show feedback.
    ///
    /// Returns whether the answer was correct.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAnswerSelected` if nothing was selected, or
    /// `SessionError::InvalidState` outside `InQuestion`. Nothing changes on error.
    pub fn submit_answer(&mut self) -> Result<bool, SessionError> {
        self.ensure_phase(QuizPhase::InQuestion, "submit an answer")?;
        let Some(choice) = self.selected_option() else {
            return Err(SessionError::NoAnswerSelected);
        };
        let Some(question) = self.questions.get(self.current) else {
            return Err(SessionError::InvalidState {
                action: "submit an answer",
                phase: self.phase,
            });
        };
        let correct = question.is_correct(choice);

        self.countdown.stop();
        self.total_time_used = self.total_time_used.saturating_add(self.countdown.elapsed());
        self.graded.insert(self.current, correct);
        self.phase = QuizPhase::Feedback;

        debug!(
            "[Session] Question {} answered with option {} (correct: {})",
            self.current, choice, correct
        );
        Ok(correct)
    }

    /// Timer expiry: pick the first option if nothing was selected, then submit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InQuestion`.
    pub fn auto_submit(&mut self) -> Result<bool, SessionError> {
        self.ensure_phase(QuizPhase::InQuestion, "submit an answer")?;
        if self.selected_option().is_none() {
            self.select_option(0)?;
        }
        self.submit_answer()
    }

    /// Leave feedback for the next question, or for the results after the last one.
    ///
    /// `now` is recorded as the completion time when the quiz ends.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Feedback`.
    pub fn next_question(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, SessionError> {
        self.ensure_phase(QuizPhase::Feedback, "move to the next question")?;
        self.current += 1;
        if self.current >= self.questions.len() {
            self.current = self.questions.len();
            self.countdown.stop();
            self.phase = QuizPhase::Results;
            self.completed_at = Some(now);
            debug!(
                "[Session] Completed {:?}: {}/{}",
                self.topic,
                self.score(),
                self.questions.len()
            );
        } else {
            self.countdown.start(self.time_limit);
            self.phase = QuizPhase::InQuestion;
        }
        Ok(self.phase)
    }

    /// Go back one question for review.
    ///
    /// Returns `false` without changing anything on the first question.
    /// Time spent on the question being left is not accrued.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InQuestion`.
    pub fn prev_question(&mut self) -> Result<bool, SessionError> {
        self.ensure_phase(QuizPhase::InQuestion, "go back")?;
        if self.current == 0 {
            return Ok(false);
        }
        self.countdown.stop();
        self.current -= 1;
        self.countdown.start(self.time_limit);
        Ok(true)
    }

    /// Flag or unflag the current question. Returns the new flag state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` once the quiz is over.
    pub fn toggle_flag(&mut self) -> Result<bool, SessionError> {
        let Some(id) = self.current_question().map(|q| q.id().clone()) else {
            return Err(SessionError::InvalidState {
                action: "flag a question",
                phase: self.phase,
            });
        };
        if self.flagged.remove(&id) {
            Ok(false)
        } else {
            self.flagged.insert(id);
            Ok(true)
        }
    }

    /// Advance the countdown by one second, auto-submitting on expiry.
    ///
    /// Ticks produced for another countdown `epoch` are ignored.
    ///
    /// # Errors
    ///
    /// Propagates errors from `auto_submit`.
    pub fn tick(&mut self, epoch: u64) -> Result<TickOutcome, SessionError> {
        if self.phase != QuizPhase::InQuestion || epoch != self.countdown.epoch() {
            return Ok(TickOutcome::Ignored);
        }
        match self.countdown.tick() {
            CountdownTick::Idle => Ok(TickOutcome::Ignored),
            CountdownTick::Running { remaining } => Ok(TickOutcome::Running { remaining }),
            CountdownTick::Expired => {
                self.auto_submit()?;
                Ok(TickOutcome::Expired)
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
