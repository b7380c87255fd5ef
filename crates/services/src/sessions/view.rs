use quiz_core::model::{Difficulty, QuestionId, QuizSummary, TopicIndex};

use super::progress::SessionProgress;
use super::service::{QuizPhase, QuizSession};

/// Presentation-agnostic snapshot of what the user should see.
///
/// Carries raw values only; formatting is left to the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizView {
    Welcome {
        question_count: usize,
    },
    /// The question source could not be loaded; a manual reload may help.
    LoadFailed {
        message: String,
    },
    /// An empty `topics` list is the "no topics available" state.
    TopicSelection {
        topics: Vec<TopicEntry>,
    },
    Question(QuestionView),
    Feedback(FeedbackView),
    Results(ResultsView),
}

/// One row of the topic list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub name: String,
    pub question_count: usize,
}

impl TopicEntry {
    pub(crate) fn list(index: &TopicIndex<'_>) -> Vec<Self> {
        index
            .topics()
            .iter()
            .map(|topic| Self {
                name: (*topic).to_owned(),
                question_count: index.count_for(topic),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub topic: String,
    pub id: QuestionId,
    pub difficulty: Difficulty,
    pub text: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub flagged: bool,
    pub remaining_secs: u32,
    pub time_limit_secs: u32,
    pub progress: SessionProgress,
    pub score: usize,
    pub can_go_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    pub topic: String,
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: String,
    pub flagged: bool,
    pub progress: SessionProgress,
    pub score: usize,
    /// Moving on from here shows the results.
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub topic: String,
    pub summary: QuizSummary,
    pub flagged: Vec<QuestionId>,
}

impl QuizView {
    /// Project the session into the view for its current phase.
    ///
    /// `summary` is only used in the `Results` phase.
    pub(crate) fn from_session(session: &QuizSession, summary: Option<QuizSummary>) -> Option<Self> {
        match session.phase() {
            QuizPhase::InQuestion => QuestionView::from_session(session).map(Self::Question),
            QuizPhase::Feedback => FeedbackView::from_session(session).map(Self::Feedback),
            QuizPhase::Results => summary.map(|summary| {
                Self::Results(ResultsView {
                    topic: session.topic().to_owned(),
                    summary,
                    flagged: session.flagged().iter().cloned().collect(),
                })
            }),
        }
    }
}

impl QuestionView {
    fn from_session(session: &QuizSession) -> Option<Self> {
        let question = session.current_question()?;
        Some(Self {
            topic: session.topic().to_owned(),
            id: question.id().clone(),
            difficulty: question.difficulty(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            selected: session.selected_option(),
            flagged: session.is_flagged(question.id()),
            remaining_secs: session.countdown().remaining(),
            time_limit_secs: session.time_limit(),
            progress: session.progress(),
            score: session.score(),
            can_go_back: session.current_index() > 0,
        })
    }
}

impl FeedbackView {
    fn from_session(session: &QuizSession) -> Option<Self> {
        let question = session.current_question()?;
        let selected = session.selected_option()?;
        Some(Self {
            topic: session.topic().to_owned(),
            id: question.id().clone(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            selected,
            correct_index: question.answer_index(),
            is_correct: session.grade_for(session.current_index()).unwrap_or(false),
            explanation: question.explanation().to_owned(),
            flagged: session.is_flagged(question.id()),
            progress: session.progress(),
            score: session.score(),
            is_last: session.is_last_question(),
        })
    }
}
