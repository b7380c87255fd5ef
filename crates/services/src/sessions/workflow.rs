use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use quiz_core::model::QuizSummary;
use quiz_core::DEFAULT_TIME_LIMIT_SECS;
use storage::{QuestionSource, QuestionStore};

use super::results::summarize;
use super::service::{QuizPhase, QuizSession, TickOutcome};
use super::ticker::Ticker;
use super::view::{QuizView, TopicEntry};
use crate::error::{ControllerError, SessionError};
use crate::Clock;

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// User intent forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowTopics,
    StartQuiz(String),
    SelectOption(usize),
    Submit,
    Next,
    Prev,
    ToggleFlag,
    Restart,
    /// Abandon the running quiz and pick another topic.
    ChangeTopic,
    /// Fetch the question source again.
    Reload,
}

/// Everything that can change controller state, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Command(Command),
    /// Emitted by the ticker; `generation` identifies the task that sent it.
    Tick { generation: u64 },
}

impl From<Command> for QuizEvent {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

/// Screens outside of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    TopicSelection,
    Quiz,
}

/// What a dispatched event did, so the front end knows how much to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Unchanged,
    /// The countdown moved; only the timer needs redrawing.
    Tick { remaining: u32 },
    /// The countdown expired and the answer was submitted for the user.
    TimedOut,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    pub time_limit_secs: u32,
    pub tick_period: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            tick_period: Duration::from_secs(1),
        }
    }
}

impl QuizSettings {
    /// Per-question limit in seconds, at least one.
    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs.max(1);
        self
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns the question bank, the running session and its ticker.
///
/// Every state change goes through [`QuizController::dispatch`]; ticks and
/// commands share one channel so they are applied strictly in order.
pub struct QuizController {
    clock: Clock,
    settings: QuizSettings,
    source: Arc<dyn QuestionSource>,
    store: QuestionStore,
    load_error: Option<String>,
    screen: Screen,
    session: Option<QuizSession>,
    summary: Option<QuizSummary>,
    ticker: Ticker,
    events: UnboundedSender<QuizEvent>,
}

impl QuizController {
    /// Build a controller and the receiving end of its event channel.
    ///
    /// Nothing is loaded until [`QuizController::load`] runs.
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        source: Arc<dyn QuestionSource>,
    ) -> (Self, UnboundedReceiver<QuizEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            clock,
            settings,
            source,
            store: QuestionStore::empty(),
            load_error: None,
            screen: Screen::Welcome,
            session: None,
            summary: None,
            ticker: Ticker::new(),
            events,
        };
        (controller, receiver)
    }

    /// Fetch the question bank, discarding any running session.
    ///
    /// On failure the store is left empty and the error is kept for the view.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Load` when the source cannot be read or parsed.
    pub async fn load(&mut self) -> Result<(), ControllerError> {
        self.end_session();
        self.screen = Screen::Welcome;
        match QuestionStore::load(self.source.as_ref()).await {
            Ok(store) => {
                self.store = store;
                self.load_error = None;
                Ok(())
            }
            Err(err) => {
                self.store = QuestionStore::empty();
                self.load_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Sender for feeding commands into the event loop.
    #[must_use]
    pub fn events(&self) -> UnboundedSender<QuizEvent> {
        self.events.clone()
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Message of the last failed load, if the bank is currently unavailable.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    /// Apply one event, then bring the ticker in line with the countdown.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Session` for commands that are invalid in the
    /// current state and `ControllerError::Load` when a reload fails. State is
    /// left consistent either way.
    pub async fn dispatch(&mut self, event: QuizEvent) -> Result<Outcome, ControllerError> {
        let result = match event {
            QuizEvent::Command(command) => self.apply(command).await,
            QuizEvent::Tick { generation } => self.on_tick(generation).map_err(Into::into),
        };
        self.sync_ticker();
        result
    }

    async fn apply(&mut self, command: Command) -> Result<Outcome, ControllerError> {
        debug!("[Quiz] Command {command:?}");
        match command {
            Command::ShowTopics => {
                self.end_session();
                self.screen = Screen::TopicSelection;
            }
            Command::StartQuiz(topic) => {
                let session = QuizSession::start(
                    &self.store.topic_index(),
                    &topic,
                    self.settings.time_limit_secs,
                    self.clock.now(),
                )?;
                self.end_session();
                info!("[Quiz] Starting {topic:?} with {} questions", session.len());
                self.session = Some(session);
                self.screen = Screen::Quiz;
            }
            Command::SelectOption(option) => self.session_mut()?.select_option(option)?,
            Command::Submit => {
                self.session_mut()?.submit_answer()?;
            }
            Command::Next => {
                let now = self.clock.now();
                let session = self.session_mut()?;
                // A clock stepping backwards must not make the summary fail.
                let completed_at = now.max(session.started_at());
                if session.next_question(completed_at)? == QuizPhase::Results {
                    let summary = summarize(session, completed_at)?;
                    info!(
                        "[Quiz] Finished {:?}: {}/{} ({}%)",
                        session.topic(),
                        summary.correct(),
                        summary.total(),
                        summary.accuracy()
                    );
                    self.summary = Some(summary);
                }
            }
            Command::Prev => {
                if !self.session_mut()?.prev_question()? {
                    return Ok(Outcome::Unchanged);
                }
            }
            Command::ToggleFlag => {
                self.session_mut()?.toggle_flag()?;
            }
            Command::Restart => {
                let now = self.clock.now();
                self.session_mut()?.restart(now);
                self.summary = None;
            }
            Command::ChangeTopic => {
                if self.session.is_none() {
                    return Err(SessionError::NoSession.into());
                }
                self.end_session();
                self.screen = Screen::TopicSelection;
            }
            Command::Reload => self.load().await?,
        }
        Ok(Outcome::Updated)
    }

    fn on_tick(&mut self, generation: u64) -> Result<Outcome, SessionError> {
        if !self.ticker.accepts(generation) {
            warn!("[Quiz] Dropping stale tick from generation {generation}");
            return Ok(Outcome::Unchanged);
        }
        let (Some(epoch), Some(session)) = (self.ticker.driving(), self.session.as_mut()) else {
            return Ok(Outcome::Unchanged);
        };
        Ok(match session.tick(epoch)? {
            TickOutcome::Ignored => Outcome::Unchanged,
            TickOutcome::Running { remaining } => Outcome::Tick { remaining },
            TickOutcome::Expired => {
                info!("[Quiz] Time is up, answer submitted");
                Outcome::TimedOut
            }
        })
    }

    /// Run the ticker exactly while the session countdown runs, restarting it
    /// whenever a new countdown begins.
    pub fn sync_ticker(&mut self) {
        let wanted = self
            .session
            .as_ref()
            .map(QuizSession::countdown)
            .filter(|countdown| countdown.is_running())
            .map(|countdown| countdown.epoch());

        if wanted == self.ticker.driving() {
            return;
        }
        match wanted {
            Some(epoch) => {
                self.ticker
                    .start(epoch, self.settings.tick_period, self.events.clone());
            }
            None => self.ticker.stop(),
        }
    }

    /// Project current state for the presentation layer.
    #[must_use]
    pub fn view(&self) -> QuizView {
        match self.screen {
            Screen::Welcome => match &self.load_error {
                Some(message) => QuizView::LoadFailed {
                    message: message.clone(),
                },
                None => QuizView::Welcome {
                    question_count: self.store.len(),
                },
            },
            Screen::TopicSelection => match &self.load_error {
                Some(message) => QuizView::LoadFailed {
                    message: message.clone(),
                },
                None => self.topic_view(),
            },
            Screen::Quiz => self
                .session
                .as_ref()
                .and_then(|session| QuizView::from_session(session, self.summary.clone()))
                .unwrap_or_else(|| self.topic_view()),
        }
    }

    fn topic_view(&self) -> QuizView {
        QuizView::TopicSelection {
            topics: TopicEntry::list(&self.store.topic_index()),
        }
    }

    fn session_mut(&mut self) -> Result<&mut QuizSession, SessionError> {
        self.session.as_mut().ok_or(SessionError::NoSession)
    }

    fn end_session(&mut self) {
        self.ticker.stop();
        self.session = None;
        self.summary = None;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
