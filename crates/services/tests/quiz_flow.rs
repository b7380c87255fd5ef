use std::sync::Arc;

use quiz_core::time::{fixed_clock, fixed_now};
use services::{Command, ControllerError, Outcome, QuizController, QuizSettings, QuizView, Screen};
use storage::{InMemorySource, QuestionRecord};

fn record(id: &str, topic: &str, answer_index: usize) -> QuestionRecord {
    QuestionRecord {
        id: id.to_string(),
        topic: topic.to_string(),
        question: format!("{topic} question {id}?"),
        options: vec![
            "Option A".into(),
            "Option B".into(),
            "Option C".into(),
            "Option D".into(),
        ],
        answer_index,
        explanation: format!("{id} explained."),
    }
}

fn bank() -> InMemorySource {
    InMemorySource::new(vec![
        record("Q1", "Infrastructure as Code", 0),
        record("Q2", "Version Control Systems", 1),
        record("Q3", "Infrastructure as Code", 2),
        record("Q14", "Infrastructure as Code", 3),
        record("Q25", "Infrastructure as Code", 1),
    ])
}

async fn loaded(settings: QuizSettings) -> QuizController {
    let (mut controller, _rx) = QuizController::new(fixed_clock(), settings, Arc::new(bank()));
    controller.load().await.unwrap();
    controller
}

async fn send(controller: &mut QuizController, command: Command) -> Outcome {
    controller.dispatch(command.into()).await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn three_of_four_correct_is_seventy_five_percent() {
    let mut controller = loaded(QuizSettings::default()).await;
    assert_eq!(controller.view(), QuizView::Welcome { question_count: 5 });

    send(&mut controller, Command::ShowTopics).await;
    send(&mut controller, Command::StartQuiz("Infrastructure as Code".into())).await;

    // correct answers are 0, 2, 3, 1
    for (step, option) in [0, 2, 0, 1].into_iter().enumerate() {
        let QuizView::Question(question) = controller.view() else {
            panic!("expected a question at step {step}");
        };
        assert_eq!(question.progress.position, step + 1);
        assert_eq!(question.progress.total, 4);

        send(&mut controller, Command::SelectOption(option)).await;
        send(&mut controller, Command::Submit).await;
        assert!(matches!(controller.view(), QuizView::Feedback(_)));
        send(&mut controller, Command::Next).await;
    }

    let QuizView::Results(results) = controller.view() else {
        panic!("expected results");
    };
    assert_eq!(results.topic, "Infrastructure as Code");
    assert_eq!(results.summary.total(), 4);
    assert_eq!(results.summary.correct(), 3);
    assert_eq!(results.summary.accuracy(), 75);
    assert_eq!(results.summary.accuracy_for("Infrastructure as Code"), Some(75));
    assert_eq!(results.summary.completed_at(), fixed_now());
}

#[tokio::test(start_paused = true)]
async fn reviewing_a_question_does_not_double_count() {
    let mut controller = loaded(QuizSettings::default()).await;
    send(&mut controller, Command::StartQuiz("Infrastructure as Code".into())).await;

    send(&mut controller, Command::SelectOption(0)).await;
    send(&mut controller, Command::Submit).await;
    send(&mut controller, Command::Next).await;
    send(&mut controller, Command::Prev).await;

    let QuizView::Question(question) = controller.view() else {
        panic!("expected the first question again");
    };
    assert_eq!(question.id.as_str(), "Q1");
    assert_eq!(question.selected, Some(0));

    send(&mut controller, Command::Submit).await;
    let session = controller.session().unwrap();
    assert_eq!(session.score(), 1);
    assert_eq!(session.answered_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn prev_on_first_question_is_unchanged() {
    let mut controller = loaded(QuizSettings::default()).await;
    send(&mut controller, Command::StartQuiz("Version Control Systems".into())).await;
    let before = controller.view();

    assert_eq!(send(&mut controller, Command::Prev).await, Outcome::Unchanged);
    assert_eq!(controller.view(), before);
}

#[tokio::test(start_paused = true)]
async fn submit_without_selection_reports_an_error() {
    let mut controller = loaded(QuizSettings::default()).await;
    send(&mut controller, Command::StartQuiz("Version Control Systems".into())).await;

    let err = controller.dispatch(Command::Submit.into()).await.unwrap_err();

    assert_eq!(err.to_string(), "select an answer before submitting");
    assert!(matches!(err, ControllerError::Session(_)));
    assert!(matches!(controller.view(), QuizView::Question(_)));
}

#[tokio::test(start_paused = true)]
async fn flags_show_up_in_results() {
    let mut controller = loaded(QuizSettings::default()).await;
    send(&mut controller, Command::StartQuiz("Version Control Systems".into())).await;
    send(&mut controller, Command::ToggleFlag).await;
    send(&mut controller, Command::SelectOption(1)).await;
    send(&mut controller, Command::Submit).await;

    let QuizView::Feedback(feedback) = controller.view() else {
        panic!("expected feedback");
    };
    assert!(feedback.flagged);
    assert!(feedback.is_correct);
    assert!(feedback.is_last);

    send(&mut controller, Command::Next).await;
    let QuizView::Results(results) = controller.view() else {
        panic!("expected results");
    };
    assert_eq!(results.flagged.len(), 1);
    assert_eq!(results.summary.accuracy(), 100);
}

#[tokio::test(start_paused = true)]
async fn timer_expiry_auto_submits_the_first_option() {
    let settings = QuizSettings::default().with_time_limit(3);
    let (mut controller, mut rx) =
        QuizController::new(fixed_clock(), settings, Arc::new(bank()));
    controller.load().await.unwrap();
    send(&mut controller, Command::StartQuiz("Infrastructure as Code".into())).await;

    let mut outcomes = Vec::new();
    while !matches!(outcomes.last(), Some(Outcome::TimedOut)) {
        let event = rx.recv().await.unwrap();
        outcomes.push(controller.dispatch(event).await.unwrap());
    }

    assert_eq!(
        outcomes,
        [
            Outcome::Tick { remaining: 2 },
            Outcome::Tick { remaining: 1 },
            Outcome::TimedOut,
        ]
    );
    let session = controller.session().unwrap();
    assert_eq!(session.answer_for(0), Some(0));
    assert_eq!(session.score(), 1);
    assert_eq!(session.total_time_used(), 3);
}

#[tokio::test(start_paused = true)]
async fn change_topic_discards_the_session() {
    let mut controller = loaded(QuizSettings::default()).await;
    send(&mut controller, Command::StartQuiz("Infrastructure as Code".into())).await;
    send(&mut controller, Command::SelectOption(0)).await;

    send(&mut controller, Command::ChangeTopic).await;

    assert_eq!(controller.screen(), Screen::TopicSelection);
    assert!(controller.session().is_none());

    send(&mut controller, Command::StartQuiz("Infrastructure as Code".into())).await;
    let session = controller.session().unwrap();
    assert_eq!(session.selected_option(), None);
    assert_eq!(session.score(), 0);
}
