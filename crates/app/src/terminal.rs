//! Line-based terminal front end: turns typed keys into commands and views
//! into text.

use colored::Colorize;
use std::fmt::Write as _;

use services::{Command, ControllerError, FeedbackView, QuestionView, QuizView, ResultsView};

/// What a line of user input means on the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Quit,
    Unknown(String),
}

/// Interpret one line of input against the view the user is looking at.
#[must_use]
pub fn parse_input(view: &QuizView, line: &str) -> Input {
    let key = line.trim().to_lowercase();
    let in_quiz = matches!(
        view,
        QuizView::Question(_) | QuizView::Feedback(_) | QuizView::Results(_)
    );

    match key.as_str() {
        "q" => return Input::Quit,
        "l" => return Input::Command(Command::Reload),
        "t" if in_quiz => return Input::Command(Command::ChangeTopic),
        "t" => return Input::Command(Command::ShowTopics),
        _ => {}
    }

    let command = match view {
        QuizView::Welcome { .. } | QuizView::LoadFailed { .. } => {
            key.is_empty().then_some(Command::ShowTopics)
        }
        QuizView::TopicSelection { topics } => number(&key, topics.len())
            .and_then(|i| topics.get(i))
            .map(|entry| Command::StartQuiz(entry.name.clone())),
        QuizView::Question(question) => match key.as_str() {
            "" | "s" => Some(Command::Submit),
            "p" => Some(Command::Prev),
            "f" => Some(Command::ToggleFlag),
            other => number(other, question.options.len()).map(Command::SelectOption),
        },
        QuizView::Feedback(_) => match key.as_str() {
            "" | "n" => Some(Command::Next),
            "f" => Some(Command::ToggleFlag),
            _ => None,
        },
        QuizView::Results(_) => (key == "r").then_some(Command::Restart),
    };

    command.map_or_else(|| Input::Unknown(line.trim().to_string()), Input::Command)
}

/// 1-based menu number to a 0-based index below `len`.
fn number(key: &str, len: usize) -> Option<usize> {
    let n: usize = key.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

/// `m:ss` for a number of seconds.
#[must_use]
pub fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) / 5;
    format!("[{}{}] {percent}%", "#".repeat(filled), "-".repeat(20 - filled))
}

/// Full-screen rendering of a view.
#[must_use]
pub fn render(view: &QuizView) -> String {
    let mut out = String::new();
    match view {
        QuizView::Welcome { question_count } => {
            let _ = writeln!(out, "{}", "Topic Quiz".bold());
            let _ = writeln!(out, "{question_count} questions loaded.");
            let _ = writeln!(out, "{}", "Press Enter to choose a topic, q to quit.".dimmed());
        }
        QuizView::LoadFailed { message } => {
            let _ = writeln!(out, "{}", format!("Could not load questions: {message}").red());
            let _ = writeln!(out, "{}", "Press l to retry, q to quit.".dimmed());
        }
        QuizView::TopicSelection { topics } => {
            let _ = writeln!(out, "{}", "Choose a topic".bold());
            if topics.is_empty() {
                let _ = writeln!(out, "No topics available.");
                let _ = writeln!(out, "{}", "Press l to reload, q to quit.".dimmed());
            } else {
                for (i, topic) in topics.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "  {}. {} ({} questions)",
                        i + 1,
                        topic.name,
                        topic.question_count
                    );
                }
                let _ = writeln!(out, "{}", "Type a number, q to quit.".dimmed());
            }
        }
        QuizView::Question(question) => render_question(&mut out, question),
        QuizView::Feedback(feedback) => render_feedback(&mut out, feedback),
        QuizView::Results(results) => render_results(&mut out, results),
    }
    out
}

fn render_question(out: &mut String, view: &QuestionView) {
    let flag = if view.flagged { " [flagged]" } else { "" };
    let _ = writeln!(
        out,
        "{} Question {}/{} | {} | score {}{}",
        format!("[{}]", view.topic).bold(),
        view.progress.position,
        view.progress.total,
        view.difficulty,
        view.score,
        flag.yellow()
    );
    let _ = writeln!(out, "{}", progress_bar(view.progress.percent));
    let _ = writeln!(
        out,
        "Time left: {}",
        format_duration(view.remaining_secs).cyan()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", view.text);
    for (i, option) in view.options.iter().enumerate() {
        if view.selected == Some(i) {
            let _ = writeln!(out, "{}", format!("> {}. {option}", i + 1).bold());
        } else {
            let _ = writeln!(out, "  {}. {option}", i + 1);
        }
    }
    let back = if view.can_go_back { ", p previous" } else { "" };
    let _ = writeln!(
        out,
        "{}",
        format!("Number to select, Enter to submit{back}, f flag, t topics, q quit.").dimmed()
    );
}

fn render_feedback(out: &mut String, view: &FeedbackView) {
    if view.is_correct {
        let _ = writeln!(out, "{}", "Correct!".green().bold());
    } else {
        let _ = writeln!(out, "{}", "Incorrect.".red().bold());
    }
    let option = |i: usize| view.options.get(i).map_or("?", String::as_str);
    let _ = writeln!(out, "Your answer: {}", option(view.selected));
    if !view.is_correct {
        let _ = writeln!(
            out,
            "{}",
            format!("Correct answer: {}", option(view.correct_index)).green()
        );
    }
    if !view.explanation.is_empty() {
        let _ = writeln!(out, "{}", view.explanation.italic());
    }
    let _ = writeln!(out, "Score: {}/{}", view.score, view.progress.total);
    let next = if view.is_last { "see results" } else { "next question" };
    let _ = writeln!(
        out,
        "{}",
        format!("Enter for {next}, f flag, t topics, q quit.").dimmed()
    );
}

fn render_results(out: &mut String, view: &ResultsView) {
    let summary = &view.summary;
    let _ = writeln!(out, "{}", format!("Results: {}", view.topic).bold());
    let _ = writeln!(
        out,
        "Score: {}/{} ({}%)",
        summary.correct(),
        summary.total(),
        summary.accuracy()
    );
    let _ = writeln!(
        out,
        "Time used: {}",
        format_duration(summary.total_time_used())
    );
    for topic in summary.per_topic() {
        let _ = writeln!(
            out,
            "  {}: {}% ({}/{})",
            topic.topic, topic.accuracy, topic.correct, topic.answered
        );
    }
    if !view.flagged.is_empty() {
        let ids: Vec<&str> = view.flagged.iter().map(|id| id.as_str()).collect();
        let _ = writeln!(out, "{}", format!("Flagged: {}", ids.join(", ")).yellow());
    }
    let _ = writeln!(
        out,
        "{}",
        "r to restart, t to change topic, q to quit.".dimmed()
    );
}

/// Countdown line, printed on a few ticks only so the screen stays readable.
#[must_use]
pub fn render_tick(remaining: u32) -> Option<String> {
    (remaining <= 5 || remaining % 15 == 0)
        .then(|| format!("{} left", format_duration(remaining)).cyan().to_string())
}

#[must_use]
pub fn render_error(err: &ControllerError) -> String {
    err.to_string().red().to_string()
}
