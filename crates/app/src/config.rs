use clap::Parser;
use std::time::Duration;

use quiz_core::DEFAULT_TIME_LIMIT_SECS;
use services::QuizSettings;

/// Command line and environment configuration for the terminal quiz.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "quiz")]
#[command(version, about = "Multiple-choice topic quiz in the terminal", long_about = None)]
pub struct Args {
    /// Question bank: a local path, a file:// URL or an http(s):// URL.
    #[arg(
        short,
        long,
        value_name = "PATH|URL",
        env = "QUIZ_SOURCE",
        default_value = "data/questions.json"
    )]
    pub source: String,

    /// Seconds allowed per question.
    #[arg(
        short,
        long,
        value_name = "SECS",
        env = "QUIZ_TIME_LIMIT",
        default_value_t = DEFAULT_TIME_LIMIT_SECS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub time_limit: u32,

    /// Log filter, overridden by RUST_LOG.
    #[arg(short, long, env = "QUIZ_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Args {
    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        QuizSettings::default()
            .with_time_limit(self.time_limit)
            .with_tick_period(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let args = Args::try_parse_from(["quiz"]).unwrap();
        assert_eq!(args.source, "data/questions.json");
        assert_eq!(args.time_limit, 60);
        assert_eq!(args.log_level, "warn");
        assert_eq!(args.settings(), QuizSettings::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "quiz",
            "--source",
            "https://example.com/questions.json",
            "--time-limit",
            "15",
            "-l",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.source, "https://example.com/questions.json");
        assert_eq!(args.settings().time_limit_secs, 15);
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn zero_time_limit_is_rejected() {
        assert!(Args::try_parse_from(["quiz", "--time-limit", "0"]).is_err());
        assert!(Args::try_parse_from(["quiz", "--time-limit", "soon"]).is_err());
    }
}
