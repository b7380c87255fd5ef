use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use services::{Clock, ControllerError, Outcome, QuizController};
use storage::source_for_location;

mod config;
mod terminal;

use config::Args;
use terminal::Input;

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    let source = source_for_location(&args.source);
    let (mut controller, mut events) =
        QuizController::new(Clock::default_clock(), args.settings(), source);
    let commands = controller.events();

    // A failed load is shown to the user; `l` retries it.
    if let Err(err) = controller.load().await {
        warn!("[App] Initial load failed: {err}");
    }
    print!("{}", terminal::render(&controller.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                match controller.dispatch(event).await {
                    Ok(Outcome::Unchanged) => {}
                    Ok(Outcome::Tick { remaining }) => {
                        if let Some(line) = terminal::render_tick(remaining) {
                            println!("{line}");
                        }
                    }
                    Ok(Outcome::TimedOut) => {
                        println!("Time's up!");
                        print!("{}", terminal::render(&controller.view()));
                    }
                    Ok(Outcome::Updated) => {
                        print!("{}", terminal::render(&controller.view()));
                    }
                    Err(err) => {
                        eprintln!("{}", terminal::render_error(&err));
                        if matches!(err, ControllerError::Load(_)) {
                            print!("{}", terminal::render(&controller.view()));
                        }
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match terminal::parse_input(&controller.view(), &line) {
                    Input::Quit => break,
                    Input::Command(command) => commands.send(command.into())?,
                    Input::Unknown(key) => println!("Unknown key {key:?}"),
                }
            }
        }
    }

    info!("[App] Bye");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
