use crate::libtorivia::fetch::{TriviaClient, TriviaRequest};
use crate::libtorivia::score::ScoreSummary;
use crate::libtorivia::session::{AnswerFeedback, Effect, Event, QuizState, Session};
use crate::Error;
use colored::Colorize;
use log::debug;
use rand::rng;
use std::io::{self, Read, Write};
use std::time::Duration;
use text_io::try_read;

const PROGRESS_WIDTH: usize = 20;

#[derive(Debug, PartialEq)]
enum Choice {
    Option(usize),
    Next,
    Quit,
    Unknown,
}

impl Choice {
    fn from_str(choices_count: usize, input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            "" | "n" => Choice::Next,
            input => match input.parse::<usize>() {
                Ok(num) if (1..=choices_count).contains(&num) => Choice::Option(num - 1),
                Ok(_) => {
                    println!(
                        "{}",
                        format!("There are only {} options available!", choices_count)
                            .bright_red()
                    );
                    Choice::Unknown
                }
                Err(_) => Choice::Unknown,
            },
        }
    }
}

pub struct CliOptions {
    pub reveal_delay: Duration,
}

/// Runs screens until the player quits or input runs out.
pub async fn cli_loop(
    client: &TriviaClient,
    request: &TriviaRequest,
    options: &CliOptions,
) -> Result<(), Error> {
    let mut state = QuizState::default();
    let mut pending: Option<Event> = None;

    loop {
        let event = match pending.take() {
            Some(event) => event,
            None => match &state {
                QuizState::Start => {
                    println!("{}", "==========> Trivia Time! <==========".cyan());
                    println!(
                        "{} general knowledge questions. Pick an answer by number, press Enter to lock it in.",
                        request.amount
                    );
                    match prompt("Press Enter to start (q to quit):")?.as_deref() {
                        None | Some("q") => return quit(),
                        Some(_) => Event::Start,
                    }
                }
                // Only reachable if a fetch effect went missing; load anyway.
                QuizState::Loading => load(client, request).await,
                QuizState::Error { message } => {
                    println!("{}", message.bright_red());
                    match prompt("Press Enter to try again (q to quit):")?.as_deref() {
                        None | Some("q") => return quit(),
                        Some(_) => Event::Retry,
                    }
                }
                QuizState::Quiz(session) => {
                    draw_question(session);
                    let Some(input) = prompt(&format!(
                        "Answer (1-{}), Enter for {}, q to quit:",
                        session.current_question().answer_choices().len(),
                        session.advance_label()
                    ))?
                    else {
                        return quit();
                    };
                    let choices = session.current_question().answer_choices();
                    match Choice::from_str(choices.len(), &input) {
                        Choice::Option(idx) => Event::Select(choices[idx].clone()),
                        Choice::Next => {
                            if session.selected_answer().is_none() {
                                println!("{}", "Pick an answer first!".yellow());
                            }
                            Event::Advance
                        }
                        Choice::Quit => return quit(),
                        Choice::Unknown => continue,
                    }
                }
                QuizState::Results { summary, .. } => {
                    draw_results(summary);
                    match prompt("Press Enter to play again (q to quit):")?.as_deref() {
                        None | Some("q") => return quit(),
                        Some(_) => Event::Restart,
                    }
                }
            },
        };
        debug!("[Cli] {} <- {:?}", state.name(), event);

        let (next, effect) = state.handle(event);
        state = next;
        pending = run_effect(effect, client, request, options).await;
    }
}

/// Carries out what a transition asked for. A fetch yields the event that
/// completes it.
async fn run_effect(
    effect: Effect,
    client: &TriviaClient,
    request: &TriviaRequest,
    options: &CliOptions,
) -> Option<Event> {
    match effect {
        Effect::None => None,
        Effect::FetchQuestions => Some(load(client, request).await),
        Effect::Reveal(feedback) => {
            draw_reveal(&feedback);
            tokio::time::sleep(options.reveal_delay).await;
            None
        }
    }
}

async fn load(client: &TriviaClient, request: &TriviaRequest) -> Event {
    println!("{}", "Loading questions...".cyan());
    Event::Loaded(client.fetch_questions(request, &mut rng()).await)
}

/// `None` once stdin is closed.
fn prompt(message: &str) -> Result<Option<String>, Error> {
    print!("{} ", message.cyan());
    io::stdout().flush()?;
    Ok(read_input(io::stdin().lock().bytes().map_while(Result::ok)))
}

fn read_input<I: Iterator<Item = u8>>(mut bytes: I) -> Option<String> {
    let line: Result<String, _> = try_read!("{}\n", bytes);
    match line {
        Ok(line) => Some(line.trim().to_string()),
        Err(err) => {
            debug!("[Cli] No more input: {:?}", err);
            None
        }
    }
}

fn quit() -> Result<(), Error> {
    println!("{}", "Quitting Early!".cyan());
    Ok(())
}

fn progress_bar(percentage: u32) -> String {
    let filled = PROGRESS_WIDTH * percentage.min(100) as usize / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        percentage
    )
}

fn draw_question(session: &Session) {
    let question = session.current_question();
    let leading = format!("{}. ", session.position_label());
    println!();
    println!(
        "{}  {}",
        progress_bar(session.progress_percentage()).dimmed(),
        format!("score {}", session.score()).dimmed()
    );
    println!(
        "{}{}",
        leading.cyan(),
        question.prompt().black().bold().on_white()
    );

    let indent = " ".repeat(leading.chars().count());
    for (i, choice) in question.answer_choices().iter().enumerate() {
        let number = format!("{}", i + 1).bold();
        if session.selected_answer() == Some(choice.as_str()) {
            println!("{}{}. {}", indent, number, choice.bright_blue().bold());
        } else {
            println!("{}{}. {}", indent, number, choice);
        }
    }
}

fn draw_reveal(feedback: &AnswerFeedback) {
    let correct = feedback.question.correct_answer();
    for choice in feedback.question.answer_choices() {
        if choice == correct {
            println!("  {} {}", "✔".bright_green(), choice.bright_green());
        } else if *choice == feedback.selected {
            println!("  {} {}", "✘".bright_red(), choice.bright_red().strikethrough());
        } else {
            println!("    {}", choice.dimmed());
        }
    }
    if feedback.is_correct {
        println!("{}", "Correct!".bright_green());
    } else {
        println!(
            "{}",
            format!("Incorrect! The correct answer was {:?}.", correct).bright_red()
        );
    }
}

fn draw_results(summary: &ScoreSummary) {
    println!();
    println!("{}", "==========> Results <==========".cyan());
    println!("{}", summary.fraction().bold());
    println!(
        "{} {} ({}%)",
        summary.tier.message(),
        summary.tier.badge(),
        summary.percentage
    );
}
