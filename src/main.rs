use clap::Parser;
use env_logger::Env;
use log::debug;
use std::io;
use std::time::Duration;
use thiserror::Error;

mod cli;
mod libtorivia;

use crate::cli::{cli_loop, CliOptions};
use crate::libtorivia::fetch::{Difficulty, TriviaClient, TriviaRequest, DEFAULT_ENDPOINT};

#[derive(Parser, Debug)]
#[command(name = "トリビアしよう！ (Toriviashiyō!)")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=50))]
    amount: u32,
    #[arg(short, long, default_value = "9")]
    category: u32,
    #[arg(short, long, value_enum, default_value = "medium")]
    difficulty: Difficulty,
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    #[arg(long, default_value = "1500")]
    reveal_delay_ms: u64,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("cannot set up the HTTP client")]
    Http(#[from] reqwest::Error),
    #[error("cannot talk to the terminal")]
    Io(#[from] io::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .init();
    debug!("[Setup] Args: {:?}", args);

    let request = TriviaRequest {
        amount: args.amount,
        category: args.category,
        difficulty: args.difficulty,
    };
    let client = TriviaClient::new(args.endpoint)?;
    let options = CliOptions {
        reveal_delay: Duration::from_millis(args.reveal_delay_ms),
    };

    cli_loop(&client, &request, &options).await
}
