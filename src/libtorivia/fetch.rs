use crate::libtorivia::shitsumon::{Question, QuestionError};
use clap::ValueEnum;
use log::{debug, info, warn};
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub(crate) const DEFAULT_ENDPOINT: &str = "https://opentdb.com/api.php";
/// Everything that goes wrong while loading is shown to the player as this.
pub(crate) const FETCH_FAILED_MESSAGE: &str = "Unable to load questions. Go kick the router.";

const QUESTION_TYPE: &str = "multiple";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TriviaRequest {
    pub amount: u32,
    pub category: u32,
    pub difficulty: Difficulty,
}

impl Default for TriviaRequest {
    fn default() -> Self {
        Self {
            amount: 10,
            category: 9,
            difficulty: Difficulty::Medium,
        }
    }
}

impl TriviaRequest {
    fn query(&self) -> [(&'static str, String); 4] {
        [
            ("amount", self.amount.to_string()),
            ("category", self.category.to_string()),
            ("difficulty", self.difficulty.as_str().to_string()),
            ("type", QUESTION_TYPE.to_string()),
        ]
    }
}

/// `response_code` as reported by the trivia API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseCode {
    Success,
    NoResults,
    InvalidParameter,
    RateLimited,
    Other(i64),
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::NoResults,
            2 => ResponseCode::InvalidParameter,
            5 => ResponseCode::RateLimited,
            other => ResponseCode::Other(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Success => write!(f, "success"),
            ResponseCode::NoResults => write!(f, "not enough questions for the query"),
            ResponseCode::InvalidParameter => write!(f, "invalid query parameter"),
            ResponseCode::RateLimited => write!(f, "rate limited"),
            ResponseCode::Other(code) => write!(f, "unknown code {code}"),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request failed with status {0}")]
    HttpStatus(StatusCode),
    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("trivia API answered with {0}")]
    Api(ResponseCode),
    #[error("trivia API returned no questions")]
    Empty,
    #[error("question {index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    response_code: i64,
    #[serde(default)]
    results: Vec<RawQuestion>,
}

#[derive(Clone)]
pub(crate) struct TriviaClient {
    client: Client,
    endpoint: String,
}

impl TriviaClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: endpoint.into(),
        })
    }

    /// Fetches one batch and normalizes it. Nothing is retried.
    pub async fn fetch_questions<R: Rng + ?Sized>(
        &self,
        request: &TriviaRequest,
        rng: &mut R,
    ) -> Result<Vec<Question>, FetchError> {
        debug!("[Fetch] GET {} {:?}", self.endpoint, request);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query())
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("[Fetch] Trivia API answered {}", response.status());
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let questions = parse_questions(&body, rng)?;
        info!("[Fetch] Loaded {} questions.", questions.len());
        Ok(questions)
    }
}

/// Validates a response body and turns it into questions. The batch is
/// accepted whole or not at all.
pub(crate) fn parse_questions<R: Rng + ?Sized>(
    body: &str,
    rng: &mut R,
) -> Result<Vec<Question>, FetchError> {
    let payload: ApiResponse = serde_json::from_str(body)?;

    let code = ResponseCode::from(payload.response_code);
    if code != ResponseCode::Success {
        warn!("[Fetch] Trivia API reported {}", code);
        return Err(FetchError::Api(code));
    }
    if payload.results.is_empty() {
        warn!("[Fetch] Trivia API returned an empty batch.");
        return Err(FetchError::Empty);
    }

    payload
        .results
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            Question::from_raw(raw, &mut *rng).map_err(|source| FetchError::Malformed { index, source })
        })
        .collect()
}
