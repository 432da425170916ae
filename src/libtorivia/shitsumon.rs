use crate::libtorivia::entities::decode_html;
use crate::libtorivia::fetch::RawQuestion;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

pub(crate) const CHOICES_PER_QUESTION: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum QuestionError {
    #[error("expected {expected} incorrect answers, got {got}")]
    IncorrectAnswerCount { expected: usize, got: usize },
    #[error("answer {0:?} appears more than once")]
    DuplicateAnswer(String),
}

/// One multiple-choice question, with its choices already in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Question {
    prompt: String,
    correct_answer: String,
    answer_choices: Vec<String>,
}

impl Question {
    pub fn new<R: Rng + ?Sized>(
        prompt: String,
        correct_answer: String,
        incorrect_answers: Vec<String>,
        rng: &mut R,
    ) -> Result<Self, QuestionError> {
        let expected = CHOICES_PER_QUESTION - 1;
        if incorrect_answers.len() != expected {
            return Err(QuestionError::IncorrectAnswerCount {
                expected,
                got: incorrect_answers.len(),
            });
        }
        for (i, answer) in incorrect_answers.iter().enumerate() {
            if *answer == correct_answer || incorrect_answers[..i].contains(answer) {
                return Err(QuestionError::DuplicateAnswer(answer.clone()));
            }
        }

        let answer_choices = shuffled_choices(&correct_answer, incorrect_answers, rng);
        Ok(Self {
            prompt,
            correct_answer,
            answer_choices,
        })
    }

    /// Builds a question from an API item, decoding every piece of text first.
    pub fn from_raw<R: Rng + ?Sized>(raw: RawQuestion, rng: &mut R) -> Result<Self, QuestionError> {
        let incorrect = raw
            .incorrect_answers
            .iter()
            .map(|answer| decode_html(answer))
            .collect();
        Self::new(
            decode_html(&raw.question),
            decode_html(&raw.correct_answer),
            incorrect,
            rng,
        )
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn answer_choices(&self) -> &[String] {
        &self.answer_choices
    }

    pub fn is_choice(&self, answer: &str) -> bool {
        self.answer_choices.iter().any(|choice| choice == answer)
    }
}

/// The correct answer and the incorrect ones in a uniformly random order.
pub(crate) fn shuffled_choices<R: Rng + ?Sized>(
    correct_answer: &str,
    incorrect_answers: Vec<String>,
    rng: &mut R,
) -> Vec<String> {
    let mut choices = Vec::with_capacity(incorrect_answers.len() + 1);
    choices.push(correct_answer.to_string());
    choices.extend(incorrect_answers);
    choices.shuffle(rng);
    debug!("[Question] Shuffled choices: {:?}", choices);
    choices
}
