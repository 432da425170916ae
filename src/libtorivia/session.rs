use crate::libtorivia::fetch::FetchError;
use crate::libtorivia::score::ScoreSummary;
use crate::libtorivia::shitsumon::Question;
use log::{debug, info, warn};

/// One run through a batch of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    selected_answer: Option<String>,
    answered: bool,
}

/// What the player picked against what was right, handed back when an answer
/// is locked in so the driver can reveal it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnswerFeedback {
    pub question: Question,
    pub selected: String,
    pub is_correct: bool,
}

impl Session {
    /// `None` for an empty batch, which can't be played.
    pub fn new(questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            current_index: 0,
            score: 0,
            selected_answer: None,
            answered: false,
        })
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// "Question 3 of 10"
    pub fn position_label(&self) -> String {
        format!("Question {} of {}", self.current_index + 1, self.total())
    }

    pub fn progress_percentage(&self) -> u32 {
        ((self.current_index + 1) * 100 / self.total()) as u32
    }

    pub fn advance_label(&self) -> &'static str {
        if self.is_last_question() {
            "View Results"
        } else {
            "Next Question"
        }
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary::new(self.score, self.total())
    }

    /// Ignored once the answer is locked in, or when `answer` isn't one of
    /// the current choices.
    pub fn select(&mut self, answer: String) -> bool {
        if self.answered {
            debug!("[Session] Question already answered, ignoring {:?}", answer);
            return false;
        }
        if !self.current_question().is_choice(&answer) {
            debug!("[Session] {:?} is not a choice, ignoring", answer);
            return false;
        }
        self.selected_answer = Some(answer);
        true
    }

    /// Scores the current selection. Only the first call per question counts.
    pub fn lock_in(&mut self) -> Option<AnswerFeedback> {
        if self.answered {
            return None;
        }
        let selected = self.selected_answer.clone()?;
        let question = self.current_question().clone();
        let is_correct = selected == question.correct_answer();

        self.answered = true;
        if is_correct {
            self.score += 1;
        }
        debug!(
            "[Session] Q{} locked in {:?} (correct: {}), score {}",
            self.current_index + 1,
            selected,
            is_correct,
            self.score
        );
        Some(AnswerFeedback {
            question,
            selected,
            is_correct,
        })
    }

    /// Moves to the next question. `false` when there is none left.
    pub fn next_question(&mut self) -> bool {
        if self.is_last_question() {
            return false;
        }
        self.current_index += 1;
        self.selected_answer = None;
        self.answered = false;
        true
    }
}

/// Player actions plus the completion of the one fetch.
#[derive(Debug)]
pub(crate) enum Event {
    Start,
    Retry,
    Loaded(Result<Vec<Question>, FetchError>),
    Select(String),
    Advance,
    Restart,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum QuizState {
    #[default]
    Start,
    Loading,
    Error { message: &'static str },
    Quiz(Session),
    Results { session: Session, summary: ScoreSummary },
}

/// Work the driver has to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    None,
    FetchQuestions,
    Reveal(AnswerFeedback),
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::Start => "start",
            QuizState::Loading => "loading",
            QuizState::Error { .. } => "error",
            QuizState::Quiz(_) => "quiz",
            QuizState::Results { .. } => "results",
        }
    }

    /// Applies one event. Events that don't belong to the current state leave
    /// it untouched.
    pub fn handle(self, event: Event) -> (QuizState, Effect) {
        let from = self.name();
        let (next, effect) = match (self, event) {
            (QuizState::Start, Event::Start) | (QuizState::Error { .. }, Event::Retry) => {
                (QuizState::Loading, Effect::FetchQuestions)
            }
            (QuizState::Loading, Event::Loaded(Ok(questions))) => match Session::new(questions) {
                Some(session) => {
                    info!("[Session] Starting a quiz of {} questions.", session.total());
                    (QuizState::Quiz(session), Effect::None)
                }
                None => {
                    warn!("[Session] Loaded an empty batch.");
                    (
                        QuizState::Error {
                            message: FetchError::Empty.user_message(),
                        },
                        Effect::None,
                    )
                }
            },
            (QuizState::Loading, Event::Loaded(Err(err))) => {
                warn!("[Session] Could not load questions: {}", err);
                (
                    QuizState::Error {
                        message: err.user_message(),
                    },
                    Effect::None,
                )
            }
            (QuizState::Quiz(mut session), Event::Select(answer)) => {
                session.select(answer);
                (QuizState::Quiz(session), Effect::None)
            }
            (QuizState::Quiz(mut session), Event::Advance) => match session.lock_in() {
                None => {
                    debug!("[Session] Advance without a selection, ignoring.");
                    (QuizState::Quiz(session), Effect::None)
                }
                Some(feedback) => {
                    if session.next_question() {
                        (QuizState::Quiz(session), Effect::Reveal(feedback))
                    } else {
                        let summary = session.summary();
                        info!(
                            "[Session] Finished with {} ({}%).",
                            summary.fraction(),
                            summary.percentage
                        );
                        (QuizState::Results { session, summary }, Effect::Reveal(feedback))
                    }
                }
            },
            (QuizState::Results { .. }, Event::Restart) => (QuizState::Start, Effect::None),
            (state, event) => {
                debug!("[Session] {:?} does nothing in {}", event, state.name());
                (state, Effect::None)
            }
        };
        debug!("[Session] {} -> {}", from, next.name());
        (next, effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libtorivia::score::Tier;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn questions(count: usize) -> Vec<Question> {
        let mut rng = StdRng::seed_from_u64(11);
        (0..count)
            .map(|n| {
                Question::new(
                    format!("Question {n}"),
                    format!("right {n}"),
                    vec![format!("wrong {n}a"), format!("wrong {n}b"), format!("wrong {n}c")],
                    &mut rng,
                )
                .unwrap()
            })
            .collect()
    }

    fn quiz(count: usize) -> QuizState {
        let (state, effect) = QuizState::Start.handle(Event::Start);
        assert_eq!(effect, Effect::FetchQuestions);
        let (state, _) = state.handle(Event::Loaded(Ok(questions(count))));
        state
    }

    fn session(state: &QuizState) -> &Session {
        match state {
            QuizState::Quiz(session) | QuizState::Results { session, .. } => session,
            other => panic!("no session in {}", other.name()),
        }
    }

    fn answer(state: QuizState, correctly: bool) -> (QuizState, Effect) {
        let question = session(&state).current_question();
        let pick = if correctly {
            question.correct_answer().to_string()
        } else {
            question
                .answer_choices()
                .iter()
                .find(|c| c.as_str() != question.correct_answer())
                .unwrap()
                .clone()
        };
        let (state, _) = state.handle(Event::Select(pick));
        state.handle(Event::Advance)
    }

    fn play(count: usize, correct: usize) -> QuizState {
        let mut state = quiz(count);
        for i in 0..count {
            state = answer(state, i < correct).0;
        }
        state
    }

    #[test]
    fn start_goes_to_loading_and_fetches() {
        let (state, effect) = QuizState::default().handle(Event::Start);
        assert_eq!(state, QuizState::Loading);
        assert_eq!(effect, Effect::FetchQuestions);
    }

    #[test]
    fn loaded_batch_starts_at_first_question() {
        let state = quiz(10);
        let session = session(&state);
        assert_eq!(state.name(), "quiz");
        assert_eq!(session.position_label(), "Question 1 of 10");
        assert_eq!(session.score(), 0);
        assert_eq!(session.selected_answer(), None);
        assert_eq!(session.progress_percentage(), 10);
        assert_eq!(session.advance_label(), "Next Question");
    }

    #[test]
    fn failed_fetch_goes_to_error_never_quiz() {
        let (state, _) = QuizState::Loading.handle(Event::Loaded(Err(FetchError::Empty)));
        assert!(matches!(state, QuizState::Error { .. }));

        let (state, _) = QuizState::Loading.handle(Event::Loaded(Ok(Vec::new())));
        assert!(matches!(state, QuizState::Error { .. }));

        let (state, _) = state.handle(Event::Advance);
        assert!(matches!(state, QuizState::Error { .. }));
    }

    #[test]
    fn retry_from_error_fetches_again() {
        let (state, _) = QuizState::Loading.handle(Event::Loaded(Err(FetchError::Empty)));
        let (state, effect) = state.handle(Event::Retry);
        assert_eq!(state, QuizState::Loading);
        assert_eq!(effect, Effect::FetchQuestions);
    }

    #[test]
    fn advancing_without_a_selection_changes_nothing() {
        let state = quiz(3);
        let before = state.clone();
        let (state, effect) = state.handle(Event::Advance);
        assert_eq!(state, before);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn selection_must_be_one_of_the_choices() {
        let state = quiz(3);
        let (state, _) = state.handle(Event::Select("not a choice".to_string()));
        assert_eq!(session(&state).selected_answer(), None);

        let (state, _) = state.handle(Event::Select("wrong 0b".to_string()));
        let (state, _) = state.handle(Event::Select("right 0".to_string()));
        assert_eq!(session(&state).selected_answer(), Some("right 0"));
    }

    #[test]
    fn advancing_reveals_and_moves_on() {
        let (state, effect) = answer(quiz(3), false);
        match effect {
            Effect::Reveal(feedback) => {
                assert!(!feedback.is_correct);
                assert_eq!(feedback.question.correct_answer(), "right 0");
                assert_ne!(feedback.selected, "right 0");
            }
            other => panic!("expected a reveal, got {other:?}"),
        }
        let session = session(&state);
        assert_eq!(session.position_label(), "Question 2 of 3");
        assert_eq!(session.score(), 0);
        assert_eq!(session.selected_answer(), None);
        assert!(session.clone().select("right 1".to_string()));
    }

    #[test]
    fn answer_is_scored_once() {
        let mut session = Session::new(questions(2)).unwrap();
        assert!(session.select("right 0".to_string()));
        assert!(session.lock_in().unwrap().is_correct);
        assert!(session.lock_in().is_none());
        assert!(!session.select("wrong 0a".to_string()));
        assert_eq!(session.score(), 1);
        assert_eq!(session.selected_answer(), Some("right 0"));
    }

    #[test]
    fn last_question_leads_to_results() {
        let mut state = quiz(2);
        state = answer(state, true).0;
        assert_eq!(session(&state).advance_label(), "View Results");
        assert_eq!(session(&state).progress_percentage(), 100);

        let (state, effect) = answer(state, true);
        assert!(matches!(effect, Effect::Reveal(_)));
        assert_eq!(state.name(), "results");
    }

    #[test]
    fn all_correct_is_a_perfect_score() {
        match play(10, 10) {
            QuizState::Results { summary, .. } => {
                assert_eq!(summary.fraction(), "10/10");
                assert_eq!(summary.percentage, 100);
                assert_eq!(summary.tier, Tier::Master);
            }
            other => panic!("expected results, got {}", other.name()),
        }
    }

    #[test]
    fn six_correct_is_third_tier() {
        match play(10, 6) {
            QuizState::Results { summary, .. } => {
                assert_eq!(summary.fraction(), "6/10");
                assert_eq!(summary.percentage, 60);
                assert_eq!(summary.tier, Tier::NotBad);
            }
            other => panic!("expected results, got {}", other.name()),
        }
    }

    #[test]
    fn results_ignore_further_answers() {
        let state = play(2, 1);
        let before = state.clone();
        let (state, _) = state.handle(Event::Select("right 1".to_string()));
        let (state, effect) = state.handle(Event::Advance);
        assert_eq!(state, before);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn restart_resets_and_next_start_fetches_fresh() {
        let (state, effect) = play(10, 7).handle(Event::Restart);
        assert_eq!(state, QuizState::Start);
        assert_eq!(effect, Effect::None);

        let (state, effect) = state.handle(Event::Start);
        assert_eq!(state, QuizState::Loading);
        assert_eq!(effect, Effect::FetchQuestions);

        let (state, _) = state.handle(Event::Loaded(Ok(questions(10))));
        let session = session(&state);
        assert_eq!(session.score(), 0);
        assert_eq!(session.position_label(), "Question 1 of 10");
    }

    #[test]
    fn stray_events_are_ignored() {
        let (state, effect) = QuizState::Start.handle(Event::Advance);
        assert_eq!(state, QuizState::Start);
        assert_eq!(effect, Effect::None);

        let (state, effect) = QuizState::Loading.handle(Event::Start);
        assert_eq!(state, QuizState::Loading);
        assert_eq!(effect, Effect::None);

        let (state, _) = QuizState::Start.handle(Event::Loaded(Ok(questions(1))));
        assert_eq!(state, QuizState::Start);
    }
}
