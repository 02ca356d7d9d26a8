//! Quiz documents as the engine receives them.
//!
//! Authoring, storage and loading happen elsewhere. By the time a quiz
//! reaches a game it is an immutable value, usually shared as
//! `Arc<Quiz>` between the coordinator and the engine.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Countdown length used when a question doesn't specify one.
pub const DEFAULT_QUESTION_SECS: u32 = 10;

fn default_duration() -> u32 {
    DEFAULT_QUESTION_SECS
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The text shown on the host's screen.
    pub prompt: String,

    /// Answer options, in display order.
    pub choices: Vec<String>,

    /// Index into `choices` of the right answer.
    pub correct: usize,

    /// Countdown length announced to players, in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u32,
}

impl Question {
    /// Creates a question with the default countdown.
    pub fn new(prompt: impl Into<String>, choices: Vec<String>, correct: usize) -> Self {
        Self {
            prompt: prompt.into(),
            choices,
            correct,
            duration_secs: DEFAULT_QUESTION_SECS,
        }
    }

    /// Overrides the countdown length.
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Returns `true` if `choice` is a valid index into `choices`.
    pub fn has_choice(&self, choice: usize) -> bool {
        choice < self.choices.len()
    }

    /// Returns `true` if `choice` is the right answer.
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}

/// An ordered list of questions with a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            questions,
        }
    }

    /// Number of questions (rounds) in the quiz.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question at `index`, if there is one.
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Checks that every question can actually be played.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidQuiz`] for an empty quiz, a question
    /// without choices, or a correct index out of range.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.questions.is_empty() {
            return Err(ProtocolError::InvalidQuiz("quiz has no questions".into()));
        }
        for (i, q) in self.questions.iter().enumerate() {
            if q.choices.is_empty() {
                return Err(ProtocolError::InvalidQuiz(format!(
                    "question {} has no choices",
                    i + 1
                )));
            }
            if !q.has_choice(q.correct) {
                return Err(ProtocolError::InvalidQuiz(format!(
                    "question {} marks choice {} correct but has {} choices",
                    i + 1,
                    q.correct,
                    q.choices.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capitals() -> Quiz {
        Quiz::new(
            "Capitals",
            vec![
                Question::new(
                    "Capital of France?",
                    vec!["Paris".into(), "Lyon".into()],
                    0,
                ),
                Question::new(
                    "Capital of Peru?",
                    vec!["Cusco".into(), "Lima".into()],
                    1,
                )
                .with_duration(20),
            ],
        )
    }

    #[test]
    fn test_duration_defaults_when_missing() {
        let json = r#"{"prompt": "2 + 2?", "choices": ["3", "4"], "correct": 1}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.duration_secs, DEFAULT_QUESTION_SECS);
    }

    #[test]
    fn test_quiz_accessors() {
        let quiz = capitals();
        assert_eq!(quiz.len(), 2);
        assert!(!quiz.is_empty());
        assert_eq!(quiz.question(1).unwrap().duration_secs, 20);
        assert!(quiz.question(2).is_none());
    }

    #[test]
    fn test_question_is_correct() {
        let quiz = capitals();
        let q = quiz.question(0).unwrap();
        assert!(q.is_correct(0));
        assert!(!q.is_correct(1));
        assert!(q.has_choice(1));
        assert!(!q.has_choice(2));
    }

    #[test]
    fn test_validate_accepts_playable_quiz() {
        assert!(capitals().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_quiz() {
        let quiz = Quiz::new("Empty", vec![]);
        assert!(matches!(quiz.validate(), Err(ProtocolError::InvalidQuiz(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_answer() {
        let quiz = Quiz::new(
            "Broken",
            vec![Question::new("?", vec!["a".into()], 3)],
        );
        let err = quiz.validate().unwrap_err();
        assert!(err.to_string().contains("question 1"));
    }
}
