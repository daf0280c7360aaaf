use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::evaluation::evaluator::Evaluation;
use crate::questions::generator::InterviewRound;
use crate::session::aggregator::SessionAggregator;

/// Where a session's questions came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum QuestionSource {
    Role {
        role: String,
        round: InterviewRound,
    },
    Resume {
        resume_id: Uuid,
        file_name: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Interview already completed")]
    Completed,

    #[error("Question {expected} was already answered (current question is {actual})")]
    CursorMoved { expected: usize, actual: usize },
}

/// One interview attempt.
///
/// `questions`, `answers` and `evaluations` always have the same length; the
/// cursor is always in `0..=questions.len()`. Answers are written only at the
/// cursor, which then advances, so every recorded score belongs to exactly one slot.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    pub id: Uuid,
    pub owner: Option<String>,
    pub source: QuestionSource,
    pub created_at: DateTime<Utc>,
    questions: Vec<String>,
    answers: Vec<Option<String>>,
    evaluations: Vec<Option<Evaluation>>,
    cursor: usize,
    aggregator: SessionAggregator,
}

impl InterviewSession {
    pub fn new(owner: Option<String>, source: QuestionSource, questions: Vec<String>) -> Self {
        let len = questions.len();
        Self {
            id: Uuid::new_v4(),
            owner,
            source,
            created_at: Utc::now(),
            questions,
            answers: vec![None; len],
            evaluations: vec![None; len],
            cursor: 0,
            aggregator: SessionAggregator::new(),
        }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    pub fn evaluations(&self) -> &[Option<Evaluation>] {
        &self.evaluations
    }

    pub fn aggregator(&self) -> &SessionAggregator {
        &self.aggregator
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.cursor).map(String::as_str)
    }

    pub fn progress_percent(&self) -> u8 {
        if self.questions.is_empty() {
            return 100;
        }
        (self.cursor * 100 / self.questions.len()) as u8
    }

    /// Stores the answer and its evaluation for question `index`, records the
    /// score, and advances the cursor. `index` must still be the cursor.
    pub fn record_answer(
        &mut self,
        index: usize,
        answer: String,
        evaluation: Evaluation,
    ) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if index != self.cursor {
            return Err(SessionError::CursorMoved {
                expected: index,
                actual: self.cursor,
            });
        }

        self.aggregator.record(evaluation.score);
        self.answers[index] = Some(answer);
        self.evaluations[index] = Some(evaluation);
        self.cursor += 1;
        Ok(())
    }

    /// Starts the same questions over: answers, evaluations and scores are cleared.
    pub fn restart(&mut self) {
        let len = self.questions.len();
        self.answers = vec![None; len];
        self.evaluations = vec![None; len];
        self.aggregator.reset();
        self.cursor = 0;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            owner: self.owner.clone(),
            source: self.source.clone(),
            total_questions: self.questions.len(),
            answered: self.aggregator.answered(),
            cursor: self.cursor,
            current_question: self.current_question().map(String::from),
            progress_percent: self.progress_percent(),
            completed: self.is_complete(),
            created_at: self.created_at,
        }
    }
}

/// What a client needs to render the interview screen.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub owner: Option<String>,
    pub source: QuestionSource,
    pub total_questions: usize,
    pub answered: usize,
    pub cursor: usize,
    pub current_question: Option<String>,
    pub progress_percent: u8,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}
