//! Answer Evaluator: scores one answer to one question via the model.
//!
//! The model's reply is untrusted text. Decoding is tolerant: locate the outermost
//! `{...}`, decode it, coerce and clamp the score, default any missing field.
//! If any of that fails the result is a fixed fallback evaluation with score 0.
//! Parse problems never reach the caller; only transport errors do.
//!
//! This module records nothing. The session owns its scores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::evaluation::prompts::EVALUATION_PROMPT;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{extract_json_object, CompletionModel, LlmError};

pub const MAX_SCORE: u8 = 10;

pub const DEFAULT_FEEDBACK: &str = "No feedback provided.";
pub const DEFAULT_STRENGTHS: &str = "Not specified.";
pub const DEFAULT_WEAKNESSES: &str = "Not specified.";
pub const DEFAULT_TIP: &str = "No suggestion provided.";

pub const FALLBACK_FEEDBACK: &str = "Unable to evaluate the answer properly.";
const FALLBACK_STRENGTHS: &str = "Unable to analyze strengths.";
const FALLBACK_WEAKNESSES: &str = "Unable to analyze weaknesses.";
const FALLBACK_TIP: &str = "Try answering with clearer structure.";

/// Whether the model's reply could be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Scored,
    Fallback,
}

/// Result of scoring one answer. `score` is always within `0..=10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u8,
    pub feedback: String,
    pub strengths: String,
    pub weaknesses: String,
    pub improvement_tip: String,
    pub outcome: EvaluationOutcome,
}

impl Evaluation {
    /// The fail-safe result used whenever the model's reply cannot be decoded.
    pub fn fallback() -> Self {
        Self {
            score: 0,
            feedback: FALLBACK_FEEDBACK.to_string(),
            strengths: FALLBACK_STRENGTHS.to_string(),
            weaknesses: FALLBACK_WEAKNESSES.to_string(),
            improvement_tip: FALLBACK_TIP.to_string(),
            outcome: EvaluationOutcome::Fallback,
        }
    }

    /// Human-readable feedback block shown after an answer is submitted.
    pub fn render(&self) -> String {
        format!(
            "Score: {}/{MAX_SCORE}\n\n\
             Strengths:\n{}\n\n\
             Weaknesses:\n{}\n\n\
             How to Improve:\n{}\n\n\
             Overall Feedback:\n{}",
            self.score, self.strengths, self.weaknesses, self.improvement_tip, self.feedback
        )
    }
}

/// Asks the model to score `answer` against `question`.
///
/// Both inputs must already be non-blank; the caller rejects blank submissions.
pub async fn evaluate_answer(
    model: &dyn CompletionModel,
    question: &str,
    answer: &str,
) -> Result<Evaluation, LlmError> {
    let prompt = fill_template(EVALUATION_PROMPT, &[("question", question), ("answer", answer)]);

    let reply = model.complete(&prompt).await?;
    Ok(parse_evaluation(&reply))
}

/// Decodes a raw model reply into an `Evaluation`, falling back on any failure.
pub fn parse_evaluation(reply: &str) -> Evaluation {
    match decode(reply) {
        Some(evaluation) => {
            debug!("Evaluation decoded: score={}", evaluation.score);
            evaluation
        }
        None => {
            warn!(
                "Could not decode evaluation reply, using fallback: {:?}",
                reply.chars().take(80).collect::<String>()
            );
            Evaluation::fallback()
        }
    }
}

fn decode(reply: &str) -> Option<Evaluation> {
    let json = extract_json_object(reply.trim())?;
    let value: Value = serde_json::from_str(json).ok()?;
    let fields = value.as_object()?;

    let score = match fields.get("score") {
        None => 0,
        Some(raw) => coerce_score(raw)?,
    };

    Some(Evaluation {
        score,
        feedback: text_field(fields, &["feedback", "summary_feedback"], DEFAULT_FEEDBACK),
        strengths: text_field(fields, &["strengths"], DEFAULT_STRENGTHS),
        weaknesses: text_field(fields, &["weaknesses"], DEFAULT_WEAKNESSES),
        improvement_tip: text_field(fields, &["improvement_tip"], DEFAULT_TIP),
        outcome: EvaluationOutcome::Scored,
    })
}

/// Integer, float (truncated toward zero) or numeric string, clamped into `0..=10`.
/// Anything else is not a score.
fn coerce_score(raw: &Value) -> Option<u8> {
    let value = match raw {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64()?;
                if !f.is_finite() {
                    return None;
                }
                f.trunc() as i64
            }
        },
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    Some(value.clamp(0, MAX_SCORE as i64) as u8)
}

fn text_field(fields: &Map<String, Value>, keys: &[&str], default: &str) -> String {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}
