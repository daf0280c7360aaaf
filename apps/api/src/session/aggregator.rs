//! Session Aggregator: the ordered score list for one session, its mean, and the verdict.

use serde::{Deserialize, Serialize};

pub const NO_DATA_MESSAGE: &str = "No interview data available.";

const EXCELLENT_THRESHOLD: f64 = 8.0;
const GOOD_THRESHOLD: f64 = 5.0;

/// Qualitative bucket derived from the mean score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// mean ≥ 8
    Excellent,
    /// 5 ≤ mean < 8
    Good,
    /// mean < 5
    NeedsImprovement,
}

impl Verdict {
    pub fn classify(mean: f64) -> Self {
        if mean >= EXCELLENT_THRESHOLD {
            Verdict::Excellent
        } else if mean >= GOOD_THRESHOLD {
            Verdict::Good
        } else {
            Verdict::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Excellent => "Excellent! Interview ready.",
            Verdict::Good => "Good, but needs more practice.",
            Verdict::NeedsImprovement => "Needs significant improvement.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Mean score rounded to one decimal place.
    pub average_score: f64,
    pub total_questions: usize,
    pub verdict: Verdict,
    pub verdict_message: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionAggregator {
    scores: Vec<u8>,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, score: u8) {
        self.scores.push(score);
    }

    pub fn scores(&self) -> &[u8] {
        &self.scores
    }

    pub fn answered(&self) -> usize {
        self.scores.len()
    }

    pub fn reset(&mut self) {
        self.scores.clear();
    }

    /// Arithmetic mean, or `None` before any answer is recorded.
    pub fn average(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let total: u32 = self.scores.iter().map(|&s| u32::from(s)).sum();
        Some(f64::from(total) / self.scores.len() as f64)
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        let mean = self.average()?;
        let verdict = Verdict::classify(mean);
        Some(SessionSummary {
            average_score: (mean * 10.0).round() / 10.0,
            total_questions: self.scores.len(),
            verdict,
            verdict_message: verdict.message().to_string(),
        })
    }

    /// The end-of-interview feedback text.
    pub fn final_feedback(&self) -> String {
        let Some(mean) = self.average() else {
            return NO_DATA_MESSAGE.to_string();
        };
        format!(
            "Average Score: {:.1} / 10\nTotal Questions: {}\n\nOverall Verdict:\n{}",
            mean,
            self.scores.len(),
            Verdict::classify(mean).message()
        )
    }
}
