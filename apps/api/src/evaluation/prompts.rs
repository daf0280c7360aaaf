// LLM prompt template for answer evaluation.

/// Scoring prompt. Replace `{question}` and `{answer}` before sending.
pub const EVALUATION_PROMPT: &str = r#"You are evaluating an interview answer.

Question:
{question}

Candidate Answer:
{answer}

Evaluate based on:
- Relevance
- Clarity
- Technical correctness
- Completeness

Respond ONLY in valid JSON format:

{
  "score": <integer between 0 and 10>,
  "strengths": "<1-2 lines explaining what was good>",
  "weaknesses": "<1-2 lines explaining what was missing or incorrect>",
  "improvement_tip": "<1 actionable suggestion to improve>",
  "feedback": "<2 lines overall feedback>"
}"#;
