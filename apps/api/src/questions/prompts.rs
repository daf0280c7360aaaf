// All LLM prompt templates for question generation.

/// Role/round prompt. Replace `{round}` and `{role}` before sending.
pub const ROLE_QUESTIONS_PROMPT: &str = "Generate exactly 5 {round} interview questions
for the role of {role}.

Rules:
- One question per line
- No numbering
- No explanations";

/// Whole-resume prompt. Replace `{resume_text}` before sending.
pub const RESUME_QUESTIONS_PROMPT: &str = "Read the candidate resume below and generate exactly 5 \
interview questions about the candidate's experience, projects, and skills.

Rules:
- One question per line
- No numbering
- No explanations

RESUME:
{resume_text}";

/// Per-chunk resume prompt. Replace `{chunk}` before sending.
pub const RESUME_CHUNK_PROMPT: &str = "Generate up to 5 interview questions based ONLY on the \
resume section below. Do not ask about anything the section does not mention.

Rules:
- One question per line
- No numbering
- No explanations

RESUME SECTION:
{chunk}";
