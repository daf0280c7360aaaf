// Shared prompt constants for the model gateway.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Exact reply the model must give to anything outside interview practice.
pub const REFUSAL: &str = "I can only help with interview practice: generating interview questions \
    and evaluating interview answers.";

/// System instruction sent with every call. Constrains the assistant's domain.
pub const COACH_SYSTEM: &str = "You are a strict but fair interview coach and evaluator. \
    You only generate interview questions and evaluate candidate answers to interview questions. \
    Analyze answers carefully and score realistically. \
    If a request is about anything else, reply with exactly this sentence and nothing more: \
    \"I can only help with interview practice: generating interview questions \
    and evaluating interview answers.\"";

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so user text containing `{answer}` or
/// similar stays literal. Braces that do not name a known placeholder (JSON
/// examples in a prompt) are copied through unchanged.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
