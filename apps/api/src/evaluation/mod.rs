// Answer evaluation: prompt the model for a JSON verdict and coerce whatever
// comes back into a bounded score with feedback.

pub mod evaluator;
pub mod prompts;
