// Question generation from a job role and round, or from resume text.

pub mod generator;
pub mod prompts;
