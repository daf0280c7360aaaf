// Interview sessions: per-session question/answer/evaluation state, score
// aggregation, reports, and the HTTP handlers that drive them.
// Sessions live in the in-process SessionStore keyed by id; the evaluator never
// touches them, handlers record each evaluation after it returns.

pub mod aggregator;
pub mod handlers;
pub mod models;
pub mod report;
pub mod store;
