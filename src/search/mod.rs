//! Search orchestration: runs a diversified set of constructive heuristics
//! in parallel and keeps the best solution by [`crate::solution::SolutionIndicators`]
//! (spec §4.8, §5).

pub mod orchestrator;

pub use orchestrator::{Orchestrator, SolveResult};
