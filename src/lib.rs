//! # u-routing
//!
//! Vehicle routing optimization library solving TSP, CVRP, and VRPTW
//! instances: given jobs, a vehicle fleet, and a distance matrix, builds a
//! diversified set of constructive heuristics, improves each with local
//! search, and returns the best solution found under the lexicographic
//! objective (spec §3, §4.8).
//!
//! ## Modules
//!
//! - [`amount`] — multi-dimensional demand/capacity vectors
//! - [`error`] — `InputError`, the only recoverable error this crate raises
//! - [`distance`] — distance/duration/cost matrix provider
//! - [`models`] — `Job`, `Vehicle`, `Input`, `InputBuilder`
//! - [`route`] — `RawRoute`/`TWRoute` incremental capacity and time-window state
//! - [`evaluation`] — edge and route cost evaluation
//! - [`constructive`] — Solomon-I1 insertion heuristics and parameter points
//! - [`local_search`] — 2-opt, Or-opt, relocate, cross-exchange, and their driver
//! - [`solution`] — `Route`, `Summary`, `SolutionIndicators`
//! - [`search`] — the parallel search orchestrator
//! - [`config`] — `SolveConfig`
//!
//! ## Entry point
//!
//! [`solve`] takes an [`Input`] and a [`SolveConfig`] and returns a
//! [`SolveResult`]. It classifies the instance as TSP, CVRP, or VRPTW from
//! its jobs and vehicles, picks the matching route representation and
//! curated parameter-point list, and runs [`Orchestrator::solve`].

pub mod amount;
pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod route;
pub mod search;
pub mod solution;

use std::sync::Arc;

use tracing::info;

use config::SolveConfig;
use constructive::{curated_parameter_points, ParameterPoint, ProblemKind};
use models::Input;
use route::{RawRoute, RouteTimeWindow, TWRoute};
use search::{Orchestrator, SolveResult};

/// Whether any job or vehicle declares a time window (spec §9: this is the
/// one-time, search-construction-time decision between `RawRoute` and
/// `TWRoute`).
fn is_time_constrained(input: &Input) -> bool {
    input.jobs().iter().any(|j| !j.time_windows().is_empty()) || input.vehicles().iter().any(|v| v.time_window().is_some())
}

/// Whether every vehicle shares the same `vehicle_type` (spec §4.5: trims
/// the curated parameter-point list's vehicle-fill-order diversity).
fn has_homogeneous_fleet(input: &Input) -> bool {
    let mut types = input.vehicles().iter().map(|v| v.vehicle_type());
    let Some(first) = types.next() else { return true };
    types.all(|t| t == first)
}

fn problem_kind(input: &Input) -> ProblemKind {
    if is_time_constrained(input) {
        ProblemKind::Vrptw
    } else if input.vehicles().len() > 1 {
        ProblemKind::Cvrp
    } else {
        ProblemKind::Tsp
    }
}

fn parameter_points_for(input: &Input, config: &SolveConfig) -> Vec<ParameterPoint> {
    if let Some(points) = config.heuristic_params() {
        return points.to_vec();
    }
    curated_parameter_points(problem_kind(input), has_homogeneous_fleet(input))
}

/// Solves a VRP instance (spec §4.8, §6).
///
/// Dispatches on whether `input` declares any time window: capacity-only
/// instances (TSP, CVRP) run against [`RawRoute`]; time-constrained
/// instances (VRPTW) run against [`TWRoute`], whose `earliest`/`latest`
/// profile backs both the constructive heuristic's `tw_ok` oracle and the
/// local-search driver's feasibility predicate.
pub fn solve(input: Arc<Input>, config: SolveConfig) -> SolveResult {
    let points = parameter_points_for(&input, &config);
    info!(jobs = input.jobs().len(), vehicles = input.vehicles().len(), searches = points.len(), "starting solve");

    let orchestrator = Orchestrator::new(input.clone(), config);

    if is_time_constrained(&input) {
        orchestrator.solve::<TWRoute>(
            &points,
            |input, v| TWRoute::new(input, v),
            |route, job_rank, pos| route.is_valid_addition_for_tw(job_rank, pos),
            |route| local_search::tw_route_is_feasible(route),
            |routes| routes.iter().map(|r| r.total_waiting()).sum(),
            |route, pos| Some(route.earliest(pos)),
        )
    } else {
        orchestrator.solve::<RawRoute>(
            &points,
            |input, v| RawRoute::new(input, v),
            |_, _, _| true,
            |_| true,
            |_| 0,
            |_, _| None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::distance::DenseMatrix;
    use crate::models::{InputBuilder, Job, TimeWindow, Vehicle};

    fn cvrp_input() -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)], 1.0);
        let mut builder = InputBuilder::new()
            .add_vehicle(Vehicle::new(0, Amount::new(vec![100])).with_depot(0))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![100])).with_depot(0))
            .with_matrix(0, matrix);
        for i in 1..4 {
            builder = builder.add_job(Job::new(i - 1, i, Amount::zero(1), Amount::new(vec![5])));
        }
        Arc::new(builder.finalize().expect("valid"))
    }

    fn vrptw_input() -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 1.0);
        let mut builder = InputBuilder::new().add_vehicle(Vehicle::new(0, Amount::new(vec![100])).with_depot(0)).with_matrix(0, matrix);
        for i in 1..3 {
            builder = builder.add_job(
                Job::new(i - 1, i, Amount::zero(1), Amount::new(vec![1])).with_time_window(TimeWindow::new(0, 1000).unwrap()),
            );
        }
        Arc::new(builder.finalize().expect("valid"))
    }

    #[test]
    fn test_problem_kind_classifies_cvrp_and_vrptw() {
        assert_eq!(problem_kind(&cvrp_input()), ProblemKind::Cvrp);
        assert_eq!(problem_kind(&vrptw_input()), ProblemKind::Vrptw);
    }

    #[test]
    fn test_solve_cvrp_assigns_all_jobs() {
        let input = cvrp_input();
        let config = SolveConfig::new().with_nb_searches(2).with_depth(2).with_nb_threads(1);
        let result = solve(input, config);
        assert_eq!(result.summary.assigned_jobs, 3);
        assert!(result.unassigned.is_empty());
    }

    #[test]
    fn test_solve_vrptw_assigns_all_jobs() {
        let input = vrptw_input();
        let config = SolveConfig::new().with_nb_searches(2).with_depth(2).with_nb_threads(1);
        let result = solve(input, config);
        assert_eq!(result.summary.assigned_jobs, 2);
        assert!(result.unassigned.is_empty());
    }

    #[test]
    fn test_solve_respects_heuristic_params_override() {
        use crate::constructive::{HeuristicKind, InitStrategy, SortStrategy};
        let input = cvrp_input();
        let config = SolveConfig::new()
            .with_nb_threads(1)
            .with_heuristic_params(vec![ParameterPoint::new(HeuristicKind::Basic, InitStrategy::None, SortStrategy::Availability, 0.0)]);
        let result = solve(input, config);
        assert_eq!(result.summary.assigned_jobs, 3);
    }
}
