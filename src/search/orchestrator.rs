//! Runs `nb_searches` parameter points across a `rayon` thread pool and
//! returns the best solution (spec §4.8, §5).

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{debug, info, info_span};

use crate::config::SolveConfig;
use crate::constructive::{construct_basic, construct_dynamic, HeuristicKind, ParameterPoint};
use crate::local_search::run_local_search;
use crate::models::Input;
use crate::route::RouteCapacity;
use crate::solution::{build_route, Route, SolutionIndicators, Summary};

/// The final outcome of a solve (spec §6).
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// One entry per vehicle that serviced at least one job.
    pub routes: Vec<Route>,
    /// Job ranks that no search managed to place.
    pub unassigned: Vec<usize>,
    /// Metrics aggregated across `routes`.
    pub summary: Summary,
    /// The winning solution's indicator tuple.
    pub indicators: SolutionIndicators,
}

/// Distributes parameter points across threads and selects the best result
/// (spec §4.8). Generic over the route type `R`, so the same orchestrator
/// serves both capacity-only (`RawRoute`) and time-window (`TWRoute`)
/// searches (spec §9): the caller supplies the route constructor and the
/// feasibility/arrival closures appropriate to that route type.
pub struct Orchestrator {
    input: Arc<Input>,
    config: SolveConfig,
}

impl Orchestrator {
    /// Creates an orchestrator for one problem instance and configuration.
    pub fn new(input: Arc<Input>, config: SolveConfig) -> Self {
        Self { input, config }
    }

    /// Runs every parameter point in `parameter_points` (capped to
    /// `config.nb_searches()`) and returns the best result.
    ///
    /// - `new_route` builds an empty route for a vehicle rank.
    /// - `tw_ok` is the constructive heuristic's per-insertion time-window
    ///   oracle (`|_, _, _| true` for capacity-only problems).
    /// - `local_feasible` is the local-search driver's whole-route
    ///   feasibility predicate beyond capacity (same default).
    /// - `total_waiting_of` aggregates `SolutionIndicators::total_waiting`
    ///   across a slice of routes (`|_| 0` for capacity-only problems).
    /// - `arrival_at` supplies a job's service-start time, if tracked.
    ///
    /// # Panics
    ///
    /// Panics if `parameter_points` is empty.
    #[allow(clippy::too_many_arguments)]
    pub fn solve<R>(
        &self,
        parameter_points: &[ParameterPoint],
        new_route: impl Fn(Arc<Input>, usize) -> R + Sync,
        tw_ok: impl Fn(&R, usize, usize) -> bool + Sync + Copy,
        local_feasible: impl Fn(&R) -> bool + Sync + Copy,
        total_waiting_of: impl Fn(&[R]) -> i64 + Sync,
        arrival_at: impl Fn(&R, usize) -> Option<i64> + Sync,
    ) -> SolveResult
    where
        R: RouteCapacity + Clone + Send,
    {
        assert!(!parameter_points.is_empty(), "at least one parameter point is required");

        let nb_searches = self.config.nb_searches().min(parameter_points.len());
        let per_search_deadline = self.config.timeout().map(|total| total / nb_searches as u32);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.nb_threads())
            .build()
            .expect("failed to build the search thread pool");

        let seen: Mutex<HashSet<SolutionIndicators>> = Mutex::new(HashSet::new());
        let best: Mutex<Option<(Vec<R>, Vec<usize>, SolutionIndicators)>> = Mutex::new(None);
        let depth = self.config.depth();
        let input = &self.input;

        pool.scope(|scope| {
            for (index, point) in parameter_points.iter().take(nb_searches).enumerate() {
                let seen = &seen;
                let best = &best;
                let new_route = &new_route;
                let total_waiting_of = &total_waiting_of;
                let arrival_at = &arrival_at;
                let deadline = per_search_deadline.map(|d| Instant::now() + d);

                scope.spawn(move |_| {
                    let span = info_span!("search", index, thread = rayon::current_thread_index().unwrap_or(0));
                    let _guard = span.enter();

                    let (routes, unassigned, indicators) =
                        run_single_search(input, point, depth, deadline, new_route, tw_ok, local_feasible, total_waiting_of, arrival_at, seen);

                    info!(index, assigned = indicators.assigned_jobs, cost = indicators.cost, vehicles = indicators.used_vehicles, "search completed");

                    let mut best = best.lock().expect("best-result mutex poisoned");
                    let is_better = best.as_ref().map(|(_, _, current)| indicators < *current).unwrap_or(true);
                    if is_better {
                        *best = Some((routes, unassigned, indicators));
                    }
                });
            }
        });

        let (routes, unassigned, indicators) = best.into_inner().expect("best-result mutex poisoned").expect("at least one search ran");

        let emitted: Vec<Route> = routes.iter().filter_map(|route| build_route(self.input.as_ref(), route, |i| arrival_at(route, i))).collect();
        let summary = Summary {
            cost: emitted.iter().map(|r| r.cost).sum(),
            duration: emitted.iter().map(|r| r.duration).sum(),
            distance: emitted.iter().map(|r| r.distance).sum(),
            service: emitted.iter().map(|r| r.service).sum(),
            used_vehicles: emitted.len(),
            assigned_jobs: indicators.assigned_jobs,
        };

        SolveResult { routes: emitted, unassigned, summary, indicators }
    }
}

/// Runs one (heuristic, maybe local search) pass for a single parameter
/// point. Deduplicates against `seen`: if the heuristic-only indicator
/// tuple was already produced by an earlier search in this orchestrator,
/// local search is skipped entirely (spec §4.8).
#[allow(clippy::too_many_arguments)]
fn run_single_search<R>(
    input: &Arc<Input>,
    point: &ParameterPoint,
    depth: usize,
    deadline: Option<Instant>,
    new_route: &(impl Fn(Arc<Input>, usize) -> R + Sync),
    tw_ok: impl Fn(&R, usize, usize) -> bool + Copy,
    local_feasible: impl Fn(&R) -> bool + Copy,
    total_waiting_of: &(impl Fn(&[R]) -> i64 + Sync),
    arrival_at: &(impl Fn(&R, usize) -> Option<i64> + Sync),
    seen: &Mutex<HashSet<SolutionIndicators>>,
) -> (Vec<R>, Vec<usize>, SolutionIndicators)
where
    R: RouteCapacity + Clone,
{
    let mut routes: Vec<R> = (0..input.vehicles().len()).map(|v| new_route(input.clone(), v)).collect();

    let unassigned = match point.heuristic {
        HeuristicKind::Basic => construct_basic(input.as_ref(), &mut routes, point, tw_ok),
        HeuristicKind::Dynamic => construct_dynamic(input.as_ref(), &mut routes, point, tw_ok),
    };

    let heuristic_indicators = indicators_of(input.as_ref(), &routes, unassigned.len(), total_waiting_of, arrival_at);

    let is_new = {
        let mut seen = seen.lock().expect("dedup-set mutex poisoned");
        seen.insert(heuristic_indicators)
    };
    if !is_new {
        debug!(assigned = heuristic_indicators.assigned_jobs, "duplicate heuristic indicators, skipping local search");
        return (routes, unassigned, heuristic_indicators);
    }

    run_local_search(input.as_ref(), &mut routes, depth, deadline, local_feasible);
    let final_indicators = indicators_of(input.as_ref(), &routes, unassigned.len(), total_waiting_of, arrival_at);
    (routes, unassigned, final_indicators)
}

fn indicators_of<R: RouteCapacity>(
    input: &Input,
    routes: &[R],
    unassigned_count: usize,
    total_waiting_of: &impl Fn(&[R]) -> i64,
    arrival_at: &impl Fn(&R, usize) -> Option<i64>,
) -> SolutionIndicators {
    let built: Vec<Route> = routes.iter().filter_map(|route| build_route(input, route, |i| arrival_at(route, i))).collect();
    let waiting = total_waiting_of(routes);
    SolutionIndicators::compute(input, &built, unassigned_count, waiting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::constructive::{curated_parameter_points, HeuristicKind, InitStrategy, ProblemKind, SortStrategy};
    use crate::distance::DenseMatrix;
    use crate::models::{InputBuilder, Job, Vehicle};
    use crate::route::RawRoute;

    fn small_input() -> Arc<Input> {
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

    #[test]
    fn test_orchestrator_assigns_all_jobs() {
        let input = small_input();
        let config = SolveConfig::new().with_nb_searches(2).with_depth(2).with_nb_threads(1);
        let orchestrator = Orchestrator::new(input, config);
        let points = curated_parameter_points(ProblemKind::Cvrp, true);
        let result = orchestrator.solve::<RawRoute>(
            &points,
            |input, v| RawRoute::new(input, v),
            |_, _, _| true,
            |_| true,
            |_| 0,
            |_, _| None,
        );
        assert_eq!(result.summary.assigned_jobs, 3);
        assert!(result.unassigned.is_empty());
    }

    #[test]
    fn test_orchestrator_single_parameter_point() {
        let input = small_input();
        let config = SolveConfig::new().with_nb_searches(1).with_depth(1).with_nb_threads(1);
        let orchestrator = Orchestrator::new(input, config);
        let points = vec![ParameterPoint::new(HeuristicKind::Basic, InitStrategy::None, SortStrategy::Availability, 0.0)];
        let result = orchestrator.solve::<RawRoute>(
            &points,
            |input, v| RawRoute::new(input, v),
            |_, _, _| true,
            |_| true,
            |_| 0,
            |_, _| None,
        );
        assert_eq!(result.summary.assigned_jobs, 3);
    }
}
