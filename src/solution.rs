//! Solution output types and the lexicographic objective (spec §3, §6, §9).

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::evaluation::evaluate_route;
use crate::models::Input;
use crate::route::RouteCapacity;

/// One stop in an emitted [`Route`] (spec §6, §9: closed tagged enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Departs the vehicle's start location.
    Start {
        /// Location index.
        location: usize,
    },
    /// Services one job.
    Job {
        /// Job rank.
        job_rank: usize,
        /// Service start time, if the route tracked one (`TWRoute`-backed
        /// searches); `None` for capacity-only (`RawRoute`-backed) searches.
        arrival: Option<i64>,
    },
    /// Arrives at the vehicle's end location.
    End {
        /// Location index.
        location: usize,
    },
}

/// One vehicle's emitted route: its stops plus aggregated metrics (spec §6).
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Vehicle rank.
    pub vehicle: usize,
    /// Ordered stops, `Start`, then one `Job` per visited job, then `End`.
    pub steps: Vec<Step>,
    /// Total cost, including the vehicle's fixed cost.
    pub cost: f64,
    /// Total travel duration.
    pub duration: i64,
    /// Total travel distance.
    pub distance: f64,
    /// Total service time across all jobs on the route.
    pub service: i64,
}

/// Builds the emitted [`Route`] for a vehicle, or `None` if it services no
/// jobs (an unused vehicle is omitted from the solution entirely).
///
/// `arrival_at(i)` supplies the service-start time for sequence position
/// `i`, if the caller's route type tracks one; pass `|_| None` for a
/// `RawRoute`-backed search and `|i| Some(route.earliest(i))` for a
/// `TWRoute`-backed one.
pub fn build_route<R: RouteCapacity>(input: &Input, route: &R, arrival_at: impl Fn(usize) -> Option<i64>) -> Option<Route> {
    if route.sequence().is_empty() {
        return None;
    }

    let cost = evaluate_route(input, route.vehicle(), route.sequence());
    let vehicle = &input.vehicles()[route.vehicle()];
    let mut steps = Vec::with_capacity(route.sequence().len() + 2);

    if let Some(location) = vehicle.start_location() {
        steps.push(Step::Start { location });
    }
    for (i, &job_rank) in route.sequence().iter().enumerate() {
        steps.push(Step::Job { job_rank, arrival: arrival_at(i) });
    }
    if let Some(location) = vehicle.end_location() {
        steps.push(Step::End { location });
    }

    Some(Route { vehicle: route.vehicle(), steps, cost: cost.cost, duration: cost.duration, distance: cost.distance, service: cost.service })
}

/// Aggregated metrics across every route in a solution (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    /// Total cost across all used vehicles.
    pub cost: f64,
    /// Total travel duration.
    pub duration: i64,
    /// Total travel distance.
    pub distance: f64,
    /// Total service time.
    pub service: i64,
    /// Number of vehicles with at least one job.
    pub used_vehicles: usize,
    /// Number of jobs assigned to a route.
    pub assigned_jobs: usize,
}

/// Lexicographic objective and deduplication key (spec §3, §9).
///
/// Ordered smallest-first as "best": more assigned jobs, then lower cost,
/// then fewer vehicles, then higher total priority, with setup/service/
/// waiting carried as later, lower-precedence tie-breakers.
#[derive(Debug, Clone, Copy)]
pub struct SolutionIndicators {
    /// Number of jobs assigned to a route.
    pub assigned_jobs: usize,
    /// Total cost across all used vehicles.
    pub cost: f64,
    /// Number of vehicles with at least one job.
    pub used_vehicles: usize,
    /// Sum of `priority()` over every assigned job.
    pub total_priority: u64,
    /// Sum of each used vehicle's fixed cost, rounded (reported separately
    /// from `cost`, which already folds it in; a tie-breaker only).
    pub total_setup: i64,
    /// Sum of service duration over every assigned job.
    pub total_service: i64,
    /// Sum of waiting time across every `TWRoute` in the solution; always
    /// zero for a capacity-only (`RawRoute`-backed) search.
    pub total_waiting: i64,
}

impl SolutionIndicators {
    /// Computes the indicator tuple for a completed solution.
    pub fn compute(input: &Input, routes: &[Route], unassigned_count: usize, total_waiting: i64) -> Self {
        let assigned_jobs = input.jobs().len() - unassigned_count;
        let cost = routes.iter().map(|r| r.cost).sum();
        let used_vehicles = routes.len();
        let total_setup = routes.iter().map(|r| input.vehicles()[r.vehicle].fixed_cost().round() as i64).sum();
        let total_service = routes.iter().map(|r| r.service).sum();
        let total_priority = routes
            .iter()
            .flat_map(|r| r.steps.iter())
            .filter_map(|s| match s {
                Step::Job { job_rank, .. } => Some(input.jobs()[*job_rank].priority() as u64),
                _ => None,
            })
            .sum();

        Self { assigned_jobs, cost, used_vehicles, total_priority, total_setup, total_service, total_waiting }
    }
}

impl PartialEq for SolutionIndicators {
    fn eq(&self, other: &Self) -> bool {
        self.assigned_jobs == other.assigned_jobs
            && self.cost.total_cmp(&other.cost) == Ordering::Equal
            && self.used_vehicles == other.used_vehicles
            && self.total_priority == other.total_priority
            && self.total_setup == other.total_setup
            && self.total_service == other.total_service
            && self.total_waiting == other.total_waiting
    }
}

impl Eq for SolutionIndicators {}

impl PartialOrd for SolutionIndicators {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SolutionIndicators {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .assigned_jobs
            .cmp(&self.assigned_jobs)
            .then_with(|| self.cost.total_cmp(&other.cost))
            .then_with(|| self.used_vehicles.cmp(&other.used_vehicles))
            .then_with(|| other.total_priority.cmp(&self.total_priority))
            .then_with(|| self.total_setup.cmp(&other.total_setup))
            .then_with(|| self.total_service.cmp(&other.total_service))
            .then_with(|| self.total_waiting.cmp(&other.total_waiting))
    }
}

impl Hash for SolutionIndicators {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.assigned_jobs.hash(state);
        self.cost.to_bits().hash(state);
        self.used_vehicles.hash(state);
        self.total_priority.hash(state);
        self.total_setup.hash(state);
        self.total_service.hash(state);
        self.total_waiting.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::distance::DenseMatrix;
    use crate::models::{InputBuilder, Job, Vehicle};
    use crate::route::RawRoute;
    use std::sync::Arc;

    fn small_input() -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 1.0);
        let mut builder = InputBuilder::new().add_vehicle(Vehicle::new(0, Amount::new(vec![100])).with_depot(0)).with_matrix(0, matrix);
        for i in 1..3 {
            builder = builder.add_job(Job::new(i - 1, i, Amount::zero(1), Amount::new(vec![1])).with_priority(2));
        }
        Arc::new(builder.finalize().expect("valid"))
    }

    #[test]
    fn test_build_route_skips_empty() {
        let input = small_input();
        let route = RawRoute::new(input.clone(), 0);
        assert!(build_route(&input, &route, |_| None).is_none());
    }

    #[test]
    fn test_build_route_has_start_job_end() {
        let input = small_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        let built = build_route(&input, &route, |_| None).expect("non-empty");
        assert!(matches!(built.steps[0], Step::Start { location: 0 }));
        assert!(matches!(built.steps[1], Step::Job { job_rank: 0, .. }));
        assert!(matches!(built.steps[2], Step::End { location: 0 }));
    }

    #[test]
    fn test_indicators_total_order_more_assigned_wins() {
        let input = small_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        route.add(1, 1);
        let both = build_route(&input, &route, |_| None).unwrap();
        let indicators_both = SolutionIndicators::compute(&input, &[both.clone()], 0, 0);

        let mut one_route = RawRoute::new(input.clone(), 0);
        one_route.add(0, 0);
        let one = build_route(&input, &one_route, |_| None).unwrap();
        let indicators_one = SolutionIndicators::compute(&input, &[one], 1, 0);

        assert!(indicators_both < indicators_one);
    }

    #[test]
    fn test_indicators_eq_is_reflexive() {
        let input = small_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        let built = build_route(&input, &route, |_| None).unwrap();
        let indicators = SolutionIndicators::compute(&input, &[built], 1, 0);
        assert_eq!(indicators, indicators);
    }
}
