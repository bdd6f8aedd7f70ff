//! Route-level cost evaluator: sums per-edge [`Eval`]s and per-job service
//! time over a complete route, adding the vehicle's fixed cost (spec §4.4).

use crate::evaluation::Eval;
use crate::models::Input;

/// Aggregated cost, duration, distance, and service time for one route.
///
/// # Examples
///
/// ```
/// use routecraft::amount::Amount;
/// use routecraft::distance::DenseMatrix;
/// use routecraft::evaluation::evaluate_route;
/// use routecraft::models::{InputBuilder, Job, Vehicle};
///
/// let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0)], 1.0);
/// let input = InputBuilder::new()
///     .add_job(Job::new(0, 1, Amount::zero(1), Amount::new(vec![1])).with_service_duration(5))
///     .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
///     .with_matrix(0, matrix)
///     .finalize()
///     .unwrap();
///
/// let cost = evaluate_route(&input, 0, &[0]);
/// assert_eq!(cost.service, 5);
/// assert!((cost.distance - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteCost {
    /// Total monetary (or otherwise abstract) cost, including the vehicle's
    /// fixed cost if the route is non-empty.
    pub cost: f64,
    /// Total travel duration across all edges.
    pub duration: i64,
    /// Total travel distance across all edges.
    pub distance: f64,
    /// Total service time across all jobs on the route.
    pub service: i64,
}

impl RouteCost {
    /// The zero cost: an unused vehicle contributes nothing.
    pub fn zero() -> Self {
        Self::default()
    }
}

impl std::ops::Add for RouteCost {
    type Output = RouteCost;

    fn add(self, rhs: RouteCost) -> RouteCost {
        RouteCost {
            cost: self.cost + rhs.cost,
            duration: self.duration + rhs.duration,
            distance: self.distance + rhs.distance,
            service: self.service + rhs.service,
        }
    }
}

/// Evaluates a vehicle's route: the edge from its start location through
/// each job in `sequence`, in order, back to its end location, plus each
/// job's service duration and the vehicle's fixed cost (spec §4.4).
///
/// Total cost layers the matrix's per-edge `cost` (a vehicle-type-level
/// network cost, e.g. tolls) with the vehicle's own linear rates:
/// `edges.cost + edges.distance * cost_per_distance + edges.duration *
/// cost_per_duration + fixed_cost`. Two vehicles sharing a vehicle_type (and
/// so the same matrix) but declaring different rates therefore produce
/// different route costs.
///
/// Returns `RouteCost::zero()` for an empty sequence — an unvisited vehicle
/// never incurs its fixed cost.
pub fn evaluate_route(input: &Input, vehicle: usize, sequence: &[usize]) -> RouteCost {
    if sequence.is_empty() {
        return RouteCost::zero();
    }

    let v = &input.vehicles()[vehicle];
    let vehicle_type = v.vehicle_type();
    let mut edges = Eval::zero();
    let mut service = 0i64;
    let mut location = v.start_location();

    for &job_rank in sequence {
        let job = &input.jobs()[job_rank];
        if let Some(loc) = location {
            edges = edges + input.eval(vehicle_type, loc, job.location());
        }
        service += job.service_duration();
        location = Some(job.location());
    }

    if let (Some(loc), Some(end)) = (location, v.end_location()) {
        edges = edges + input.eval(vehicle_type, loc, end);
    }

    let cost = edges.cost + edges.distance * v.cost_per_distance() + edges.duration as f64 * v.cost_per_duration() + v.fixed_cost();
    RouteCost { cost, duration: edges.duration, distance: edges.distance, service }
}
