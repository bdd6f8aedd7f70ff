//! Parameter points for the constructive heuristics (spec §4.5).
//!
//! A `ParameterPoint` names one combination of heuristic family, seed
//! strategy, vehicle-fill order, and regret coefficient. The orchestrator
//! enumerates a curated list of these, one per parallel search.

/// Which job seeds an empty vehicle (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStrategy {
    /// No special seeding; the first still-unassigned job in rank order.
    None,
    /// The unassigned job with the largest pickup-or-delivery amount.
    HigherAmount,
    /// The unassigned job nearest the vehicle's start location.
    Nearest,
    /// The unassigned job farthest from the vehicle's start location.
    Furthest,
    /// The unassigned job whose tightest time window closes earliest.
    EarliestDeadline,
}

/// Vehicle fill order (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    /// Vehicles in their natural rank order (first available first).
    Availability,
    /// Vehicles ordered by ascending `cost_per_distance`.
    Cost,
}

/// Which Solomon-I1 variant to run (spec §4.5, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicKind {
    /// Fill one vehicle at a time to exhaustion before opening the next.
    Basic,
    /// Choose the best `(job, vehicle, position)` triple globally at each
    /// step, across every partially-filled or not-yet-opened vehicle.
    Dynamic,
}

/// One `(heuristic, init_strategy, sort_strategy, regret_coeff)` tuple
/// (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterPoint {
    /// Heuristic family.
    pub heuristic: HeuristicKind,
    /// Seed strategy for opening a new vehicle.
    pub init_strategy: InitStrategy,
    /// Vehicle fill order.
    pub sort_strategy: SortStrategy,
    /// Regret coefficient; 0.0 is pure best-insertion.
    pub regret_coeff: f64,
}

impl ParameterPoint {
    /// Creates a new parameter point.
    pub fn new(heuristic: HeuristicKind, init_strategy: InitStrategy, sort_strategy: SortStrategy, regret_coeff: f64) -> Self {
        Self { heuristic, init_strategy, sort_strategy, regret_coeff }
    }
}

/// The problem variant being solved, used to curate a parameter-point list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    /// Single-vehicle tour.
    Tsp,
    /// Multi-vehicle, capacity-constrained.
    Cvrp,
    /// Multi-vehicle, capacity- and time-window-constrained.
    Vrptw,
}

/// Builds the curated parameter-point list for a problem kind (spec §4.5).
///
/// `homogeneous_fleet` trims vehicle-fill-order diversity: with a single
/// vehicle type there is no meaningful difference between `Availability`
/// and `Cost` ordering, so only `Availability` is included.
pub fn curated_parameter_points(problem_kind: ProblemKind, homogeneous_fleet: bool) -> Vec<ParameterPoint> {
    let sort_strategies: &[SortStrategy] =
        if homogeneous_fleet { &[SortStrategy::Availability] } else { &[SortStrategy::Availability, SortStrategy::Cost] };

    let init_strategies: &[InitStrategy] = match problem_kind {
        ProblemKind::Tsp => &[InitStrategy::None, InitStrategy::Furthest],
        ProblemKind::Cvrp => &[InitStrategy::None, InitStrategy::HigherAmount, InitStrategy::Furthest, InitStrategy::Nearest],
        ProblemKind::Vrptw => &[InitStrategy::None, InitStrategy::HigherAmount, InitStrategy::EarliestDeadline, InitStrategy::Furthest],
    };

    let regret_coeffs: &[f64] = &[0.0, 1.0, 2.0];

    let mut points = Vec::new();
    for &init in init_strategies {
        for &sort in sort_strategies {
            for &regret in regret_coeffs {
                points.push(ParameterPoint::new(HeuristicKind::Basic, init, sort, regret));
                points.push(ParameterPoint::new(HeuristicKind::Dynamic, init, sort, regret));
            }
        }
    }
    points
}
