//! Solomon-I1 insertion heuristic with regret scoring (spec §4.5).
//!
//! Two variants share the same per-job insertion evaluation:
//! [`construct_basic`] fills one vehicle at a time to exhaustion before
//! opening the next; [`construct_dynamic`] instead picks the single best
//! `(job, vehicle, position)` triple across every vehicle at each step
//! (spec §9's resolution of the Dynamic-heuristic Open Question).
//!
//! Both are generic over `R: RouteCapacity + Clone` so they run unmodified
//! against `RawRoute` (TSP/CVRP) or `TWRoute` (VRPTW); callers pass a
//! `tw_ok` closure that is `|_, _, _| true` for capacity-only routes.

use crate::constructive::params::{InitStrategy, ParameterPoint, SortStrategy};
use crate::models::job::JobType;
use crate::models::Input;
use crate::route::RouteCapacity;

/// Where, in a route, a candidate job would be inserted.
#[derive(Debug, Clone, Copy)]
enum InsertionPlan {
    Single { position: usize },
    Pair { pickup_position: usize, delivery_position: usize },
}

struct Candidate {
    job_rank: usize,
    vehicle: usize,
    plan: InsertionPlan,
    cost: f64,
    regret: f64,
}

fn endpoint_cost(input: &Input, vehicle_type: usize, prev: Option<usize>, next: Option<usize>, job_loc: usize) -> f64 {
    let added_prev = prev.map(|p| input.eval(vehicle_type, p, job_loc).cost).unwrap_or(0.0);
    let added_next = next.map(|n| input.eval(vehicle_type, job_loc, n).cost).unwrap_or(0.0);
    let removed = match (prev, next) {
        (Some(p), Some(n)) => input.eval(vehicle_type, p, n).cost,
        _ => 0.0,
    };
    added_prev + added_next - removed
}

fn neighbors_of<R: RouteCapacity>(input: &Input, route: &R, pos: usize) -> (Option<usize>, Option<usize>) {
    let seq = route.sequence();
    let vehicle = &input.vehicles()[route.vehicle()];
    let prev = if pos == 0 { vehicle.start_location() } else { Some(input.jobs()[seq[pos - 1]].location()) };
    let next = if pos == seq.len() { vehicle.end_location() } else { Some(input.jobs()[seq[pos]].location()) };
    (prev, next)
}

/// Evaluates every feasible insertion position for a Single job, returning
/// the best and the insertion-cost regret term (spec §4.5).
fn evaluate_single<R: RouteCapacity>(
    input: &Input,
    route: &R,
    job_rank: usize,
    tw_ok: impl Fn(&R, usize, usize) -> bool,
) -> Option<(InsertionPlan, f64, f64)> {
    let job = &input.jobs()[job_rank];
    let vehicle_type = input.vehicles()[route.vehicle()].vehicle_type();
    let n = route.sequence().len();

    let mut costs = Vec::new();
    for pos in 0..=n {
        if !route.is_valid_addition_for_capacity(job.pickup(), job.delivery(), pos) {
            continue;
        }
        if !tw_ok(route, job_rank, pos) {
            continue;
        }
        let (prev, next) = neighbors_of(input, route, pos);
        costs.push((pos, endpoint_cost(input, vehicle_type, prev, next, job.location())));
    }
    costs.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (best_pos, best_cost) = *costs.first()?;
    let regret = costs.get(1).map(|&(_, c)| c - best_cost).unwrap_or(0.0);
    Some((InsertionPlan::Single { position: best_pos }, best_cost, regret))
}

/// Evaluates every feasible `(pickup_position, delivery_position)` pair for
/// a pickup/delivery pair, inserting the pickup on a cloned route to probe
/// the delivery's feasibility and cost without mutating `route` (spec §9).
fn evaluate_pair<R: RouteCapacity + Clone>(
    input: &Input,
    route: &R,
    pickup_rank: usize,
    delivery_rank: usize,
    tw_ok: impl Fn(&R, usize, usize) -> bool + Copy,
) -> Option<(InsertionPlan, f64, f64)> {
    let pickup_job = &input.jobs()[pickup_rank];
    let delivery_job = &input.jobs()[delivery_rank];
    let vehicle_type = input.vehicles()[route.vehicle()].vehicle_type();
    let n = route.sequence().len();

    let mut costs = Vec::new();
    for pickup_pos in 0..=n {
        if !route.is_valid_addition_for_capacity(pickup_job.pickup(), pickup_job.delivery(), pickup_pos) {
            continue;
        }
        if !tw_ok(route, pickup_rank, pickup_pos) {
            continue;
        }
        let (prev, next) = neighbors_of(input, route, pickup_pos);
        let pickup_cost = endpoint_cost(input, vehicle_type, prev, next, pickup_job.location());

        let mut probe = route.clone();
        probe.add(pickup_rank, pickup_pos);

        for delivery_pos in (pickup_pos + 1)..=probe.sequence().len() {
            if !probe.is_valid_addition_for_capacity(delivery_job.pickup(), delivery_job.delivery(), delivery_pos) {
                continue;
            }
            if !tw_ok(&probe, delivery_rank, delivery_pos) {
                continue;
            }
            let (dprev, dnext) = neighbors_of(input, &probe, delivery_pos);
            let delivery_cost = endpoint_cost(input, vehicle_type, dprev, dnext, delivery_job.location());
            costs.push((pickup_pos, delivery_pos, pickup_cost + delivery_cost));
        }
    }
    costs.sort_by(|a, b| a.2.total_cmp(&b.2));
    let &(pickup_pos, delivery_pos, best_cost) = costs.first()?;
    let regret = costs.get(1).map(|&(_, _, c)| c - best_cost).unwrap_or(0.0);
    Some((InsertionPlan::Pair { pickup_position: pickup_pos, delivery_position: delivery_pos }, best_cost, regret))
}

/// Job ranks a caller should iterate directly: every Single job, plus every
/// Pickup job whose paired Delivery is also still unassigned (Delivery
/// ranks never appear directly — they ride along with their Pickup, spec
/// §9).
fn insertable_items(input: &Input, unassigned: &[usize]) -> Vec<usize> {
    unassigned
        .iter()
        .copied()
        .filter(|&rank| match input.jobs()[rank].job_type() {
            JobType::Single => true,
            JobType::Pickup { pair } => unassigned.contains(&pair),
            JobType::Delivery { .. } => false,
        })
        .collect()
}

fn evaluate_item<R: RouteCapacity + Clone>(
    input: &Input,
    route: &R,
    job_rank: usize,
    tw_ok: impl Fn(&R, usize, usize) -> bool + Copy,
) -> Option<(InsertionPlan, f64, f64)> {
    match input.jobs()[job_rank].job_type() {
        JobType::Single => evaluate_single(input, route, job_rank, tw_ok),
        JobType::Pickup { pair } => evaluate_pair(input, route, job_rank, pair, tw_ok),
        JobType::Delivery { .. } => None,
    }
}

fn demand_magnitude(input: &Input, job_rank: usize) -> i64 {
    let job = &input.jobs()[job_rank];
    job.pickup().values().iter().sum::<i64>() + job.delivery().values().iter().sum::<i64>()
}

fn pick_seed<R: RouteCapacity>(input: &Input, route: &R, candidates: &[usize], strategy: InitStrategy) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let vehicle = &input.vehicles()[route.vehicle()];
    let vehicle_type = vehicle.vehicle_type();
    match strategy {
        InitStrategy::None => candidates.first().copied(),
        InitStrategy::HigherAmount => candidates.iter().copied().max_by_key(|&r| demand_magnitude(input, r)),
        InitStrategy::Nearest => vehicle.start_location().and_then(|loc| {
            candidates
                .iter()
                .copied()
                .min_by(|&a, &b| {
                    let da = input.eval(vehicle_type, loc, input.jobs()[a].location()).distance;
                    let db = input.eval(vehicle_type, loc, input.jobs()[b].location()).distance;
                    da.total_cmp(&db)
                })
        }),
        InitStrategy::Furthest => vehicle.start_location().and_then(|loc| {
            candidates
                .iter()
                .copied()
                .max_by(|&a, &b| {
                    let da = input.eval(vehicle_type, loc, input.jobs()[a].location()).distance;
                    let db = input.eval(vehicle_type, loc, input.jobs()[b].location()).distance;
                    da.total_cmp(&db)
                })
        }),
        InitStrategy::EarliestDeadline => candidates
            .iter()
            .copied()
            .filter(|&r| !input.jobs()[r].time_windows().is_empty())
            .min_by_key(|&r| input.jobs()[r].time_windows().iter().map(|tw| tw.due()).min().unwrap())
            .or_else(|| candidates.first().copied()),
    }
}

fn sort_vehicles(input: &Input, order: &mut [usize], strategy: SortStrategy) {
    match strategy {
        SortStrategy::Availability => {}
        SortStrategy::Cost => {
            order.sort_by(|&a, &b| {
                input.vehicles()[a].cost_per_distance().total_cmp(&input.vehicles()[b].cost_per_distance())
            });
        }
    }
}

/// Runs the Basic Solomon-I1 variant: fills one vehicle at a time to
/// exhaustion before opening the next (spec §4.5).
///
/// Returns the job ranks that remain unassigned once no further feasible
/// insertion exists anywhere.
pub fn construct_basic<R: RouteCapacity + Clone>(
    input: &Input,
    routes: &mut [R],
    params: &ParameterPoint,
    tw_ok: impl Fn(&R, usize, usize) -> bool + Copy,
) -> Vec<usize> {
    let mut unassigned: Vec<usize> = input.jobs().iter().map(|j| j.id()).collect();
    let mut order: Vec<usize> = (0..routes.len()).collect();
    sort_vehicles(input, &mut order, params.sort_strategy);

    for vi in order {
        if unassigned.is_empty() {
            break;
        }
        seed_if_empty(input, &mut routes[vi], &mut unassigned, params.init_strategy, tw_ok);

        loop {
            let items = insertable_items(input, &unassigned);
            if items.is_empty() {
                break;
            }
            let mut best: Option<(usize, InsertionPlan, f64)> = None;
            for job_rank in items {
                let Some((plan, cost, regret)) = evaluate_item(input, &routes[vi], job_rank, tw_ok) else {
                    continue;
                };
                let score = cost - params.regret_coeff * regret;
                if best.as_ref().is_none_or(|&(_, _, s)| score < s) {
                    best = Some((job_rank, plan, score));
                }
            }
            let Some((job_rank, plan, _)) = best else {
                break;
            };
            let inserted = apply_plan_with_pair(input, &mut routes[vi], job_rank, plan);
            unassigned.retain(|r| !inserted.contains(r));
        }
    }

    unassigned
}

/// Runs the Dynamic variant: at every step, picks the single best
/// `(job, vehicle, position)` triple across every vehicle, open or not
/// (spec §4.5, §9). Ties broken by lexicographically lowest
/// `(vehicle_rank, job_rank, position)`.
pub fn construct_dynamic<R: RouteCapacity + Clone>(
    input: &Input,
    routes: &mut [R],
    params: &ParameterPoint,
    tw_ok: impl Fn(&R, usize, usize) -> bool + Copy,
) -> Vec<usize> {
    let mut unassigned: Vec<usize> = input.jobs().iter().map(|j| j.id()).collect();

    loop {
        let items = insertable_items(input, &unassigned);
        if items.is_empty() {
            break;
        }

        let mut best: Option<Candidate> = None;
        for vi in 0..routes.len() {
            for &job_rank in &items {
                let Some((plan, cost, regret)) = evaluate_item(input, &routes[vi], job_rank, tw_ok) else {
                    continue;
                };
                let score = cost - params.regret_coeff * regret;
                let better = match &best {
                    None => true,
                    Some(b) => score < b.cost || (score == b.cost && (vi, job_rank) < (b.vehicle, b.job_rank)),
                };
                if better {
                    best = Some(Candidate { job_rank, vehicle: vi, plan, cost: score, regret });
                }
            }
        }

        let Some(candidate) = best else {
            break;
        };
        let _ = candidate.regret;
        let inserted = apply_plan_with_pair(input, &mut routes[candidate.vehicle], candidate.job_rank, candidate.plan);
        unassigned.retain(|r| !inserted.contains(r));
    }

    unassigned
}

fn seed_if_empty<R: RouteCapacity + Clone>(
    input: &Input,
    route: &mut R,
    unassigned: &mut Vec<usize>,
    init_strategy: InitStrategy,
    tw_ok: impl Fn(&R, usize, usize) -> bool + Copy,
) {
    if !route.sequence().is_empty() {
        return;
    }
    let items = insertable_items(input, unassigned);
    let Some(seed) = pick_seed(input, route, &items, init_strategy) else {
        return;
    };
    let Some((plan, _, _)) = evaluate_item(input, route, seed, tw_ok) else {
        return;
    };
    let inserted = apply_plan_with_pair(input, route, seed, plan);
    unassigned.retain(|r| !inserted.contains(r));
}

fn apply_plan_with_pair<R: RouteCapacity>(input: &Input, route: &mut R, job_rank: usize, plan: InsertionPlan) -> Vec<usize> {
    match plan {
        InsertionPlan::Single { position } => {
            route.add(job_rank, position);
            vec![job_rank]
        }
        InsertionPlan::Pair { pickup_position, delivery_position } => {
            let delivery_rank = match input.jobs()[job_rank].job_type() {
                JobType::Pickup { pair } => pair,
                _ => unreachable!("Pair plan must originate from a Pickup job"),
            };
            route.add(job_rank, pickup_position);
            route.add(delivery_rank, delivery_position);
            vec![job_rank, delivery_rank]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::constructive::params::HeuristicKind;
    use crate::distance::DenseMatrix;
    use crate::models::{InputBuilder, Job, Vehicle};
    use crate::route::RawRoute;
    use std::sync::Arc;

    fn line_input(n_jobs: usize, capacity: i64) -> Arc<Input> {
        let mut coords = vec![(0.0, 0.0)];
        for i in 1..=n_jobs {
            coords.push((i as f64, 0.0));
        }
        let matrix = DenseMatrix::from_coordinates(&coords, 1.0);
        let mut builder = InputBuilder::new().add_vehicle(Vehicle::new(0, Amount::new(vec![capacity])).with_depot(0)).with_matrix(0, matrix);
        for i in 0..n_jobs {
            builder = builder.add_job(Job::new(i, i + 1, Amount::zero(1), Amount::new(vec![10])));
        }
        Arc::new(builder.finalize().expect("valid"))
    }

    #[test]
    fn test_basic_assigns_all_when_capacity_allows() {
        let input = line_input(3, 100);
        let mut routes = vec![RawRoute::new(input.clone(), 0)];
        let params = ParameterPoint::new(HeuristicKind::Basic, InitStrategy::None, SortStrategy::Availability, 0.0);
        let unassigned = construct_basic(&input, &mut routes, &params, |_, _, _| true);
        assert!(unassigned.is_empty());
        assert_eq!(routes[0].sequence().len(), 3);
    }

    #[test]
    fn test_basic_leaves_unassigned_when_over_capacity() {
        let input = line_input(2, 10);
        let mut routes = vec![RawRoute::new(input.clone(), 0)];
        let params = ParameterPoint::new(HeuristicKind::Basic, InitStrategy::None, SortStrategy::Availability, 0.0);
        let unassigned = construct_basic(&input, &mut routes, &params, |_, _, _| true);
        assert_eq!(unassigned.len(), 1);
        assert_eq!(routes[0].sequence().len(), 1);
    }

    #[test]
    fn test_dynamic_distributes_across_vehicles() {
        let input = line_input(4, 20);
        let mut routes = vec![RawRoute::new(input.clone(), 0), RawRoute::new(input.clone(), 0)];
        let params = ParameterPoint::new(HeuristicKind::Dynamic, InitStrategy::None, SortStrategy::Availability, 0.0);
        let unassigned = construct_dynamic(&input, &mut routes, &params, |_, _, _| true);
        assert!(unassigned.is_empty());
        let total: usize = routes.iter().map(|r| r.sequence().len()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_pair_inserted_together_pickup_before_delivery() {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 1.0);
        let pickup = Job::new(0, 1, Amount::new(vec![5]), Amount::zero(1)).as_pickup_of(1);
        let delivery = Job::new(1, 2, Amount::zero(1), Amount::new(vec![5])).as_delivery_of(0);
        let input = Arc::new(
            InputBuilder::new()
                .add_job(pickup)
                .add_job(delivery)
                .add_vehicle(Vehicle::new(0, Amount::new(vec![20])).with_depot(0))
                .with_matrix(0, matrix)
                .finalize()
                .expect("valid"),
        );
        let mut routes = vec![RawRoute::new(input.clone(), 0)];
        let params = ParameterPoint::new(HeuristicKind::Basic, InitStrategy::None, SortStrategy::Availability, 0.0);
        let unassigned = construct_basic(&input, &mut routes, &params, |_, _, _| true);
        assert!(unassigned.is_empty());
        let seq = routes[0].sequence();
        let pickup_idx = seq.iter().position(|&r| r == 0).unwrap();
        let delivery_idx = seq.iter().position(|&r| r == 1).unwrap();
        assert!(pickup_idx < delivery_idx);
    }
}
