//! Single-job relocation, intra-route and inter-route (spec §4.6, §4.7).
//!
//! [`relocate_intra_improve`] moves a job to a different position in the
//! same route. [`relocate_improve`] moves a job from one route to another.
//! Both accept the best move whose combined removal saving and insertion
//! cost is negative and which keeps the destination feasible.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::models::Input;
use crate::route::RouteCapacity;

fn edge_cost(input: &Input, vehicle_type: usize, from: usize, to: usize) -> f64 {
    input.eval(vehicle_type, from, to).cost
}

/// Saving from removing the job at `pos` from `sequence` (positive means
/// removal reduces cost).
fn removal_saving(input: &Input, vehicle_type: usize, sequence: &[usize], pos: usize, start_loc: Option<usize>, end_loc: Option<usize>) -> f64 {
    let n = sequence.len();
    let prev_loc = if pos == 0 { start_loc } else { Some(input.jobs()[sequence[pos - 1]].location()) };
    let job_loc = input.jobs()[sequence[pos]].location();
    let next_loc = if pos + 1 == n { end_loc } else { Some(input.jobs()[sequence[pos + 1]].location()) };

    let removed = prev_loc.map(|p| edge_cost(input, vehicle_type, p, job_loc)).unwrap_or(0.0)
        + next_loc.map(|nx| edge_cost(input, vehicle_type, job_loc, nx)).unwrap_or(0.0);
    let closed = match (prev_loc, next_loc) {
        (Some(p), Some(nx)) => edge_cost(input, vehicle_type, p, nx),
        _ => 0.0,
    };
    removed - closed
}

/// Cost of inserting a job at location `job_loc` at position `dest` of
/// `sequence` (before any removal).
fn insertion_cost(input: &Input, vehicle_type: usize, sequence: &[usize], dest: usize, job_loc: usize, start_loc: Option<usize>, end_loc: Option<usize>) -> f64 {
    let n = sequence.len();
    let before_loc = if dest == 0 { start_loc } else { Some(input.jobs()[sequence[dest - 1]].location()) };
    let after_loc = if dest == n { end_loc } else { Some(input.jobs()[sequence[dest]].location()) };
    let opened = match (before_loc, after_loc) {
        (Some(b), Some(a)) => edge_cost(input, vehicle_type, b, a),
        _ => 0.0,
    };
    let added = before_loc.map(|b| edge_cost(input, vehicle_type, b, job_loc)).unwrap_or(0.0)
        + after_loc.map(|a| edge_cost(input, vehicle_type, job_loc, a)).unwrap_or(0.0);
    added - opened
}

/// Runs intra-route relocate to a local fixpoint: moves a single job to a
/// different position in the same route. Returns the improved route and the
/// total cost reduction, or `None` if no improving move exists.
pub fn relocate_intra_improve<R: RouteCapacity + Clone>(input: &Input, route: &R, feasible: impl Fn(&R) -> bool + Copy) -> Option<(R, f64)> {
    let vehicle = &input.vehicles()[route.vehicle()];
    let vehicle_type = vehicle.vehicle_type();
    let mut current = route.clone();
    let mut total_gain = 0.0;
    let mut improved_once = false;

    loop {
        let sequence = current.sequence().to_vec();
        let n = sequence.len();
        if n < 2 {
            break;
        }

        let mut best: Option<(usize, usize, f64)> = None;
        for pos in 0..n {
            let saving = removal_saving(input, vehicle_type, &sequence, pos, vehicle.start_location(), vehicle.end_location());
            let job_loc = input.jobs()[sequence[pos]].location();

            let mut reduced = sequence.clone();
            reduced.remove(pos);

            for dest in 0..=reduced.len() {
                if dest == pos {
                    // Same gap the job just vacated: a no-op.
                    continue;
                }
                let insert_cost = insertion_cost(input, vehicle_type, &reduced, dest, job_loc, vehicle.start_location(), vehicle.end_location());
                let delta = insert_cost - saving;
                if delta < -1e-9 && best.map(|(_, _, d)| delta < d).unwrap_or(true) {
                    best = Some((pos, dest, delta));
                }
            }
        }

        match best {
            Some((pos, dest, delta)) => {
                let job_rank = sequence[pos];
                let mut candidate = current.clone();
                candidate.remove(pos, 1);
                candidate.add(job_rank, dest);
                if candidate.is_within_capacity() && feasible(&candidate) {
                    current = candidate;
                    total_gain += -delta;
                    improved_once = true;
                } else {
                    break;
                }
            }
            None => break,
        }
    }

    if improved_once {
        Some((current, total_gain))
    } else {
        None
    }
}

/// One pass of relocate between two routes of the same vehicle type.
/// Returns the updated `(from, to)` routes and the net cost reduction if an
/// improving, feasible move was found.
pub fn relocate_improve<R: RouteCapacity + Clone>(input: &Input, from: &R, to: &R, feasible_to: impl Fn(&R) -> bool + Copy) -> Option<(R, R, f64)> {
    let vehicle_from = &input.vehicles()[from.vehicle()];
    let vehicle_to = &input.vehicles()[to.vehicle()];
    let mut current_from = from.clone();
    let mut current_to = to.clone();
    let mut total_gain = 0.0;
    let mut improved_once = false;

    loop {
        let seq_from = current_from.sequence().to_vec();
        let seq_to = current_to.sequence().to_vec();
        if seq_from.is_empty() {
            break;
        }

        let mut best: Option<(usize, usize, f64)> = None;
        for (pos, &job_rank) in seq_from.iter().enumerate() {
            let saving = removal_saving(input, vehicle_from.vehicle_type(), &seq_from, pos, vehicle_from.start_location(), vehicle_from.end_location());
            let job_loc = input.jobs()[job_rank].location();
            for dest in 0..=seq_to.len() {
                let insert_cost = insertion_cost(input, vehicle_to.vehicle_type(), &seq_to, dest, job_loc, vehicle_to.start_location(), vehicle_to.end_location());
                let delta = insert_cost - saving;
                if delta < -1e-9 && best.map(|(_, _, d)| delta < d).unwrap_or(true) {
                    best = Some((pos, dest, delta));
                }
            }
        }

        match best {
            Some((pos, dest, delta)) => {
                let job_rank = seq_from[pos];
                let mut new_to = current_to.clone();
                new_to.add(job_rank, dest);
                if new_to.is_within_capacity() && feasible_to(&new_to) {
                    let mut new_from = current_from.clone();
                    new_from.remove(pos, 1);
                    current_from = new_from;
                    current_to = new_to;
                    total_gain += -delta;
                    improved_once = true;
                } else {
                    break;
                }
            }
            None => break,
        }
    }

    if improved_once {
        Some((current_from, current_to, total_gain))
    } else {
        None
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

    fn two_vehicle_input() -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (100.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 1.0);
        let mut builder = InputBuilder::new()
            .add_vehicle(Vehicle::new(0, Amount::new(vec![100])).with_depot(0))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![100])).with_depot(1))
            .with_matrix(0, matrix);
        builder = builder.add_job(Job::new(0, 2, Amount::zero(1), Amount::new(vec![1])));
        builder = builder.add_job(Job::new(1, 3, Amount::zero(1), Amount::new(vec![1])));
        Arc::new(builder.finalize().expect("valid"))
    }

    fn badly_ordered_single_route_input() -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (2.0, 0.0)], 1.0);
        let vehicle = Vehicle::new(0, Amount::new(vec![100])).with_depot(0);
        let mut builder = InputBuilder::new().add_vehicle(vehicle).with_matrix(0, matrix);
        for i in 1..4 {
            builder = builder.add_job(Job::new(i - 1, i, Amount::zero(1), Amount::new(vec![1])));
        }
        Arc::new(builder.finalize().expect("valid"))
    }

    #[test]
    fn test_relocate_intra_moves_misplaced_job() {
        let input = badly_ordered_single_route_input();
        let mut route = RawRoute::new(input.clone(), 0);
        // Locations 1, 10, 2: visiting the far job (10.0) before the near one
        // (2.0) is a detour that moving it to the end removes.
        route.add(0, 0);
        route.add(1, 1);
        route.add(2, 2);
        let result = relocate_intra_improve(&input, &route, |_| true);
        assert!(result.is_some());
        let (improved, gain) = result.unwrap();
        assert!(gain > 0.0);
        assert_eq!(improved.sequence().len(), 3);
    }

    #[test]
    fn test_relocate_intra_no_move_on_short_route() {
        let input = badly_ordered_single_route_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        assert!(relocate_intra_improve(&input, &route, |_| true).is_none());
    }

    #[test]
    fn test_relocate_intra_respects_feasibility_predicate() {
        let input = badly_ordered_single_route_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        route.add(1, 1);
        route.add(2, 2);
        assert!(relocate_intra_improve(&input, &route, |_| false).is_none());
    }

    #[test]
    fn test_relocate_moves_job_to_closer_vehicle() {
        let input = two_vehicle_input();
        let mut far = RawRoute::new(input.clone(), 1);
        far.add(0, 0);
        far.add(1, 1);
        let near = RawRoute::new(input.clone(), 0);
        let result = relocate_improve(&input, &far, &near, |_| true);
        assert!(result.is_some());
    }

    #[test]
    fn test_relocate_no_move_from_empty_route() {
        let input = two_vehicle_input();
        let empty = RawRoute::new(input.clone(), 1);
        let near = RawRoute::new(input.clone(), 0);
        assert!(relocate_improve(&input, &empty, &near, |_| true).is_none());
    }

    #[test]
    fn test_relocate_respects_destination_feasibility() {
        let input = two_vehicle_input();
        let mut far = RawRoute::new(input.clone(), 1);
        far.add(0, 0);
        far.add(1, 1);
        let near = RawRoute::new(input.clone(), 0);
        assert!(relocate_improve(&input, &far, &near, |_| false).is_none());
    }
}
