//! Intra-route Or-opt improvement (spec §4.6).
//!
//! Relocates a short segment (length 1 to [`MAX_SEGMENT_LEN`]) to a different
//! position within the same route, preserving the segment's internal order.
//! Unlike 2-opt this doesn't reverse edges, so it catches improvements 2-opt
//! can't reach on its own.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::models::Input;
use crate::route::RouteCapacity;

/// Longest segment considered for relocation.
const MAX_SEGMENT_LEN: usize = 3;

fn edge_cost(input: &Input, vehicle_type: usize, from: usize, to: usize) -> f64 {
    input.eval(vehicle_type, from, to).cost
}

/// Cost change from removing the segment `[start, start+len)` and closing
/// the gap it leaves behind (negative means removal saves cost).
fn removal_delta(input: &Input, vehicle_type: usize, sequence: &[usize], start: usize, len: usize, start_loc: Option<usize>, end_loc: Option<usize>) -> f64 {
    let n = sequence.len();
    let prev_loc = if start == 0 { start_loc } else { Some(input.jobs()[sequence[start - 1]].location()) };
    let seg_first = input.jobs()[sequence[start]].location();
    let seg_last = input.jobs()[sequence[start + len - 1]].location();
    let next_loc = if start + len == n { end_loc } else { Some(input.jobs()[sequence[start + len]].location()) };

    let removed = prev_loc.map(|p| edge_cost(input, vehicle_type, p, seg_first)).unwrap_or(0.0)
        + next_loc.map(|nx| edge_cost(input, vehicle_type, seg_last, nx)).unwrap_or(0.0);
    let closed = match (prev_loc, next_loc) {
        (Some(p), Some(nx)) => edge_cost(input, vehicle_type, p, nx),
        _ => 0.0,
    };
    closed - removed
}

/// Cost of inserting the segment `[seg_first, seg_last]` between `before` and
/// `after` (locations, with `None` meaning the vehicle endpoint).
fn insertion_delta(input: &Input, vehicle_type: usize, before: Option<usize>, after: Option<usize>, seg_first: usize, seg_last: usize) -> f64 {
    let opened = match (before, after) {
        (Some(b), Some(a)) => edge_cost(input, vehicle_type, b, a),
        _ => 0.0,
    };
    let added = before.map(|b| edge_cost(input, vehicle_type, b, seg_first)).unwrap_or(0.0)
        + after.map(|a| edge_cost(input, vehicle_type, seg_last, a)).unwrap_or(0.0);
    added - opened
}

/// Runs Or-opt to a local fixpoint. Returns the improved route and total
/// cost reduction, or `None` if no improving relocation exists.
pub fn or_opt_improve<R: RouteCapacity + Clone>(input: &Input, route: &R, feasible: impl Fn(&R) -> bool + Copy) -> Option<(R, f64)> {
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

        let mut best: Option<(usize, usize, usize, f64)> = None;
        for len in 1..=MAX_SEGMENT_LEN.min(n.saturating_sub(1)) {
            for start in 0..=n - len {
                let remove_gain = -removal_delta(input, vehicle_type, &sequence, start, len, vehicle.start_location(), vehicle.end_location());
                let seg_first = input.jobs()[sequence[start]].location();
                let seg_last = input.jobs()[sequence[start + len - 1]].location();

                for dest in 0..=n - len {
                    if dest >= start && dest <= start + len {
                        continue;
                    }
                    let before_loc = if dest == 0 { vehicle.start_location() } else { Some(input.jobs()[sequence[dest - 1]].location()) };
                    let after_loc = if dest == n - len { vehicle.end_location() } else { Some(input.jobs()[sequence[dest]].location()) };
                    let insert_cost = insertion_delta(input, vehicle_type, before_loc, after_loc, seg_first, seg_last);
                    let delta = insert_cost - remove_gain;
                    if delta < -1e-9 && best.map(|(_, _, _, d)| delta < d).unwrap_or(true) {
                        best = Some((start, len, dest, delta));
                    }
                }
            }
        }

        match best {
            Some((start, len, dest, delta)) => {
                let mut rest = sequence.clone();
                let segment: Vec<usize> = rest.drain(start..start + len).collect();
                let insert_at = if dest > start { dest - len } else { dest };
                rest.splice(insert_at..insert_at, segment);
                let mut candidate = current.clone();
                candidate.replace(0..n, &rest);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::distance::DenseMatrix;
    use crate::models::{InputBuilder, Job, Vehicle};
    use crate::route::RawRoute;
    use std::sync::Arc;

    fn badly_ordered_input() -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (2.0, 0.0)], 1.0);
        let vehicle = Vehicle::new(0, Amount::new(vec![100])).with_depot(0);
        let mut builder = InputBuilder::new().add_vehicle(vehicle).with_matrix(0, matrix);
        for i in 1..4 {
            builder = builder.add_job(Job::new(i - 1, i, Amount::zero(1), Amount::new(vec![1])));
        }
        Arc::new(builder.finalize().expect("valid"))
    }

    #[test]
    fn test_or_opt_relocates_misplaced_job() {
        let input = badly_ordered_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        route.add(1, 1);
        route.add(2, 2);
        let result = or_opt_improve(&input, &route, |_| true);
        assert!(result.is_some());
    }

    #[test]
    fn test_or_opt_no_move_when_infeasible() {
        let input = badly_ordered_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        route.add(1, 1);
        route.add(2, 2);
        assert!(or_opt_improve(&input, &route, |_| false).is_none());
    }

    #[test]
    fn test_or_opt_no_move_on_short_route() {
        let input = badly_ordered_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        assert!(or_opt_improve(&input, &route, |_| true).is_none());
    }
}
