//! Intra-route 2-opt improvement (spec §4.6).
//!
//! For each pair of edges `(i, i+1)` and `(j, j+1)` in a route, reversing the
//! segment between them may shorten the tour:
//!
//! ```text
//! delta = cost(r[i], r[j]) + cost(r[i+1], r[j+1]) - cost(r[i], r[i+1]) - cost(r[j], r[j+1])
//! ```
//!
//! Best-improvement: each full pass scans every pair, picks the feasible
//! reversal with the most negative `delta`, and applies only that one before
//! rescanning, until a pass finds nothing to improve.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::models::Input;
use crate::route::RouteCapacity;

/// Edge cost between two route positions, where `None` denotes the vehicle's
/// start/end location (outside the job sequence).
fn edge_cost(input: &Input, vehicle_type: usize, from: usize, to: usize) -> f64 {
    input.eval(vehicle_type, from, to).cost
}

/// Runs 2-opt to a local fixpoint, applying only reversals that both reduce
/// cost and satisfy `feasible`. Returns the improved route and the total
/// cost reduction, or `None` if no improving move exists.
pub fn two_opt_improve<R: RouteCapacity + Clone>(input: &Input, route: &R, feasible: impl Fn(&R) -> bool + Copy) -> Option<(R, f64)> {
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
        for i in 0..n - 1 {
            for j in i + 1..n {
                let prev_loc = if i == 0 { vehicle.start_location() } else { Some(input.jobs()[sequence[i - 1]].location()) };
                let next_loc = if j + 1 == n { vehicle.end_location() } else { Some(input.jobs()[sequence[j + 1]].location()) };
                let loc_i = input.jobs()[sequence[i]].location();
                let loc_j = input.jobs()[sequence[j]].location();

                let old_cost = prev_loc.map(|p| edge_cost(input, vehicle_type, p, loc_i)).unwrap_or(0.0)
                    + next_loc.map(|nx| edge_cost(input, vehicle_type, loc_j, nx)).unwrap_or(0.0);
                let new_cost = prev_loc.map(|p| edge_cost(input, vehicle_type, p, loc_j)).unwrap_or(0.0)
                    + next_loc.map(|nx| edge_cost(input, vehicle_type, loc_i, nx)).unwrap_or(0.0);
                let delta = new_cost - old_cost;

                if delta < -1e-9 && best.map(|(_, _, d)| delta < d).unwrap_or(true) {
                    best = Some((i, j, delta));
                }
            }
        }

        match best {
            Some((i, j, delta)) => {
                let mut candidate_seq = sequence.clone();
                candidate_seq[i..=j].reverse();
                let mut candidate = current.clone();
                candidate.replace(0..n, &candidate_seq);
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

    fn crossed_input() -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (1.0, -1.0)], 1.0);
        let vehicle = Vehicle::new(0, Amount::new(vec![100])).with_depot(0);
        let mut builder = InputBuilder::new().add_vehicle(vehicle).with_matrix(0, matrix);
        for i in 1..4 {
            builder = builder.add_job(Job::new(i - 1, i, Amount::zero(1), Amount::new(vec![1])));
        }
        Arc::new(builder.finalize().expect("valid"))
    }

    #[test]
    fn test_two_opt_reverses_crossing_route() {
        let input = crossed_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        route.add(2, 1);
        route.add(1, 2);
        let result = two_opt_improve(&input, &route, |_| true);
        assert!(result.is_some());
        let (_, gain) = result.unwrap();
        assert!(gain > 0.0);
    }

    #[test]
    fn test_two_opt_no_move_on_short_route() {
        let input = crossed_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        assert!(two_opt_improve(&input, &route, |_| true).is_none());
    }

    #[test]
    fn test_two_opt_respects_feasibility_predicate() {
        let input = crossed_input();
        let mut route = RawRoute::new(input.clone(), 0);
        route.add(0, 0);
        route.add(2, 1);
        route.add(1, 2);
        let result = two_opt_improve(&input, &route, |_| false);
        assert!(result.is_none());
    }
}
