//! Inter-route tail-segment exchange, a.k.a. 2-opt* (spec §4.6, §4.7).
//!
//! Given routes `A = [a0..ai, ai+1..]` and `B = [b0..bj, bj+1..]`, swapping
//! the tails produces:
//!
//! ```text
//! A' = [a0..ai] ++ [bj+1..]
//! B' = [b0..bj] ++ [ai+1..]
//! ```
//!
//! Accepted when the new pair of closing edges costs less than the old pair
//! and both resulting routes are feasible.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use crate::models::Input;
use crate::route::RouteCapacity;

fn edge_cost(input: &Input, vehicle_type: usize, from: usize, to: usize) -> f64 {
    input.eval(vehicle_type, from, to).cost
}

/// One pass of cross-exchange between two routes. Returns the updated pair
/// and net cost reduction if an improving, mutually feasible swap exists.
pub fn cross_exchange_improve<R: RouteCapacity + Clone>(
    input: &Input,
    a: &R,
    b: &R,
    feasible_a: impl Fn(&R) -> bool + Copy,
    feasible_b: impl Fn(&R) -> bool + Copy,
) -> Option<(R, R, f64)> {
    let vehicle_a = &input.vehicles()[a.vehicle()];
    let vehicle_b = &input.vehicles()[b.vehicle()];
    let seq_a = a.sequence().to_vec();
    let seq_b = b.sequence().to_vec();
    if seq_a.is_empty() || seq_b.is_empty() {
        return None;
    }

    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..seq_a.len() {
        let loc_ai = input.jobs()[seq_a[i]].location();
        let after_i = if i + 1 < seq_a.len() { Some(input.jobs()[seq_a[i + 1]].location()) } else { vehicle_a.end_location() };
        for j in 0..seq_b.len() {
            let loc_bj = input.jobs()[seq_b[j]].location();
            let after_j = if j + 1 < seq_b.len() { Some(input.jobs()[seq_b[j + 1]].location()) } else { vehicle_b.end_location() };

            let old_cost = after_i.map(|nx| edge_cost(input, vehicle_a.vehicle_type(), loc_ai, nx)).unwrap_or(0.0)
                + after_j.map(|nx| edge_cost(input, vehicle_b.vehicle_type(), loc_bj, nx)).unwrap_or(0.0);
            let new_cost = after_j.map(|nx| edge_cost(input, vehicle_a.vehicle_type(), loc_ai, nx)).unwrap_or(0.0)
                + after_i.map(|nx| edge_cost(input, vehicle_b.vehicle_type(), loc_bj, nx)).unwrap_or(0.0);
            let delta = new_cost - old_cost;

            if delta < -1e-9 && best.map(|(_, _, d)| delta < d).unwrap_or(true) {
                best = Some((i, j, delta));
            }
        }
    }

    let (i, j, delta) = best?;
    let mut new_a_seq = seq_a[..=i].to_vec();
    new_a_seq.extend_from_slice(&seq_b[j + 1..]);
    let mut new_b_seq = seq_b[..=j].to_vec();
    new_b_seq.extend_from_slice(&seq_a[i + 1..]);

    let mut new_a = a.clone();
    new_a.replace(0..seq_a.len(), &new_a_seq);
    let mut new_b = b.clone();
    new_b.replace(0..seq_b.len(), &new_b_seq);

    if new_a.is_within_capacity() && new_b.is_within_capacity() && feasible_a(&new_a) && feasible_b(&new_b) {
        Some((new_a, new_b, -delta))
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

    fn two_route_input() -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)], 1.0);
        let mut builder = InputBuilder::new()
            .add_vehicle(Vehicle::new(0, Amount::new(vec![100])).with_depot(0))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![100])).with_depot(0))
            .with_matrix(0, matrix);
        for i in 1..5 {
            builder = builder.add_job(Job::new(i - 1, i, Amount::zero(1), Amount::new(vec![1])));
        }
        Arc::new(builder.finalize().expect("valid"))
    }

    #[test]
    fn test_cross_exchange_finds_no_move_on_empty_routes() {
        let input = two_route_input();
        let a = RawRoute::new(input.clone(), 0);
        let b = RawRoute::new(input.clone(), 1);
        assert!(cross_exchange_improve(&input, &a, &b, |_| true, |_| true).is_none());
    }

    #[test]
    fn test_cross_exchange_respects_feasibility() {
        let input = two_route_input();
        let mut a = RawRoute::new(input.clone(), 0);
        a.add(0, 0);
        a.add(3, 1);
        let mut b = RawRoute::new(input.clone(), 1);
        b.add(1, 0);
        b.add(2, 1);
        assert!(cross_exchange_improve(&input, &a, &b, |_| false, |_| true).is_none());
    }
}
