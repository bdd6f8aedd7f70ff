//! Deterministic round-robin local search driver (spec §4.6, §4.7, §10).
//!
//! Applies the neighborhood operators in a fixed canonical order — 2-opt,
//! Or-opt, relocate (intra), relocate (inter), cross-exchange — repeating the
//! full cycle up to `depth` times or until a round makes no improvement,
//! whichever comes first. Stops early if `deadline` passes. The order is
//! fixed rather than randomized so that the same input and parameter point
//! always produce the same result.

use std::time::Instant;

use crate::local_search::cross_exchange::cross_exchange_improve;
use crate::local_search::or_opt::or_opt_improve;
use crate::local_search::relocate::{relocate_improve, relocate_intra_improve};
use crate::local_search::two_opt::two_opt_improve;
use crate::models::Input;
use crate::route::tw_route::TWRoute;
use crate::route::RouteCapacity;

/// `true` if every position of a time-window route's profile is feasible.
///
/// A route's `earliest`/`latest` arrays are always populated after a
/// mutation, whether or not the sequence is actually servable; this is the
/// companion check that turns the profile into a yes/no feasibility oracle.
pub fn tw_route_is_feasible(route: &TWRoute) -> bool {
    (0..route.sequence().len()).all(|i| route.earliest(i) <= route.latest(i))
}

/// Runs one full round-robin local search over `routes`, in place.
///
/// `feasible` additionally validates each candidate route beyond capacity
/// (which every operator already checks via [`RouteCapacity::is_within_capacity`]
/// trait method internally) — pass `|_| true` for capacity-only problems and
/// [`tw_route_is_feasible`] for time-window problems.
///
/// Returns the total cost reduction achieved before `depth` rounds complete,
/// no round improves further, or `deadline` passes.
pub fn run_local_search<R: RouteCapacity + Clone>(
    input: &Input,
    routes: &mut [R],
    depth: usize,
    deadline: Option<Instant>,
    feasible: impl Fn(&R) -> bool + Copy,
) -> f64 {
    let mut total_gain = 0.0;

    for _ in 0..depth.max(1) {
        if deadline.map(|d| Instant::now() >= d).unwrap_or(false) {
            break;
        }
        let mut round_gain = 0.0;

        for idx in 0..routes.len() {
            if let Some((improved, gain)) = two_opt_improve(input, &routes[idx], feasible) {
                routes[idx] = improved;
                round_gain += gain;
            }
        }

        for idx in 0..routes.len() {
            if let Some((improved, gain)) = or_opt_improve(input, &routes[idx], feasible) {
                routes[idx] = improved;
                round_gain += gain;
            }
        }

        for idx in 0..routes.len() {
            if let Some((improved, gain)) = relocate_intra_improve(input, &routes[idx], feasible) {
                routes[idx] = improved;
                round_gain += gain;
            }
        }

        for i in 0..routes.len() {
            for j in 0..routes.len() {
                if i == j {
                    continue;
                }
                if let Some((new_from, new_to, gain)) = relocate_improve(input, &routes[i], &routes[j], feasible) {
                    routes[i] = new_from;
                    routes[j] = new_to;
                    round_gain += gain;
                }
            }
        }

        for i in 0..routes.len() {
            for j in (i + 1)..routes.len() {
                if let Some((new_a, new_b, gain)) = cross_exchange_improve(input, &routes[i], &routes[j], feasible, feasible) {
                    routes[i] = new_a;
                    routes[j] = new_b;
                    round_gain += gain;
                }
            }
        }

        total_gain += round_gain;
        if round_gain <= 1e-9 {
            break;
        }
    }

    total_gain
}
