//! Route state: the incrementally maintained capacity and time-window
//! profiles that back feasibility checks and neighborhood operators (spec
//! §4.2, §4.3, §9).
//!
//! [`RawRoute`] tracks only load/capacity. [`TWRoute`] wraps a `RawRoute` by
//! composition and adds a time-window profile. Both implement
//! [`RouteCapacity`]; only `TWRoute` implements [`RouteTimeWindow`]. Generic
//! code (e.g. neighborhood operators) that only needs capacity feasibility
//! is written against `R: RouteCapacity` and works with either route type.

pub mod raw_route;
pub mod tw_route;

pub use raw_route::RawRoute;
pub use tw_route::TWRoute;

use crate::amount::Amount;
use std::ops::Range;

/// Capacity-feasibility oracle and mutation surface shared by every route
/// type (spec §9: capability-set model, not inheritance).
pub trait RouteCapacity {
    /// The job ranks visited, in order.
    fn sequence(&self) -> &[usize];

    /// The vehicle rank this route belongs to.
    fn vehicle(&self) -> usize;

    /// Whether inserting a Single job with the given demands at `rank` keeps
    /// every step's load within capacity (spec §4.2).
    fn is_valid_addition_for_capacity(&self, pickup: &Amount, delivery: &Amount, rank: usize) -> bool;

    /// Whether replacing `[first_rank, last_rank)` with a single job of the
    /// given demands keeps capacity, accounting for the load the range
    /// itself contributed (spec §4.2).
    fn is_valid_addition_for_capacity_margins(
        &self,
        pickup: &Amount,
        delivery: &Amount,
        first_rank: usize,
        last_rank: usize,
    ) -> bool;

    /// Whether replacing `[first_rank, last_rank)` with `jobs_slice`, walked
    /// in order, stays within capacity at every intermediate step (spec
    /// §4.2).
    fn is_valid_addition_for_capacity_inclusion(
        &self,
        delivery: &Amount,
        jobs_slice: &[usize],
        first_rank: usize,
        last_rank: usize,
    ) -> bool;

    /// Inserts `job_rank` at `position`, rebuilding all profiles.
    fn add(&mut self, job_rank: usize, position: usize);

    /// Removes `count` jobs starting at `first`, rebuilding all profiles.
    fn remove(&mut self, first: usize, count: usize);

    /// Replaces `range` with `new_subsequence`, rebuilding all profiles.
    fn replace(&mut self, range: Range<usize>, new_subsequence: &[usize]);

    /// Empties the route.
    fn clear(&mut self);

    /// `true` if no pickup/delivery pair straddles position `position`
    /// (spec §9: pairing enforced via `nb_pickups`/`nb_deliveries` counters).
    fn is_balanced_at(&self, position: usize) -> bool;

    /// `true` if every step's load is within the vehicle's capacity.
    ///
    /// Used by neighborhood operators that reorder an existing sequence
    /// (2-opt, Or-opt, relocate) rather than insert a new job, where the
    /// per-insertion oracles above don't directly apply.
    fn is_within_capacity(&self) -> bool;
}

/// Time-window feasibility oracle, additional to [`RouteCapacity`] (spec
/// §4.3). Only route types that track a time profile implement this.
pub trait RouteTimeWindow: RouteCapacity {
    /// Earliest feasible service start at `position`.
    fn earliest(&self, position: usize) -> i64;

    /// Latest feasible service start at `position`.
    fn latest(&self, position: usize) -> i64;

    /// Total accumulated waiting time across the route.
    fn total_waiting(&self) -> i64;

    /// Whether inserting `job_rank` at `rank` keeps `earliest <= latest` at
    /// every position (spec §4.3).
    fn is_valid_addition_for_tw(&self, job_rank: usize, rank: usize) -> bool;

    /// Whether replacing `[first_rank, last_rank)` with `jobs_slice` keeps
    /// `earliest <= latest` at every position (spec §4.3).
    fn is_valid_addition_for_tw_subsequence(
        &self,
        jobs_slice: &[usize],
        first_rank: usize,
        last_rank: usize,
    ) -> bool;

    /// Time-window feasibility decoupled from the capacity check, for
    /// callers that combine the two oracles themselves (spec §4.3).
    fn is_valid_addition_for_tw_without_max_load(&self, job_rank: usize, rank: usize) -> bool;
}
