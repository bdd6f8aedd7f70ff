//! Time-window profile, composed over a [`RawRoute`] (spec §4.3, §9).

use std::ops::Range;
use std::sync::Arc;

use crate::amount::Amount;
use crate::models::job::Job;
use crate::models::Input;
use crate::route::raw_route::RawRoute;
use crate::route::{RouteCapacity, RouteTimeWindow};

/// Route state that additionally tracks a time-window feasibility profile.
///
/// Wraps a [`RawRoute`] by composition rather than inheritance (spec §9):
/// capacity feasibility is delegated entirely to the inner `RawRoute`, and
/// this type is responsible only for `earliest`/`latest` bookkeeping.
#[derive(Clone)]
pub struct TWRoute {
    raw: RawRoute,
    earliest: Vec<i64>,
    latest: Vec<i64>,
    total_waiting: i64,
}

impl TWRoute {
    /// Creates an empty route for the given vehicle.
    pub fn new(input: Arc<Input>, vehicle: usize) -> Self {
        let raw = RawRoute::new(input, vehicle);
        let mut route = Self { raw, earliest: Vec::new(), latest: Vec::new(), total_waiting: 0 };
        route.resweep();
        route
    }

    /// The wrapped capacity-only route.
    pub fn raw(&self) -> &RawRoute {
        &self.raw
    }

    /// Job ranks visited, in order.
    pub fn sequence(&self) -> &[usize] {
        self.raw.sequence()
    }

    fn input(&self) -> &Input {
        self.raw.input()
    }

    fn resweep(&mut self) {
        let (earliest, latest, waiting) = self.sweep(self.raw.sequence());
        self.earliest = earliest;
        self.latest = latest;
        self.total_waiting = waiting;
    }

    /// Runs the forward and backward sweeps over an arbitrary candidate
    /// sequence, without mutating `self`. Used both to rebuild after a real
    /// mutation and to probe feasibility of a hypothetical insertion.
    fn sweep(&self, sequence: &[usize]) -> (Vec<i64>, Vec<i64>, i64) {
        let input = self.input();
        let vehicle = &input.vehicles()[self.raw.vehicle()];
        let n = sequence.len();

        let mut earliest = Vec::with_capacity(n);
        let mut total_waiting = 0i64;
        let mut location = vehicle.start_location();
        let mut time = vehicle.time_window().map(|tw| tw.ready()).unwrap_or(0);
        for &job_rank in sequence {
            let job = &input.jobs()[job_rank];
            let travel = match location {
                Some(loc) => input.eval(vehicle.vehicle_type(), loc, job.location()).duration,
                None => 0,
            };
            let arrival = time + travel;
            let start = job.best_service_start(arrival).unwrap_or(arrival);
            total_waiting += (start - arrival).max(0);
            earliest.push(start);
            time = start + job.service_duration();
            location = Some(job.location());
        }

        let mut latest = vec![0i64; n];
        let mut location = vehicle.end_location();
        let mut time = vehicle.time_window().map(|tw| tw.due()).unwrap_or(i64::MAX / 2);
        for i in (0..n).rev() {
            let job = &input.jobs()[sequence[i]];
            let travel = match location {
                Some(loc) => input.eval(vehicle.vehicle_type(), job.location(), loc).duration,
                None => 0,
            };
            let latest_departure = time - travel;
            let latest_start = tightest_due(job, latest_departure - job.service_duration());
            latest[i] = latest_start;
            time = latest_start;
            location = Some(job.location());
        }

        (earliest, latest, total_waiting)
    }

    /// Earliest feasible service start at `position`.
    pub fn earliest(&self, position: usize) -> i64 {
        self.earliest[position]
    }

    /// Latest feasible service start at `position`.
    pub fn latest(&self, position: usize) -> i64 {
        self.latest[position]
    }

    /// Total accumulated waiting time across the route.
    pub fn total_waiting(&self) -> i64 {
        self.total_waiting
    }

    /// `true` if `earliest[i] <= latest[i]` at every position of `sequence`.
    fn is_feasible_sequence(&self, sequence: &[usize]) -> bool {
        let (earliest, latest, _) = self.sweep(sequence);
        earliest.iter().zip(&latest).all(|(&e, &l)| e <= l)
    }

    /// Whether inserting `job_rank` at `rank` keeps `earliest <= latest` at
    /// every position (spec §4.3).
    pub fn is_valid_addition_for_tw(&self, job_rank: usize, rank: usize) -> bool {
        let mut candidate = self.raw.sequence().to_vec();
        candidate.insert(rank.min(candidate.len()), job_rank);
        self.is_feasible_sequence(&candidate)
    }

    /// Whether replacing `[first_rank, last_rank)` with `jobs_slice` keeps
    /// `earliest <= latest` at every position (spec §4.3).
    pub fn is_valid_addition_for_tw_subsequence(&self, jobs_slice: &[usize], first_rank: usize, last_rank: usize) -> bool {
        let mut candidate = self.raw.sequence().to_vec();
        candidate.splice(first_rank..last_rank, jobs_slice.iter().copied());
        self.is_feasible_sequence(&candidate)
    }

    /// Time-window feasibility decoupled from the capacity check.
    ///
    /// This crate always checks capacity ([`RouteCapacity`]) and time
    /// windows ([`RouteTimeWindow`]) as independent oracles, so this is
    /// equivalent to [`TWRoute::is_valid_addition_for_tw`].
    pub fn is_valid_addition_for_tw_without_max_load(&self, job_rank: usize, rank: usize) -> bool {
        self.is_valid_addition_for_tw(job_rank, rank)
    }

    /// Inserts `job_rank` at `position`, rebuilding capacity and TW profiles.
    pub fn add(&mut self, job_rank: usize, position: usize) {
        self.raw.add(job_rank, position);
        self.resweep();
    }

    /// Removes `count` jobs starting at `first`, rebuilding both profiles.
    pub fn remove(&mut self, first: usize, count: usize) {
        self.raw.remove(first, count);
        self.resweep();
    }

    /// Replaces `range` with `new_subsequence`, rebuilding both profiles.
    pub fn replace(&mut self, range: Range<usize>, new_subsequence: &[usize]) {
        self.raw.replace(range, new_subsequence);
        self.resweep();
    }

    /// Empties the route.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.resweep();
    }
}

/// Latest service start at or under `upper_bound` that still falls inside
/// one of `job`'s windows, or the tightest declared `due` at all if no
/// window opens by `upper_bound` (a non-panicking fallback; the caller is
/// responsible for having checked feasibility before committing a move).
///
/// A window only bounds the result if it's already open by `upper_bound`
/// (`ready() <= upper_bound`); among those, the window's contribution is
/// `due().min(upper_bound)`, and the latest start is the max across windows.
fn tightest_due(job: &Job, upper_bound: i64) -> i64 {
    if job.time_windows().is_empty() {
        return upper_bound;
    }
    job.time_windows()
        .iter()
        .filter(|tw| tw.ready() <= upper_bound)
        .map(|tw| tw.due().min(upper_bound))
        .max()
        .unwrap_or_else(|| job.time_windows().iter().map(|tw| tw.due()).min().unwrap())
}

impl RouteCapacity for TWRoute {
    fn sequence(&self) -> &[usize] {
        self.sequence()
    }

    fn vehicle(&self) -> usize {
        self.raw.vehicle()
    }

    fn is_valid_addition_for_capacity(&self, pickup: &Amount, delivery: &Amount, rank: usize) -> bool {
        self.raw.is_valid_addition_for_capacity(pickup, delivery, rank)
    }

    fn is_valid_addition_for_capacity_margins(
        &self,
        pickup: &Amount,
        delivery: &Amount,
        first_rank: usize,
        last_rank: usize,
    ) -> bool {
        self.raw.is_valid_addition_for_capacity_margins(pickup, delivery, first_rank, last_rank)
    }

    fn is_valid_addition_for_capacity_inclusion(
        &self,
        delivery: &Amount,
        jobs_slice: &[usize],
        first_rank: usize,
        last_rank: usize,
    ) -> bool {
        self.raw.is_valid_addition_for_capacity_inclusion(delivery, jobs_slice, first_rank, last_rank)
    }

    fn add(&mut self, job_rank: usize, position: usize) {
        self.add(job_rank, position)
    }

    fn remove(&mut self, first: usize, count: usize) {
        self.remove(first, count)
    }

    fn replace(&mut self, range: Range<usize>, new_subsequence: &[usize]) {
        self.replace(range, new_subsequence)
    }

    fn clear(&mut self) {
        self.clear()
    }

    fn is_balanced_at(&self, position: usize) -> bool {
        self.raw.is_balanced_at(position)
    }

    fn is_within_capacity(&self) -> bool {
        self.raw.is_within_capacity()
    }
}

impl RouteTimeWindow for TWRoute {
    fn earliest(&self, position: usize) -> i64 {
        self.earliest(position)
    }

    fn latest(&self, position: usize) -> i64 {
        self.latest(position)
    }

    fn total_waiting(&self) -> i64 {
        self.total_waiting()
    }

    fn is_valid_addition_for_tw(&self, job_rank: usize, rank: usize) -> bool {
        self.is_valid_addition_for_tw(job_rank, rank)
    }

    fn is_valid_addition_for_tw_subsequence(&self, jobs_slice: &[usize], first_rank: usize, last_rank: usize) -> bool {
        self.is_valid_addition_for_tw_subsequence(jobs_slice, first_rank, last_rank)
    }

    fn is_valid_addition_for_tw_without_max_load(&self, job_rank: usize, rank: usize) -> bool {
        self.is_valid_addition_for_tw_without_max_load(job_rank, rank)
    }
}
