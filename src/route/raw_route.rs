//! Capacity profile for a single vehicle's route (spec §4.2).

use std::ops::Range;
use std::sync::Arc;

use crate::amount::Amount;
use crate::models::job::JobType;
use crate::models::Input;
use crate::route::RouteCapacity;

fn margin(capacity: &Amount, used: &Amount) -> Amount {
    if used.le(capacity) {
        capacity.checked_sub(used)
    } else {
        Amount::zero(capacity.dims())
    }
}

/// Per-vehicle route state tracking only the capacity profile.
///
/// Every field is rebuilt from `sequence` on every mutation (spec §3, §9):
/// no half-updated view is ever observable.
#[derive(Clone)]
pub struct RawRoute {
    input: Arc<Input>,
    vehicle: usize,
    sequence: Vec<usize>,
    fwd_pickups: Vec<Amount>,
    fwd_deliveries: Vec<Amount>,
    pd_loads: Vec<Amount>,
    nb_pickups: Vec<usize>,
    nb_deliveries: Vec<usize>,
    bwd_pickups: Vec<Amount>,
    bwd_deliveries: Vec<Amount>,
    current_loads: Vec<Amount>,
    fwd_peaks: Vec<Amount>,
    bwd_peaks: Vec<Amount>,
    delivery_margin: Amount,
    pickup_margin: Amount,
}

impl RawRoute {
    /// Creates an empty route for the given vehicle.
    pub fn new(input: Arc<Input>, vehicle: usize) -> Self {
        let dims = input.zero_amount().dims();
        let mut route = Self {
            input,
            vehicle,
            sequence: Vec::new(),
            fwd_pickups: Vec::new(),
            fwd_deliveries: Vec::new(),
            pd_loads: Vec::new(),
            nb_pickups: Vec::new(),
            nb_deliveries: Vec::new(),
            bwd_pickups: Vec::new(),
            bwd_deliveries: Vec::new(),
            current_loads: Vec::new(),
            fwd_peaks: Vec::new(),
            bwd_peaks: Vec::new(),
            delivery_margin: Amount::zero(dims),
            pickup_margin: Amount::zero(dims),
        };
        route.rebuild();
        route
    }

    /// The problem this route belongs to.
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// The vehicle rank.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Job ranks visited, in order.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Number of jobs on the route.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// `true` if the route visits no jobs.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Load on the arc at `step` (`0..=len()+1`, spec §3).
    pub fn current_load(&self, step: usize) -> &Amount {
        &self.current_loads[step]
    }

    /// Componentwise running max of `current_loads[0..=step]`.
    pub fn fwd_peak(&self, step: usize) -> &Amount {
        &self.fwd_peaks[step]
    }

    /// Componentwise running max of `current_loads[step..]`.
    pub fn bwd_peak(&self, step: usize) -> &Amount {
        &self.bwd_peaks[step]
    }

    /// `capacity - current_loads[0]`, clamped to zero.
    pub fn delivery_margin(&self) -> &Amount {
        &self.delivery_margin
    }

    /// `capacity - fwd_pickups[last]`, clamped to zero.
    pub fn pickup_margin(&self) -> &Amount {
        &self.pickup_margin
    }

    /// Cumulative Single-pickup amount for positions `0..=i`.
    pub fn fwd_pickups_at(&self, i: usize) -> &Amount {
        &self.fwd_pickups[i]
    }

    /// Cumulative Single-delivery amount for positions `0..=i`.
    pub fn fwd_deliveries_at(&self, i: usize) -> &Amount {
        &self.fwd_deliveries[i]
    }

    /// Cumulative Single-delivery amount for positions `i+1..`.
    pub fn bwd_deliveries_at(&self, i: usize) -> &Amount {
        &self.bwd_deliveries[i]
    }

    /// Count of pickup/delivery-pair jobs seen by position `0..=i`.
    pub fn nb_pickups_at(&self, i: usize) -> usize {
        self.nb_pickups[i]
    }

    /// Count of pickup/delivery-pair jobs delivered by position `0..=i`.
    pub fn nb_deliveries_at(&self, i: usize) -> usize {
        self.nb_deliveries[i]
    }

    fn capacity(&self) -> &Amount {
        self.input.vehicle_capacity(self.vehicle)
    }

    /// Whether inserting a Single job with the given demands at `rank`
    /// keeps every step's load within capacity (spec §4.2).
    pub fn is_valid_addition_for_capacity(&self, pickup: &Amount, delivery: &Amount, rank: usize) -> bool {
        let capacity = self.capacity();
        let front = self.fwd_peaks[rank].clone() + delivery.clone();
        let back = self.bwd_peaks[rank].clone() + pickup.clone();
        front.le(capacity) && back.le(capacity)
    }

    /// Whether replacing `[first_rank, last_rank)` with a single job of the
    /// given demands keeps capacity, accounting for what the range itself
    /// contributed (spec §4.2).
    pub fn is_valid_addition_for_capacity_margins(
        &self,
        pickup: &Amount,
        delivery: &Amount,
        first_rank: usize,
        last_rank: usize,
    ) -> bool {
        let capacity = self.capacity();
        let dims = capacity.dims();
        let removed_from = if first_rank == 0 { self.current_loads[0].clone() } else { self.bwd_deliveries[first_rank - 1].clone() };
        let replaced_deliveries = removed_from.checked_sub(&self.bwd_deliveries[last_rank - 1]);
        let prior_pickups = if first_rank == 0 { Amount::zero(dims) } else { self.fwd_pickups[first_rank - 1].clone() };
        let replaced_pickups = self.fwd_pickups[last_rank - 1].checked_sub(&prior_pickups);

        let front = self.fwd_peaks[first_rank].clone() + delivery.clone();
        let back = self.bwd_peaks[last_rank].clone() + pickup.clone();
        front.le(&(capacity.clone() + replaced_deliveries)) && back.le(&(capacity.clone() + replaced_pickups))
    }

    /// Whether replacing `[first_rank, last_rank)` with `jobs_slice`, walked
    /// in order as a simulated insertion, stays within capacity at every
    /// intermediate step (spec §4.2).
    pub fn is_valid_addition_for_capacity_inclusion(
        &self,
        delivery: &Amount,
        jobs_slice: &[usize],
        first_rank: usize,
        last_rank: usize,
    ) -> bool {
        let capacity = self.capacity();
        let dims = capacity.dims();
        let outer_remaining_delivery =
            if last_rank == 0 { self.current_loads[0].clone() } else { self.bwd_deliveries[last_rank - 1].clone() };
        let outer_pickups = if first_rank == 0 { Amount::zero(dims) } else { self.fwd_pickups[first_rank - 1].clone() };

        let mut running = outer_remaining_delivery + outer_pickups + delivery.clone();
        if !running.le(capacity) {
            return false;
        }

        for &job_rank in jobs_slice {
            let job = &self.input.jobs()[job_rank];
            match job.job_type() {
                JobType::Single => {
                    running = running.checked_sub(job.delivery()) + job.pickup().clone();
                }
                JobType::Pickup { .. } => {
                    running = running + job.pickup().clone();
                }
                JobType::Delivery { .. } => {
                    running = running.checked_sub(job.delivery());
                }
            }
            if !running.le(capacity) {
                return false;
            }
        }
        true
    }

    /// `true` if every step's load is within the vehicle's capacity.
    pub fn is_within_capacity(&self) -> bool {
        let capacity = self.capacity();
        self.fwd_peaks.last().map(|peak| peak.le(capacity)).unwrap_or(true)
    }

    /// `true` if no open pickup/delivery pair straddles `position` (spec §9).
    pub fn is_balanced_at(&self, position: usize) -> bool {
        if self.sequence.is_empty() {
            return true;
        }
        let i = position.min(self.sequence.len() - 1);
        self.nb_pickups[i] == self.nb_deliveries[i]
    }

    /// Inserts `job_rank` at `position` and rebuilds all profiles.
    ///
    /// # Panics
    ///
    /// Panics if `position > len()`.
    pub fn add(&mut self, job_rank: usize, position: usize) {
        assert!(position <= self.sequence.len(), "position {position} out of range for route of length {}", self.sequence.len());
        self.sequence.insert(position, job_rank);
        self.rebuild();
    }

    /// Removes `count` jobs starting at `first` and rebuilds all profiles.
    ///
    /// # Panics
    ///
    /// Panics if `first + count > len()`.
    pub fn remove(&mut self, first: usize, count: usize) {
        assert!(first + count <= self.sequence.len(), "range out of bounds for route of length {}", self.sequence.len());
        self.sequence.drain(first..first + count);
        self.rebuild();
    }

    /// Replaces `range` with `new_subsequence` and rebuilds all profiles.
    ///
    /// # Panics
    ///
    /// Panics if `range.end > len()`.
    pub fn replace(&mut self, range: Range<usize>, new_subsequence: &[usize]) {
        assert!(range.end <= self.sequence.len(), "range out of bounds for route of length {}", self.sequence.len());
        self.sequence.splice(range, new_subsequence.iter().copied());
        self.rebuild();
    }

    /// Empties the route.
    pub fn clear(&mut self) {
        self.sequence.clear();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let n = self.sequence.len();
        let dims = self.input.zero_amount().dims();
        let zero = Amount::zero(dims);

        let mut fwd_pickups = Vec::with_capacity(n);
        let mut fwd_deliveries = Vec::with_capacity(n);
        let mut pd_loads = Vec::with_capacity(n);
        let mut nb_pickups = Vec::with_capacity(n);
        let mut nb_deliveries = Vec::with_capacity(n);

        let mut running_pickup = zero.clone();
        let mut running_delivery = zero.clone();
        let mut running_pd = zero.clone();
        let mut count_pickups = 0usize;
        let mut count_deliveries = 0usize;

        for &job_rank in &self.sequence {
            let job = &self.input.jobs()[job_rank];
            match job.job_type() {
                JobType::Single => {
                    running_pickup = running_pickup + job.pickup().clone();
                    running_delivery = running_delivery + job.delivery().clone();
                }
                JobType::Pickup { .. } => {
                    running_pd = running_pd + job.pickup().clone();
                    count_pickups += 1;
                }
                JobType::Delivery { .. } => {
                    running_pd = running_pd.checked_sub(job.delivery());
                    count_deliveries += 1;
                }
            }
            fwd_pickups.push(running_pickup.clone());
            fwd_deliveries.push(running_delivery.clone());
            pd_loads.push(running_pd.clone());
            nb_pickups.push(count_pickups);
            nb_deliveries.push(count_deliveries);
        }

        let mut bwd_pickups = vec![zero.clone(); n];
        let mut bwd_deliveries = vec![zero.clone(); n];
        let mut running_pickup_b = zero.clone();
        let mut running_delivery_b = zero.clone();
        for i in (0..n).rev() {
            bwd_pickups[i] = running_pickup_b.clone();
            bwd_deliveries[i] = running_delivery_b.clone();
            let job = &self.input.jobs()[self.sequence[i]];
            if let JobType::Single = job.job_type() {
                running_pickup_b = running_pickup_b + job.pickup().clone();
                running_delivery_b = running_delivery_b + job.delivery().clone();
            }
        }

        let total_delivery = fwd_deliveries.last().cloned().unwrap_or_else(|| zero.clone());
        let mut current_loads = Vec::with_capacity(n + 2);
        current_loads.push(total_delivery.clone());
        for i in 0..n {
            let remaining_delivery = total_delivery.checked_sub(&fwd_deliveries[i]);
            let load = remaining_delivery + fwd_pickups[i].clone() + pd_loads[i].clone();
            current_loads.push(load);
        }
        current_loads.push(current_loads[n].clone());

        let len = current_loads.len();
        let mut fwd_peaks = Vec::with_capacity(len);
        let mut running_max = zero.clone();
        for load in &current_loads {
            running_max = running_max.max(load);
            fwd_peaks.push(running_max.clone());
        }

        let mut bwd_peaks = vec![zero.clone(); len];
        let mut running_max_b = zero.clone();
        for i in (0..len).rev() {
            running_max_b = running_max_b.max(&current_loads[i]);
            bwd_peaks[i] = running_max_b.clone();
        }

        let capacity = self.input.vehicle_capacity(self.vehicle).clone();
        self.delivery_margin = margin(&capacity, &current_loads[0]);
        self.pickup_margin = margin(&capacity, fwd_pickups.last().unwrap_or(&zero));

        self.fwd_pickups = fwd_pickups;
        self.fwd_deliveries = fwd_deliveries;
        self.pd_loads = pd_loads;
        self.nb_pickups = nb_pickups;
        self.nb_deliveries = nb_deliveries;
        self.bwd_pickups = bwd_pickups;
        self.bwd_deliveries = bwd_deliveries;
        self.current_loads = current_loads;
        self.fwd_peaks = fwd_peaks;
        self.bwd_peaks = bwd_peaks;
    }
}

impl RouteCapacity for RawRoute {
    fn sequence(&self) -> &[usize] {
        self.sequence()
    }

    fn vehicle(&self) -> usize {
        self.vehicle()
    }

    fn is_valid_addition_for_capacity(&self, pickup: &Amount, delivery: &Amount, rank: usize) -> bool {
        self.is_valid_addition_for_capacity(pickup, delivery, rank)
    }

    fn is_valid_addition_for_capacity_margins(
        &self,
        pickup: &Amount,
        delivery: &Amount,
        first_rank: usize,
        last_rank: usize,
    ) -> bool {
        self.is_valid_addition_for_capacity_margins(pickup, delivery, first_rank, last_rank)
    }

    fn is_valid_addition_for_capacity_inclusion(
        &self,
        delivery: &Amount,
        jobs_slice: &[usize],
        first_rank: usize,
        last_rank: usize,
    ) -> bool {
        self.is_valid_addition_for_capacity_inclusion(delivery, jobs_slice, first_rank, last_rank)
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
        self.is_balanced_at(position)
    }

    fn is_within_capacity(&self) -> bool {
        self.is_within_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DenseMatrix;
    use crate::models::{InputBuilder, Job, Vehicle};

    fn input_with(coords: &[(f64, f64)], capacity: i64) -> Arc<Input> {
        let matrix = DenseMatrix::from_coordinates(coords, 1.0);
        let mut builder = InputBuilder::new().add_vehicle(Vehicle::new(0, Amount::new(vec![capacity])).with_depot(0)).with_matrix(0, matrix);
        for (i, _) in coords.iter().enumerate().skip(1) {
            builder = builder.add_job(Job::new(i - 1, i, Amount::zero(1), Amount::new(vec![10])));
        }
        Arc::new(builder.finalize().expect("valid input"))
    }

    #[test]
    fn test_empty_route_profiles() {
        let input = input_with(&[(0.0, 0.0), (1.0, 0.0)], 50);
        let route = RawRoute::new(input, 0);
        assert_eq!(route.current_loads.len(), 2);
        assert_eq!(route.fwd_peaks.len(), 2);
        assert!(route.current_load(0).values().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_add_tracks_delivery_load() {
        let input = input_with(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 50);
        let mut route = RawRoute::new(input, 0);
        route.add(0, 0);
        route.add(1, 1);
        assert_eq!(route.current_load(0).values(), &[20]);
        assert_eq!(route.current_load(1).values(), &[10]);
        assert_eq!(route.current_load(2).values(), &[0]);
        assert_eq!(route.current_load(3).values(), &[0]);
    }

    #[test]
    fn test_capacity_rejects_overflow() {
        let input = input_with(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 15);
        let mut route = RawRoute::new(input, 0);
        route.add(0, 0);
        let feasible = route.is_valid_addition_for_capacity(&Amount::zero(1), &Amount::new(vec![10]), 1);
        assert!(!feasible);
    }

    #[test]
    fn test_capacity_accepts_within_bounds() {
        let input = input_with(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 50);
        let route = RawRoute::new(input, 0);
        let feasible = route.is_valid_addition_for_capacity(&Amount::zero(1), &Amount::new(vec![10]), 0);
        assert!(feasible);
    }

    #[test]
    fn test_remove_rebuilds() {
        let input = input_with(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], 50);
        let mut route = RawRoute::new(input, 0);
        route.add(0, 0);
        route.add(1, 1);
        route.remove(0, 1);
        assert_eq!(route.sequence(), &[1]);
        assert_eq!(route.current_load(0).values(), &[10]);
    }

    #[test]
    #[should_panic]
    fn test_add_out_of_range_panics() {
        let input = input_with(&[(0.0, 0.0), (1.0, 0.0)], 50);
        let mut route = RawRoute::new(input, 0);
        route.add(0, 5);
    }

    #[test]
    fn test_peaks_equal_running_max() {
        let input = input_with(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)], 100);
        let mut route = RawRoute::new(input, 0);
        route.add(0, 0);
        route.add(1, 1);
        route.add(2, 2);
        let mut running = Amount::zero(1);
        for s in 0..route.current_loads.len() {
            running = running.max(route.current_load(s));
            assert_eq!(route.fwd_peak(s).values(), running.values());
        }
    }

    #[test]
    fn test_is_balanced_at_with_no_pairs() {
        let input = input_with(&[(0.0, 0.0), (1.0, 0.0)], 50);
        let mut route = RawRoute::new(input, 0);
        route.add(0, 0);
        assert!(route.is_balanced_at(0));
    }
}
