//! Immutable problem input: jobs, vehicles, and precomputed travel data.

use std::collections::HashMap;

use crate::amount::Amount;
use crate::distance::DistanceMatrixProvider;
use crate::error::InputError;
use crate::evaluation::Eval;
use crate::models::job::{Job, JobType};
use crate::models::vehicle::Vehicle;

/// Builder for [`Input`] (spec §6).
///
/// Add jobs and vehicles, register one distance-matrix provider per vehicle
/// type used, then [`InputBuilder::finalize`]. After that, [`Input`] is
/// read-only.
///
/// # Examples
///
/// ```
/// use routecraft::amount::Amount;
/// use routecraft::distance::DenseMatrix;
/// use routecraft::models::{InputBuilder, Job, Vehicle};
///
/// let matrix = DenseMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0)], 1.0);
/// let input = InputBuilder::new()
///     .add_job(Job::new(0, 1, Amount::new(vec![1]), Amount::zero(1)))
///     .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
///     .with_matrix(0, matrix)
///     .finalize()
///     .unwrap();
/// assert_eq!(input.jobs().len(), 1);
/// ```
#[derive(Default)]
pub struct InputBuilder {
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    matrices: HashMap<usize, Box<dyn DistanceMatrixProvider>>,
}

impl InputBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job. Jobs should be added in rank order matching their `id()`.
    pub fn add_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    /// Adds a vehicle. Vehicles should be added in rank order matching their `id()`.
    pub fn add_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicles.push(vehicle);
        self
    }

    /// Registers the distance-matrix provider for a vehicle type.
    pub fn with_matrix(mut self, vehicle_type: usize, matrix: impl DistanceMatrixProvider + 'static) -> Self {
        self.matrices.insert(vehicle_type, Box::new(matrix));
        self
    }

    /// Validates and freezes the input (spec §7).
    pub fn finalize(self) -> Result<Input, InputError> {
        if self.jobs.is_empty() {
            return Err(InputError::EmptyJobs);
        }

        let dims = self.jobs[0].pickup().dims();
        for job in &self.jobs {
            if job.pickup().dims() != dims {
                return Err(InputError::JobDemandDimensionMismatch {
                    job: job.id(),
                    got: job.pickup().dims(),
                    expected: dims,
                });
            }
            if job.delivery().dims() != dims {
                return Err(InputError::JobDemandDimensionMismatch {
                    job: job.id(),
                    got: job.delivery().dims(),
                    expected: dims,
                });
            }
            if let JobType::Pickup { pair } | JobType::Delivery { pair } = job.job_type() {
                let ok = self.jobs.get(pair).is_some_and(|partner| {
                    matches!(
                        (job.job_type(), partner.job_type()),
                        (JobType::Pickup { .. }, JobType::Delivery { .. })
                            | (JobType::Delivery { .. }, JobType::Pickup { .. })
                    )
                });
                if !ok {
                    return Err(InputError::InvalidPairPartner { job: job.id(), partner: pair });
                }
            }
        }

        for vehicle in &self.vehicles {
            if vehicle.capacity().dims() != dims {
                return Err(InputError::CapacityDimensionMismatch {
                    vehicle: vehicle.id(),
                    got: vehicle.capacity().dims(),
                    expected: dims,
                });
            }
            let matrix = self
                .matrices
                .get(&vehicle.vehicle_type())
                .ok_or(InputError::MissingMatrix { vehicle_type: vehicle.vehicle_type() })?;
            for loc in [vehicle.start_location(), vehicle.end_location()].into_iter().flatten() {
                if loc >= matrix.size() {
                    return Err(InputError::UnknownLocation { location: loc, matrix_size: matrix.size() });
                }
            }
        }

        for job in &self.jobs {
            for vehicle_type in self.matrices.keys() {
                let matrix = &self.matrices[vehicle_type];
                if job.location() >= matrix.size() {
                    return Err(InputError::UnknownLocation { location: job.location(), matrix_size: matrix.size() });
                }
            }
        }

        let mut eval_grids = HashMap::with_capacity(self.matrices.len());
        for (&vehicle_type, matrix) in &self.matrices {
            let size = matrix.size();
            let mut grid = Vec::with_capacity(size * size);
            for from in 0..size {
                for to in 0..size {
                    grid.push(Eval {
                        cost: matrix.cost(from, to),
                        duration: matrix.duration(from, to),
                        distance: matrix.distance(from, to),
                    });
                }
            }
            eval_grids.insert(vehicle_type, (size, grid));
        }

        Ok(Input {
            jobs: self.jobs,
            vehicles: self.vehicles,
            eval_grids,
            zero_amount: Amount::zero(dims),
        })
    }
}

/// Immutable, validated problem instance (spec §3).
///
/// Holds jobs, vehicles, and a precomputed `(vehicle_type, from, to) -> Eval`
/// lookup. Shared read-only across search threads (typically via `Arc`).
pub struct Input {
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    eval_grids: HashMap<usize, (usize, Vec<Eval>)>,
    zero_amount: Amount,
}

impl Input {
    /// All jobs, indexed by rank.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// All vehicles, indexed by rank.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// The zero `Amount` of this problem's dimension, for accumulator init.
    pub fn zero_amount(&self) -> &Amount {
        &self.zero_amount
    }

    /// Pickup amount contributed by a job at a route stop.
    pub fn job_pickup(&self, rank: usize) -> &Amount {
        self.jobs[rank].pickup()
    }

    /// Delivery amount contributed by a job at a route stop.
    pub fn job_delivery(&self, rank: usize) -> &Amount {
        self.jobs[rank].delivery()
    }

    /// A vehicle's capacity.
    pub fn vehicle_capacity(&self, rank: usize) -> &Amount {
        self.vehicles[rank].capacity()
    }

    /// Looks up the precomputed `Eval` for `(vehicle_type, from, to)`.
    ///
    /// # Panics
    ///
    /// Panics if no matrix was registered for `vehicle_type`, or if `from`/`to`
    /// are out of range — both are usage errors (spec §7), guaranteed not to
    /// happen for any well-formed `Input` since `finalize` validated every
    /// location referenced by a job or vehicle.
    pub fn eval(&self, vehicle_type: usize, from: usize, to: usize) -> Eval {
        let (size, grid) = self
            .eval_grids
            .get(&vehicle_type)
            .unwrap_or_else(|| panic!("no matrix registered for vehicle type {vehicle_type}"));
        grid[from * size + to]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DenseMatrix;

    fn matrix() -> DenseMatrix {
        DenseMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)], 1.0)
    }

    #[test]
    fn test_finalize_empty_jobs() {
        let result = InputBuilder::new()
            .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
            .with_matrix(0, matrix())
            .finalize();
        assert_eq!(result.unwrap_err(), InputError::EmptyJobs);
    }

    #[test]
    fn test_finalize_missing_matrix() {
        let result = InputBuilder::new()
            .add_job(Job::new(0, 1, Amount::new(vec![1]), Amount::zero(1)))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
            .finalize();
        assert_eq!(result.unwrap_err(), InputError::MissingMatrix { vehicle_type: 0 });
    }

    #[test]
    fn test_finalize_capacity_mismatch() {
        let result = InputBuilder::new()
            .add_job(Job::new(0, 1, Amount::new(vec![1, 1]), Amount::zero(2)))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
            .with_matrix(0, matrix())
            .finalize();
        assert_eq!(
            result.unwrap_err(),
            InputError::CapacityDimensionMismatch { vehicle: 0, got: 1, expected: 2 }
        );
    }

    #[test]
    fn test_finalize_unknown_location() {
        let result = InputBuilder::new()
            .add_job(Job::new(0, 99, Amount::new(vec![1]), Amount::zero(1)))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
            .with_matrix(0, matrix())
            .finalize();
        assert_eq!(result.unwrap_err(), InputError::UnknownLocation { location: 99, matrix_size: 3 });
    }

    #[test]
    fn test_finalize_invalid_pair_partner() {
        let result = InputBuilder::new()
            .add_job(Job::new(0, 1, Amount::new(vec![1]), Amount::zero(1)).as_pickup_of(5))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
            .with_matrix(0, matrix())
            .finalize();
        assert_eq!(result.unwrap_err(), InputError::InvalidPairPartner { job: 0, partner: 5 });
    }

    #[test]
    fn test_finalize_ok() {
        let input = InputBuilder::new()
            .add_job(Job::new(0, 1, Amount::new(vec![1]), Amount::zero(1)))
            .add_job(Job::new(1, 2, Amount::new(vec![1]), Amount::zero(1)))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
            .with_matrix(0, matrix())
            .finalize()
            .expect("valid");
        assert_eq!(input.jobs().len(), 2);
        assert_eq!(input.vehicles().len(), 1);
        let eval = input.eval(0, 0, 1);
        assert!((eval.distance - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_pair_roundtrip_valid() {
        let input = InputBuilder::new()
            .add_job(Job::new(0, 1, Amount::new(vec![5]), Amount::zero(1)).as_pickup_of(1))
            .add_job(Job::new(1, 2, Amount::zero(1), Amount::new(vec![5])).as_delivery_of(0))
            .add_vehicle(Vehicle::new(0, Amount::new(vec![10])).with_depot(0))
            .with_matrix(0, matrix())
            .finalize();
        assert!(input.is_ok());
    }
}
