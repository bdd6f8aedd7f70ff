//! Validation errors surfaced at `Input` construction time.
//!
//! These are the only recoverable errors this crate exposes (spec §7):
//! everything past `InputBuilder::finalize()` either succeeds or reports
//! infeasibility via the `unassigned` list, never via `Result`.

use thiserror::Error;

/// Errors raised while finalizing an [`crate::models::input::InputBuilder`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// No jobs were added to the problem.
    #[error("input has no jobs")]
    EmptyJobs,

    /// A job or vehicle referenced a location index outside the distance
    /// matrix registered for its vehicle type.
    #[error("location {location} is out of range for matrix of size {matrix_size}")]
    UnknownLocation {
        /// The offending location index.
        location: usize,
        /// Size of the distance matrix it was checked against.
        matrix_size: usize,
    },

    /// A vehicle's capacity has fewer dimensions than the problem's amount
    /// dimension (established by the first job with a demand).
    #[error(
        "vehicle {vehicle} capacity has {got} dimensions, expected {expected}"
    )]
    CapacityDimensionMismatch {
        /// Vehicle rank.
        vehicle: usize,
        /// Dimensions the vehicle's capacity actually has.
        got: usize,
        /// Dimensions required by the problem.
        expected: usize,
    },

    /// A job's pickup or delivery amount has the wrong number of dimensions.
    #[error("job {job} demand has {got} dimensions, expected {expected}")]
    JobDemandDimensionMismatch {
        /// Job rank.
        job: usize,
        /// Dimensions the job's demand actually has.
        got: usize,
        /// Dimensions required by the problem.
        expected: usize,
    },

    /// No distance matrix was registered for a vehicle type referenced by
    /// some vehicle.
    #[error("no distance matrix registered for vehicle type {vehicle_type}")]
    MissingMatrix {
        /// The vehicle type lacking a matrix.
        vehicle_type: usize,
    },

    /// A job declared itself part of a pickup/delivery pair whose partner
    /// rank does not exist or is not of the complementary type.
    #[error("job {job} has an invalid pickup/delivery partner {partner}")]
    InvalidPairPartner {
        /// Job rank.
        job: usize,
        /// The (invalid) partner rank it named.
        partner: usize,
    },
}
