//! Multi-dimensional non-negative demand vectors.
//!
//! A vehicle's capacity and a job's pickup/delivery quantities are all
//! `Amount`s: fixed-length vectors of non-negative integers, one component
//! per capacity dimension (weight, volume, pallet count, ...).

use std::ops::{Add, Sub};

/// A fixed-length vector of non-negative integers.
///
/// All `Amount`s that interact (via `+`, `-`, or `<=`) must share the same
/// length; a mismatch is a programmer error and panics rather than
/// returning a `Result` — see spec §4.1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount(Vec<i64>);

impl Amount {
    /// Creates an amount from explicit per-dimension values.
    ///
    /// # Panics
    ///
    /// Panics if any component is negative.
    pub fn new(values: impl Into<Vec<i64>>) -> Self {
        let values = values.into();
        assert!(
            values.iter().all(|&v| v >= 0),
            "Amount components must be non-negative, got {values:?}"
        );
        Self(values)
    }

    /// Creates a zero amount with the given number of dimensions.
    pub fn zero(dims: usize) -> Self {
        Self(vec![0; dims])
    }

    /// Number of capacity dimensions.
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// Returns the raw per-dimension values.
    pub fn values(&self) -> &[i64] {
        &self.0
    }

    /// Returns `true` if this amount is all zeros.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }

    /// Componentwise `self <= other`.
    ///
    /// # Panics
    ///
    /// Panics if `self.dims() != other.dims()`.
    pub fn le(&self, other: &Amount) -> bool {
        assert_same_dims(self, other);
        self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// Componentwise maximum.
    ///
    /// # Panics
    ///
    /// Panics if `self.dims() != other.dims()`.
    pub fn max(&self, other: &Amount) -> Amount {
        assert_same_dims(self, other);
        Amount(self.0.iter().zip(&other.0).map(|(a, b)| (*a).max(*b)).collect())
    }

    /// Componentwise saturating-checked subtraction.
    ///
    /// # Panics
    ///
    /// Panics if dimensions mismatch or any resulting component would be
    /// negative — subtraction that could underflow is always a programmer
    /// error in this engine (callers must check feasibility first).
    pub fn checked_sub(&self, other: &Amount) -> Amount {
        assert_same_dims(self, other);
        let values: Vec<i64> = self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| {
                let r = a - b;
                assert!(r >= 0, "Amount subtraction would underflow: {a} - {b}");
                r
            })
            .collect();
        Amount(values)
    }
}

fn assert_same_dims(a: &Amount, b: &Amount) {
    assert_eq!(
        a.dims(),
        b.dims(),
        "Amount dimension mismatch: {} vs {}",
        a.dims(),
        b.dims()
    );
}

impl Add for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        assert_same_dims(self, rhs);
        Amount(self.0.iter().zip(&rhs.0).map(|(a, b)| a + b).collect())
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        &self + &rhs
    }
}

impl Sub for &Amount {
    type Output = Amount;

    /// Alias for [`Amount::checked_sub`].
    fn sub(self, rhs: &Amount) -> Amount {
        self.checked_sub(rhs)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        &self - &rhs
    }
}
