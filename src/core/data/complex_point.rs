use std::ops::{Add, Mul};

/// A point on the complex plane in double precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComplexPoint {
    pub real: f64,
    pub imag: f64,
}

pub const ORIGIN: ComplexPoint = ComplexPoint {
    real: 0.0,
    imag: 0.0,
};

impl ComplexPoint {
    #[must_use]
    pub const fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    /// Squared modulus `re² + im²`. Escape checks compare against this to avoid a square root.
    #[must_use]
    pub fn norm_sqr(&self) -> f64 {
        self.real * self.real + self.imag * self.imag
    }
}

impl From<(f64, f64)> for ComplexPoint {
    fn from((real, imag): (f64, f64)) -> Self {
        Self { real, imag }
    }
}

impl Add for ComplexPoint {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            real: self.real + other.real,
            imag: self.imag + other.imag,
        }
    }
}

impl Mul for ComplexPoint {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self {
            real: self.real * other.real - self.imag * other.imag,
            imag: self.real * other.imag + self.imag * other.real,
        }
    }
}
