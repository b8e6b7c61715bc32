//! Unit newtypes for diagram quantities.
//!
//! Keeps grid spacing and nominal voltage from being confused with plain
//! canvas coordinates. [`GridSize`] is validated on construction, so every
//! operation that snaps to a grid can assume a finite, positive spacing.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::error::{SldError, SldResult};

/// Grid spacing used when none is configured.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Voltage in kilovolts (kV)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl Kilovolts {
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Add for Kilovolts {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Kilovolts {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Kilovolts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} kV", self.0)
    }
}

/// Grid spacing in canvas units. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GridSize(f64);

impl GridSize {
    pub fn new(value: f64) -> SldResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(SldError::Config(format!(
                "grid size must be a finite positive number, got {value}"
            )));
        }
        Ok(Self(value))
    }

    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(DEFAULT_GRID_SIZE)
    }
}

impl TryFrom<f64> for GridSize {
    type Error = SldError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        GridSize::new(value)
    }
}

impl From<GridSize> for f64 {
    fn from(grid: GridSize) -> Self {
        grid.0
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_rejects_non_positive() {
        assert!(GridSize::new(0.0).is_err());
        assert!(GridSize::new(-5.0).is_err());
        assert!(GridSize::new(f64::NAN).is_err());
        assert!(GridSize::new(f64::INFINITY).is_err());
        assert_eq!(GridSize::new(10.0).unwrap().value(), 10.0);
    }

    #[test]
    fn test_grid_size_default() {
        assert_eq!(GridSize::default().value(), DEFAULT_GRID_SIZE);
    }

    #[test]
    fn test_grid_size_deserialize_validates() {
        let ok: GridSize = serde_json::from_str("25").unwrap();
        assert_eq!(ok.value(), 25.0);
        assert!(serde_json::from_str::<GridSize>("0").is_err());
    }

    #[test]
    fn test_kilovolts_display() {
        assert_eq!(Kilovolts(15.0).to_string(), "15 kV");
        assert_eq!((Kilovolts(20.0) - Kilovolts(5.0)).value(), 15.0);
    }
}
