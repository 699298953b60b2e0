//! Validated millimetre scalars.
//!
//! These newtypes are the hard validation boundary for the schema: a value
//! that exists is a value that is valid. All serialize as bare numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// A finite length strictly greater than zero (mm).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PositiveMm(f64);

impl PositiveMm {
    pub fn new(value: f64) -> Result<Self, SchemaError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(SchemaError::NotPositive { value })
        }
    }

    /// For crate-internal defaults that are valid by construction.
    pub(crate) const fn literal(value: f64) -> Self {
        Self(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// A finite length greater than or equal to zero (mm).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct NonNegativeMm(f64);

impl NonNegativeMm {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Result<Self, SchemaError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(SchemaError::Negative { value })
        }
    }

    pub(crate) const fn literal(value: f64) -> Self {
        Self(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// A finite coordinate (mm), of either sign.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FiniteMm(f64);

impl FiniteMm {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Result<Self, SchemaError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(SchemaError::NotFinite { value })
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PositiveMm {
    type Error = SchemaError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<f64> for NonNegativeMm {
    type Error = SchemaError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<f64> for FiniteMm {
    type Error = SchemaError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositiveMm> for f64 {
    fn from(v: PositiveMm) -> f64 {
        v.0
    }
}

impl From<NonNegativeMm> for f64 {
    fn from(v: NonNegativeMm) -> f64 {
        v.0
    }
}

impl From<FiniteMm> for f64 {
    fn from(v: FiniteMm) -> f64 {
        v.0
    }
}

impl fmt::Display for PositiveMm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.0)
    }
}

impl fmt::Display for NonNegativeMm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.0)
    }
}

impl fmt::Display for FiniteMm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_negative_and_nan() {
        assert!(PositiveMm::new(0.0).is_err());
        assert!(PositiveMm::new(-1.0).is_err());
        assert!(PositiveMm::new(f64::NAN).is_err());
        assert!(PositiveMm::new(f64::INFINITY).is_err());
        assert_eq!(PositiveMm::new(0.5).unwrap().get(), 0.5);
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(NonNegativeMm::new(0.0).unwrap(), NonNegativeMm::ZERO);
        assert!(NonNegativeMm::new(-0.01).is_err());
    }

    #[test]
    fn finite_accepts_negative_and_rejects_nan_and_infinity() {
        assert_eq!(FiniteMm::new(-3.5).unwrap().get(), -3.5);
        assert_eq!(FiniteMm::default(), FiniteMm::ZERO);
        assert_eq!(
            FiniteMm::new(f64::NAN).unwrap_err().to_string(),
            "expected a finite coordinate, got NaN"
        );
        assert!(FiniteMm::new(f64::INFINITY).is_err());
        assert!(FiniteMm::new(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let ok: PositiveMm = serde_json::from_str("1.6").unwrap();
        assert_eq!(ok.get(), 1.6);
        assert!(serde_json::from_str::<PositiveMm>("0").is_err());
        assert!(serde_json::from_str::<NonNegativeMm>("-2.0").is_err());
        assert!(serde_json::from_str::<FiniteMm>("null").is_err());
        assert_eq!(serde_json::from_str::<FiniteMm>("-12.25").unwrap().get(), -12.25);
    }
}
