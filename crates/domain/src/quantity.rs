use std::{
    fmt,
    ops::{Add, AddAssign, Mul},
};

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<u32> for Reps {
    type Error = RepsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Reps::new(value)
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

impl From<Reps> for f32 {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: Reps) -> Self {
        value.0 as f32
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Weight(f32);

impl Weight {
    pub const ZERO: Weight = Weight(0.0);

    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !value.is_finite() {
            return Err(WeightError::NotFinite);
        }

        if value < 0.0 {
            return Err(WeightError::Negative);
        }

        Ok(Self(value))
    }

    /// Rounds down to the next multiple of `step`.
    #[must_use]
    pub fn round_down_to(self, step: f32) -> Weight {
        if step <= 0.0 {
            return self;
        }
        Weight(((self.0 / step).floor() * step).max(0.0))
    }

    #[must_use]
    pub fn scale(self, factor: f32) -> Weight {
        Weight((self.0 * factor).max(0.0))
    }

    #[must_use]
    pub fn at_least(self, minimum: f32) -> Weight {
        Weight(self.0.max(minimum).max(0.0))
    }
}

impl TryFrom<f32> for Weight {
    type Error = WeightError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Weight::new(value)
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

impl Mul<Reps> for Weight {
    type Output = Volume;

    fn mul(self, rhs: Reps) -> Self::Output {
        Volume(self.0 * f32::from(rhs))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must not be negative")]
    Negative,
    #[error("Weight must be a finite number")]
    NotFinite,
    #[error("Weight must be a decimal")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Volume(f32);

impl Add for Volume {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Volume {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct RPE(u8);

impl RPE {
    pub const ZERO: RPE = RPE(0);
    pub const ONE: RPE = RPE(10);
    pub const TWO: RPE = RPE(20);
    pub const THREE: RPE = RPE(30);
    pub const FOUR: RPE = RPE(40);
    pub const FIVE: RPE = RPE(50);
    pub const SIX: RPE = RPE(60);
    pub const SEVEN: RPE = RPE(70);
    pub const EIGHT: RPE = RPE(80);
    pub const NINE: RPE = RPE(90);
    pub const TEN: RPE = RPE(100);

    pub fn new(value: f32) -> Result<Self, RPEError> {
        if !(0.0..=10.0).contains(&value) {
            return Err(RPEError::OutOfRange);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = (value * 10.0).round() as u8;

        if v % 5 != 0 {
            return Err(RPEError::InvalidResolution);
        }

        Ok(Self(v))
    }

    /// Rounds to the nearest multiple of 0.5.
    pub fn nearest(value: f32) -> Result<Self, RPEError> {
        if !(0.0..=10.0).contains(&value) {
            return Err(RPEError::OutOfRange);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let halves = (value * 2.0).round() as u8;

        Ok(Self(halves * 5))
    }

    /// Adds whole RPE points, capped at 10.
    #[must_use]
    pub fn saturating_add(self, points: u32) -> RPE {
        let points = u8::try_from(points.saturating_mul(10)).unwrap_or(u8::MAX);
        RPE(self.0.saturating_add(points).min(RPE::TEN.0))
    }

    /// Whole points above `other`, zero if below.
    #[must_use]
    pub fn points_above(self, other: RPE) -> f32 {
        f32::from(self.0.saturating_sub(other.0)) / 10.0
    }
}

impl From<RPE> for f32 {
    fn from(value: RPE) -> Self {
        f32::from(value.0) / 10.0
    }
}

impl TryFrom<f32> for RPE {
    type Error = RPEError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        RPE::new(value)
    }
}

impl TryFrom<&str> for RPE {
    type Error = RPEError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<f32>() {
            Ok(parsed_value) => RPE::new(parsed_value),
            Err(_) => Err(RPEError::ParseError),
        }
    }
}

impl fmt::Display for RPE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", f32::from(*self))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RPEError {
    #[error("RPE must be in the range 0.0 to 10.0")]
    OutOfRange,
    #[error("RPE must be a multiple of 0.5")]
    InvalidResolution,
    #[error("RPE must be a decimal")]
    ParseError,
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, Ok(Reps(0)))]
    #[case(999, Ok(Reps(999)))]
    #[case(1000, Err(RepsError::OutOfRange))]
    fn test_reps_new(#[case] input: u32, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::new(input), expected);
    }

    #[rstest]
    #[case("8", Ok(Reps(8)))]
    #[case("4.", Err(RepsError::ParseError))]
    #[case("", Err(RepsError::ParseError))]
    fn test_reps_from_str(#[case] input: &str, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::try_from(input), expected);
    }

    #[rstest]
    #[case(0.0, Ok(Weight(0.0)))]
    #[case(102.37, Ok(Weight(102.37)))]
    #[case(-0.5, Err(WeightError::Negative))]
    #[case(f32::NAN, Err(WeightError::NotFinite))]
    #[case(f32::INFINITY, Err(WeightError::NotFinite))]
    fn test_weight_new(#[case] input: f32, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::new(input), expected);
    }

    #[rstest]
    #[case(Weight(80.0), 0.5, 80.0)]
    #[case(Weight(80.8), 0.5, 80.5)]
    #[case(Weight(64.8), 0.5, 64.5)]
    #[case(Weight(37.84), 0.5, 37.5)]
    #[case(Weight(51.2), 0.0, 51.2)]
    fn test_weight_round_down_to(
        #[case] weight: Weight,
        #[case] step: f32,
        #[case] expected: f32,
    ) {
        assert_approx_eq!(f32::from(weight.round_down_to(step)), expected);
    }

    #[rstest]
    #[case(Weight(2.0), "2")]
    #[case(Weight(8.5), "8.5")]
    fn test_weight_display(#[case] input: Weight, #[case] expected: &str) {
        assert_eq!(input.to_string(), expected);
    }

    #[rstest]
    #[case(Weight(4.0), 5.0, 5.0)]
    #[case(Weight(64.0), 5.0, 64.0)]
    #[case(Weight(0.0), -1.0, 0.0)]
    fn test_weight_at_least(#[case] weight: Weight, #[case] minimum: f32, #[case] expected: f32) {
        assert_approx_eq!(f32::from(weight.at_least(minimum)), expected);
    }

    #[test]
    fn test_weight_mul_reps() {
        assert_approx_eq!(f32::from(Weight(62.5) * Reps(8)), 500.0);
    }

    #[test]
    fn test_volume_add_assign() {
        let mut volume = Volume::default();
        volume += Weight(100.0) * Reps(10);
        volume += Weight(100.0) * Reps(8);
        assert_approx_eq!(f32::from(volume), 1800.0);
    }

    #[rstest]
    #[case(0.0, Ok(RPE::ZERO))]
    #[case(8.0, Ok(RPE::EIGHT))]
    #[case(9.5, Ok(RPE(95)))]
    #[case(10.0, Ok(RPE::TEN))]
    #[case(11.0, Err(RPEError::OutOfRange))]
    #[case(-1.0, Err(RPEError::OutOfRange))]
    #[case(8.3, Err(RPEError::InvalidResolution))]
    fn test_rpe_new(#[case] input: f32, #[case] expected: Result<RPE, RPEError>) {
        assert_eq!(RPE::new(input), expected);
    }

    #[rstest]
    #[case(8.3, Ok(RPE(85)))]
    #[case(8.2, Ok(RPE::EIGHT))]
    #[case(9.75, Ok(RPE::TEN))]
    #[case(1.0, Ok(RPE::ONE))]
    #[case(10.1, Err(RPEError::OutOfRange))]
    #[case(f32::NAN, Err(RPEError::OutOfRange))]
    fn test_rpe_nearest(#[case] input: f32, #[case] expected: Result<RPE, RPEError>) {
        assert_eq!(RPE::nearest(input), expected);
    }

    #[rstest]
    #[case(RPE::SEVEN, 1, RPE::EIGHT)]
    #[case(RPE(95), 1, RPE::TEN)]
    #[case(RPE::EIGHT, 5, RPE::TEN)]
    #[case(RPE::EIGHT, u32::MAX, RPE::TEN)]
    fn test_rpe_saturating_add(#[case] rpe: RPE, #[case] points: u32, #[case] expected: RPE) {
        assert_eq!(rpe.saturating_add(points), expected);
    }

    #[rstest]
    #[case(RPE::NINE, RPE::SEVEN, 2.0)]
    #[case(RPE(85), RPE::SEVEN, 1.5)]
    #[case(RPE::SIX, RPE::SEVEN, 0.0)]
    fn test_rpe_points_above(#[case] rpe: RPE, #[case] other: RPE, #[case] expected: f32) {
        assert_approx_eq!(rpe.points_above(other), expected);
    }

    #[rstest]
    #[case(RPE::EIGHT, "8")]
    #[case(RPE(95), "9.5")]
    fn test_rpe_display(#[case] input: RPE, #[case] expected: &str) {
        assert_eq!(input.to_string(), expected);
    }

    #[test]
    fn test_serde_rejects_invalid_values() {
        assert!(serde_json::from_str::<Weight>("-1.0").is_err());
        assert!(serde_json::from_str::<RPE>("10.5").is_err());
        assert_eq!(serde_json::from_str::<RPE>("9.5").unwrap(), RPE(95));
        assert_eq!(serde_json::to_string(&Reps(8)).unwrap(), "8");
    }
}
