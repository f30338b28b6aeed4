use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{RPE, Reps};

/// Bounds of a quantity controlled by a protocol.
///
/// An open `max` leaves the upper bound to the strategy (e.g. the MAV safety ceiling).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: Option<T>,
    #[serde(default)]
    pub direction: Direction,
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn new(min: T, max: Option<T>, direction: Direction) -> Result<Self, ConfigurationError> {
        let range = Self {
            min,
            max,
            direction,
        };
        if range.is_inverted() {
            return Err(ConfigurationError::InvertedRange);
        }
        Ok(range)
    }

    #[must_use]
    pub fn from_min(min: T) -> Self {
        Self {
            min,
            max: None,
            direction: Direction::Maintain,
        }
    }

    #[must_use]
    pub fn between(min: T, max: T) -> Self {
        Self {
            min,
            max: Some(max),
            direction: Direction::Maintain,
        }
    }

    fn is_inverted(&self) -> bool {
        self.max.is_some_and(|max| max < self.min)
    }
}

/// How a quantity is expected to move over the phases of an execution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
    #[default]
    Maintain,
}

#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SetType {
    DropSet,
    MyoReps,
    Mav,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetConfiguration {
    DropSet(DropSetConfiguration),
    MyoReps(MyoRepsConfiguration),
    Mav(MavConfiguration),
}

impl SetConfiguration {
    #[must_use]
    pub fn set_type(&self) -> SetType {
        match self {
            SetConfiguration::DropSet(_) => SetType::DropSet,
            SetConfiguration::MyoReps(_) => SetType::MyoReps,
            SetConfiguration::Mav(_) => SetType::Mav,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            SetConfiguration::DropSet(c) => {
                validate_counts(&c.start_counts)?;
                validate_range(&c.drops)?;
                validate_range(&c.sets)?;
                validate_rpe(c.rpe.as_ref())
            }
            SetConfiguration::MyoReps(c) => {
                validate_counts(&c.activation_counts)?;
                if let Some(mini_set_counts) = &c.mini_set_counts {
                    validate_counts(mini_set_counts)?;
                }
                validate_range(&c.mini_sets)?;
                validate_rpe(c.rpe.as_ref())
            }
            SetConfiguration::Mav(c) => {
                validate_range(&c.sets)?;
                validate_counts(&c.counts)?;
                validate_rpe(c.rpe.as_ref())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropSetConfiguration {
    pub start_counts: Range<Reps>,
    pub drops: Range<u32>,
    pub sets: Range<u32>,
    #[serde(default)]
    pub rpe: Option<Range<RPE>>,
}

impl DropSetConfiguration {
    #[must_use]
    pub fn drop_count(&self) -> u32 {
        self.drops.min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyoRepsConfiguration {
    pub activation_counts: Range<Reps>,
    #[serde(default)]
    pub rpe: Option<Range<RPE>>,
    #[serde(default)]
    pub mini_set_counts: Option<Range<Reps>>,
    pub mini_sets: Range<u32>,
}

impl MyoRepsConfiguration {
    #[must_use]
    pub fn minimum_activation_reps(&self) -> Reps {
        self.activation_counts.min
    }

    #[must_use]
    pub fn mini_set_cap(&self) -> Option<Reps> {
        self.mini_set_counts.as_ref().and_then(|range| range.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MavConfiguration {
    pub sets: Range<u32>,
    pub counts: Range<Reps>,
    #[serde(default)]
    pub rpe: Option<Range<RPE>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("range maximum must not be lower than its minimum")]
    InvertedRange,
    #[error("counts must be positive")]
    NonPositiveCounts,
    #[error("RPE range must lie within 1 to 10")]
    RpeOutOfRange,
}

fn validate_range<T: PartialOrd + Copy>(range: &Range<T>) -> Result<(), ConfigurationError> {
    if range.is_inverted() {
        return Err(ConfigurationError::InvertedRange);
    }
    Ok(())
}

fn validate_counts(range: &Range<Reps>) -> Result<(), ConfigurationError> {
    validate_range(range)?;
    if !range.min.is_positive() {
        return Err(ConfigurationError::NonPositiveCounts);
    }
    Ok(())
}

fn validate_rpe(range: Option<&Range<RPE>>) -> Result<(), ConfigurationError> {
    if let Some(range) = range {
        validate_range(range)?;
        if range.min < RPE::ONE {
            return Err(ConfigurationError::RpeOutOfRange);
        }
    }
    Ok(())
}
