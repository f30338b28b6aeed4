use serde::{Deserialize, Serialize};

use crate::{RPE, Reps};

/// Heuristic tunables of the three protocols.
///
/// None of these are physiological constants. Missing keys fall back to the defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub drop_set: DropSetSettings,
    pub myo_reps: MyoRepsSettings,
    pub mav: MavSettings,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.drop_set.load_factor > 0.0 && self.drop_set.load_factor < 1.0) {
            return Err(SettingsError::Invalid("drop_set.load_factor must lie between 0 and 1"));
        }
        if self.drop_set.weight_step < 0.0 || self.drop_set.minimum_weight < 0.0 {
            return Err(SettingsError::Invalid("drop_set weights must not be negative"));
        }
        if !(self.myo_reps.mini_set_fraction > 0.0 && self.myo_reps.mini_set_fraction <= 1.0) {
            return Err(SettingsError::Invalid(
                "myo_reps.mini_set_fraction must lie between 0 and 1",
            ));
        }
        if self.myo_reps.minimum_rest_seconds > self.myo_reps.base_rest_seconds {
            return Err(SettingsError::Invalid(
                "myo_reps.minimum_rest_seconds must not exceed base_rest_seconds",
            ));
        }
        if !(self.mav.decline_threshold > 0.0 && self.mav.decline_threshold <= 1.0) {
            return Err(SettingsError::Invalid(
                "mav.decline_threshold must lie between 0 and 1",
            ));
        }
        if self.mav.base_rest_seconds > self.mav.maximum_rest_seconds {
            return Err(SettingsError::Invalid(
                "mav.base_rest_seconds must not exceed maximum_rest_seconds",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropSetSettings {
    /// Share of the previously lifted weight used for the next drop.
    pub load_factor: f32,
    pub weight_step: f32,
    pub minimum_weight: f32,
    pub rest_seconds: u32,
}

impl Default for DropSetSettings {
    fn default() -> Self {
        Self {
            load_factor: 0.8,
            weight_step: 0.5,
            minimum_weight: 5.0,
            rest_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MyoRepsSettings {
    pub mini_set_fraction: f32,
    pub minimum_mini_set_reps: Reps,
    /// Applies if the configuration does not bound the mini-set reps.
    pub default_mini_set_cap: Reps,
    pub base_rest_seconds: u32,
    pub rest_decrement_seconds: u32,
    pub minimum_rest_seconds: u32,
    pub activation_rpe_warning: RPE,
}

impl Default for MyoRepsSettings {
    fn default() -> Self {
        Self {
            mini_set_fraction: 0.25,
            minimum_mini_set_reps: Reps::new(3).unwrap_or_default(),
            default_mini_set_cap: Reps::new(5).unwrap_or_default(),
            base_rest_seconds: 20,
            rest_decrement_seconds: 2,
            minimum_rest_seconds: 10,
            activation_rpe_warning: RPE::SEVEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MavSettings {
    /// Applies if the configuration leaves the set count open.
    pub safety_set_ceiling: u32,
    /// Share of the first set's reps below which performance counts as declined.
    pub decline_threshold: f32,
    pub base_rest_seconds: u32,
    pub rest_per_set_seconds: u32,
    pub rest_per_rpe_point_seconds: u32,
    pub maximum_rest_seconds: u32,
    pub far_below_target_ratio: f32,
    pub near_maximal_rpe: RPE,
}

impl Default for MavSettings {
    fn default() -> Self {
        Self {
            safety_set_ceiling: 20,
            decline_threshold: 0.8,
            base_rest_seconds: 60,
            rest_per_set_seconds: 10,
            rest_per_rpe_point_seconds: 15,
            maximum_rest_seconds: 180,
            far_below_target_ratio: 0.5,
            near_maximal_rpe: RPE::NINE,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(&'static str),
}
