use derive_more::Display;
use log::warn;

use crate::{ExecutionState, RPE, Reps, SetData, SetProgressionData, ValidationError, Weight};

/// Checks the bounds every protocol shares and resolves the set that was actually performed.
///
/// The planned weight of the current phase applies when no weight has been reported. RPE values
/// are rounded to the nearest 0.5.
pub fn validate_set(
    data: &SetProgressionData,
    planned_weight: Weight,
) -> Result<SetData, ValidationError> {
    if data.counts == 0 {
        return Err(ValidationError::NonPositiveCounts);
    }
    let counts =
        Reps::new(data.counts).map_err(|_| ValidationError::CountsOutOfRange(data.counts))?;

    let weight = match data.weight {
        Some(weight) if !weight.is_finite() => return Err(ValidationError::NonFiniteWeight),
        Some(weight) => Weight::new(weight).map_err(|_| ValidationError::NegativeWeight(weight))?,
        None => planned_weight,
    };

    let rpe = match data.rpe {
        Some(rpe) => {
            if !(1.0..=10.0).contains(&rpe) {
                return Err(ValidationError::RpeOutOfRange(rpe));
            }
            let rounded = RPE::nearest(rpe).map_err(|_| ValidationError::RpeOutOfRange(rpe))?;
            if (f32::from(rounded) - rpe).abs() > f32::EPSILON {
                warn!("RPE {rpe} rounded to {rounded}");
            }
            Some(rounded)
        }
        None => None,
    };

    Ok(SetData {
        weight,
        counts,
        rpe,
    })
}

/// Soft findings that never block progression.
#[derive(Debug, Display, Clone, Copy, PartialEq)]
pub enum Advisory {
    #[display("{counts} reps exceed twice the target of {expected}")]
    ExcessiveReps { counts: Reps, expected: Reps },
    #[display("activation set at RPE {rpe} is not close enough to failure")]
    LowActivationEffort { rpe: RPE },
    #[display("{counts} reps are far below the target of {expected}")]
    FarBelowTarget { counts: Reps, expected: Reps },
    #[display("RPE {rpe} is approaching the maximum")]
    NearMaximalEffort { rpe: RPE },
}

pub(crate) fn exceeds_twice(counts: Reps, expected: Reps) -> bool {
    u32::from(counts) > u32::from(expected).saturating_mul(2)
}

pub(crate) fn log_advisories(state: &ExecutionState, advisories: &[Advisory]) {
    for advisory in advisories {
        warn!(
            "{} phase {}/{}: {advisory}",
            state.set_type(),
            state.current_phase,
            state.total_phases
        );
    }
}
