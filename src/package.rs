//! Sensor package dispatch
//!
//! A package is what the tracker transmits after a workout: a three-letter
//! workout code and a positional list of readings. [`read_package`] maps the
//! code to the matching [`Training`] variant.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::error::{PackageError, Result};
use crate::models::{WorkoutBase, WorkoutKind};
use crate::report::InfoMessage;
use crate::training::{Running, SportsWalking, Swimming, Training};

/// One raw package: workout code plus positional readings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorPackage {
    pub code: String,
    pub values: Vec<Decimal>,
}

impl SensorPackage {
    pub fn new(code: impl Into<String>, values: Vec<Decimal>) -> Self {
        Self {
            code: code.into(),
            values,
        }
    }

    /// Parse readings, e.g. `"15000, 1, 75"` or `"15000 1 75"`.
    ///
    /// When commas are present they delimit the fields and an empty field
    /// between two readings is rejected rather than skipped, so positions
    /// never shift. Trailing empty fields are dropped.
    pub fn parse_values(input: &str) -> std::result::Result<Vec<Decimal>, PackageError> {
        let mut tokens: Vec<&str> = if input.contains(',') {
            input.split(',').map(str::trim).collect()
        } else {
            input.split_whitespace().collect()
        };
        while tokens.last().is_some_and(|token| token.is_empty()) {
            tokens.pop();
        }

        tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| {
                if token.is_empty() {
                    return Err(PackageError::invalid(
                        format!("values[{}]", index),
                        "",
                        "missing reading",
                    ));
                }
                Decimal::from_str(token).map_err(|e| {
                    PackageError::invalid(format!("values[{}]", index), token, e.to_string())
                })
            })
            .collect()
    }
}

/// Build the workout variant selected by `workout_type` from its readings.
///
/// Readings are positional: `action, duration, weight`, followed by `height`
/// for `WLK` or `length_pool, count_pool` for `SWM`.
#[instrument(level = "debug", skip(data), fields(values = data.len()))]
pub fn read_package(workout_type: &str, data: &[Decimal]) -> Result<Box<dyn Training>> {
    let kind = WorkoutKind::from_str(workout_type)?;

    if data.len() != kind.param_count() {
        return Err(PackageError::WrongArity {
            code: kind.code().to_string(),
            expected: kind.param_count(),
            actual: data.len(),
        }
        .into());
    }

    let base = WorkoutBase::new(data[0], data[1], data[2])?;
    let training: Box<dyn Training> = match kind {
        WorkoutKind::Running => Box::new(Running::new(base)),
        WorkoutKind::SportsWalking => Box::new(SportsWalking::new(base, data[3])?),
        WorkoutKind::Swimming => Box::new(Swimming::new(base, data[3], data[4])?),
    };

    debug!(kind = kind.code(), "Package dispatched");
    Ok(training)
}

/// Read a package and compute its summary
pub fn process(package: &SensorPackage) -> Result<InfoMessage> {
    let training = read_package(&package.code, &package.values)?;
    Ok(training.show_training_info()?)
}

/// The reference packages shipped with the tracker
pub fn demo_packages() -> Vec<SensorPackage> {
    vec![
        SensorPackage::new("SWM", vec![dec!(720), dec!(1), dec!(80), dec!(25), dec!(40)]),
        SensorPackage::new("RUN", vec![dec!(15000), dec!(1), dec!(75)]),
        SensorPackage::new("WLK", vec![dec!(9000), dec!(1), dec!(75), dec!(180)]),
    ]
}
