use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PackageError;

/// Workout variants the tracker knows how to score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutKind {
    Running,
    SportsWalking,
    Swimming,
}

impl WorkoutKind {
    pub const ALL: [WorkoutKind; 3] = [
        WorkoutKind::Swimming,
        WorkoutKind::Running,
        WorkoutKind::SportsWalking,
    ];

    /// Three-letter code transmitted by the tracker
    pub fn code(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "RUN",
            WorkoutKind::SportsWalking => "WLK",
            WorkoutKind::Swimming => "SWM",
        }
    }

    /// Label shown in the summary message
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::SportsWalking => "SportsWalking",
            WorkoutKind::Swimming => "Swimming",
        }
    }

    /// Number of sensor values a package of this kind carries
    pub fn param_count(&self) -> usize {
        match self {
            WorkoutKind::Running => 3, // action, duration, weight
            WorkoutKind::SportsWalking => 4, // + height
            WorkoutKind::Swimming => 5, // + pool length, pool count
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkoutKind {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RUN" => Ok(WorkoutKind::Running),
            "WLK" => Ok(WorkoutKind::SportsWalking),
            "SWM" => Ok(WorkoutKind::Swimming),
            _ => Err(PackageError::UnknownWorkoutCode {
                code: s.trim().to_string(),
            }),
        }
    }
}

/// Readings shared by every workout: step/stroke count, duration, body weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutBase {
    action: Decimal,
    duration: Decimal,
    weight: Decimal,
}

impl WorkoutBase {
    /// Validate and build the common readings.
    ///
    /// `duration` is in hours and `weight` in kilograms; both must be
    /// positive. `action` may be zero (a session with no recorded steps).
    pub fn new(action: Decimal, duration: Decimal, weight: Decimal) -> Result<Self, PackageError> {
        if action < Decimal::ZERO {
            return Err(PackageError::invalid("action", action, "must not be negative"));
        }
        if duration <= Decimal::ZERO {
            return Err(PackageError::invalid("duration", duration, "must be positive"));
        }
        if weight <= Decimal::ZERO {
            return Err(PackageError::invalid("weight", weight, "must be positive"));
        }

        Ok(Self {
            action,
            duration,
            weight,
        })
    }

    pub fn action(&self) -> Decimal {
        self.action
    }

    /// Duration in hours
    pub fn duration(&self) -> Decimal {
        self.duration
    }

    /// Body weight in kilograms
    pub fn weight(&self) -> Decimal {
        self.weight
    }
}
