//! Distance, speed and calorie formulas for each workout variant
//!
//! All three variants share the distance and mean speed computation of the
//! [`Training`] trait; each supplies its own calorie model, and swimming also
//! replaces the step length and the speed estimate (pool laps rather than
//! strokes).
//!
//! Decimal operators panic on overflow, so every formula goes through the
//! checked operations and reports [`CalculationError::Overflow`] instead.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt::Debug;
use tracing::debug;

use crate::error::{CalculationError, PackageError};
use crate::models::{WorkoutBase, WorkoutKind};
use crate::report::InfoMessage;

/// Step length in metres
pub const LEN_STEP: Decimal = dec!(0.65);
/// Metres in a kilometre
pub const M_IN_KM: Decimal = dec!(1000);
/// Minutes in an hour
pub const MIN_IN_H: Decimal = dec!(60);

type CalcResult = Result<Decimal, CalculationError>;

fn overflow(calculation: &'static str) -> impl Fn() -> CalculationError {
    move || CalculationError::Overflow {
        calculation: calculation.to_string(),
    }
}

/// Checked `a × b`
fn mul(a: Decimal, b: Decimal, calculation: &'static str) -> CalcResult {
    a.checked_mul(b).ok_or_else(overflow(calculation))
}

/// Checked `a ÷ b`
fn div(a: Decimal, b: Decimal, calculation: &'static str) -> CalcResult {
    a.checked_div(b).ok_or_else(overflow(calculation))
}

/// Checked `a + b`
fn add(a: Decimal, b: Decimal, calculation: &'static str) -> CalcResult {
    a.checked_add(b).ok_or_else(overflow(calculation))
}

/// Common behaviour of a scored workout
pub trait Training: Debug {
    fn kind(&self) -> WorkoutKind;

    fn base(&self) -> &WorkoutBase;

    /// Distance covered by one step or stroke, in metres
    fn len_step(&self) -> Decimal {
        LEN_STEP
    }

    /// Distance in km
    fn distance(&self) -> CalcResult {
        let metres = mul(self.base().action(), self.len_step(), "distance")?;
        div(metres, M_IN_KM, "distance")
    }

    /// Mean speed in km/h
    fn mean_speed(&self) -> CalcResult {
        div(self.distance()?, self.base().duration(), "mean speed")
    }

    /// Energy spent in kcal
    fn spent_calories(&self) -> CalcResult;

    fn show_training_info(&self) -> Result<InfoMessage, CalculationError> {
        let info = InfoMessage {
            training_type: self.kind().label().to_string(),
            duration: self.base().duration(),
            distance: self.distance()?,
            speed: self.mean_speed()?,
            calories: self.spent_calories()?,
        };

        debug!(
            kind = self.kind().code(),
            distance = %info.distance,
            speed = %info.speed,
            calories = %info.calories,
            "Computed workout metrics"
        );

        Ok(info)
    }
}

/// Running: calories grow linearly with mean speed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Running {
    base: WorkoutBase,
}

impl Running {
    const CALORIES_MEAN_SPEED_MULTIPLIER: Decimal = dec!(18);
    const CALORIES_MEAN_SPEED_SHIFT: Decimal = dec!(1.79);

    pub fn new(base: WorkoutBase) -> Self {
        Self { base }
    }
}

impl Training for Running {
    fn kind(&self) -> WorkoutKind {
        WorkoutKind::Running
    }

    fn base(&self) -> &WorkoutBase {
        &self.base
    }

    /// (18 × speed + 1.79) × weight / 1000 × minutes
    fn spent_calories(&self) -> CalcResult {
        const CALC: &str = "calories";

        let rate = add(
            mul(Self::CALORIES_MEAN_SPEED_MULTIPLIER, self.mean_speed()?, CALC)?,
            Self::CALORIES_MEAN_SPEED_SHIFT,
            CALC,
        )?;
        let per_minute = div(mul(rate, self.base.weight(), CALC)?, M_IN_KM, CALC)?;
        let minutes = mul(self.base.duration(), MIN_IN_H, CALC)?;

        mul(per_minute, minutes, CALC)
    }
}

/// Sports walking: calories depend on speed squared relative to height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportsWalking {
    base: WorkoutBase,
    height: Decimal,
}

impl SportsWalking {
    const CALORIES_WEIGHT_MULTIPLIER: Decimal = dec!(0.035);
    const CALORIES_SPEED_HEIGHT_MULTIPLIER: Decimal = dec!(0.029);
    const KMH_IN_MSEC: Decimal = dec!(3.6);
    const CM_IN_M: Decimal = dec!(100);

    /// `height` is in centimetres
    pub fn new(base: WorkoutBase, height: Decimal) -> Result<Self, PackageError> {
        if height <= Decimal::ZERO {
            return Err(PackageError::invalid("height", height, "must be positive"));
        }
        Ok(Self { base, height })
    }

    pub fn height(&self) -> Decimal {
        self.height
    }
}

impl Training for SportsWalking {
    fn kind(&self) -> WorkoutKind {
        WorkoutKind::SportsWalking
    }

    fn base(&self) -> &WorkoutBase {
        &self.base
    }

    /// (0.035 × weight + (v_ms² / height_m) × 0.029 × weight) × minutes
    fn spent_calories(&self) -> CalcResult {
        const CALC: &str = "calories";
        let weight = self.base.weight();

        let speed_ms = div(self.mean_speed()?, Self::KMH_IN_MSEC, CALC)?;
        let height_m = div(self.height, Self::CM_IN_M, CALC)?;
        let speed_term = div(mul(speed_ms, speed_ms, CALC)?, height_m, CALC)?;
        let speed_term = mul(
            mul(speed_term, Self::CALORIES_SPEED_HEIGHT_MULTIPLIER, CALC)?,
            weight,
            CALC,
        )?;
        let per_minute = add(
            mul(Self::CALORIES_WEIGHT_MULTIPLIER, weight, CALC)?,
            speed_term,
            CALC,
        )?;

        mul(per_minute, mul(self.base.duration(), MIN_IN_H, CALC)?, CALC)
    }
}

/// Swimming: speed comes from pool laps, distance from stroke count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swimming {
    base: WorkoutBase,
    length_pool: Decimal,
    count_pool: Decimal,
}

impl Swimming {
    const LEN_STROKE: Decimal = dec!(1.38);
    const CALORIES_MEAN_SPEED_SHIFT: Decimal = dec!(1.1);
    const CALORIES_WEIGHT_MULTIPLIER: Decimal = dec!(2);

    /// `length_pool` is in metres, `count_pool` is the number of lengths swum
    pub fn new(
        base: WorkoutBase,
        length_pool: Decimal,
        count_pool: Decimal,
    ) -> Result<Self, PackageError> {
        if length_pool < Decimal::ZERO {
            return Err(PackageError::invalid(
                "length_pool",
                length_pool,
                "must not be negative",
            ));
        }
        if count_pool < Decimal::ZERO {
            return Err(PackageError::invalid(
                "count_pool",
                count_pool,
                "must not be negative",
            ));
        }
        Ok(Self {
            base,
            length_pool,
            count_pool,
        })
    }

    pub fn length_pool(&self) -> Decimal {
        self.length_pool
    }

    pub fn count_pool(&self) -> Decimal {
        self.count_pool
    }
}

impl Training for Swimming {
    fn kind(&self) -> WorkoutKind {
        WorkoutKind::Swimming
    }

    fn base(&self) -> &WorkoutBase {
        &self.base
    }

    fn len_step(&self) -> Decimal {
        Self::LEN_STROKE
    }

    fn mean_speed(&self) -> CalcResult {
        const CALC: &str = "mean speed";

        let km = div(mul(self.length_pool, self.count_pool, CALC)?, M_IN_KM, CALC)?;
        div(km, self.base.duration(), CALC)
    }

    /// (speed + 1.1) × 2 × weight × hours
    fn spent_calories(&self) -> CalcResult {
        const CALC: &str = "calories";

        let shifted = add(self.mean_speed()?, Self::CALORIES_MEAN_SPEED_SHIFT, CALC)?;
        let weighted = mul(
            mul(shifted, Self::CALORIES_WEIGHT_MULTIPLIER, CALC)?,
            self.base.weight(),
            CALC,
        )?;

        mul(weighted, self.base.duration(), CALC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(action: Decimal, duration: Decimal, weight: Decimal) -> WorkoutBase {
        WorkoutBase::new(action, duration, weight).unwrap()
    }

    fn overflow_in(calculation: &str) -> CalculationError {
        CalculationError::Overflow {
            calculation: calculation.to_string(),
        }
    }

    #[test]
    fn test_running_formulas() {
        let run = Running::new(base(dec!(15000), dec!(1), dec!(75)));

        assert_eq!(run.distance().unwrap(), dec!(9.75));
        assert_eq!(run.mean_speed().unwrap(), dec!(9.75));
        assert_eq!(run.spent_calories().unwrap(), dec!(797.805));
    }

    #[test]
    fn test_sports_walking_formulas() {
        let walk = SportsWalking::new(base(dec!(9000), dec!(1), dec!(75)), dec!(180)).unwrap();

        assert_eq!(walk.distance().unwrap(), dec!(5.85));
        assert_eq!(walk.mean_speed().unwrap(), dec!(5.85));
        assert_eq!(walk.spent_calories().unwrap().round_dp(3), dec!(348.945));
    }

    #[test]
    fn test_swimming_formulas() {
        let swim =
            Swimming::new(base(dec!(720), dec!(1), dec!(80)), dec!(25), dec!(40)).unwrap();

        // Distance is stroke based, speed is lap based
        assert_eq!(swim.distance().unwrap(), dec!(0.9936));
        assert_eq!(swim.mean_speed().unwrap(), dec!(1));
        assert_eq!(swim.spent_calories().unwrap(), dec!(336));
    }

    #[test]
    fn test_mean_speed_scales_with_duration() {
        let run = Running::new(base(dec!(15000), dec!(2), dec!(75)));
        assert_eq!(run.mean_speed().unwrap(), dec!(4.875));
    }

    #[test]
    fn test_walking_rejects_zero_height() {
        let err = SportsWalking::new(base(dec!(9000), dec!(1), dec!(75)), dec!(0)).unwrap_err();
        assert!(matches!(err, PackageError::InvalidParameter { ref parameter, .. } if parameter == "height"));
    }

    #[test]
    fn test_swimming_rejects_negative_pool() {
        let err =
            Swimming::new(base(dec!(720), dec!(1), dec!(80)), dec!(-25), dec!(40)).unwrap_err();
        assert!(matches!(err, PackageError::InvalidParameter { ref parameter, .. } if parameter == "length_pool"));

        let err =
            Swimming::new(base(dec!(720), dec!(1), dec!(80)), dec!(25), dec!(-1)).unwrap_err();
        assert!(matches!(err, PackageError::InvalidParameter { ref parameter, .. } if parameter == "count_pool"));
    }

    #[test]
    fn test_show_training_info() {
        let run = Running::new(base(dec!(15000), dec!(1), dec!(75)));
        let info = run.show_training_info().unwrap();

        assert_eq!(info.training_type, "Running");
        assert_eq!(info.duration, dec!(1));
        assert_eq!(info.distance, dec!(9.75));
        assert_eq!(info.calories, dec!(797.805));
    }

    #[test]
    fn test_tiny_duration_overflows_calories() {
        // Speed of 9.75e25 km/h still fits; the calorie product does not
        let run = Running::new(base(
            dec!(15000),
            dec!(0.0000000000000000000000001),
            dec!(75),
        ));

        assert!(run.mean_speed().is_ok());
        assert_eq!(run.spent_calories().unwrap_err(), overflow_in("calories"));
        assert_eq!(run.show_training_info().unwrap_err(), overflow_in("calories"));
    }

    #[test]
    fn test_huge_weight_overflows_each_variant() {
        let run = Running::new(base(dec!(15000), dec!(1), Decimal::MAX));
        assert_eq!(run.spent_calories().unwrap_err(), overflow_in("calories"));

        let walk = SportsWalking::new(base(dec!(9000), dec!(1), Decimal::MAX), dec!(180)).unwrap();
        assert_eq!(walk.spent_calories().unwrap_err(), overflow_in("calories"));

        let swim =
            Swimming::new(base(dec!(720), dec!(1), Decimal::MAX), dec!(25), dec!(40)).unwrap();
        assert_eq!(swim.spent_calories().unwrap_err(), overflow_in("calories"));
    }

    #[test]
    fn test_huge_pool_overflows_mean_speed() {
        let swim = Swimming::new(
            base(dec!(720), dec!(1), dec!(80)),
            Decimal::MAX,
            dec!(40),
        )
        .unwrap();

        assert_eq!(swim.mean_speed().unwrap_err(), overflow_in("mean speed"));
    }

    #[test]
    fn test_huge_action_overflows_walking_calories() {
        let walk = SportsWalking::new(base(Decimal::MAX, dec!(1), dec!(75)), dec!(180)).unwrap();
        // MAX × 0.65 still fits, so distance is fine; walking squares the speed
        assert!(walk.distance().is_ok());
        assert_eq!(walk.spent_calories().unwrap_err(), overflow_in("calories"));
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_running_calories_monotonic_in_steps(
            steps in 1000u32..40000u32,
            extra in 1u32..5000u32,
            weight in 40u32..120u32,
        ) {
            let slow = Running::new(base(Decimal::from(steps), dec!(1), Decimal::from(weight)));
            let fast = Running::new(base(Decimal::from(steps + extra), dec!(1), Decimal::from(weight)));

            prop_assert!(slow.spent_calories().unwrap() > Decimal::ZERO);
            prop_assert!(fast.spent_calories().unwrap() > slow.spent_calories().unwrap());
        }

        #[test]
        fn test_distance_is_duration_independent(
            steps in 0u32..40000u32,
            minutes in 10u32..240u32,
        ) {
            let duration = Decimal::from(minutes) / MIN_IN_H;
            let walk = SportsWalking::new(base(Decimal::from(steps), duration, dec!(70)), dec!(175)).unwrap();

            prop_assert_eq!(walk.distance().unwrap(), Decimal::from(steps) * LEN_STEP / M_IN_KM);
        }

        #[test]
        fn test_swimming_calories_positive(
            strokes in 0u32..5000u32,
            laps in 0u32..200u32,
            weight in 40u32..120u32,
        ) {
            let swim = Swimming::new(
                base(Decimal::from(strokes), dec!(1), Decimal::from(weight)),
                dec!(25),
                Decimal::from(laps),
            ).unwrap();

            prop_assert!(swim.spent_calories().unwrap() >= dec!(2.2) * Decimal::from(weight));
        }

        #[test]
        fn test_extreme_readings_never_panic(
            action in 0u64..u64::MAX,
            duration_scale in 0u32..28u32,
            weight_exp in 0u32..28u32,
        ) {
            let duration = Decimal::new(1, duration_scale);
            let weight = Decimal::from_i128_with_scale(10i128.pow(weight_exp), 0);
            let run = Running::new(base(Decimal::from(action), duration, weight));

            // Either a value or a typed overflow, never a panic
            let _ = run.show_training_info();
        }
    }
}
