//! Summary messages for computed workouts
//!
//! [`InfoMessage`] is the read-only projection produced by
//! [`Training::show_training_info`](crate::training::Training::show_training_info).
//! It renders as a single human readable line (English or Russian) or as part
//! of a JSON report.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places shown for every figure in a summary
pub const DISPLAY_PRECISION: u32 = 3;

/// Result summary of one workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoMessage {
    /// Activity label, e.g. `Running`
    pub training_type: String,
    /// Duration in hours
    pub duration: Decimal,
    /// Distance in km
    pub distance: Decimal,
    /// Mean speed in km/h
    pub speed: Decimal,
    /// Energy spent in kcal
    pub calories: Decimal,
}

/// Language of the rendered message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLocale {
    #[default]
    En,
    Ru,
}

impl FromStr for MessageLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(MessageLocale::En),
            "ru" | "russian" => Ok(MessageLocale::Ru),
            _ => Err(format!("Invalid locale: {}", s)),
        }
    }
}

/// Output format for a batch of summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One message per line
    #[default]
    Text,
    /// Pretty printed JSON report
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// Round to display precision and pin the scale, so `336` serializes as
/// `"336.000"` just like the text output
fn display_round(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_PRECISION);
    rounded
}

impl InfoMessage {
    /// Copy of this message with every figure rounded to display precision
    pub fn rounded(&self) -> Self {
        Self {
            training_type: self.training_type.clone(),
            duration: display_round(self.duration),
            distance: display_round(self.distance),
            speed: display_round(self.speed),
            calories: display_round(self.calories),
        }
    }

    /// English summary line
    pub fn get_message(&self) -> String {
        self.get_message_localized(MessageLocale::En)
    }

    pub fn get_message_localized(&self, locale: MessageLocale) -> String {
        let r = self.rounded();
        let p = DISPLAY_PRECISION as usize;

        match locale {
            MessageLocale::En => format!(
                "Training type: {}; Duration: {:.p$} h.; Distance: {:.p$} km; \
                 Avg speed: {:.p$} km/h; Calories burned: {:.p$}.",
                r.training_type, r.duration, r.distance, r.speed, r.calories
            ),
            MessageLocale::Ru => format!(
                "Тип тренировки: {}; Длительность: {:.p$} ч.; Дистанция: {:.p$} км; \
                 Ср. скорость: {:.p$} км/ч; Потрачено ккал: {:.p$}.",
                r.training_type, r.duration, r.distance, r.speed, r.calories
            ),
        }
    }
}

impl fmt::Display for InfoMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_message())
    }
}

/// JSON document wrapping a batch of summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutReport {
    pub generated_at: DateTime<Utc>,
    pub workouts: Vec<InfoMessage>,
}

impl WorkoutReport {
    pub fn new(messages: &[InfoMessage]) -> Self {
        Self {
            generated_at: Utc::now(),
            workouts: messages.iter().map(InfoMessage::rounded).collect(),
        }
    }
}

/// Render a batch of summaries in the requested format
pub fn render(
    messages: &[InfoMessage],
    format: OutputFormat,
    locale: MessageLocale,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(messages
            .iter()
            .map(|m| m.get_message_localized(locale))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => serde_json::to_string_pretty(&WorkoutReport::new(messages)),
    }
}
