// Library interface for fittrack modules
// This allows integration tests and benches to access the core functionality

pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod package;
pub mod report;
pub mod training;

// Re-export commonly used types for convenience
pub use error::{CalculationError, FitTrackError, ImportError, PackageError, Result};
pub use import::{process_all, BatchOutcome, PackageReader};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::{WorkoutBase, WorkoutKind};
pub use package::{demo_packages, process, read_package, SensorPackage};
pub use report::{render, InfoMessage, MessageLocale, OutputFormat};
pub use training::{Running, SportsWalking, Swimming, Training};
