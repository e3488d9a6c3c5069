//! Test-stand telemetry analysis core.
//!
//! Open a measurement file into a [`Session`](session::Session), look up
//! channels, and compute windowed statistics: average thrust of a load cell
//! and the oxidizer/fuel ratio of two flow channels with propagated
//! uncertainty.

pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod stats;

pub use config::{AnalysisConfig, ChannelRoles};
pub use data::window::TimeWindow;
pub use error::{AnalysisError, Result};
pub use session::{SeriesView, Session};
pub use stats::{RatioResult, StatisticResult};
