use std::path::Path;

use crate::config::ChannelRoles;
use crate::data::loader;
use crate::data::model::{Catalog, ChannelSummary};
use crate::data::window::{self, TimeWindow};
use crate::error::{AnalysisError, Operand, Result};
use crate::stats::{self, RatioResult, StatisticResult};

// ---------------------------------------------------------------------------
// Session – one open measurement file and the queries against it
// ---------------------------------------------------------------------------

/// A channel's arrays borrowed from the open catalog, ready for plotting.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub units: &'a str,
    pub time: &'a [f64],
    pub data: &'a [f64],
}

/// Owns at most one opened file. Every query recomputes from the raw
/// arrays; nothing derived is cached.
#[derive(Debug, Default)]
pub struct Session {
    roles: ChannelRoles,
    catalog: Option<Catalog>,
}

impl Session {
    pub fn new(roles: ChannelRoles) -> Self {
        Self {
            roles,
            catalog: None,
        }
    }

    pub fn roles(&self) -> &ChannelRoles {
        &self.roles
    }

    /// Replace the open file. The previous catalog (and any file handle it
    /// holds) is dropped before the new one is read, so a failed load leaves
    /// the session with nothing open.
    pub fn open(&mut self, path: &Path) -> Result<&Catalog> {
        self.close();
        let catalog = loader::load_file(path)?;
        log::info!(
            "Opened {} with {} channels",
            path.display(),
            catalog.len()
        );
        Ok(self.catalog.insert(catalog))
    }

    pub fn close(&mut self) {
        if let Some(old) = self.catalog.take() {
            log::debug!("Closing {}", old.path().display());
        }
    }

    pub fn is_open(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn catalog(&self) -> Result<&Catalog> {
        self.catalog.as_ref().ok_or(AnalysisError::NoFileLoaded)
    }

    pub fn list_channels(&self) -> Result<Vec<ChannelSummary>> {
        Ok(self.catalog()?.channels().iter().map(|c| c.summary()).collect())
    }

    pub fn get_series(&self, id: &str) -> Result<SeriesView<'_>> {
        let catalog = self.catalog()?;
        let channel = catalog.channel_by_id(id)?;
        let series = catalog.series(channel)?;
        Ok(SeriesView {
            id: &channel.id,
            name: &channel.name,
            units: &channel.units,
            time: &series.time,
            data: &series.data,
        })
    }

    /// Statistics over every sample of a channel.
    pub fn compute_single_stat(&self, id: &str) -> Result<StatisticResult> {
        let series = self.catalog()?.series_by_id(id)?;
        stats::describe(&series.data).map_err(|e| e.in_channel(id))
    }

    /// Statistics over the samples of a channel inside `[start, end]`.
    pub fn compute_window_stat(&self, id: &str, start: f64, end: f64) -> Result<StatisticResult> {
        let window = TimeWindow::new(start, end)?;
        self.windowed(id, &window)
    }

    /// Ratio of the windowed means of `numerator_id` and `denominator_id`.
    pub fn compute_ratio(
        &self,
        numerator_id: &str,
        denominator_id: &str,
        start: f64,
        end: f64,
    ) -> Result<RatioResult> {
        let window = TimeWindow::new(start, end)?;
        let a = self.windowed(numerator_id, &window)?;
        let b = self.windowed(denominator_id, &window)?;
        stats::ratio(&a, &b).map_err(|e| match e {
            AnalysisError::DivideByZero {
                operand: Operand::Numerator,
                ..
            } => e.in_channel(numerator_id),
            other => other.in_channel(denominator_id),
        })
    }

    /// Oxidizer-to-fuel ratio on the configured flow channels.
    pub fn of_ratio(&self, start: f64, end: f64) -> Result<RatioResult> {
        let roles = &self.roles;
        self.compute_ratio(&roles.oxidizer, &roles.fuel, start, end)
    }

    /// Mean thrust on the configured load-cell channel.
    pub fn average_thrust(&self, start: f64, end: f64) -> Result<StatisticResult> {
        self.compute_window_stat(&self.roles.thrust, start, end)
    }

    fn windowed(&self, id: &str, window: &TimeWindow) -> Result<StatisticResult> {
        let series = self.catalog()?.series_by_id(id)?;
        window::select(series, window)
            .and_then(|samples| stats::describe(&samples))
            .map_err(|e| e.in_channel(id))
    }
}
