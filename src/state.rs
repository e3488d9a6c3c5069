use std::path::Path;

use firing_viewer::data::model::ChannelSummary;
use firing_viewer::{AnalysisConfig, AnalysisError, RatioResult, Session, StatisticResult};

use crate::color::ChannelPalette;
use crate::ui::report;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Last computation shown in the side panel.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    OfRatio(RatioResult),
    Thrust(StatisticResult),
}

#[derive(Debug, Clone)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Open file and channel roles.
    pub session: Session,

    /// Catalog snapshot for the selector and table (empty until a file loads).
    pub channels: Vec<ChannelSummary>,

    /// Id of the channel being plotted.
    pub selected: Option<String>,

    /// Analysis window bounds, edited in the side panel.
    pub window_start: f64,
    pub window_end: f64,

    pub outcome: Option<Outcome>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    pub palette: ChannelPalette,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            session: Session::new(config.roles),
            channels: Vec::new(),
            selected: None,
            window_start: 0.0,
            window_end: 0.0,
            outcome: None,
            status: None,
            palette: ChannelPalette::default(),
        }
    }

    /// Load a file, replacing whatever was open.
    pub fn load(&mut self, path: &Path) {
        self.channels.clear();
        self.selected = None;
        self.outcome = None;

        match self.session.open(path) {
            Ok(catalog) => {
                self.channels = catalog.channels().iter().map(|c| c.summary()).collect();
                self.palette = ChannelPalette::new(self.channels.iter().map(|c| c.id.as_str()));
                self.info("File loaded successfully.");
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.error(format!("Error loading file: {e}"));
            }
        }
    }

    pub fn close(&mut self) {
        self.session.close();
        self.channels.clear();
        self.selected = None;
        self.outcome = None;
        self.status = None;
    }

    /// Select a channel by its display name (first match wins) and fit the
    /// analysis window to its time span.
    pub fn select_by_name(&mut self, name: &str) {
        let lookup = self
            .session
            .catalog()
            .and_then(|cat| cat.channel_by_name(name).map(|ch| ch.id.clone()));
        let id = match lookup {
            Ok(id) => id,
            Err(e) => {
                self.fail(&e);
                return;
            }
        };

        match self.session.get_series(&id) {
            Ok(view) => {
                if let Some((lo, hi)) = time_span(view.time) {
                    self.window_start = lo;
                    self.window_end = hi;
                }
                log::info!("Selected channel: {}", view.name);
                self.selected = Some(id);
                self.status = None;
            }
            Err(e) => self.fail(&e),
        }
    }

    pub fn compute_of_ratio(&mut self) {
        let result = self.session.of_ratio(self.window_start, self.window_end);
        self.finish(result.map(Outcome::OfRatio));
    }

    pub fn compute_thrust(&mut self) {
        let result = self.session.average_thrust(self.window_start, self.window_end);
        self.finish(result.map(Outcome::Thrust));
    }

    fn finish(&mut self, result: firing_viewer::Result<Outcome>) {
        match result {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.status = None;
            }
            Err(e) => {
                self.outcome = None;
                self.fail(&e);
            }
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    fn fail(&mut self, err: &AnalysisError) {
        self.error(report::error_text(err));
    }

    fn error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: true,
        });
    }
}

/// Smallest and largest timestamp. Time need not be sorted, so the ends of
/// the array are not enough. NaN entries are skipped.
fn time_span(time: &[f64]) -> Option<(f64, f64)> {
    time.iter()
        .copied()
        .filter(|t| !t.is_nan())
        .fold(None, |span, t| match span {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
}
