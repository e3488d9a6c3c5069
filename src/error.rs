use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::window::TimeWindow;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// How a channel was looked up when it could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKey {
    Id(String),
    Name(String),
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKey::Id(id) => write!(f, "id '{id}'"),
            ChannelKey::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

/// Which side of a quotient had a zero mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Numerator,
    Denominator,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Numerator => write!(f, "numerator"),
            Operand::Denominator => write!(f, "denominator"),
        }
    }
}

/// Every failure the analysis core can report to its caller.
///
/// None of these are fatal to a [`Session`](crate::session::Session): an
/// `Io` or `FileFormat` error leaves it with no file loaded, everything else
/// leaves the loaded catalog untouched.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid measurement file {}: {reason}", .path.display())]
    FileFormat { path: PathBuf, reason: String },

    #[error("no file loaded; please load a file first")]
    NoFileLoaded,

    #[error("no channel with {key}")]
    NotFound { key: ChannelKey },

    #[error("no samples selected{}", scope(.channel.as_deref(), .window.as_ref()))]
    EmptyWindow {
        channel: Option<String>,
        window: Option<TimeWindow>,
    },

    #[error("invalid time range: start {start} is after end {end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("{operand} mean is zero{}", scope(.channel.as_deref(), None))]
    DivideByZero {
        operand: Operand,
        channel: Option<String>,
    },
}

fn scope(channel: Option<&str>, window: Option<&TimeWindow>) -> String {
    let mut out = String::new();
    if let Some(ch) = channel {
        out.push_str(&format!(" in channel '{ch}'"));
    }
    if let Some(w) = window {
        out.push_str(&format!(" for window {w}"));
    }
    out
}

impl AnalysisError {
    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AnalysisError::FileFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a channel id to window/statistics errors that were raised
    /// without one. Other variants pass through untouched.
    pub fn in_channel(self, id: &str) -> Self {
        match self {
            AnalysisError::EmptyWindow {
                channel: None,
                window,
            } => AnalysisError::EmptyWindow {
                channel: Some(id.to_string()),
                window,
            },
            AnalysisError::DivideByZero {
                operand,
                channel: None,
            } => AnalysisError::DivideByZero {
                operand,
                channel: Some(id.to_string()),
            },
            other => other,
        }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
