use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

use crate::error::{AnalysisError, ChannelKey, Result};

/// Placeholder shown on the dependent axis when a channel has no `units`.
pub const DEFAULT_UNITS: &str = "Units";

/// Display name used when a channel carries no `name` attribute.
pub fn fallback_name(id: &str) -> String {
    format!("Channel {id}")
}

// ---------------------------------------------------------------------------
// Series – the raw time/data arrays of one channel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("time has {time} samples but data has {data}")]
pub struct LengthMismatch {
    pub time: usize,
    pub data: usize,
}

/// Index-aligned timestamps and samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub time: Vec<f64>,
    pub data: Vec<f64>,
}

impl Series {
    pub fn new(time: Vec<f64>, data: Vec<f64>) -> Result<Self, LengthMismatch> {
        if time.len() != data.len() {
            return Err(LengthMismatch {
                time: time.len(),
                data: data.len(),
            });
        }
        Ok(Self { time, data })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SeriesSource – deferred reads for containers that are not parsed eagerly
// ---------------------------------------------------------------------------

/// Backend that can read one channel's arrays on demand.
///
/// Formats that are parsed as a whole (JSON, CSV, Parquet) never need one;
/// the HDF5 reader keeps its file handle open behind this trait. Sources are
/// shareable so a loaded catalog can be queried from any thread.
pub trait SeriesSource: Send + Sync {
    fn read_series(&self, id: &str) -> Result<Series>;
}

// ---------------------------------------------------------------------------
// Channel – one sensor stream in the catalog
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub units: String,
    /// Sample count, known at open time even before the arrays are read.
    len: usize,
    series: OnceLock<Series>,
}

impl Channel {
    /// A channel whose arrays are already in memory.
    pub fn loaded(id: String, name: Option<String>, units: Option<String>, series: Series) -> Self {
        let len = series.len();
        Self {
            name: name.unwrap_or_else(|| fallback_name(&id)),
            units: units.unwrap_or_else(|| DEFAULT_UNITS.to_string()),
            id,
            len,
            series: OnceLock::from(series),
        }
    }

    /// A channel whose arrays are read from a [`SeriesSource`] on first access.
    pub fn deferred(id: String, name: Option<String>, units: Option<String>, len: usize) -> Self {
        Self {
            name: name.unwrap_or_else(|| fallback_name(&id)),
            units: units.unwrap_or_else(|| DEFAULT_UNITS.to_string()),
            id,
            len,
            series: OnceLock::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_materialized(&self) -> bool {
        self.series.get().is_some()
    }

    pub fn summary(&self) -> ChannelSummary {
        ChannelSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            units: self.units.clone(),
            len: self.len,
        }
    }
}

/// Catalog entry as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    pub units: String,
    pub len: usize,
}

// ---------------------------------------------------------------------------
// Catalog – every channel of one opened file, in file order
// ---------------------------------------------------------------------------

pub struct Catalog {
    path: PathBuf,
    channels: Vec<Channel>,
    source: Option<Box<dyn SeriesSource>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("path", &self.path)
            .field("channels", &self.channels)
            .field("deferred", &self.source.is_some())
            .finish()
    }
}

impl Catalog {
    /// Build a catalog, rejecting duplicate channel ids.
    pub fn new(
        path: impl Into<PathBuf>,
        channels: Vec<Channel>,
        source: Option<Box<dyn SeriesSource>>,
    ) -> Result<Self> {
        let path = path.into();
        let mut seen = HashSet::with_capacity(channels.len());
        for ch in &channels {
            if !seen.insert(ch.id.as_str()) {
                return Err(AnalysisError::format(
                    &path,
                    format!("duplicate channel id '{}'", ch.id),
                ));
            }
        }
        Ok(Self {
            path,
            channels,
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_by_id(&self, id: &str) -> Result<&Channel> {
        self.channels
            .iter()
            .find(|ch| ch.id == id)
            .ok_or_else(|| AnalysisError::NotFound {
                key: ChannelKey::Id(id.to_string()),
            })
    }

    /// Exact display-name match. Names may repeat; the first channel in
    /// catalog order wins.
    pub fn channel_by_name(&self, name: &str) -> Result<&Channel> {
        self.channels
            .iter()
            .find(|ch| ch.name == name)
            .ok_or_else(|| AnalysisError::NotFound {
                key: ChannelKey::Name(name.to_string()),
            })
    }

    /// Raw arrays of `channel`, read from the source on first access.
    pub fn series<'a>(&'a self, channel: &'a Channel) -> Result<&'a Series> {
        if let Some(series) = channel.series.get() {
            return Ok(series);
        }
        let source = self.source.as_ref().ok_or_else(|| {
            AnalysisError::format(&self.path, format!("channel '{}' has no data", channel.id))
        })?;
        let series = source.read_series(&channel.id)?;
        if series.len() != channel.len {
            return Err(AnalysisError::format(
                &self.path,
                format!(
                    "channel '{}' changed length: expected {} samples, read {}",
                    channel.id,
                    channel.len,
                    series.len()
                ),
            ));
        }
        Ok(channel.series.get_or_init(|| series))
    }

    pub fn series_by_id(&self, id: &str) -> Result<&Series> {
        self.series(self.channel_by_id(id)?)
    }
}
