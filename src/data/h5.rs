//! HDF5 measurement files.
//!
//! Layout read here (as written by h5py-based test-stand tooling):
//! ```text
//! firing.h5
//! └── /channels
//!     ├── /M850            attrs: name, units
//!     │   ├── time         f64[n]
//!     │   └── data         f64[n]
//!     └── /LC190 ...
//! ```
//! Only the catalog (attributes and dataset extents) is read at open time;
//! sample arrays are pulled through [`SeriesSource`] on first access.

use std::path::{Path, PathBuf};

use hdf5::types::{VarLenAscii, VarLenUnicode};
use hdf5::{File, Group};

use crate::error::{AnalysisError, Result};

use super::loader::CHANNELS_GROUP;
use super::model::{Catalog, Channel, Series, SeriesSource};

struct H5Source {
    path: PathBuf,
    file: File,
}

impl SeriesSource for H5Source {
    fn read_series(&self, id: &str) -> Result<Series> {
        let fail = |what: &str, e: hdf5::Error| {
            AnalysisError::format(&self.path, format!("channel '{id}': {what}: {e}"))
        };
        let group = self
            .file
            .group(CHANNELS_GROUP)
            .and_then(|g| g.group(id))
            .map_err(|e| fail("opening group", e))?;
        let time = group
            .dataset("time")
            .and_then(|d| d.read_raw::<f64>())
            .map_err(|e| fail("reading 'time'", e))?;
        let data = group
            .dataset("data")
            .and_then(|d| d.read_raw::<f64>())
            .map_err(|e| fail("reading 'data'", e))?;
        Series::new(time, data)
            .map_err(|e| AnalysisError::format(&self.path, format!("channel '{id}': {e}")))
    }
}

pub fn open(path: &Path) -> Result<Catalog> {
    // The HDF5 library reports every open failure alike; missing or
    // unreadable files must surface as Io, not as a format error.
    std::fs::File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let file = File::open(path)
        .map_err(|e| AnalysisError::format(path, format!("not an HDF5 file: {e}")))?;
    let group = file
        .group(CHANNELS_GROUP)
        .map_err(|_| AnalysisError::format(path, "missing 'channels' group"))?;
    let ids = group
        .member_names()
        .map_err(|e| AnalysisError::format(path, format!("listing channels: {e}")))?;

    let mut channels = Vec::with_capacity(ids.len());
    for id in ids {
        let member = group
            .group(&id)
            .map_err(|_| AnalysisError::format(path, format!("channel '{id}' is not a group")))?;
        let len = checked_len(&member, &id).map_err(|r| AnalysisError::format(path, r))?;
        channels.push(Channel::deferred(
            id,
            string_attr(&member, "name"),
            string_attr(&member, "units"),
            len,
        ));
    }

    let source = H5Source {
        path: path.to_path_buf(),
        file,
    };
    Catalog::new(path, channels, Some(Box::new(source)))
}

/// Sample count shared by `time` and `data`, from the dataset extents.
fn checked_len(member: &Group, id: &str) -> std::result::Result<usize, String> {
    let extent = |name: &str| {
        member
            .dataset(name)
            .map(|d| d.size())
            .map_err(|_| format!("channel '{id}': missing '{name}' dataset"))
    };
    let time = extent("time")?;
    let data = extent("data")?;
    if time != data {
        return Err(format!(
            "channel '{id}': time has {time} samples but data has {data}"
        ));
    }
    Ok(time)
}

fn string_attr(member: &Group, key: &str) -> Option<String> {
    let attr = member.attr(key).ok()?;
    if let Ok(s) = attr.read_scalar::<VarLenUnicode>() {
        return Some(s.as_str().to_string());
    }
    attr.read_scalar::<VarLenAscii>()
        .ok()
        .map(|s| s.as_str().to_string())
}
