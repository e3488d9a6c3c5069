use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float32Array, Float64Array, LargeListArray, ListArray, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use crate::error::{AnalysisError, Result};

use super::model::{Catalog, Channel, Series};

/// Name of the top-level group holding one member per channel.
pub const CHANNELS_GROUP: &str = "channels";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Open a measurement file and build its channel catalog.  Dispatch by
/// extension.
///
/// Supported formats:
/// * `.h5` / `.hdf5` – `channels/<id>` groups with `name`/`units`
///   attributes and `time`/`data` datasets (needs the `hdf5` feature)
/// * `.json`    – `{ "channels": { "<id>": { "name", "units", "time", "data" } } }`
/// * `.parquet` – one row per channel: `id`, `name`, `units`, `time`, `data`
/// * `.csv`     – same columns, `time`/`data` as semicolon-separated floats
pub fn load_file(path: &Path) -> Result<Catalog> {
    std::fs::metadata(path).map_err(|e| AnalysisError::io(path, e))?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "h5" | "hdf5" => load_hdf5(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        "csv" => load_csv(path),
        other => Err(AnalysisError::format(
            path,
            format!("unsupported file extension: .{other}"),
        )),
    }
}

#[cfg(feature = "hdf5")]
fn load_hdf5(path: &Path) -> Result<Catalog> {
    super::h5::open(path)
}

#[cfg(not(feature = "hdf5"))]
fn load_hdf5(path: &Path) -> Result<Catalog> {
    Err(AnalysisError::format(
        path,
        "HDF5 support is not compiled in; rebuild with `--features hdf5`",
    ))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON layout (channel order = key order in the file):
///
/// ```json
/// {
///   "channels": {
///     "M850": {
///       "name": "N2O flow",
///       "units": "kg/s",
///       "time": [0.0, 0.01, ...],
///       "data": [0.12, 0.14, ...]
///     },
///     ...
///   }
/// }
/// ```
fn load_json(path: &Path) -> Result<Catalog> {
    // Read bytes, not a String: invalid UTF-8 is a malformed file, not an I/O failure.
    let bytes = std::fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
    let root: JsonValue = serde_json::from_slice(&bytes)
        .map_err(|e| AnalysisError::format(path, format!("parsing JSON: {e}")))?;

    let group = root
        .get(CHANNELS_GROUP)
        .and_then(|g| g.as_object())
        .ok_or_else(|| AnalysisError::format(path, "missing 'channels' group"))?;

    let mut channels = Vec::with_capacity(group.len());

    for (id, member) in group {
        let obj = member.as_object().ok_or_else(|| {
            AnalysisError::format(path, format!("channel '{id}' is not a group"))
        })?;

        let time = json_array_to_f64(obj, id, "time").map_err(|r| AnalysisError::format(path, r))?;
        let data = json_array_to_f64(obj, id, "data").map_err(|r| AnalysisError::format(path, r))?;
        let series = Series::new(time, data)
            .map_err(|e| AnalysisError::format(path, format!("channel '{id}': {e}")))?;

        channels.push(Channel::loaded(
            id.clone(),
            json_string_attr(obj, "name"),
            json_string_attr(obj, "units"),
            series,
        ));
    }

    Catalog::new(path, channels, None)
}

fn json_array_to_f64(
    obj: &Map<String, JsonValue>,
    id: &str,
    member: &str,
) -> std::result::Result<Vec<f64>, String> {
    let arr = obj
        .get(member)
        .and_then(|v| v.as_array())
        .ok_or_else(|| format!("channel '{id}': missing or invalid '{member}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .ok_or_else(|| format!("channel '{id}', {member}[{j}]: not a number"))
        })
        .collect()
}

/// Optional string attribute; anything that is not a string counts as absent.
fn json_string_attr(obj: &Map<String, JsonValue>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, one channel per record.
/// `time` and `data` columns contain semicolon-separated floats:
///   `"0.0;0.01;0.02"`, `"0.12;0.14;0.11"`
/// `name` and `units` are optional columns; empty cells count as absent.
fn load_csv(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnalysisError::format(path, format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let id_idx = column("id").ok_or_else(|| AnalysisError::format(path, "CSV missing 'id' column"))?;
    let time_idx =
        column("time").ok_or_else(|| AnalysisError::format(path, "CSV missing 'time' column"))?;
    let data_idx =
        column("data").ok_or_else(|| AnalysisError::format(path, "CSV missing 'data' column"))?;
    let name_idx = column("name");
    let units_idx = column("units");

    let mut channels = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| AnalysisError::format(path, format!("CSV row {row_no}: {e}")))?;

        let id = record.get(id_idx).unwrap_or("").trim().to_string();
        if id.is_empty() {
            return Err(AnalysisError::format(path, format!("CSV row {row_no}: empty channel id")));
        }

        let time = parse_semicolon_floats(record.get(time_idx).unwrap_or(""), &id, "time")
            .map_err(|r| AnalysisError::format(path, r))?;
        let data = parse_semicolon_floats(record.get(data_idx).unwrap_or(""), &id, "data")
            .map_err(|r| AnalysisError::format(path, r))?;
        let series = Series::new(time, data)
            .map_err(|e| AnalysisError::format(path, format!("channel '{id}': {e}")))?;

        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let name = cell(name_idx);
        let units = cell(units_idx);

        channels.push(Channel::loaded(id, name, units, series));
    }

    Catalog::new(path, channels, None)
}

fn parse_semicolon_floats(s: &str, id: &str, member: &str) -> std::result::Result<Vec<f64>, String> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .map_err(|_| format!("channel '{id}', {member}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet channel table.
///
/// Expected schema:
/// - `id`: Utf8 – channel identifier
/// - `name`, `units`: Utf8, optional columns, nulls allowed
/// - `time`, `data`: List<Float64> or LargeList<Float64> (Float32 accepted)
///
/// Row order is catalog order.
fn load_parquet(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| AnalysisError::format(path, format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| AnalysisError::format(path, format!("building parquet reader: {e}")))?;

    let mut channels = Vec::new();

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| AnalysisError::format(path, format!("reading parquet record batch: {e}")))?;
        let schema = batch.schema();

        let required = |name: &str| {
            schema
                .index_of(name)
                .map(|i| batch.column(i).clone())
                .map_err(|_| AnalysisError::format(path, format!("Parquet file missing '{name}' column")))
        };
        let optional = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i).clone());

        let id_col = required("id")?;
        let time_col = required("time")?;
        let data_col = required("data")?;
        let name_col = optional("name");
        let units_col = optional("units");

        for row in 0..batch.num_rows() {
            let id = extract_string(&id_col, row)
                .ok_or_else(|| AnalysisError::format(path, format!("row {row}: missing channel id")))?;

            let time = extract_f64_list(&time_col, row)
                .map_err(|r| AnalysisError::format(path, format!("channel '{id}', 'time': {r}")))?;
            let data = extract_f64_list(&data_col, row)
                .map_err(|r| AnalysisError::format(path, format!("channel '{id}', 'data': {r}")))?;
            let series = Series::new(time, data)
                .map_err(|e| AnalysisError::format(path, format!("channel '{id}': {e}")))?;

            let name = name_col.as_ref().and_then(|c| extract_string(c, row));
            let units = units_col.as_ref().and_then(|c| extract_string(c, row));

            channels.push(Channel::loaded(id, name, units, series));
        }
    }

    Catalog::new(path, channels, None)
}

// -- Parquet / Arrow helpers --

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &Arc<dyn Array>, row: usize) -> std::result::Result<Vec<f64>, String> {
    if col.is_null(row) {
        return Err("null value in list column".to_string());
    }

    let values_array = match col.data_type() {
        DataType::List(_) => col
            .as_any()
            .downcast_ref::<ListArray>()
            .ok_or("expected ListArray")?
            .value(row),
        DataType::LargeList(_) => col
            .as_any()
            .downcast_ref::<LargeListArray>()
            .ok_or("expected LargeListArray")?
            .value(row),
        other => return Err(format!("expected List or LargeList column, got {other:?}")),
    };

    // Null entries inside the list become NaN rather than shifting indices.
    if let Some(f64_arr) = values_array.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = values_array.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
    } else {
        Err(format!(
            "list inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        ))
    }
}

/// Non-null string cell of a Utf8 / LargeUtf8 column.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use arrow::array::{Float64Builder, ListBuilder};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn temp_file(name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = std::env::temp_dir().join(format!("firing_viewer_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn json_keeps_file_order_and_defaults() {
        let path = temp_file(
            "order.json",
            r#"{"channels": {
                "Z1": {"name": "Last alphabetically", "units": "bar", "time": [0, 1], "data": [1, 2]},
                "A1": {"time": [0.5], "data": [3.25]}
            }}"#,
        );
        let cat = load_file(&path).unwrap();
        let ids: Vec<&str> = cat.channels().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["Z1", "A1"]);

        let a1 = cat.channel_by_id("A1").unwrap();
        assert_eq!(a1.name, "Channel A1");
        assert_eq!(a1.units, "Units");
        assert_eq!(cat.series(a1).unwrap().data, vec![3.25]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn json_without_channels_group_is_format_error() {
        let path = temp_file("nogroup.json", r#"{"signals": {}}"#);
        assert!(matches!(load_file(&path), Err(AnalysisError::FileFormat { .. })));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn json_missing_data_member_is_format_error() {
        let path = temp_file(
            "nodata.json",
            r#"{"channels": {"M850": {"name": "N2O", "time": [0, 1]}}}"#,
        );
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("'data'"), "{err}");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn json_length_mismatch_is_format_error() {
        let path = temp_file(
            "mismatch.json",
            r#"{"channels": {"M850": {"time": [0, 1, 2], "data": [1, 2]}}}"#,
        );
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::FileFormat { .. }));
        assert!(err.to_string().contains("M850"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn json_with_invalid_utf8_is_format_error() {
        let mut bytes = br#"{"channels": {"M850": {"name": ""#.to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(br#"", "time": [0], "data": [1]}}}"#);
        let path = temp_file("latin1.json", bytes);

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::FileFormat { .. }), "{err:?}");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_path_is_io_error() {
        let path = std::env::temp_dir().join("firing_viewer_definitely_missing.json");
        assert!(matches!(load_file(&path), Err(AnalysisError::Io { .. })));
    }

    #[test]
    fn unknown_extension_is_format_error() {
        let path = temp_file("channels.txt", "whatever");
        assert!(matches!(load_file(&path), Err(AnalysisError::FileFormat { .. })));
        std::fs::remove_file(path).ok();
    }

    #[cfg(not(feature = "hdf5"))]
    #[test]
    fn hdf5_without_feature_explains_itself() {
        let path = temp_file("firing.h5", "");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("--features hdf5"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn csv_channels_with_optional_columns() {
        let path = temp_file(
            "channels.csv",
            "id,name,units,time,data\n\
             M850,N2O flow,kg/s,0;1;2,1.5;1.5;1.5\n\
             LC190,,,0;1,100;200\n",
        );
        let cat = load_file(&path).unwrap();
        assert_eq!(cat.len(), 2);
        let lc = cat.channel_by_id("LC190").unwrap();
        assert_eq!(lc.name, "Channel LC190");
        assert_eq!(lc.units, "Units");
        assert_eq!(cat.series(lc).unwrap().time, vec![0.0, 1.0]);
        assert_eq!(cat.channel_by_name("N2O flow").unwrap().units, "kg/s");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn csv_duplicate_id_is_format_error() {
        let path = temp_file("dup.csv", "id,time,data\nA,0,1\nA,0,2\n");
        assert!(matches!(load_file(&path), Err(AnalysisError::FileFormat { .. })));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn parquet_channel_table() {
        let path = std::env::temp_dir().join(format!("firing_viewer_{}_table.parquet", std::process::id()));

        let list = |rows: &[&[f64]]| {
            let mut b = ListBuilder::new(Float64Builder::new());
            for row in rows {
                b.values().append_slice(row);
                b.append(true);
            }
            b.finish()
        };
        let item = Arc::new(Field::new("item", DataType::Float64, true));
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, true),
            Field::new("units", DataType::Utf8, true),
            Field::new("time", DataType::List(item.clone()), false),
            Field::new("data", DataType::List(item), false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["M850", "M730"])),
                Arc::new(StringArray::from(vec![Some("N2O flow"), None])),
                Arc::new(StringArray::from(vec![Some("kg/s"), None])),
                Arc::new(list(&[&[0.0, 1.0][..], &[0.0, 1.0, 2.0][..]])),
                Arc::new(list(&[&[10.0, 10.0][..], &[5.0, 5.0, 5.0][..]])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let cat = load_file(&path).unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.channels()[0].name, "N2O flow");
        let m730 = cat.channel_by_id("M730").unwrap();
        assert_eq!(m730.name, "Channel M730");
        assert_eq!(cat.series(m730).unwrap().data, vec![5.0, 5.0, 5.0]);
        std::fs::remove_file(path).ok();
    }
}
