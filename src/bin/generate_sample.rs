//! Writes a synthetic hot-fire recording as `sample_firing.json` and
//! `sample_firing.parquet` for trying the viewer without test-stand data.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Builder, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{json, Map, Value};

const SAMPLE_RATE_HZ: f64 = 100.0;
const DURATION_S: f64 = 10.0;
const IGNITION_S: f64 = 1.0;
const SHUTDOWN_S: f64 = 8.0;

struct SampleChannel {
    id: &'static str,
    name: &'static str,
    units: Option<&'static str>,
    time: Vec<f64>,
    data: Vec<f64>,
}

/// splitmix64 with a Box-Muller gaussian on top; deterministic per seed.
struct Noise {
    state: u64,
}

impl Noise {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn gauss(&mut self, sigma: f64) -> f64 {
        let u1 = self.uniform().max(1e-15);
        let u2 = self.uniform();
        sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// 0 before ignition, 1 during steady state, with 0.2 s linear ramps.
fn throttle(t: f64) -> f64 {
    let up = ((t - IGNITION_S) / 0.2).clamp(0.0, 1.0);
    let down = ((SHUTDOWN_S + 0.2 - t) / 0.2).clamp(0.0, 1.0);
    up.min(down)
}

fn build_channels() -> Vec<SampleChannel> {
    let n = (DURATION_S * SAMPLE_RATE_HZ) as usize;
    let time: Vec<f64> = (0..n).map(|i| i as f64 / SAMPLE_RATE_HZ).collect();
    let mut noise = Noise::new(7);

    let mut channel = |id, name, units, level: f64, sigma: f64| {
        let data = time
            .iter()
            .map(|&t| level * throttle(t) + noise.gauss(sigma))
            .collect();
        SampleChannel {
            id,
            name,
            units,
            time: time.clone(),
            data,
        }
    };

    vec![
        channel("M850", "N2O mass flow", Some("kg/s"), 0.92, 0.01),
        channel("M730", "IPA mass flow", Some("kg/s"), 0.31, 0.005),
        channel("LC190", "Thrust", Some("N"), 1450.0, 12.0),
        channel("PT110", "Chamber pressure", Some("bar"), 21.5, 0.3),
        // No units attribute: the viewer shows its placeholder.
        channel("TC120", "Injector temperature", None, 12.0, 0.2),
    ]
}

fn write_json(channels: &[SampleChannel], path: &str) -> Result<()> {
    let mut group = Map::new();
    for ch in channels {
        let mut member = json!({
            "name": ch.name,
            "time": ch.time,
            "data": ch.data,
        });
        if let (Some(units), Some(obj)) = (ch.units, member.as_object_mut()) {
            obj.insert("units".to_string(), Value::from(units));
        }
        group.insert(ch.id.to_string(), member);
    }
    let root = json!({ "channels": group });
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    serde_json::to_writer(std::io::BufWriter::new(file), &root)
        .with_context(|| format!("writing {path}"))
}

fn write_parquet(channels: &[SampleChannel], path: &str) -> Result<()> {
    let list = |rows: Vec<&Vec<f64>>| {
        let mut builder = ListBuilder::new(Float64Builder::new());
        for row in rows {
            builder.values().append_slice(row);
            builder.append(true);
        }
        builder.finish()
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
            Arc::new(StringArray::from_iter_values(channels.iter().map(|c| c.id))),
            Arc::new(StringArray::from_iter_values(channels.iter().map(|c| c.name))),
            Arc::new(StringArray::from(
                channels.iter().map(|c| c.units).collect::<Vec<_>>(),
            )),
            Arc::new(list(channels.iter().map(|c| &c.time).collect())),
            Arc::new(list(channels.iter().map(|c| &c.data).collect())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let channels = build_channels();
    write_json(&channels, "sample_firing.json")?;
    write_parquet(&channels, "sample_firing.parquet")?;

    log::info!("sample window for analysis: [{:.1}, {:.1}] s", IGNITION_S + 0.5, SHUTDOWN_S - 0.5);
    println!(
        "Wrote {} channels ({} samples each) to sample_firing.json and sample_firing.parquet",
        channels.len(),
        channels.first().map_or(0, |c| c.time.len())
    );
    Ok(())
}
