//! CSV traffic snapshot loader.
//!
//! # CSV format
//!
//! ```csv
//! location,congestion_ratio,avg_speed,weather_intensity,weather
//! Pasar Minggu,0.62,18.5,,Rain
//! Simpang Lima,0.35,31.0,0.0,
//! ```
//!
//! | Column              | Required | Handling                                        |
//! |---------------------|----------|-------------------------------------------------|
//! | `location`          | yes      | matched against the location bindings           |
//! | `congestion_ratio`  | yes      | clamped to `[0, 1]` with a warning              |
//! | `avg_speed`         | yes      | km/h; non-positive or non-finite → error        |
//! | `weather_intensity` | no       | clamped to `[0, 1]`; wins over `weather`        |
//! | `weather`           | no       | description, see [`weather_intensity`]          |
//!
//! With neither weather column present the intensity is 0.

use std::io::Read;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::row::{TrafficRow, TrafficSnapshot, weather_intensity};
use crate::{TrafficError, TrafficResult};

#[derive(Deserialize)]
struct TrafficRecord {
    location:          String,
    congestion_ratio:  f64,
    avg_speed:         f64,
    #[serde(default)]
    weather_intensity: Option<f64>,
    #[serde(default)]
    weather:           Option<String>,
}

/// Load a snapshot from a CSV file.
pub fn load_snapshot_csv(path: &Path) -> TrafficResult<TrafficSnapshot> {
    let file = std::fs::File::open(path)?;
    load_snapshot_reader(file)
}

/// Like [`load_snapshot_csv`] but accepts any `Read` source.
pub fn load_snapshot_reader<R: Read>(reader: R) -> TrafficResult<TrafficSnapshot> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| TrafficError::Parse(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| TrafficError::Parse(e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line());
        let rec: TrafficRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| TrafficError::Parse(format!("line {line}: {e}")))?;
        rows.push(validate(rec, line)?);
    }

    Ok(TrafficSnapshot::new(rows))
}

fn validate(rec: TrafficRecord, line: u64) -> TrafficResult<TrafficRow> {
    if rec.location.is_empty() {
        return Err(TrafficError::InvalidRow { line, reason: "empty location".to_owned() });
    }
    if !(rec.avg_speed.is_finite() && rec.avg_speed > 0.0) {
        return Err(TrafficError::InvalidRow {
            line,
            reason: format!("avg_speed must be positive, got {}", rec.avg_speed),
        });
    }

    let congestion_ratio = clamp_unit(rec.congestion_ratio, "congestion_ratio", &rec.location, line)?;
    let intensity = match (rec.weather_intensity, rec.weather.as_deref()) {
        (Some(v), _) => clamp_unit(v, "weather_intensity", &rec.location, line)?,
        (None, Some(desc)) => weather_intensity(desc),
        (None, None) => 0.0,
    };

    Ok(TrafficRow::new(rec.location, congestion_ratio, rec.avg_speed).with_weather(intensity))
}

fn clamp_unit(value: f64, column: &str, location: &str, line: u64) -> TrafficResult<f64> {
    if value.is_nan() {
        return Err(TrafficError::InvalidRow { line, reason: format!("{column} is NaN") });
    }
    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        warn!("line {line}: {column} {value} for {location:?} clamped to {clamped}");
    }
    Ok(clamped)
}
