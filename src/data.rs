//! Raw ADS-B state vectors and their CSV loader.

use crate::error::Error;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Empty numeric fields are NaN, not parse errors; downstream stages drop
/// rows whose values they actually need.
fn nan_if_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(f64::NAN)
    } else {
        trimmed.parse().map_err(serde::de::Error::custom)
    }
}

/// Accepts true/false in any case as well as 1/0.
fn loose_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1"
    ))
}

fn nan() -> f64 {
    f64::NAN
}

/// One decoded surveillance record.
#[derive(Debug, Clone, Deserialize)]
pub struct AdsbState {
    #[serde(deserialize_with = "nan_if_empty")]
    pub time: f64,
    pub icao24: String,
    #[serde(deserialize_with = "nan_if_empty")]
    pub lat: f64,
    #[serde(deserialize_with = "nan_if_empty")]
    pub lon: f64,
    #[serde(deserialize_with = "nan_if_empty")]
    pub velocity: f64,
    #[serde(deserialize_with = "nan_if_empty")]
    pub heading: f64,
    #[serde(rename = "vertrate", deserialize_with = "nan_if_empty")]
    pub vert_rate: f64,
    pub callsign: String,
    #[serde(deserialize_with = "loose_bool")]
    pub onground: bool,
    #[serde(deserialize_with = "loose_bool")]
    pub alert: bool,
    #[serde(deserialize_with = "loose_bool")]
    pub spi: bool,
    pub squawk: String,
    #[serde(rename = "baroaltitude", deserialize_with = "nan_if_empty")]
    pub baro_altitude: f64,
    #[serde(rename = "geoaltitude", deserialize_with = "nan_if_empty")]
    pub geo_altitude: f64,
    #[serde(rename = "lastposupdate", deserialize_with = "nan_if_empty")]
    pub last_pos_update: f64,
    #[serde(rename = "lastcontact", deserialize_with = "nan_if_empty")]
    pub last_contact: f64,
    /// Reference label carried by synthetic datasets; NaN when absent.
    #[serde(default = "nan", deserialize_with = "nan_if_empty")]
    pub target_score: f64,
}

impl AdsbState {
    /// Ground traffic and positionless records carry no usable kinematics.
    fn usable(&self) -> bool {
        !self.icao24.is_empty() && !self.onground && !self.lat.is_nan() && !self.lon.is_nan()
    }
}

/// Load every usable state from a CSV file.
///
/// Returns the states plus the number of malformed rows that were
/// skipped. A file that cannot be opened is fatal.
pub fn load_states(path: &Path) -> Result<(Vec<AdsbState>, usize), Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut states = Vec::new();
    let mut skipped = 0;
    for row in reader.deserialize::<AdsbState>() {
        match row {
            Ok(state) if state.usable() => states.push(state),
            Ok(_) => {}
            Err(_) => skipped += 1,
        }
    }
    Ok((states, skipped))
}
