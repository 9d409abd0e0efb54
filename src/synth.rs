//! Synthetic data: a labeled scenario batch for optimizer harnesses, and
//! a scripted flight track CSV with injected anomalies.

use crate::error::Error;
use crate::fuzzy::adsb::{
    ALTITUDE_CHANGE, HEADING_CHANGE, SPEED_CHANGE, TIME_GAP, VERTICAL_RATE_CHANGE,
};
use crate::fuzzy::system::InputRow;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

fn row(speed: f64, heading: f64, vert_rate: f64, altitude: f64, time_gap: f64) -> InputRow {
    let mut inputs = InputRow::default();
    inputs.insert(SPEED_CHANGE.to_string(), speed);
    inputs.insert(HEADING_CHANGE.to_string(), heading);
    inputs.insert(VERTICAL_RATE_CHANGE.to_string(), vert_rate);
    inputs.insert(ALTITUDE_CHANGE.to_string(), altitude);
    inputs.insert(TIME_GAP.to_string(), time_gap);
    inputs
}

/// Labeled samples cycling through five flight scenarios: normal,
/// moderate anomaly, high anomaly, large-gap, and mixed. Deterministic
/// for a given seed.
pub fn scenario_batch(samples: usize, seed: u64) -> (Vec<InputRow>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut inputs = Vec::with_capacity(samples);
    let mut targets = Vec::with_capacity(samples);
    for i in 0..samples {
        let (input, target) = match i % 5 {
            0 => (
                row(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(1.0..5.0),
                ),
                0.2,
            ),
            1 => (
                row(
                    rng.gen_range(2.0..4.0),
                    rng.gen_range(10.0..30.0),
                    rng.gen_range(2.0..4.0),
                    rng.gen_range(100.0..300.0),
                    rng.gen_range(3.0..10.0),
                ),
                0.5,
            ),
            2 => (
                row(
                    rng.gen_range(5.0..8.0),
                    rng.gen_range(50.0..120.0),
                    rng.gen_range(-15.0..-8.0),
                    rng.gen_range(300.0..700.0),
                    rng.gen_range(1.0..3.0),
                ),
                0.8,
            ),
            3 => (
                row(
                    rng.gen_range(3.0..5.0),
                    rng.gen_range(15.0..40.0),
                    rng.gen_range(1.0..3.0),
                    rng.gen_range(50.0..150.0),
                    rng.gen_range(20.0..50.0),
                ),
                0.3,
            ),
            _ => (
                row(
                    rng.gen_range(-3.0..3.0),
                    rng.gen_range(-20.0..20.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-200.0..200.0),
                    rng.gen_range(5.0..15.0),
                ),
                0.4,
            ),
        };
        inputs.push(input);
        targets.push(target);
    }
    (inputs, targets)
}

/// A scripted cruise track with five injected incidents: a position
/// teleport, a hard vertical maneuver, a climb impossible even across a
/// one-minute gap, an aggressive-but-possible acceleration across a gap,
/// and a stretch of frozen position under reported speed.
pub fn write_track_csv(path: &Path, samples: usize, seed: u64) -> Result<(), Error> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    writer.write_record([
        "time",
        "icao24",
        "lat",
        "lon",
        "velocity",
        "heading",
        "vertrate",
        "callsign",
        "onground",
        "alert",
        "spi",
        "squawk",
        "baroaltitude",
        "geoaltitude",
        "lastposupdate",
        "lastcontact",
        "target_score",
    ])?;

    let mut time: i64 = 1_654_495_200;
    let mut lat: f64 = 51.0;
    let mut lon: f64 = 4.0;
    let mut velocity: f64 = 230.0;
    let mut heading: f64 = 90.0;
    let mut vert_rate: f64 = 0.0;
    let mut altitude: f64 = 10_000.0;

    for i in 0..samples {
        let mut score = 0.0;
        let mut dt: i64 = 2;

        // natural drift so the track is never a constant line
        velocity += rng.gen_range(-0.02..0.02);
        vert_rate += rng.gen_range(-0.02..0.02);
        heading += rng.gen_range(-0.02..0.02) * 0.5;

        let mut out_lat = lat;
        let out_lon = lon;
        let mut out_velocity = velocity;
        let mut out_altitude = altitude;
        let mut out_vert_rate = vert_rate;
        let frozen = (2500..=2505).contains(&i);

        if i == 500 {
            // teleport: an impossible position jump in two seconds
            out_lat += 0.1;
            score = 1.0;
        } else if i == 1000 {
            // hard climb, plausible for a fighter only
            out_vert_rate = 35.0;
            score = 0.5;
        } else if i == 1500 {
            dt = 60;
            out_altitude += 15_000.0;
            score = 1.0;
        } else if i == 2000 {
            dt = 60;
            out_velocity += 40.0;
            score = 0.5;
        } else if frozen {
            out_velocity = 230.0;
            score = 1.0;
        }

        writer.write_record([
            time.to_string(),
            "4ca765".to_string(),
            format!("{out_lat:.8}"),
            format!("{out_lon:.8}"),
            format!("{out_velocity:.2}"),
            format!("{heading:.2}"),
            format!("{out_vert_rate:.2}"),
            "TEST123".to_string(),
            "False".to_string(),
            "False".to_string(),
            "False".to_string(),
            "0100".to_string(),
            format!("{out_altitude:.2}"),
            format!("{:.2}", out_altitude + 50.0),
            format!("{:.1}", time as f64 - 0.5),
            time.to_string(),
            format!("{score}"),
        ])?;

        altitude += vert_rate * dt as f64;
        if !frozen {
            let r = heading.to_radians();
            lat += velocity * dt as f64 * r.cos() * 0.000009;
            lon += velocity * dt as f64 * r.sin() * 0.000015;
        }
        time += dt;
    }
    writer.flush()?;
    Ok(())
}
