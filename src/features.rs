//! Per-timestep kinematic deltas between consecutive ADS-B states.

use crate::data::AdsbState;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy)]
pub struct FeatureVector {
    pub dt: f64,
    pub d_speed: f64,
    pub d_heading: f64,
    pub d_vert_rate: f64,
    pub d_altitude: f64,
    pub ground_distance: f64,
    pub acceleration: f64,
    pub target_score: f64,
}

/// Deltas over consecutive samples; pairs with non-positive or undefined
/// time gaps are dropped.
pub fn extract(states: &[AdsbState]) -> Vec<FeatureVector> {
    let mut features = Vec::with_capacity(states.len().saturating_sub(1));
    for pair in states.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let dt = curr.time - prev.time;
        if !(dt > 0.0) {
            continue;
        }
        let d_speed = curr.velocity - prev.velocity;
        features.push(FeatureVector {
            dt,
            d_speed,
            d_heading: heading_delta(prev.heading, curr.heading),
            d_vert_rate: curr.vert_rate - prev.vert_rate,
            d_altitude: curr.baro_altitude - prev.baro_altitude,
            ground_distance: haversine(prev.lat, prev.lon, curr.lat, curr.lon),
            acceleration: d_speed / dt,
            target_score: curr.target_score,
        });
    }
    features
}

/// Shortest signed turn from one heading to another, in (−180, 180].
pub fn heading_delta(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    while delta > 180.0 {
        delta -= 360.0;
    }
    while delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

/// Great-circle ground distance in meters.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}
