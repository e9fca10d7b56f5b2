//! Synthetic engagement states: hand-placed set-ups and seeded random samples.

use std::f64::consts::PI;

use aircombat_shared::*;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Straight-and-level aircraft at a local (north, east) offset from `origin`.
pub fn level_state(
    origin: &GeoOrigin,
    north_m: f64,
    east_m: f64,
    altitude_ft: f64,
    heading_rad: f64,
    speed_fps: f64,
) -> AircraftState {
    let (longitude_deg, latitude_deg) = origin.from_local_m(north_m, east_m);
    AircraftState {
        longitude_deg,
        latitude_deg,
        altitude_ft,
        roll_rad: 0.0,
        pitch_rad: 0.0,
        heading_rad,
        v_north_fps: speed_fps * heading_rad.cos(),
        v_east_fps: speed_fps * heading_rad.sin(),
        v_down_fps: 0.0,
        vc_fps: speed_fps,
        accel_x_g: 0.0,
        accel_y_g: 0.0,
        accel_z_g: 1.0,
    }
}

/// Agent 0 sits `range_km` directly behind agent 1, both heading north.
pub fn tail_chase(origin: &GeoOrigin, range_km: f64, altitude_ft: f64, speed_fps: f64) -> [AircraftState; NUM_AGENTS] {
    [
        level_state(origin, 0.0, 0.0, altitude_ft, 0.0, speed_fps),
        level_state(origin, range_km * METERS_PER_KM, 0.0, altitude_ft, 0.0, speed_fps),
    ]
}

/// Agents `range_km` apart on a north-south line, flying at each other.
pub fn head_on(origin: &GeoOrigin, range_km: f64, altitude_ft: f64, speed_fps: f64) -> [AircraftState; NUM_AGENTS] {
    [
        level_state(origin, 0.0, 0.0, altitude_ft, 0.0, speed_fps),
        level_state(origin, range_km * METERS_PER_KM, 0.0, altitude_ft, PI, speed_fps),
    ]
}

/// Random but plausible pair of aircraft near `origin`.
pub fn sample_encounter<R: Rng>(rng: &mut R, origin: &GeoOrigin) -> [AircraftState; NUM_AGENTS] {
    let sample = |rng: &mut R| {
        let longitude_deg = origin.longitude_deg + rng.gen_range(-0.1..0.1);
        let latitude_deg = origin.latitude_deg + rng.gen_range(-0.1..0.1);
        let heading_rad: f64 = rng.gen_range(-PI..PI);
        let speed_fps: f64 = rng.gen_range(500.0..1000.0);
        AircraftState {
            longitude_deg,
            latitude_deg,
            altitude_ft: rng.gen_range(15_000.0..30_000.0),
            roll_rad: 0.0,
            pitch_rad: 0.0,
            heading_rad,
            v_north_fps: speed_fps * heading_rad.cos(),
            v_east_fps: speed_fps * heading_rad.sin(),
            v_down_fps: 0.0,
            vc_fps: speed_fps,
            accel_x_g: 0.0,
            accel_y_g: 0.0,
            accel_z_g: 1.0,
        }
    };
    let a = sample(rng);
    let b = sample(rng);
    [a, b]
}

/// `count` encounters from a fixed seed.
pub fn seeded_encounters(seed: u64, count: usize, origin: &GeoOrigin) -> Vec<[AircraftState; NUM_AGENTS]> {
    let mut rng = Pcg64::seed_from_u64(seed);
    (0..count).map(|_| sample_encounter(&mut rng, origin)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{self, KinematicFeature};

    #[test]
    fn test_tail_chase_geometry() {
        let origin = GeoOrigin::default();
        let states = tail_chase(&origin, 3.0, 20_000.0, 800.0);
        let ego = KinematicFeature::from_state(&states[0], &origin);
        let enemy = KinematicFeature::from_state(&states[1], &origin);
        let g = geometry::compute(&ego, &enemy, false);
        assert!((g.range - 3.0).abs() < 1e-6);
        assert!(g.ao < 1e-6 && g.ta < 1e-6);
    }

    #[test]
    fn test_head_on_geometry() {
        let origin = GeoOrigin::default();
        let states = head_on(&origin, 5.0, 20_000.0, 800.0);
        let ego = KinematicFeature::from_state(&states[0], &origin);
        let enemy = KinematicFeature::from_state(&states[1], &origin);
        let g = geometry::compute(&ego, &enemy, false);
        assert!((g.range - 5.0).abs() < 1e-6);
        assert!(g.ao < 1e-6);
        assert!((g.ta - PI).abs() < 1e-6);
    }

    #[test]
    fn test_seeded_encounters_deterministic() {
        let origin = GeoOrigin::default();
        let a = seeded_encounters(42, 10, &origin);
        let b = seeded_encounters(42, 10, &origin);
        let c = seeded_encounters(43, 10, &origin);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sampled_states_in_envelope() {
        let origin = GeoOrigin::default();
        for pair in seeded_encounters(1, 100, &origin) {
            for s in pair {
                assert!(s.is_finite());
                assert!((15_000.0..30_000.0).contains(&s.altitude_ft));
                assert!((s.longitude_deg - origin.longitude_deg).abs() <= 0.1 + 1e-9);
                let speed = (s.v_north_fps.powi(2) + s.v_east_fps.powi(2)).sqrt();
                assert!((500.0 - 1e-6..1000.0 + 1e-6).contains(&speed));
            }
        }
    }
}
