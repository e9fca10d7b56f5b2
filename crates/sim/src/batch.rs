use aircombat_shared::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::KinematicFeature;
use crate::reward::{RewardBreakdown, RewardEngine};

/// Posture reward of both agents for every pair, evaluated in parallel.
pub fn evaluate_batch(
    engine: &RewardEngine,
    origin: &GeoOrigin,
    pairs: &[[AircraftState; NUM_AGENTS]],
) -> Vec<[RewardBreakdown; NUM_AGENTS]> {
    pairs
        .par_iter()
        .map(|states| {
            let a = KinematicFeature::from_state(&states[0], origin);
            let b = KinematicFeature::from_state(&states[1], origin);
            [engine.evaluate_features(&a, &b), engine.evaluate_features(&b, &a)]
        })
        .collect()
}

/// Aggregate statistics over a batch, all agents pooled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub count: usize,
    pub mean_total: f64,
    pub min_total: f64,
    pub max_total: f64,
    pub mean_orientation: f64,
    pub mean_range: f64,
}

pub fn summarize(results: &[[RewardBreakdown; NUM_AGENTS]]) -> Option<BatchSummary> {
    let count = results.len() * NUM_AGENTS;
    if count == 0 {
        return None;
    }
    let mut summary = BatchSummary {
        count,
        mean_total: 0.0,
        min_total: f64::INFINITY,
        max_total: f64::NEG_INFINITY,
        mean_orientation: 0.0,
        mean_range: 0.0,
    };
    for b in results.iter().flatten() {
        summary.mean_total += b.total;
        summary.min_total = summary.min_total.min(b.total);
        summary.max_total = summary.max_total.max(b.total);
        summary.mean_orientation += b.orientation;
        summary.mean_range += b.range;
    }
    let n = count as f64;
    summary.mean_total /= n;
    summary.mean_orientation /= n;
    summary.mean_range /= n;
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;

    #[test]
    fn test_batch_matches_sequential() {
        let origin = GeoOrigin::default();
        let engine = RewardEngine::new(RewardConfig::default()).unwrap();
        let pairs = scenario::seeded_encounters(11, 64, &origin);
        let results = evaluate_batch(&engine, &origin, &pairs);
        assert_eq!(results.len(), pairs.len());
        for (states, result) in pairs.iter().zip(results.iter()) {
            let a = KinematicFeature::from_state(&states[0], &origin);
            let b = KinematicFeature::from_state(&states[1], &origin);
            assert_eq!(result[0], engine.evaluate_features(&a, &b));
            assert_eq!(result[1], engine.evaluate_features(&b, &a));
        }
    }

    #[test]
    fn test_summary() {
        assert_eq!(summarize(&[]), None);

        let origin = GeoOrigin::default();
        let engine = RewardEngine::new(RewardConfig::default()).unwrap();
        let pairs = [scenario::tail_chase(&origin, 3.0, 20_000.0, 800.0)];
        let results = evaluate_batch(&engine, &origin, &pairs);
        let summary = summarize(&results).unwrap();
        assert_eq!(summary.count, 2);
        assert!((summary.max_total - 1.5).abs() < 1e-6);
        assert!(summary.min_total < summary.max_total);
        assert!((summary.mean_range - 1.0).abs() < 1e-12);
        let mean = (results[0][0].total + results[0][1].total) / 2.0;
        assert!((summary.mean_total - mean).abs() < 1e-12);
    }
}
