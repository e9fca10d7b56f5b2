use aircombat_shared::*;
use aircombat_sim::scenario::seeded_encounters;
use aircombat_sim::{evaluate_batch, summarize, BatchSummary, RewardEngine};

/// Reward statistics for one (orientation, range) version pair.
struct VersionRow {
    orientation: ShapingVersion,
    range: ShapingVersion,
    summary: BatchSummary,
}

fn evaluate_versions(
    config: &RewardConfig,
    orientation: ShapingVersion,
    range: ShapingVersion,
    origin: &GeoOrigin,
    pairs: &[[AircraftState; NUM_AGENTS]],
) -> Result<Option<VersionRow>, ConfigError> {
    let engine = RewardEngine::new(RewardConfig {
        orientation_version: orientation,
        range_version: range,
        ..*config
    })?;
    let results = evaluate_batch(&engine, origin, pairs);
    Ok(summarize(&results).map(|summary| VersionRow {
        orientation,
        range,
        summary,
    }))
}

/// Sample `count` random encounters and report posture reward statistics,
/// either for the configured versions or for every version pair.
pub fn cmd_sample(config: &TaskConfig, seed: u64, count: usize, all_versions: bool) -> Result<(), ConfigError> {
    let origin = config.origin;
    let shaping = config.posture.shaping;
    let pairs = seeded_encounters(seed, count, &origin);

    println!("Sampled {} encounters (seed={})", pairs.len(), seed);

    let grid: Vec<(ShapingVersion, ShapingVersion)> = if all_versions {
        ShapingVersion::ALL
            .iter()
            .flat_map(|&o| ShapingVersion::ALL.iter().map(move |&r| (o, r)))
            .collect()
    } else {
        vec![(shaping.orientation_version, shaping.range_version)]
    };

    let mut rows = Vec::with_capacity(grid.len());
    for (orientation, range) in grid {
        if let Some(row) = evaluate_versions(&shaping, orientation, range, &origin, &pairs)? {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        println!("Nothing to evaluate.");
        return Ok(());
    }

    println!();
    println!(
        "{:<5} {:<5} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "orn", "range", "samples", "mean", "min", "max", "mean_orn", "mean_rng"
    );
    println!("{:-<5} {:-<5} {:-<8} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}", "", "", "", "", "", "", "", "");
    for row in &rows {
        let s = &row.summary;
        println!(
            "{:<5} {:<5} {:>8} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            row.orientation, row.range, s.count, s.mean_total, s.min_total, s.max_total, s.mean_orientation, s.mean_range
        );
    }
    Ok(())
}
