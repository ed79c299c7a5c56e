use crate::domain::layer::LayerSet;
use crate::domain::model::{AggregatedLayerResult, PointProfile, Reading};

/// Mean RP per layer across every sampling point.
///
/// Output follows `layers` order whatever the input order is. Layers without readings
/// are left out, and readings whose layer is not in `layers` are ignored.
pub fn aggregate<'a, I>(layers: &LayerSet, readings: I) -> Vec<AggregatedLayerResult>
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut totals = vec![(0.0_f64, 0_usize); layers.len()];

    for reading in readings {
        if let Some(index) = layers.position(&reading.layer.label) {
            totals[index].0 += reading.rp_mpa;
            totals[index].1 += 1;
        }
    }

    layers
        .iter()
        .zip(totals)
        .filter(|(_, (_, count))| *count > 0)
        .map(|(layer, (sum, count))| AggregatedLayerResult {
            layer: layer.clone(),
            mean_rp_mpa: sum / count as f64,
            readings: count,
        })
        .collect()
}

/// RP profile of each sampling point, points in first-seen order.
pub fn point_profiles<'a, I>(layers: &LayerSet, readings: I) -> Vec<PointProfile>
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut points: Vec<String> = Vec::new();
    let readings: Vec<&Reading> = readings.into_iter().collect();

    for reading in &readings {
        if !points.contains(&reading.point) {
            points.push(reading.point.clone());
        }
    }

    points
        .into_iter()
        .map(|point| {
            let own: Vec<&Reading> = readings
                .iter()
                .copied()
                .filter(|r| r.point == point)
                .collect();
            let values = aggregate(layers, own)
                .into_iter()
                .map(|result| (result.layer, result.mean_rp_mpa))
                .collect();
            PointProfile { point, values }
        })
        .collect()
}

/// Mean of the per-layer means, `None` when nothing was aggregated.
pub fn overall_mean(results: &[AggregatedLayerResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let sum: f64 = results.iter().map(|r| r.mean_rp_mpa).sum();
    Some(sum / results.len() as f64)
}
