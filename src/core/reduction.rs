use crate::domain::model::{AggregatedLayerResult, ReductionResult};

/// Percentage drop in RP from `rp_before` to `rp_after`.
///
/// A zero (or non-positive) baseline yields 0. Negative results mean RP went up and
/// are returned as is.
pub fn reduction(rp_before: f64, rp_after: f64) -> f64 {
    if rp_before > 0.0 {
        100.0 * (rp_before - rp_after) / rp_before
    } else {
        0.0
    }
}

/// Pairs before/after means by layer. Both inputs are in canonical order, so the
/// output is too; layers missing from either side are skipped.
pub fn pair_reductions(
    before: &[AggregatedLayerResult],
    after: &[AggregatedLayerResult],
) -> Vec<ReductionResult> {
    before
        .iter()
        .filter_map(|b| {
            after
                .iter()
                .find(|a| a.layer == b.layer)
                .map(|a| ReductionResult {
                    layer: b.layer.clone(),
                    rp_before_mpa: b.mean_rp_mpa,
                    rp_after_mpa: a.mean_rp_mpa,
                    reduction_percent: reduction(b.mean_rp_mpa, a.mean_rp_mpa),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layer::Layer;

    fn aggregated(label: &str, mean: f64) -> AggregatedLayerResult {
        AggregatedLayerResult {
            layer: Layer::parse(label).unwrap(),
            mean_rp_mpa: mean,
            readings: 1,
        }
    }

    #[test]
    fn test_reduction_basic() {
        assert_eq!(reduction(10.0, 5.0), 50.0);
        assert_eq!(reduction(5.0, 10.0), -100.0);
        assert_eq!(reduction(4.0, 4.0), 0.0);
    }

    #[test]
    fn test_reduction_zero_baseline() {
        assert_eq!(reduction(0.0, 0.0), 0.0);
        assert_eq!(reduction(0.0, 3.2), 0.0);
    }

    #[test]
    fn test_pair_reductions_skips_unpaired_layers() {
        let before = vec![aggregated("0-5", 4.0), aggregated("5-10", 2.0)];
        let after = vec![aggregated("5-10", 1.0), aggregated("10-15", 3.0)];

        let paired = pair_reductions(&before, &after);

        assert_eq!(paired.len(), 1);
        assert_eq!(paired[0].layer.label, "5-10");
        assert_eq!(paired[0].reduction_percent, 50.0);
    }
}
