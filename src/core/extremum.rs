use crate::domain::model::{AggregatedLayerResult, Extremum};

/// Layer with the highest mean RP. Ties go to the shallowest layer, which is the
/// first one in canonical order. `None` for an empty input.
pub fn find_max(results: &[AggregatedLayerResult]) -> Option<Extremum> {
    let mut best: Option<&AggregatedLayerResult> = None;

    for result in results {
        match best {
            Some(current) if result.mean_rp_mpa <= current.mean_rp_mpa => {}
            _ => best = Some(result),
        }
    }

    best.map(|result| Extremum {
        layer: result.layer.clone(),
        rp_mpa: result.mean_rp_mpa,
    })
}
