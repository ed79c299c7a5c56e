use crate::core::aggregate::{aggregate, overall_mean, point_profiles};
use crate::core::extremum::find_max;
use crate::core::reduction::pair_reductions;
use crate::domain::layer::LayerSet;
use crate::domain::model::{
    AnalysisMode, ComparisonReport, ComparisonRow, Condition, ProfileReport, ProfileRow, Reading,
    Report,
};
use crate::utils::error::{Result, RmspError};

pub fn assemble(mode: AnalysisMode, layers: &LayerSet, readings: &[Reading]) -> Result<Report> {
    match mode {
        AnalysisMode::Profile => assemble_profile(layers, readings).map(Report::Profile),
        AnalysisMode::Comparison => assemble_comparison(layers, readings).map(Report::Comparison),
    }
}

/// Single-condition table: mean RP per layer and the peak layer.
pub fn assemble_profile(layers: &LayerSet, readings: &[Reading]) -> Result<ProfileReport> {
    let aggregated = aggregate(layers, readings);
    let max = find_max(&aggregated).ok_or_else(|| RmspError::EmptyInputError {
        message: "no layer received a reading".to_string(),
    })?;
    let overall_mean_rp_mpa = overall_mean(&aggregated).unwrap_or_default();

    let rows = aggregated
        .into_iter()
        .map(|result| ProfileRow {
            depth_cm: result.layer.depth_cm(),
            layer: result.layer.label,
            mean_rp_mpa: result.mean_rp_mpa,
            points: result.readings,
        })
        .collect();

    Ok(ProfileReport {
        rows,
        max,
        overall_mean_rp_mpa,
        points: point_profiles(layers, readings),
    })
}

/// Before/after table. Only layers measured in both conditions get a row.
pub fn assemble_comparison(layers: &LayerSet, readings: &[Reading]) -> Result<ComparisonReport> {
    let before = aggregate(layers, by_condition(readings, Condition::Before));
    let after = aggregate(layers, by_condition(readings, Condition::After));

    let paired = pair_reductions(&before, &after);
    if paired.is_empty() {
        return Err(RmspError::EmptyInputError {
            message: "no layer has both before and after readings".to_string(),
        });
    }

    let max_before = find_max(&before).ok_or_else(|| RmspError::EmptyInputError {
        message: "no readings before subsoiling".to_string(),
    })?;

    let unpaired_layers: Vec<String> = layers
        .iter()
        .filter(|layer| {
            let in_before = before.iter().any(|r| &r.layer == *layer);
            let in_after = after.iter().any(|r| &r.layer == *layer);
            in_before != in_after
        })
        .map(|layer| layer.label.clone())
        .collect();
    if !unpaired_layers.is_empty() {
        tracing::warn!(
            "Layers measured in only one condition are left out of the comparison: {}",
            unpaired_layers.join(", ")
        );
    }

    let rows: Vec<ComparisonRow> = paired
        .into_iter()
        .map(|result| ComparisonRow {
            depth_cm: result.layer.depth_cm(),
            layer: result.layer.label,
            mean_rp_before_mpa: result.rp_before_mpa,
            mean_rp_after_mpa: result.rp_after_mpa,
            reduction_percent: result.reduction_percent,
        })
        .collect();

    // 總平均只取兩種狀態都有量測的深度
    let count = rows.len() as f64;
    let overall_mean_rp_before_mpa =
        rows.iter().map(|row| row.mean_rp_before_mpa).sum::<f64>() / count;
    let overall_mean_rp_after_mpa =
        rows.iter().map(|row| row.mean_rp_after_mpa).sum::<f64>() / count;

    Ok(ComparisonReport {
        overall_mean_rp_before_mpa,
        overall_mean_rp_after_mpa,
        rows,
        max_before,
        unpaired_layers,
    })
}

fn by_condition(readings: &[Reading], condition: Condition) -> impl Iterator<Item = &Reading> {
    readings
        .iter()
        .filter(move |reading| reading.condition == Some(condition))
}
