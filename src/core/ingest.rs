use crate::core::rp::{parse_impacts, rp};
use crate::domain::layer::LayerSet;
use crate::domain::model::{AnalysisMode, Condition, RawReading, Reading};
use crate::utils::error::{Result, RmspError};
use std::collections::HashSet;

/// Validates raw rows and converts them to RP.
///
/// Any invalid row aborts the whole batch; a report is never built from part of the
/// input.
pub fn convert_readings(
    raw: Vec<RawReading>,
    layers: &LayerSet,
    mode: AnalysisMode,
    max_points: usize,
) -> Result<Vec<Reading>> {
    if raw.is_empty() {
        return Err(RmspError::EmptyInputError {
            message: "the input contains no readings".to_string(),
        });
    }

    let points: HashSet<&str> = raw
        .iter()
        .map(|row| row.point.trim())
        .filter(|point| !point.is_empty())
        .collect();
    if points.len() > max_points {
        return Err(RmspError::TooManyPointsError {
            count: points.len(),
            max: max_points,
        });
    }
    let point_count = points.len();

    let mut seen: HashSet<(String, String, Option<Condition>)> = HashSet::new();
    let mut readings = Vec::with_capacity(raw.len());

    for row in raw {
        let point = row.point.trim().to_string();
        if point.is_empty() {
            return Err(RmspError::EmptyInputError {
                message: format!("reading for layer {} has no sampling point", row.layer),
            });
        }

        let layer = layers
            .get(&row.layer)
            .cloned()
            .ok_or_else(|| RmspError::UnknownLayerError {
                point: point.clone(),
                layer: row.layer.clone(),
            })?;

        let condition = parse_condition(&point, &layer.label, row.condition.as_deref(), mode)?;

        let impacts = parse_impacts(&row.impacts).ok_or_else(|| RmspError::InvalidImpactError {
            point: point.clone(),
            layer: layer.label.clone(),
            value: row.impacts.clone(),
        })?;

        if !seen.insert((point.clone(), layer.label.clone(), condition)) {
            return Err(RmspError::DuplicateReadingError {
                point,
                layer: layer.label,
                condition: condition
                    .map(|c| format!(" ({})", c))
                    .unwrap_or_default(),
            });
        }

        readings.push(Reading {
            point,
            layer,
            condition,
            impacts,
            rp_mpa: rp(impacts),
        });
    }

    tracing::debug!(
        "Converted {} readings from {} sampling points",
        readings.len(),
        point_count
    );

    Ok(readings)
}

fn parse_condition(
    point: &str,
    layer: &str,
    raw: Option<&str>,
    mode: AnalysisMode,
) -> Result<Option<Condition>> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty());
    let invalid = |value: &str, reason: String| RmspError::InvalidConditionError {
        point: point.to_string(),
        layer: layer.to_string(),
        value: value.to_string(),
        reason,
    };

    match (mode, raw) {
        (AnalysisMode::Profile, None) => Ok(None),
        (AnalysisMode::Profile, Some(value)) => Err(invalid(
            value,
            "profile mode takes a single condition; use comparison mode for before/after data"
                .to_string(),
        )),
        (AnalysisMode::Comparison, None) => Err(invalid(
            "",
            "comparison mode needs every reading marked before or after".to_string(),
        )),
        (AnalysisMode::Comparison, Some(value)) => value
            .parse::<Condition>()
            .map(Some)
            .map_err(|reason| invalid(value, reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(point: &str, layer: &str, condition: Option<&str>, impacts: &str) -> RawReading {
        RawReading {
            point: point.to_string(),
            layer: layer.to_string(),
            condition: condition.map(str::to_string),
            impacts: impacts.to_string(),
        }
    }

    #[test]
    fn test_converts_valid_profile() {
        let layers = LayerSet::default();
        let readings = convert_readings(
            vec![raw("P1", "0-5", None, "3"), raw("P1", "5 - 10", Some(""), "4")],
            &layers,
            AnalysisMode::Profile,
            5,
        )
        .unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].layer.label, "5-10");
        assert_eq!(readings[1].rp_mpa, rp(4));
        assert_eq!(readings[1].condition, None);
    }

    #[test]
    fn test_non_numeric_impact_names_layer() {
        let layers = LayerSet::default();
        let err = convert_readings(
            vec![raw("P1", "0-5", None, "3"), raw("P1", "10-15", None, "x")],
            &layers,
            AnalysisMode::Profile,
            5,
        )
        .unwrap_err();

        match err {
            RmspError::InvalidImpactError { layer, value, .. } => {
                assert_eq!(layer, "10-15");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_layer_and_duplicates() {
        let layers = LayerSet::default();
        assert!(matches!(
            convert_readings(vec![raw("P1", "50-55", None, "1")], &layers, AnalysisMode::Profile, 5),
            Err(RmspError::UnknownLayerError { .. })
        ));
        assert!(matches!(
            convert_readings(
                vec![raw("P1", "0-5", None, "1"), raw("P1", "0-5", None, "2")],
                &layers,
                AnalysisMode::Profile,
                5
            ),
            Err(RmspError::DuplicateReadingError { .. })
        ));
    }

    #[test]
    fn test_same_layer_allowed_once_per_condition() {
        let layers = LayerSet::default();
        let readings = convert_readings(
            vec![
                raw("P1", "0-5", Some("before"), "6"),
                raw("P1", "0-5", Some("after"), "2"),
            ],
            &layers,
            AnalysisMode::Comparison,
            1,
        )
        .unwrap();

        assert_eq!(readings[0].condition, Some(Condition::Before));
        assert_eq!(readings[1].condition, Some(Condition::After));
    }

    #[test]
    fn test_condition_must_match_mode() {
        let layers = LayerSet::default();
        assert!(matches!(
            convert_readings(vec![raw("P1", "0-5", Some("before"), "1")], &layers, AnalysisMode::Profile, 5),
            Err(RmspError::InvalidConditionError { .. })
        ));
        assert!(matches!(
            convert_readings(vec![raw("P1", "0-5", None, "1")], &layers, AnalysisMode::Comparison, 5),
            Err(RmspError::InvalidConditionError { .. })
        ));
    }

    #[test]
    fn test_point_limit_and_empty_input() {
        let layers = LayerSet::default();
        assert!(matches!(
            convert_readings(
                vec![raw("P1", "0-5", None, "1"), raw("P2", "0-5", None, "1")],
                &layers,
                AnalysisMode::Profile,
                1
            ),
            Err(RmspError::TooManyPointsError { count: 2, max: 1 })
        ));
        let five_points = ["P1", "P2", "P3", "P4", "P5"]
            .iter()
            .map(|point| raw(point, "0-5", None, "1"))
            .collect();
        match convert_readings(five_points, &layers, AnalysisMode::Profile, 2).unwrap_err() {
            err @ RmspError::TooManyPointsError { .. } => {
                assert_eq!(err.to_string(), "5 sampling points found, at most 2 allowed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            convert_readings(Vec::new(), &layers, AnalysisMode::Profile, 1),
            Err(RmspError::EmptyInputError { .. })
        ));
    }
}
