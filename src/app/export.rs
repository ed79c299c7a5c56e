//! Renders a computed report into the files handed to downstream tools: a CSV table,
//! the full JSON structure, a printable text report and chart series.

use crate::core::advice::SubsoilingAdvice;
use crate::domain::model::{ComparisonReport, ProfileReport, Report};
use crate::utils::error::{Result, RmspError};
use chrono::NaiveDate;
use serde::Serialize;

pub const HEADING: &str = "SOIL MECHANICAL PENETRATION RESISTANCE (RMSP)";

#[derive(Debug, Serialize)]
struct ChartPoint<'a> {
    series: &'a str,
    depth_cm: u32,
    rp_mpa: f64,
}

pub fn render_csv(report: &Report) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    match report {
        Report::Profile(profile) => {
            for row in &profile.rows {
                writer.serialize(row)?;
            }
        }
        Report::Comparison(comparison) => {
            for row in &comparison.rows {
                writer.serialize(row)?;
            }
        }
    }
    finish(writer)
}

pub fn render_json(report: &Report, advice: &SubsoilingAdvice) -> Result<String> {
    let document = serde_json::json!({
        "report": report,
        "advice": advice,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Depth/RP series for plotting, depth taken from each layer's top.
pub fn render_chart(report: &Report) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    match report {
        Report::Profile(profile) => {
            for row in &profile.rows {
                writer.serialize(ChartPoint {
                    series: "mean",
                    depth_cm: row.depth_cm,
                    rp_mpa: row.mean_rp_mpa,
                })?;
            }
            for point in &profile.points {
                for (layer, rp_mpa) in &point.values {
                    writer.serialize(ChartPoint {
                        series: &point.point,
                        depth_cm: layer.depth_cm(),
                        rp_mpa: *rp_mpa,
                    })?;
                }
            }
        }
        Report::Comparison(comparison) => {
            for row in &comparison.rows {
                writer.serialize(ChartPoint {
                    series: "before",
                    depth_cm: row.depth_cm,
                    rp_mpa: row.mean_rp_before_mpa,
                })?;
            }
            for row in &comparison.rows {
                writer.serialize(ChartPoint {
                    series: "after",
                    depth_cm: row.depth_cm,
                    rp_mpa: row.mean_rp_after_mpa,
                })?;
            }
        }
    }
    finish(writer)
}

pub fn render_text(
    report: &Report,
    advice: &SubsoilingAdvice,
    title: &str,
    exported_on: NaiveDate,
) -> String {
    let subtitle = match report {
        Report::Profile(_) => "Soil compaction profile report",
        Report::Comparison(_) => "Soil compaction report before and after subsoiling",
    };
    let mut lines = vec![
        HEADING.to_string(),
        title.to_string(),
        subtitle.to_string(),
        format!("Export date: {}", exported_on.format("%Y-%m-%d")),
        String::new(),
    ];

    match report {
        Report::Profile(profile) => lines.extend(profile_lines(profile)),
        Report::Comparison(comparison) => lines.extend(comparison_lines(comparison)),
    }

    lines.push(String::new());
    lines.push("Subsoiling tips".to_string());
    lines.extend(advice.tips());

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn profile_lines(profile: &ProfileReport) -> Vec<String> {
    let mut lines = vec![
        format!("Mean RP (MPa): {:.2}", profile.overall_mean_rp_mpa),
        format!(
            "Max RP (MPa): {:.2} at {} cm",
            profile.max.rp_mpa, profile.max.layer
        ),
        String::new(),
        "Results".to_string(),
        format!("{:<12}{:>16}{:>10}", "Layer (cm)", "Mean RP (MPa)", "Points"),
    ];
    for row in &profile.rows {
        lines.push(format!(
            "{:<12}{:>16.2}{:>10}",
            row.layer, row.mean_rp_mpa, row.points
        ));
    }
    lines
}

fn comparison_lines(comparison: &ComparisonReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Mean RP before (MPa): {:.2}",
            comparison.overall_mean_rp_before_mpa
        ),
        format!(
            "Mean RP after (MPa): {:.2}",
            comparison.overall_mean_rp_after_mpa
        ),
        String::new(),
        "Results".to_string(),
        format!(
            "{:<12}{:>20}{:>20}{:>15}",
            "Layer (cm)", "RP before (MPa)", "RP after (MPa)", "Reduction (%)"
        ),
    ];
    for row in &comparison.rows {
        lines.push(format!(
            "{:<12}{:>20.2}{:>20.2}{:>15.2}",
            row.layer, row.mean_rp_before_mpa, row.mean_rp_after_mpa, row.reduction_percent
        ));
    }
    if !comparison.unpaired_layers.is_empty() {
        lines.push(format!(
            "Not compared (one condition only): {}",
            comparison.unpaired_layers.join(", ")
        ));
    }
    lines
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| RmspError::ProcessingError {
        message: format!("failed to flush CSV output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| RmspError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::assemble;
    use crate::core::rp::rp;
    use crate::domain::layer::LayerSet;
    use crate::domain::model::{AnalysisMode, Condition, Reading};

    fn comparison_report() -> Report {
        let layers = LayerSet::default();
        let reading = |layer: &str, condition: Condition, impacts: u32| Reading {
            point: "P1".to_string(),
            layer: layers.get(layer).unwrap().clone(),
            condition: Some(condition),
            impacts,
            rp_mpa: rp(impacts),
        };
        let readings = vec![
            reading("0-5", Condition::Before, 10),
            reading("0-5", Condition::After, 5),
            reading("5-10", Condition::Before, 0),
            reading("5-10", Condition::After, 0),
        ];
        assemble(AnalysisMode::Comparison, &layers, &readings).unwrap()
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let csv = render_csv(&comparison_report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "layer,depth_cm,mean_rp_before_mpa,mean_rp_after_mpa,reduction_percent"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0-5,0,"));
    }

    #[test]
    fn test_chart_series_per_condition() {
        let chart = render_chart(&comparison_report()).unwrap();
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0], "series,depth_cm,rp_mpa");
        assert_eq!(lines.iter().filter(|l| l.starts_with("before,")).count(), 2);
        assert_eq!(lines.iter().filter(|l| l.starts_with("after,")).count(), 2);
    }

    #[test]
    fn test_text_report_sections() {
        let report = comparison_report();
        let advice = SubsoilingAdvice::for_peak(report.peak(), None);
        let date = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();

        let text = render_text(&report, &advice, "Field 7", date);

        assert!(text.starts_with(HEADING));
        assert!(text.contains("Export date: 2024-08-15"));
        assert!(text.contains("Mean RP before (MPa): "));
        assert!(text.contains("Subsoiling tips"));
        assert!(text.contains("0-5"));
    }

    #[test]
    fn test_text_report_line_layout() {
        let report = comparison_report();
        let advice = SubsoilingAdvice::for_peak(report.peak(), None);
        let date = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();

        let text = render_text(&report, &advice, "Field 7", date);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "Field 7");
        assert_eq!(
            lines[2],
            "Soil compaction report before and after subsoiling"
        );
        let results = lines.iter().position(|l| *l == "Results").unwrap();
        assert!(lines[results + 2].starts_with("0-5"));
        assert!(lines[results + 3].starts_with("5-10"));
        assert_eq!(lines.last().copied(), advice.tips().last().map(String::as_str));
    }

    #[test]
    fn test_json_wraps_report_and_advice() {
        let report = comparison_report();
        let advice = SubsoilingAdvice::for_peak(report.peak(), Some(7.0));

        let json: serde_json::Value =
            serde_json::from_str(&render_json(&report, &advice).unwrap()).unwrap();

        assert_eq!(json["report"]["mode"], "comparison");
        assert_eq!(json["advice"]["compacted_layer"], "0-5");
        assert_eq!(json["report"]["rows"].as_array().unwrap().len(), 2);
    }
}
