use crate::domain::model::Extremum;
use serde::Serialize;

/// Working depth goes this far below the compacted layer.
pub const DEPTH_MARGIN_CM: f64 = 5.0;
/// Working depth as a multiple of tine tip width.
pub const TIP_DEPTH_FACTOR: (f64, f64) = (5.0, 7.0);
/// Shank spacing as a multiple of working depth.
pub const SPACING_WITHOUT_WINGS: (f64, f64) = (1.0, 1.5);
pub const SPACING_WITH_WINGS: (f64, f64) = (1.5, 2.0);
pub const OPERATING_SPEED_KMH: (f64, f64) = (4.0, 6.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsoilingAdvice {
    pub compacted_layer: String,
    pub peak_rp_mpa: f64,
    pub working_depth_cm: f64,
    pub tip_width_cm: Option<f64>,
    pub depth_range_for_tip_cm: Option<(f64, f64)>,
    pub spacing_without_wings_cm: (f64, f64),
    pub spacing_with_wings_cm: (f64, f64),
    pub speed_kmh: (f64, f64),
}

impl SubsoilingAdvice {
    /// Advice for breaking the layer that holds the RP peak.
    pub fn for_peak(peak: &Extremum, tip_width_cm: Option<f64>) -> Self {
        let working_depth_cm = f64::from(peak.layer.bottom_cm) + DEPTH_MARGIN_CM;
        let scale = |(low, high): (f64, f64), base: f64| (low * base, high * base);

        Self {
            compacted_layer: peak.layer.label.clone(),
            peak_rp_mpa: peak.rp_mpa,
            working_depth_cm,
            tip_width_cm,
            depth_range_for_tip_cm: tip_width_cm.map(|width| scale(TIP_DEPTH_FACTOR, width)),
            spacing_without_wings_cm: scale(SPACING_WITHOUT_WINGS, working_depth_cm),
            spacing_with_wings_cm: scale(SPACING_WITH_WINGS, working_depth_cm),
            speed_kmh: OPERATING_SPEED_KMH,
        }
    }

    /// Printable tips, one per line.
    pub fn tips(&self) -> Vec<String> {
        let mut tips = vec![format!(
            "1. Work about {:.0} cm deep, 5 cm below the compacted layer ({} cm, {:.2} MPa).",
            self.working_depth_cm, self.compacted_layer, self.peak_rp_mpa
        )];

        match (self.tip_width_cm, self.depth_range_for_tip_cm) {
            (Some(width), Some((low, high))) => tips.push(format!(
                "   With a {:.1} cm tip, P = (5 to 7) x b gives {:.0} to {:.0} cm.",
                width, low, high
            )),
            _ => tips.push(
                "   Check against P = (5 to 7) x tip width (b), e.g. a 7 cm tip gives 35 to 49 cm."
                    .to_string(),
            ),
        }

        tips.push(format!(
            "2. Shank spacing: {:.0} to {:.0} cm for tips without wings, {:.0} to {:.0} cm with wings.",
            self.spacing_without_wings_cm.0,
            self.spacing_without_wings_cm.1,
            self.spacing_with_wings_cm.0,
            self.spacing_with_wings_cm.1
        ));
        tips.push(format!(
            "3. Keep the operating speed between {:.0} and {:.0} km/h.",
            self.speed_kmh.0, self.speed_kmh.1
        ));
        tips.push(
            "4. Subsoil with the soil slightly moist so the compacted layer breaks up cleanly."
                .to_string(),
        );
        tips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layer::Layer;

    fn peak(label: &str, rp: f64) -> Extremum {
        Extremum {
            layer: Layer::parse(label).unwrap(),
            rp_mpa: rp,
        }
    }

    #[test]
    fn test_working_depth_below_peak_layer() {
        let advice = SubsoilingAdvice::for_peak(&peak("30-35", 4.2), None);

        assert_eq!(advice.working_depth_cm, 40.0);
        assert_eq!(advice.spacing_without_wings_cm, (40.0, 60.0));
        assert_eq!(advice.spacing_with_wings_cm, (60.0, 80.0));
        assert_eq!(advice.depth_range_for_tip_cm, None);
    }

    #[test]
    fn test_tip_width_depth_range() {
        let advice = SubsoilingAdvice::for_peak(&peak("10-15", 2.0), Some(7.0));

        assert_eq!(advice.depth_range_for_tip_cm, Some((35.0, 49.0)));
        let tips = advice.tips();
        assert_eq!(tips.len(), 5);
        assert!(tips[1].contains("35 to 49 cm"));
    }
}
