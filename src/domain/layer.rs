use crate::utils::error::{Result, RmspError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 土壤深度區間，例如 "0-5" 代表 0 到 5 公分
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer {
    pub label: String,
    pub top_cm: u32,
    pub bottom_cm: u32,
}

impl Layer {
    /// Parses a `top-bottom` label in centimetres. Whitespace around the numbers is
    /// accepted; the stored label is normalised to `top-bottom`.
    pub fn parse(label: &str) -> Result<Self> {
        let invalid = |reason: &str| RmspError::InvalidConfigValueError {
            field: "layers".to_string(),
            value: label.to_string(),
            reason: reason.to_string(),
        };

        let (top, bottom) = label
            .split_once('-')
            .ok_or_else(|| invalid("Layer must be written as top-bottom, e.g. 0-5"))?;
        let top_cm: u32 = top
            .trim()
            .parse()
            .map_err(|_| invalid("Layer top depth is not a whole number of centimetres"))?;
        let bottom_cm: u32 = bottom
            .trim()
            .parse()
            .map_err(|_| invalid("Layer bottom depth is not a whole number of centimetres"))?;

        if top_cm >= bottom_cm {
            return Err(invalid("Layer top depth must be above its bottom depth"));
        }

        Ok(Self {
            label: format!("{}-{}", top_cm, bottom_cm),
            top_cm,
            bottom_cm,
        })
    }

    /// Starting depth, used as the plotting ordinate.
    pub fn depth_cm(&self) -> u32 {
        self.top_cm
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Canonical, depth-ordered set of layers a survey is recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSet {
    layers: Vec<Layer>,
}

impl LayerSet {
    pub const DEFAULT_STEP_CM: u32 = 5;
    pub const DEFAULT_MAX_DEPTH_CM: u32 = 50;

    pub fn new<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let layers = labels
            .iter()
            .map(|label| Layer::parse(label.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_layers(layers)
    }

    pub fn from_layers(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(RmspError::InvalidConfigValueError {
                field: "layers".to_string(),
                value: String::new(),
                reason: "At least one layer is required".to_string(),
            });
        }

        // 必須依深度遞增且互不重疊
        for pair in layers.windows(2) {
            if pair[1].top_cm < pair[0].bottom_cm {
                return Err(RmspError::InvalidConfigValueError {
                    field: "layers".to_string(),
                    value: format!("{}, {}", pair[0], pair[1]),
                    reason: "Layers must be listed by increasing depth without overlapping"
                        .to_string(),
                });
            }
        }

        Ok(Self { layers })
    }

    /// Contiguous layers of `step_cm` from the surface down to `max_depth_cm`.
    ///
    /// The profile depth must be a whole number of steps so no part of it is dropped.
    pub fn uniform(step_cm: u32, max_depth_cm: u32) -> Result<Self> {
        let invalid = |reason: &str| RmspError::InvalidConfigValueError {
            field: "layers".to_string(),
            value: format!("step {} / depth {}", step_cm, max_depth_cm),
            reason: reason.to_string(),
        };

        if step_cm == 0 || max_depth_cm < step_cm {
            return Err(invalid(
                "Step must be positive and not deeper than the profile",
            ));
        }
        if max_depth_cm % step_cm != 0 {
            return Err(invalid("Profile depth must be a multiple of the layer step"));
        }

        Self::from_layers(contiguous_layers(step_cm, max_depth_cm))
    }

    /// Canonical index of a label, tolerant of surrounding whitespace.
    pub fn position(&self, label: &str) -> Option<usize> {
        let wanted: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        self.layers.iter().position(|layer| layer.label == wanted)
    }

    pub fn get(&self, label: &str) -> Option<&Layer> {
        self.position(label).map(|index| &self.layers[index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.layers.iter().map(|layer| layer.label.clone()).collect()
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        Self {
            layers: contiguous_layers(Self::DEFAULT_STEP_CM, Self::DEFAULT_MAX_DEPTH_CM),
        }
    }
}

fn contiguous_layers(step_cm: u32, max_depth_cm: u32) -> Vec<Layer> {
    (0..max_depth_cm / step_cm)
        .map(|i| {
            let top_cm = i * step_cm;
            let bottom_cm = top_cm + step_cm;
            Layer {
                label: format!("{}-{}", top_cm, bottom_cm),
                top_cm,
                bottom_cm,
            }
        })
        .collect()
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
