use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl LegendSpec {
    /// Scales referenced by this legend, in fill, stroke, size, shape, opacity order
    pub fn scales(&self) -> Vec<String> {
        [
            &self.fill,
            &self.stroke,
            &self.size,
            &self.shape,
            &self.opacity,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}
