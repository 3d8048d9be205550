use crate::data::dataset::DatasetId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub type MarkId = u32;

/// The pipeline a mark is driven by: a dataset, or an upstream mark
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkFrom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DatasetId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<MarkId>,
}

impl MarkFrom {
    pub fn dataset(id: DatasetId) -> Self {
        Self {
            data: Some(id),
            mark: None,
        }
    }
}

/// Snapshot of a mark in the application state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkState {
    pub id: MarkId,

    /// Vega mark type (rect, symbol, text, line, area, ...)
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<MarkFrom>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Read access to the application state
pub trait VisState {
    fn mark(&self, id: MarkId) -> Option<MarkState>;
}
