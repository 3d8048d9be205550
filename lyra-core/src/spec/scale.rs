/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::spec::values::SignalExpressionSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSpec {
    pub name: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<ScaleDomainSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ScaleRangeSpec>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleDomainSpec {
    FieldReference(ScaleDataReferenceSpec),
    FieldsReference(ScaleDataReferencesSpec),
    Signal(SignalExpressionSpec),
    Array(Vec<Value>),
    Value(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDataReferencesSpec {
    pub fields: Vec<ScaleDataReferenceSpec>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDataReferenceSpec {
    pub data: String,
    pub field: Value,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleRangeSpec {
    Signal(SignalExpressionSpec),
    Array(Vec<Value>),
    Value(Value),
}

impl ScaleRangeSpec {
    /// Whether this range is exactly `[0, extent]` for the given plotting-surface extent.
    ///
    /// Compiled ranges sized from the configured cell are hardcoded by the compiler rather
    /// than derived from a guide, so extraction stages swap them for a reference to the
    /// mark's group dimensions.
    pub fn is_cell_extent(&self, extent: f64) -> bool {
        match self {
            ScaleRangeSpec::Array(values) => {
                let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
                numbers.len() == 2
                    && values.len() == 2
                    && ((numbers[0] == 0.0 && numbers[1] == extent)
                        || (numbers[0] == extent && numbers[1] == 0.0))
            }
            _ => false,
        }
    }
}
