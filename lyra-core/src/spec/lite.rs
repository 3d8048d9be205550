/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
//! The minimal Vega-Lite specification synthesized for a single mark.
use lyra_common::datatypes::MeasureType;
use lyra_common::error::{LyraError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteSpec {
    pub mark: LiteMark,

    #[serde(default)]
    pub data: LiteDataSpec,

    #[serde(default)]
    pub encoding: HashMap<String, ChannelDefSpec>,

    #[serde(default)]
    pub config: LiteConfigSpec,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl LiteSpec {
    pub fn new(mark: LiteMark) -> Self {
        Self {
            mark,
            data: Default::default(),
            encoding: Default::default(),
            config: Default::default(),
            extra: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteMark {
    Bar,
    Point,
    Text,
    Line,
    Area,
}

impl LiteMark {
    /// Vega-Lite mark for a Vega mark type
    pub fn from_vega_type(mark_type: &str) -> Result<Self> {
        Ok(match mark_type {
            "rect" => LiteMark::Bar,
            "symbol" => LiteMark::Point,
            "text" => LiteMark::Text,
            "line" => LiteMark::Line,
            "area" => LiteMark::Area,
            _ => {
                return Err(LyraError::unknown_mark_type(format!(
                    "No Vega-Lite mark corresponds to Vega mark type {mark_type:?}"
                )))
            }
        })
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteDataSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDefSpec {
    #[serde(rename = "type")]
    pub type_: MeasureType,

    pub field: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateOpSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<bool>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteConfigSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellConfigSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<MarkConfigSpec>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellConfigSpec {
    pub width: f64,
    pub height: f64,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkConfigSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled: Option<bool>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOpSpec {
    Values,
    Count,
    Valid,
    Missing,
    Distinct,
    Sum,
    Mean,
    Average,
    Variance,
    Variancep,
    Stdev,
    Stdevp,
    Median,
    Q1,
    Q3,
    Modeskew,
    Min,
    Max,
    Argmin,
    Argmax,
}

impl AggregateOpSpec {
    pub const ALL: [AggregateOpSpec; 20] = [
        AggregateOpSpec::Values,
        AggregateOpSpec::Count,
        AggregateOpSpec::Valid,
        AggregateOpSpec::Missing,
        AggregateOpSpec::Distinct,
        AggregateOpSpec::Sum,
        AggregateOpSpec::Mean,
        AggregateOpSpec::Average,
        AggregateOpSpec::Variance,
        AggregateOpSpec::Variancep,
        AggregateOpSpec::Stdev,
        AggregateOpSpec::Stdevp,
        AggregateOpSpec::Median,
        AggregateOpSpec::Q1,
        AggregateOpSpec::Q3,
        AggregateOpSpec::Modeskew,
        AggregateOpSpec::Min,
        AggregateOpSpec::Max,
        AggregateOpSpec::Argmin,
        AggregateOpSpec::Argmax,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggregateOpSpec::Values => "values",
            AggregateOpSpec::Count => "count",
            AggregateOpSpec::Valid => "valid",
            AggregateOpSpec::Missing => "missing",
            AggregateOpSpec::Distinct => "distinct",
            AggregateOpSpec::Sum => "sum",
            AggregateOpSpec::Mean => "mean",
            AggregateOpSpec::Average => "average",
            AggregateOpSpec::Variance => "variance",
            AggregateOpSpec::Variancep => "variancep",
            AggregateOpSpec::Stdev => "stdev",
            AggregateOpSpec::Stdevp => "stdevp",
            AggregateOpSpec::Median => "median",
            AggregateOpSpec::Q1 => "q1",
            AggregateOpSpec::Q3 => "q3",
            AggregateOpSpec::Modeskew => "modeskew",
            AggregateOpSpec::Min => "min",
            AggregateOpSpec::Max => "max",
            AggregateOpSpec::Argmin => "argmin",
            AggregateOpSpec::Argmax => "argmax",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}
