/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::spec::lite::{AggregateOpSpec, ChannelDefSpec};
use itertools::Itertools;
use lyra_common::datatypes::MeasureType;
use lyra_common::error::{LyraError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref AGGREGATE_RE: Regex = Regex::new(&format!(
        "^({})_(.*?)$",
        AggregateOpSpec::ALL.iter().map(|op| op.name()).join("|")
    ))
    .unwrap();
    static ref BIN_RE: Regex = Regex::new(r"^(bin)_(.*?)(_start|_mid|_end)$").unwrap();
}

/// A field as offered by a dataset's schema.
///
/// Fields produced by an upstream aggregate or bin transform are flagged, and their name
/// encodes the operation: `<op>_<field>` for aggregates, `bin_<field>_<start|mid|end>` for
/// bins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(default)]
    pub aggregate: bool,

    #[serde(default)]
    pub bin: bool,

    pub mtype: MeasureType,
}

impl FieldDescriptor {
    pub fn new<S: Into<String>>(name: S, mtype: MeasureType) -> Self {
        Self {
            name: name.into(),
            aggregate: false,
            bin: false,
            mtype,
        }
    }

    pub fn aggregated<S: Into<String>>(name: S, mtype: MeasureType) -> Self {
        Self {
            aggregate: true,
            ..Self::new(name, mtype)
        }
    }

    pub fn binned<S: Into<String>>(name: S, mtype: MeasureType) -> Self {
        Self {
            bin: true,
            ..Self::new(name, mtype)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Aggregate(AggregateOpSpec),
    Bin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    pub op: Option<FieldOp>,
    pub field: String,
}

/// Recover the operation and source field of a derived field from its name
pub fn decode_field(field: &FieldDescriptor) -> Result<DecodedField> {
    let name = field.name.as_str();
    if field.aggregate {
        let captures = AGGREGATE_RE.captures(name).ok_or_else(|| {
            LyraError::pattern_decode(format!(
                "Aggregated field {name:?} is not of the form <op>_<field>"
            ))
        })?;
        let op = AggregateOpSpec::from_name(&captures[1]).ok_or_else(|| {
            LyraError::pattern_decode(format!("Unknown aggregate operation in {name:?}"))
        })?;
        Ok(DecodedField {
            op: Some(FieldOp::Aggregate(op)),
            field: captures[2].to_string(),
        })
    } else if field.bin {
        let captures = BIN_RE.captures(name).ok_or_else(|| {
            LyraError::pattern_decode(format!(
                "Binned field {name:?} is not of the form bin_<field>_<start|mid|end>"
            ))
        })?;
        Ok(DecodedField {
            op: Some(FieldOp::Bin),
            field: captures[2].to_string(),
        })
    } else {
        Ok(DecodedField {
            op: None,
            field: field.name.clone(),
        })
    }
}

/// Vega-Lite channel definition for a field
pub fn channel_def(field: &FieldDescriptor) -> Result<ChannelDefSpec> {
    let decoded = decode_field(field)?;
    let (aggregate, bin) = match decoded.op {
        Some(FieldOp::Aggregate(op)) => (Some(op), None),
        Some(FieldOp::Bin) => (None, Some(true)),
        None => (None, None),
    };
    Ok(ChannelDefSpec {
        type_: field.mtype,
        field: decoded.field,
        aggregate,
        bin,
    })
}
