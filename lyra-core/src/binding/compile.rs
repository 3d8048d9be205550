/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::data::dataset::Rows;
use crate::spec::chart::ChartSpec;
use crate::spec::lite::{CellConfigSpec, LiteSpec, MarkConfigSpec};
use lyra_common::error::{LyraError, Result, ResultWithContext};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plotting-surface width given to the compiler. Chosen so that scale ranges sized from
/// the cell can be told apart from ranges the compiler hardcodes.
pub const CELL_WIDTH: f64 = 517.0;

/// Plotting-surface height given to the compiler
pub const CELL_HEIGHT: f64 = 392.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    pub cell_width: f64,
    pub cell_height: f64,

    /// Mark properties whose binding forces filled marks
    pub filled_properties: Vec<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            filled_properties: vec!["fill".to_string()],
        }
    }
}

impl CompileConfig {
    pub fn forces_fill(&self, property: &str) -> bool {
        self.filled_properties.iter().any(|p| p == property)
    }
}

/// Vega-Lite to Vega compiler
pub trait LiteCompiler {
    fn compile(&self, spec: &LiteSpec) -> Result<ChartSpec>;
}

impl<F> LiteCompiler for F
where
    F: Fn(&LiteSpec) -> Result<ChartSpec>,
{
    fn compile(&self, spec: &LiteSpec) -> Result<ChartSpec> {
        self(spec)
    }
}

/// Adapter for compilers that work on JSON documents, such as an embedded vega-lite.
///
/// Errors reported by the compiler become compilation errors with the compiler's message.
pub struct JsonLiteCompiler<F> {
    compile_fn: F,
}

impl<F> JsonLiteCompiler<F>
where
    F: Fn(&Value) -> std::result::Result<Value, String>,
{
    pub fn new(compile_fn: F) -> Self {
        Self { compile_fn }
    }
}

impl<F> LiteCompiler for JsonLiteCompiler<F>
where
    F: Fn(&Value) -> std::result::Result<Value, String>,
{
    fn compile(&self, spec: &LiteSpec) -> Result<ChartSpec> {
        let input = serde_json::to_value(spec)?;
        let output = (self.compile_fn)(&input).map_err(LyraError::compilation)?;
        serde_json::from_value(output).with_context(|| "Compiled Vega spec is malformed")
    }
}

/// A Vega-Lite spec as handed to the compiler, and the Vega spec it compiled to
#[derive(Clone, Debug, PartialEq)]
pub struct Compiled {
    pub input: LiteSpec,
    pub output: ChartSpec,
}

/// Compile a copy of a mark's Vega-Lite spec.
///
/// The copy is driven by the dataset's materialized output rather than by a reference to
/// the dataset, so the compiled spec shows which derived dataset (source, aggregate, bin)
/// the mark should be backed by. The cached spec is left untouched.
pub fn compile(
    spec: &LiteSpec,
    property: &str,
    values: Option<Rows>,
    config: &CompileConfig,
    compiler: &dyn LiteCompiler,
) -> Result<Compiled> {
    let mut input = spec.clone();
    input.data.values = values.map(|rows| rows.as_ref().clone());
    input.config.cell = Some(CellConfigSpec {
        width: config.cell_width,
        height: config.cell_height,
    });

    // Some marks default to unfilled, which would hide a fill encoding
    if config.forces_fill(property) {
        input.config.mark = Some(MarkConfigSpec {
            filled: Some(true),
            ..Default::default()
        });
    }

    log::debug!("Compiling Vega-Lite {:?} spec for property {property}", input.mark);
    let output = compiler.compile(&input)?;
    Ok(Compiled { input, output })
}
