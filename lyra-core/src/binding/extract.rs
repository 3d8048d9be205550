/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::binding::action::Dispatch;
use crate::binding::cache::IdentityMap;
use crate::binding::state::{MarkId, MarkState, VisState};
use crate::data::dataset::DatasetId;
use crate::spec::chart::ChartSpec;
use crate::spec::lite::LiteSpec;
use crate::spec::visitors::{CellSizedScalesVisitor, CompiledPrimitives};
use lyra_common::error::Result;

/// Everything the extraction stages learn about one binding
#[derive(Debug)]
pub struct BindEnvelope<'a> {
    /// The Vega-Lite spec as compiled, with every channel bound so far
    pub input: LiteSpec,
    pub output: ChartSpec,
    pub map: &'a mut IdentityMap,
    pub mark: MarkState,
    pub mark_id: MarkId,
    pub mark_type: String,
    pub property: String,
    pub channel: String,
    pub ds_id: DatasetId,
}

impl BindEnvelope<'_> {
    pub fn primitives(&self) -> Result<CompiledPrimitives> {
        self.output.primitives()
    }

    /// Scales whose range is the injected plotting-surface extent rather than a real range
    pub fn cell_sized_scales(&self) -> Result<Vec<String>> {
        let Some(cell) = &self.input.config.cell else {
            return Ok(Vec::new());
        };
        let mut visitor = CellSizedScalesVisitor::new(cell.width, cell.height);
        self.output.walk(&mut visitor)?;
        Ok(visitor.scales)
    }
}

/// The stages that turn a compiled spec into application primitives.
///
/// Stages run in declaration order: data pipelines must exist before scales reference
/// them, scales before mark encodings reference them, and guides observe the finished
/// scales and marks.
pub trait Extractor {
    fn parse_data(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        state: &dyn VisState,
        envelope: &mut BindEnvelope<'_>,
    ) -> Result<()>;

    fn parse_scales(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        state: &dyn VisState,
        envelope: &mut BindEnvelope<'_>,
    ) -> Result<()>;

    fn parse_marks(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        state: &dyn VisState,
        envelope: &mut BindEnvelope<'_>,
    ) -> Result<()>;

    fn parse_guides(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        state: &dyn VisState,
        envelope: &mut BindEnvelope<'_>,
    ) -> Result<()>;
}

/// Run every stage over the envelope, in order
pub fn run_extraction(
    extractor: &mut dyn Extractor,
    dispatcher: &mut dyn Dispatch,
    state: &dyn VisState,
    envelope: &mut BindEnvelope<'_>,
) -> Result<()> {
    extractor.parse_data(dispatcher, state, envelope)?;
    extractor.parse_scales(dispatcher, state, envelope)?;
    extractor.parse_marks(dispatcher, state, envelope)?;
    extractor.parse_guides(dispatcher, state, envelope)?;
    Ok(())
}
