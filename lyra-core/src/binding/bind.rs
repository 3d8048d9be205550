/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::binding::action::{Action, BatchGuard, Dispatch};
use crate::binding::cache::SpecCache;
use crate::binding::channel::channel_name;
use crate::binding::compile::{compile, CompileConfig, LiteCompiler};
use crate::binding::extract::{run_extraction, BindEnvelope, Extractor};
use crate::binding::field::{channel_def, FieldDescriptor};
use crate::binding::state::{MarkFrom, MarkId, MarkState, VisState};
use crate::data::dataset::{DatasetCache, DatasetId};
use lyra_common::error::{LyraError, Result, ResultWithContext};

/// Whether a mark still has to be linked to the dataset being bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineLink {
    Established,
    Missing,
}

/// Check that binding a field of `ds_id` keeps the mark on a single pipeline
pub fn check_pipeline(mark: &MarkState, ds_id: DatasetId) -> Result<PipelineLink> {
    match &mark.from {
        None => Ok(PipelineLink::Missing),
        Some(MarkFrom {
            mark: Some(upstream),
            ..
        }) => Err(LyraError::pipeline_mismatch(format!(
            "Mark {} is driven by mark {upstream}, not dataset {ds_id}",
            mark.id
        ))),
        Some(MarkFrom { data, .. }) if *data != Some(ds_id) => {
            Err(LyraError::pipeline_mismatch(format!(
                "Mark {} is driven by dataset {}, not dataset {ds_id}",
                mark.id,
                data.map(|id| id.to_string())
                    .unwrap_or_else(|| "<none>".to_string())
            )))
        }
        Some(_) => Ok(PipelineLink::Established),
    }
}

/// Binds dataset fields to mark properties.
///
/// Holds the per-mark Vega-Lite specs and identity maps, so repeated bindings of a mark
/// accumulate channels and reuse the primitives created by earlier bindings.
pub struct ChannelBinder {
    config: CompileConfig,
    specs: SpecCache,
    compiler: Box<dyn LiteCompiler>,
    extractor: Box<dyn Extractor>,
}

impl ChannelBinder {
    pub fn new(
        config: CompileConfig,
        compiler: Box<dyn LiteCompiler>,
        extractor: Box<dyn Extractor>,
    ) -> Self {
        Self {
            config,
            specs: SpecCache::new(),
            compiler,
            extractor,
        }
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    pub fn specs(&self) -> &SpecCache {
        &self.specs
    }

    /// Bind `field` of dataset `ds_id` to `property` of mark `mark_id`.
    ///
    /// Every action dispatched here, including those of the extraction stages, is wrapped
    /// in a single grouped edit. The edit is closed even when the binding fails.
    #[allow(clippy::too_many_arguments)]
    pub fn bind_channel(
        &mut self,
        state: &dyn VisState,
        datasets: &DatasetCache,
        dispatcher: &mut dyn Dispatch,
        ds_id: DatasetId,
        field: &FieldDescriptor,
        mark_id: MarkId,
        property: &str,
    ) -> Result<()> {
        let mut mark = state
            .mark(mark_id)
            .with_context(|| format!("No mark with id {mark_id}"))?;
        let mark_type = mark.type_.clone();
        let (spec, map) = self.specs.entry(mark_id, &mark_type)?;
        let channel = channel_name(property).to_string();

        let mut batch = BatchGuard::begin(dispatcher);

        match check_pipeline(&mark, ds_id) {
            Ok(PipelineLink::Established) => {}
            Ok(PipelineLink::Missing) => {
                log::debug!("Linking mark {mark_id} to dataset {ds_id}");
                let from = MarkFrom::dataset(ds_id);
                batch.dispatch(Action::UpdateMarkProperty {
                    mark_id,
                    property: "from".to_string(),
                    value: serde_json::to_value(&from)?,
                });
                mark.from = Some(from);
            }
            Err(err) => {
                log::warn!("Rejected binding of {:?} to mark {mark_id}: {err}", field.name);
                return Err(err);
            }
        }

        spec.encoding.insert(channel.clone(), channel_def(field)?);

        let compiled = compile(
            spec,
            property,
            datasets.output(ds_id),
            &self.config,
            self.compiler.as_ref(),
        )?;

        let mut envelope = BindEnvelope {
            input: compiled.input,
            output: compiled.output,
            map,
            mark,
            mark_id,
            mark_type,
            property: property.to_string(),
            channel,
            ds_id,
        };
        run_extraction(
            self.extractor.as_mut(),
            batch.dispatcher(),
            state,
            &mut envelope,
        )?;

        if log::log_enabled!(log::Level::Debug) {
            let unmapped = envelope.map.unmapped(&envelope.primitives()?);
            if !unmapped.is_empty() {
                log::debug!("Mark {mark_id} has unmapped compiled primitives: {unmapped:?}");
            }
        }
        Ok(())
    }

    /// Remove the channel of `property` from the mark's spec and reset the property.
    ///
    /// Later bindings of the mark no longer re-emit the removed channel.
    pub fn unbind_channel(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        mark_id: MarkId,
        property: &str,
    ) {
        let mut batch = BatchGuard::begin(dispatcher);
        let channel = channel_name(property);
        if let Some(spec) = self.specs.get_spec_mut(mark_id) {
            spec.encoding.remove(channel);
        }
        batch.dispatch(Action::ResetMarkVisual {
            mark_id,
            property: property.to_string(),
        });
    }

    /// Forget the cached spec and identity map of a deleted mark
    pub fn evict_mark(&mut self, mark_id: MarkId) {
        self.specs.evict(mark_id);
    }

    pub fn reset(&mut self) {
        self.specs.reset();
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::bind::{check_pipeline, PipelineLink};
    use crate::binding::state::{MarkFrom, MarkState};
    use lyra_common::error::LyraError;

    fn mark(from: Option<MarkFrom>) -> MarkState {
        MarkState {
            id: 1,
            type_: "rect".to_string(),
            from,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_check_pipeline() {
        assert_eq!(check_pipeline(&mark(None), 3).unwrap(), PipelineLink::Missing);
        assert_eq!(
            check_pipeline(&mark(Some(MarkFrom::dataset(3))), 3).unwrap(),
            PipelineLink::Established
        );
        assert!(matches!(
            check_pipeline(&mark(Some(MarkFrom::dataset(3))), 4),
            Err(LyraError::PipelineMismatchError(..))
        ));
        let from_mark = MarkFrom {
            data: Some(3),
            mark: Some(8),
        };
        assert!(matches!(
            check_pipeline(&mark(Some(from_mark)), 3),
            Err(LyraError::PipelineMismatchError(..))
        ));
        assert!(matches!(
            check_pipeline(&mark(Some(MarkFrom::default())), 3),
            Err(LyraError::PipelineMismatchError(..))
        ));
    }
}
