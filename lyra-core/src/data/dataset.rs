/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use lyra_common::datatypes::{infer_all, MeasureType, PrimitiveType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub type DatasetId = u32;

/// Row objects of a dataset. Shared between a dataset and the datasets derived from it.
pub type Rows = Arc<Vec<Value>>;

pub type Schema = HashMap<String, FieldSchema>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,

    #[serde(rename = "type")]
    pub type_: PrimitiveType,

    pub mtype: MeasureType,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetProps {
    /// Upstream dataset whose raw values this dataset reuses
    pub source: Option<DatasetId>,

    /// Raw values, ignored when `source` is set
    pub values: Option<Vec<Value>>,
}

/// Accessor for the live view's evaluated datasets.
///
/// Invoked on every output lookup, so the cache never holds a reference to application
/// state and may be created before it.
pub trait LiveView {
    fn dataset_name(&self, id: DatasetId) -> Option<String>;
    fn data_values(&self, name: &str) -> Option<Rows>;
}

pub trait TypeInference {
    fn infer_all(&self, rows: &[Value]) -> Vec<(String, PrimitiveType)>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeInference;

impl TypeInference for DefaultTypeInference {
    fn infer_all(&self, rows: &[Value]) -> Vec<(String, PrimitiveType)> {
        infer_all(rows)
    }
}

/// Memoized raw values and schemas of datasets.
///
/// Raw values are loaded once per dataset and never mutated. Schemas are derived once from
/// the dataset's output and are not recomputed when new data arrives; callers that need a
/// fresh schema must `reset` the cache.
pub struct DatasetCache {
    values: HashMap<DatasetId, Rows>,
    schemas: HashMap<DatasetId, Arc<Schema>>,
    live_view: Option<Arc<dyn LiveView>>,
    inference: Arc<dyn TypeInference>,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for DatasetCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .field("schemas", &self.schemas.keys().collect::<Vec<_>>())
            .field("live_view", &self.live_view.is_some())
            .finish()
    }
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::with_inference(Arc::new(DefaultTypeInference))
    }

    pub fn with_inference(inference: Arc<dyn TypeInference>) -> Self {
        Self {
            values: Default::default(),
            schemas: Default::default(),
            live_view: None,
            inference,
        }
    }

    pub fn set_live_view(&mut self, live_view: Arc<dyn LiveView>) {
        self.live_view = Some(live_view);
    }

    /// Load a dataset's raw values and derive its schema.
    ///
    /// No-op returning the cached values if the dataset was already loaded.
    pub fn initialize(&mut self, id: DatasetId, props: DatasetProps) -> Option<Rows> {
        if let Some(values) = self.values.get(&id) {
            return Some(values.clone());
        }

        let values = match props.source {
            Some(source) => self.values.get(&source).cloned(),
            None => props.values.map(Arc::new),
        };
        match &values {
            Some(values) => {
                self.values.insert(id, values.clone());
            }
            None => log::debug!("Dataset {id} initialized without values"),
        }

        self.schema(id);
        values
    }

    /// Raw input values of a dataset
    pub fn input(&self, id: DatasetId) -> Option<Rows> {
        self.values.get(&id).cloned()
    }

    /// Output tuples of a dataset after its transforms have been evaluated.
    ///
    /// Falls back to the raw input when the live view has not evaluated the dataset, or
    /// when its evaluated output is empty (as it is while the view is being rebuilt).
    pub fn output(&self, id: DatasetId) -> Option<Rows> {
        let evaluated = self.live_view.as_ref().and_then(|view| {
            let name = view.dataset_name(id)?;
            view.data_values(&name)
        });
        match evaluated {
            Some(rows) if !rows.is_empty() => Some(rows),
            _ => self.input(id),
        }
    }

    /// Schema of a dataset, derived from its output on first request
    pub fn schema(&mut self, id: DatasetId) -> Arc<Schema> {
        if let Some(schema) = self.schemas.get(&id) {
            return schema.clone();
        }

        let Some(rows) = self.output(id) else {
            // Nothing to infer from yet. Don't memoize so that a later initialize
            // derives the real schema.
            return Default::default();
        };

        let schema: Schema = self
            .inference
            .infer_all(rows.as_slice())
            .into_iter()
            .map(|(name, type_)| {
                let field = FieldSchema {
                    name: name.clone(),
                    type_,
                    mtype: type_.measure_type(),
                };
                (name, field)
            })
            .collect();

        let schema = Arc::new(schema);
        self.schemas.insert(id, schema.clone());
        schema
    }

    /// Drop every memoized value and schema
    pub fn reset(&mut self) {
        self.values.clear();
        self.schemas.clear();
    }
}
