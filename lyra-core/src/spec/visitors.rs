/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::spec::axis::AxisSpec;
use crate::spec::chart::ChartVisitor;
use crate::spec::data::DataSpec;
use crate::spec::legend::LegendSpec;
use crate::spec::mark::MarkSpec;
use crate::spec::scale::ScaleSpec;
use lyra_common::error::Result;

/// A non-group mark of a compiled spec
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledMark {
    pub name: Option<String>,
    pub type_: String,
    pub from_data: Option<String>,
    /// Channels of the mark's "update" encoding set, sorted
    pub channels: Vec<String>,
}

/// Primitive names found in a compiled spec, in walk order.
///
/// Axes have no name of their own and are recorded by the name of their scale. Legends
/// are recorded by the first scale they reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledPrimitives {
    pub data: Vec<String>,
    pub scales: Vec<String>,
    pub axes: Vec<String>,
    pub legends: Vec<String>,
    pub marks: Vec<CompiledMark>,
}

#[derive(Clone, Debug, Default)]
pub struct CollectPrimitivesVisitor {
    pub primitives: CompiledPrimitives,
}

impl CollectPrimitivesVisitor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartVisitor for CollectPrimitivesVisitor {
    fn visit_non_group_mark(&mut self, mark: &MarkSpec, _scope: &[u32]) -> Result<()> {
        self.primitives.marks.push(CompiledMark {
            name: mark.name.clone(),
            type_: mark.type_.clone(),
            from_data: mark.from.as_ref().and_then(|from| from.data.clone()),
            channels: mark.encoding_channels("update"),
        });
        Ok(())
    }

    fn visit_data(&mut self, data: &DataSpec, _scope: &[u32]) -> Result<()> {
        self.primitives.data.push(data.name.clone());
        Ok(())
    }

    fn visit_scale(&mut self, scale: &ScaleSpec, _scope: &[u32]) -> Result<()> {
        self.primitives.scales.push(scale.name.clone());
        Ok(())
    }

    fn visit_axis(&mut self, axis: &AxisSpec, _scope: &[u32]) -> Result<()> {
        self.primitives.axes.push(axis.scale.clone());
        Ok(())
    }

    fn visit_legend(&mut self, legend: &LegendSpec, _scope: &[u32]) -> Result<()> {
        if let Some(scale) = legend.scales().into_iter().next() {
            self.primitives.legends.push(scale);
        }
        Ok(())
    }
}

/// Collects scales whose range spans exactly the configured plotting-surface width or height
#[derive(Clone, Debug)]
pub struct CellSizedScalesVisitor {
    width: f64,
    height: f64,
    pub scales: Vec<String>,
}

impl CellSizedScalesVisitor {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scales: Vec::new(),
        }
    }
}

impl ChartVisitor for CellSizedScalesVisitor {
    fn visit_scale(&mut self, scale: &ScaleSpec, _scope: &[u32]) -> Result<()> {
        if let Some(range) = &scale.range {
            if range.is_cell_extent(self.width) || range.is_cell_extent(self.height) {
                self.scales.push(scale.name.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::spec::chart::ChartSpec;
    use crate::spec::visitors::{CellSizedScalesVisitor, CompiledMark};
    use serde_json::json;

    #[test]
    fn test_collect_nested_primitives() {
        let spec: ChartSpec = serde_json::from_value(json!({
            "data": [
                {"name": "source", "values": [{"a": "A", "b": 28}]},
                {
                    "name": "summary",
                    "source": "source",
                    "transform": [{"type": "aggregate", "groupby": ["a"]}]
                }
            ],
            "marks": [{
                "name": "root",
                "type": "group",
                "scales": [
                    {"name": "x", "type": "ordinal", "domain": {"data": "summary", "field": "a"}},
                    {"name": "y", "type": "linear", "range": [392, 0]},
                    {"name": "color", "type": "ordinal", "range": "category10"}
                ],
                "axes": [{"type": "x", "scale": "x"}, {"type": "y", "scale": "y"}],
                "legends": [{"fill": "color"}],
                "marks": [{
                    "name": "marks",
                    "type": "rect",
                    "from": {"data": "summary"},
                    "properties": {
                        "update": {
                            "y": {"scale": "y", "field": "sum_b"},
                            "x": {"scale": "x", "field": "a"}
                        }
                    }
                }]
            }]
        }))
        .unwrap();

        let primitives = spec.primitives().unwrap();
        assert_eq!(primitives.data, vec!["source", "summary"]);
        assert_eq!(primitives.scales, vec!["x", "y", "color"]);
        assert_eq!(primitives.axes, vec!["x", "y"]);
        assert_eq!(primitives.legends, vec!["color"]);
        assert_eq!(
            primitives.marks,
            vec![CompiledMark {
                name: Some("marks".to_string()),
                type_: "rect".to_string(),
                from_data: Some("summary".to_string()),
                channels: vec!["x".to_string(), "y".to_string()],
            }]
        );
    }

    #[test]
    fn test_cell_sized_scales() {
        let spec: ChartSpec = serde_json::from_value(json!({
            "marks": [{
                "type": "group",
                "scales": [
                    {"name": "x", "type": "linear", "range": [0, 517]},
                    {"name": "y", "type": "linear", "range": [392, 0]},
                    {"name": "size", "type": "linear", "range": [10, 100]},
                    {"name": "color", "type": "ordinal", "range": "category10"}
                ]
            }]
        }))
        .unwrap();

        let mut visitor = CellSizedScalesVisitor::new(517.0, 392.0);
        spec.walk(&mut visitor).unwrap();
        assert_eq!(visitor.scales, vec!["x", "y"]);
    }
}
