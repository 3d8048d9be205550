use lyra_common::error::{LyraError, Result};
use lyra_core::binding::action::{Action, Dispatch};
use lyra_core::binding::cache::PrimitiveId;
use lyra_core::binding::extract::{BindEnvelope, Extractor};
use lyra_core::binding::state::{MarkFrom, MarkId, MarkState, VisState};
use lyra_core::spec::chart::ChartSpec;
use lyra_core::spec::lite::LiteSpec;
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub type Marks = Rc<RefCell<HashMap<MarkId, MarkState>>>;

pub fn mark(id: MarkId, type_: &str, from: Option<MarkFrom>) -> MarkState {
    MarkState {
        id,
        type_: type_.to_string(),
        from,
        extra: Default::default(),
    }
}

pub fn marks(marks: Vec<MarkState>) -> Marks {
    Rc::new(RefCell::new(
        marks.into_iter().map(|mark| (mark.id, mark)).collect(),
    ))
}

/// Application state view over a shared mark table
pub struct TestState {
    pub marks: Marks,
}

impl VisState for TestState {
    fn mark(&self, id: MarkId) -> Option<MarkState> {
        self.marks.borrow().get(&id).cloned()
    }
}

/// Records every action and applies mark `from` updates to the shared mark table
pub struct TestStore {
    pub marks: Marks,
    pub actions: Vec<Action>,
}

impl TestStore {
    pub fn new(marks: Marks) -> Self {
        Self {
            marks,
            actions: Vec::new(),
        }
    }

    pub fn custom_kinds(&self) -> Vec<String> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                Action::Custom { kind, .. } => Some(kind.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Dispatch for TestStore {
    fn dispatch(&mut self, action: Action) {
        if let Action::UpdateMarkProperty {
            mark_id,
            property,
            value,
        } = &action
        {
            if property == "from" {
                if let Some(mark) = self.marks.borrow_mut().get_mut(mark_id) {
                    mark.from = serde_json::from_value(value.clone()).ok();
                }
            }
        }
        self.actions.push(action);
    }
}

/// Compiler stand-in producing the shape of a Vega spec compiled from Vega-Lite: one
/// "source" dataset, a root group with a scale per channel, x/y axes, a color legend and
/// a single mark encoding every channel.
pub fn fake_compile(spec: &LiteSpec) -> Result<ChartSpec> {
    let cell = spec
        .config
        .cell
        .as_ref()
        .ok_or_else(|| LyraError::compilation("Missing cell config"))?;

    let mut channels: Vec<&String> = spec.encoding.keys().collect();
    channels.sort();

    let mut scales = Vec::new();
    let mut axes = Vec::new();
    let mut legends = Vec::new();
    let mut update = Map::new();
    for channel in channels {
        let def = &spec.encoding[channel];
        let field = match def.aggregate {
            Some(op) => format!("{}_{}", op.name(), def.field),
            None => def.field.clone(),
        };
        let range = match channel.as_str() {
            "x" => json!([0, cell.width]),
            "y" => json!([cell.height, 0]),
            "color" => json!("category10"),
            _ => json!([0, 100]),
        };
        scales.push(json!({
            "name": channel,
            "type": "linear",
            "domain": {"data": "source", "field": field},
            "range": range
        }));
        match channel.as_str() {
            "x" | "y" => axes.push(json!({"type": channel, "scale": channel})),
            "color" => legends.push(json!({"fill": channel})),
            _ => {}
        }
        update.insert(
            channel.clone(),
            json!({"scale": channel, "field": field}),
        );
    }

    let vega_type = match serde_json::to_value(spec.mark)?.as_str() {
        Some("bar") => "rect",
        Some("point") => "symbol",
        Some(other) => other,
        None => "rect",
    }
    .to_string();

    Ok(serde_json::from_value(json!({
        "data": [{"name": "source", "values": spec.data.values.clone()}],
        "marks": [{
            "name": "root",
            "type": "group",
            "scales": scales,
            "axes": axes,
            "legends": legends,
            "marks": [{
                "name": "marks",
                "type": vega_type,
                "from": {"data": "source"},
                "properties": {"update": Value::Object(update)}
            }]
        }]
    }))?)
}

/// Compiler that records its inputs before delegating to `fake_compile`
pub fn recording_compiler(
    inputs: Rc<RefCell<Vec<LiteSpec>>>,
) -> impl Fn(&LiteSpec) -> Result<ChartSpec> {
    move |spec: &LiteSpec| {
        inputs.borrow_mut().push(spec.clone());
        fake_compile(spec)
    }
}

/// What the extractor observed while it ran
#[derive(Debug, Default)]
pub struct ExtractionLog {
    pub stages: Vec<&'static str>,
    pub mark_from: Vec<Option<MarkFrom>>,
    pub cell_sized_scales: Vec<Vec<String>>,
    pub next_id: PrimitiveId,
}

/// Extractor that creates an application primitive for every compiled primitive the
/// identity map doesn't know yet
pub struct TestExtractor {
    pub log: Rc<RefCell<ExtractionLog>>,
}

impl TestExtractor {
    fn create(
        &self,
        dispatcher: &mut dyn Dispatch,
        kind: &str,
        name: &str,
        ids: &mut HashMap<String, PrimitiveId>,
    ) {
        if ids.contains_key(name) {
            return;
        }
        let id = {
            let mut log = self.log.borrow_mut();
            log.next_id += 1;
            log.next_id
        };
        ids.insert(name.to_string(), id);
        dispatcher.dispatch(Action::Custom {
            kind: kind.to_string(),
            payload: json!({"id": id, "name": name}),
        });
    }
}

impl Extractor for TestExtractor {
    fn parse_data(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        _state: &dyn VisState,
        envelope: &mut BindEnvelope<'_>,
    ) -> Result<()> {
        self.log.borrow_mut().stages.push("data");
        self.log
            .borrow_mut()
            .mark_from
            .push(envelope.mark.from.clone());
        for name in envelope.primitives()?.data {
            self.create(dispatcher, "ADD_PIPELINE", &name, &mut envelope.map.data);
        }
        Ok(())
    }

    fn parse_scales(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        _state: &dyn VisState,
        envelope: &mut BindEnvelope<'_>,
    ) -> Result<()> {
        self.log.borrow_mut().stages.push("scales");
        let cell_sized = envelope.cell_sized_scales()?;
        self.log.borrow_mut().cell_sized_scales.push(cell_sized);
        for name in envelope.primitives()?.scales {
            self.create(dispatcher, "ADD_SCALE", &name, &mut envelope.map.scales);
        }
        Ok(())
    }

    fn parse_marks(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        _state: &dyn VisState,
        envelope: &mut BindEnvelope<'_>,
    ) -> Result<()> {
        self.log.borrow_mut().stages.push("marks");
        dispatcher.dispatch(Action::UpdateMarkProperty {
            mark_id: envelope.mark_id,
            property: envelope.property.clone(),
            value: json!({"scale": envelope.channel, "field": envelope.channel}),
        });
        Ok(())
    }

    fn parse_guides(
        &mut self,
        dispatcher: &mut dyn Dispatch,
        _state: &dyn VisState,
        envelope: &mut BindEnvelope<'_>,
    ) -> Result<()> {
        self.log.borrow_mut().stages.push("guides");
        let primitives = envelope.primitives()?;
        for name in primitives.axes {
            self.create(dispatcher, "ADD_AXIS", &name, &mut envelope.map.axes);
        }
        for name in primitives.legends {
            self.create(dispatcher, "ADD_LEGEND", &name, &mut envelope.map.legends);
        }
        Ok(())
    }
}
