/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::binding::state::MarkId;
use serde_json::Value;

/// State updates emitted while binding
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Open a grouped edit. Every action until the matching `EndBatch` is a single
    /// undo/redo step.
    StartBatch,
    EndBatch,
    UpdateMarkProperty {
        mark_id: MarkId,
        property: String,
        value: Value,
    },
    ResetMarkVisual {
        mark_id: MarkId,
        property: String,
    },
    /// Actions owned by the extraction stages (data transform, scale and guide updates)
    Custom {
        kind: String,
        payload: Value,
    },
}

pub trait Dispatch {
    fn dispatch(&mut self, action: Action);
}

/// Scoped grouped-edit boundary.
///
/// Dispatches `StartBatch` when created and `EndBatch` when dropped, so the boundary is
/// closed on every exit path, including early error returns.
pub struct BatchGuard<'a> {
    dispatcher: &'a mut dyn Dispatch,
}

impl<'a> BatchGuard<'a> {
    pub fn begin(dispatcher: &'a mut dyn Dispatch) -> Self {
        dispatcher.dispatch(Action::StartBatch);
        Self { dispatcher }
    }

    pub fn dispatcher(&mut self) -> &mut (dyn Dispatch + 'a) {
        &mut *self.dispatcher
    }

    pub fn dispatch(&mut self, action: Action) {
        self.dispatcher.dispatch(action)
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.dispatcher.dispatch(Action::EndBatch);
    }
}
