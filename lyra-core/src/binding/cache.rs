/*
 * VegaFusion
 * Copyright (C) 2022 VegaFusion Technologies LLC
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::binding::state::MarkId;
use crate::spec::lite::{LiteMark, LiteSpec};
use crate::spec::visitors::CompiledPrimitives;
use lyra_common::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Identity of a primitive (dataset, scale, guide) in the application state
pub type PrimitiveId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Data,
    Scale,
    Axis,
    Legend,
}

/// Mapping from primitive names in a mark's compiled spec to the application primitives
/// created for them.
///
/// Owned by the binding caches so that it survives across bindings of the same mark. The
/// extraction stages consult and update it; nothing else writes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMap {
    pub data: HashMap<String, PrimitiveId>,
    pub scales: HashMap<String, PrimitiveId>,
    pub axes: HashMap<String, PrimitiveId>,
    pub legends: HashMap<String, PrimitiveId>,
}

impl IdentityMap {
    pub fn get(&self, kind: PrimitiveKind, name: &str) -> Option<PrimitiveId> {
        self.entries(kind).get(name).copied()
    }

    pub fn entries(&self, kind: PrimitiveKind) -> &HashMap<String, PrimitiveId> {
        match kind {
            PrimitiveKind::Data => &self.data,
            PrimitiveKind::Scale => &self.scales,
            PrimitiveKind::Axis => &self.axes,
            PrimitiveKind::Legend => &self.legends,
        }
    }

    /// Compiled primitives that have no application primitive recorded yet
    pub fn unmapped(&self, primitives: &CompiledPrimitives) -> Vec<(PrimitiveKind, String)> {
        [
            (PrimitiveKind::Data, &primitives.data),
            (PrimitiveKind::Scale, &primitives.scales),
            (PrimitiveKind::Axis, &primitives.axes),
            (PrimitiveKind::Legend, &primitives.legends),
        ]
        .into_iter()
        .flat_map(|(kind, names)| {
            names
                .iter()
                .filter(move |name| self.get(kind, name).is_none())
                .map(move |name| (kind, name.clone()))
        })
        .collect()
    }
}

/// Per-mark Vega-Lite specs and identity maps.
///
/// Entries are created on a mark's first binding and live until the mark is evicted or the
/// cache is reset.
#[derive(Debug, Clone, Default)]
pub struct SpecCache {
    specs: HashMap<MarkId, LiteSpec>,
    maps: HashMap<MarkId, IdentityMap>,
}

impl SpecCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mark's Vega-Lite spec, created empty for the mark type if it doesn't exist yet
    pub fn spec_for(&mut self, mark_id: MarkId, mark_type: &str) -> Result<&mut LiteSpec> {
        spec_entry(&mut self.specs, mark_id, mark_type)
    }

    pub fn identity_map_for(&mut self, mark_id: MarkId) -> &mut IdentityMap {
        self.maps.entry(mark_id).or_default()
    }

    /// Both cached entries of a mark, created as needed
    pub fn entry(
        &mut self,
        mark_id: MarkId,
        mark_type: &str,
    ) -> Result<(&mut LiteSpec, &mut IdentityMap)> {
        let spec = spec_entry(&mut self.specs, mark_id, mark_type)?;
        let map = self.maps.entry(mark_id).or_default();
        Ok((spec, map))
    }

    pub fn get_spec(&self, mark_id: MarkId) -> Option<&LiteSpec> {
        self.specs.get(&mark_id)
    }

    pub fn get_spec_mut(&mut self, mark_id: MarkId) -> Option<&mut LiteSpec> {
        self.specs.get_mut(&mark_id)
    }

    pub fn get_identity_map(&self, mark_id: MarkId) -> Option<&IdentityMap> {
        self.maps.get(&mark_id)
    }

    /// Forget a mark, e.g. after it was deleted
    pub fn evict(&mut self, mark_id: MarkId) {
        self.specs.remove(&mark_id);
        self.maps.remove(&mark_id);
    }

    pub fn reset(&mut self) {
        self.specs.clear();
        self.maps.clear();
    }
}

fn spec_entry<'a>(
    specs: &'a mut HashMap<MarkId, LiteSpec>,
    mark_id: MarkId,
    mark_type: &str,
) -> Result<&'a mut LiteSpec> {
    match specs.entry(mark_id) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let mark = LiteMark::from_vega_type(mark_type)?;
            log::debug!("Creating Vega-Lite {mark:?} spec for mark {mark_id}");
            Ok(entry.insert(LiteSpec::new(mark)))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::cache::{IdentityMap, PrimitiveKind, SpecCache};
    use crate::spec::lite::LiteMark;
    use crate::spec::visitors::CompiledPrimitives;
    use lyra_common::error::LyraError;

    #[test]
    fn test_spec_is_created_once() {
        let mut cache = SpecCache::new();
        let spec = cache.spec_for(1, "rect").unwrap();
        assert_eq!(spec.mark, LiteMark::Bar);
        assert!(spec.encoding.is_empty());
        spec.config.extra.insert("marker".to_string(), true.into());

        // Cached by mark id; the type is only consulted on creation
        let spec = cache.spec_for(1, "symbol").unwrap();
        assert_eq!(spec.mark, LiteMark::Bar);
        assert!(spec.config.extra.contains_key("marker"));
    }

    #[test]
    fn test_unknown_mark_type_is_not_cached() {
        let mut cache = SpecCache::new();
        assert!(matches!(
            cache.spec_for(2, "group"),
            Err(LyraError::UnknownMarkTypeError(..))
        ));
        assert!(cache.get_spec(2).is_none());
    }

    #[test]
    fn test_identity_map_is_independent_and_persistent() {
        let mut cache = SpecCache::new();
        cache.identity_map_for(3).scales.insert("x".to_string(), 40);
        assert!(cache.get_spec(3).is_none());

        let (_, map) = cache.entry(3, "symbol").unwrap();
        assert_eq!(map.get(PrimitiveKind::Scale, "x"), Some(40));
    }

    #[test]
    fn test_evict_and_reset() {
        let mut cache = SpecCache::new();
        cache.entry(1, "rect").unwrap();
        cache.entry(2, "line").unwrap();

        cache.evict(1);
        assert!(cache.get_spec(1).is_none());
        assert!(cache.get_identity_map(1).is_none());
        assert!(cache.get_spec(2).is_some());

        cache.reset();
        assert!(cache.get_spec(2).is_none());
        assert!(cache.get_identity_map(2).is_none());
    }

    #[test]
    fn test_unmapped() {
        let mut map = IdentityMap::default();
        map.data.insert("source".to_string(), 11);
        map.scales.insert("x".to_string(), 12);

        let primitives = CompiledPrimitives {
            data: vec!["source".to_string(), "summary".to_string()],
            scales: vec!["x".to_string(), "y".to_string()],
            axes: vec!["x".to_string()],
            legends: vec![],
            marks: vec![],
        };
        assert_eq!(
            map.unmapped(&primitives),
            vec![
                (PrimitiveKind::Data, "summary".to_string()),
                (PrimitiveKind::Scale, "y".to_string()),
                (PrimitiveKind::Axis, "x".to_string()),
            ]
        );
    }
}
