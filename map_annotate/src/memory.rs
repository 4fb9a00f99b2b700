//! Headless engine and drawing adapter kept entirely in memory.
//!
//! Used by the command-line replay tool and by tests. Style loads never
//! complete on their own: the host takes the ready token with
//! [`MemoryEngine::take_ready_token`] and delivers it to the session,
//! standing in for the asynchronous "style loaded" notification.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::basemap::StyleSource;
use crate::engine::{DrawAdapter, LayerSpec, MapEngine, SourceData, StyleToken};
use crate::geometry::{Feature, FeatureId, Geometry, GeometryType, LngLat};

#[derive(Debug, Default)]
pub struct MemoryEngine {
    sources: BTreeMap<String, SourceData>,
    layers: Vec<LayerSpec>,
    terrain: Option<String>,
    pitch: f64,
    style: Option<StyleSource>,
    style_loads: usize,
    ready: Option<StyleToken>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the token of the style load in flight, as if it just finished.
    pub fn take_ready_token(&mut self) -> Option<StyleToken> {
        self.ready.take()
    }

    pub fn style(&self) -> Option<&StyleSource> {
        self.style.as_ref()
    }

    /// Number of style swaps requested so far.
    pub fn style_loads(&self) -> usize {
        self.style_loads
    }

    pub fn source(&self, id: &str) -> Option<&SourceData> {
        self.sources.get(id)
    }

    /// Data of a GeoJSON source.
    pub fn geojson(&self, id: &str) -> Option<&geojson::FeatureCollection> {
        match self.sources.get(id) {
            Some(SourceData::GeoJson(fc)) => Some(fc),
            _ => None,
        }
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Layer ids in drawing order.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.keys().map(|k| k.as_str()).collect()
    }

    pub fn terrain(&self) -> Option<&str> {
        self.terrain.as_deref()
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }
}

impl MapEngine for MemoryEngine {
    type Adapter = MemoryDrawAdapter;

    fn add_source(&mut self, id: &str, data: SourceData) {
        if self.sources.contains_key(id) {
            warn!("source {id} already exists");
            return;
        }
        self.sources.insert(id.to_string(), data);
    }

    fn set_source_data(&mut self, id: &str, data: geojson::FeatureCollection) {
        match self.sources.get_mut(id) {
            Some(slot) if matches!(slot, SourceData::GeoJson(_)) => {
                *slot = SourceData::GeoJson(data)
            }
            Some(_) => warn!("source {id} is not a GeoJSON source"),
            None => warn!("source {id} does not exist"),
        }
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn remove_source(&mut self, id: &str) {
        if self.layers.iter().any(|l| l.source == id) {
            warn!("source {id} is still used by a layer");
            return;
        }
        self.sources.remove(id);
    }

    fn add_layer(&mut self, layer: LayerSpec) {
        if !self.sources.contains_key(&layer.source) {
            warn!("layer {} references missing source {}", layer.id, layer.source);
            return;
        }
        if self.has_layer(&layer.id) {
            warn!("layer {} already exists", layer.id);
            return;
        }
        self.layers.push(layer);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    fn remove_layer(&mut self, id: &str) {
        self.layers.retain(|l| l.id != id);
    }

    fn set_layer_visibility(&mut self, id: &str, visible: bool) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
            layer.visible = visible;
        }
    }

    fn set_layer_opacity(&mut self, id: &str, opacity: f32) {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => layer.paint.opacity = opacity,
            None => debug!("layer {id} not present, opacity not set"),
        }
    }

    fn set_pitch(&mut self, degrees: f64) {
        self.pitch = degrees;
    }

    fn set_terrain(&mut self, source: Option<&str>) {
        match source {
            Some(id) if !self.sources.contains_key(id) => {
                warn!("terrain source {id} does not exist");
            }
            _ => self.terrain = source.map(str::to_string),
        }
    }

    fn set_style(&mut self, style: &StyleSource, ready: StyleToken) {
        debug!("loading style generation {}", ready.generation());
        self.sources.clear();
        self.layers.clear();
        self.terrain = None;
        self.style = Some(style.clone());
        self.style_loads += 1;
        self.ready = Some(ready);
    }

    fn draw_adapter(&mut self) -> MemoryDrawAdapter {
        MemoryDrawAdapter::new()
    }
}

/// Drawing adapter with click-to-place semantics.
///
/// Point mode commits one feature per click. Line and polygon modes collect
/// vertices until [`DrawAdapter::finish`].
#[derive(Debug)]
pub struct MemoryDrawAdapter {
    enabled: bool,
    mode: Option<GeometryType>,
    features: Vec<Feature>,
    pending: Vec<LngLat>,
    next_id: FeatureId,
}

impl Default for MemoryDrawAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDrawAdapter {
    pub fn new() -> Self {
        Self {
            enabled: false,
            mode: None,
            features: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Vertices of the shape being drawn.
    pub fn pending(&self) -> &[LngLat] {
        &self.pending
    }

    fn commit(&mut self, geometry: Geometry) {
        let mode = geometry.geometry_type().mode_name();
        let id = self.fresh_id();
        self.features.push(Feature::new(id, geometry).with_property("mode", mode));
    }

    /// First unused id from `next_id` on, wrapping past `FeatureId::MAX`.
    fn fresh_id(&mut self) -> FeatureId {
        let mut id = self.next_id;
        while self.features.iter().any(|f| f.id == id) {
            id = id.checked_add(1).unwrap_or(1);
        }
        self.next_id = id.checked_add(1).unwrap_or(1);
        id
    }
}

impl DrawAdapter for MemoryDrawAdapter {
    fn start(&mut self) {
        self.enabled = true;
    }

    fn stop(&mut self) {
        self.enabled = false;
        self.pending.clear();
        self.features.clear();
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_mode(&mut self, mode: GeometryType) {
        self.pending.clear();
        self.mode = Some(mode);
    }

    fn mode(&self) -> Option<GeometryType> {
        self.mode
    }

    fn click(&mut self, coord: LngLat) {
        if !self.enabled {
            return;
        }
        match self.mode {
            Some(GeometryType::Point) => self.commit(Geometry::Point(coord)),
            Some(_) => self.pending.push(coord),
            None => debug!("click ignored, no drawing mode selected"),
        }
    }

    fn finish(&mut self) {
        let vertices = std::mem::take(&mut self.pending);
        let geometry = match self.mode {
            Some(GeometryType::LineString) => Geometry::LineString(vertices),
            Some(GeometryType::Polygon) => Geometry::polygon(vertices),
            _ => return,
        };
        if geometry.is_valid() {
            self.commit(geometry);
        } else {
            debug!("discarding incomplete {}", geometry.geometry_type().as_str());
        }
    }

    fn snapshot(&self) -> Vec<Feature> {
        self.features.clone()
    }

    fn add_features(&mut self, features: Vec<Feature>) {
        for mut feature in features {
            if self.features.iter().any(|f| f.id == feature.id) {
                feature.id = self.fresh_id();
            } else if let Some(next) = feature.id.checked_add(1) {
                self.next_id = self.next_id.max(next);
            }
            self.features.push(feature);
        }
    }

    fn clear(&mut self) {
        self.features.clear();
        self.pending.clear();
    }
}
