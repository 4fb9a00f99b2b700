//! Capabilities the session consumes from the rendering and drawing engines.

use log::debug;

use crate::basemap::StyleSource;
use crate::geometry::{Feature, GeometryType, LngLat};

/// Data backing a named source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData {
    GeoJson(geojson::FeatureCollection),
    Raster { tiles: Vec<String>, tile_size: u32 },
    RasterDem { url: String, tile_size: u32 },
}

/// How a layer draws its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Circle,
    Line,
    Fill,
    /// Polygons extruded by their `height` and `min_height` properties.
    FillExtrusion,
    Raster,
}

/// Paint properties shared by the layer kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPaint {
    pub color: String,
    /// Line width or circle radius in pixels.
    pub width: f32,
    pub opacity: f32,
    pub dashed: bool,
}

impl Default for LayerPaint {
    fn default() -> Self {
        Self {
            color: "#3388ff".to_string(),
            width: 2.0,
            opacity: 1.0,
            dashed: false,
        }
    }
}

impl LayerPaint {
    pub fn new(color: &str, width: f32) -> Self {
        Self {
            color: color.to_string(),
            width,
            ..Self::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

/// A styled layer drawing one source.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub kind: LayerKind,
    /// Only draw features of this geometry type.
    pub filter: Option<GeometryType>,
    pub paint: LayerPaint,
    pub visible: bool,
}

impl LayerSpec {
    pub fn new(id: &str, source: &str, kind: LayerKind, paint: LayerPaint) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            kind,
            filter: None,
            paint,
            visible: true,
        }
    }

    pub fn filtered(mut self, geometry_type: GeometryType) -> Self {
        self.filter = Some(geometry_type);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Single-use "style ready" signal for one style swap.
///
/// The engine receives the token with [`MapEngine::set_style`] and hands it
/// back to the host once the new style has fully loaded. It cannot be
/// cloned, so each swap completes at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct StyleToken {
    generation: u64,
}

impl StyleToken {
    pub(crate) fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Rendering engine driven by the session.
pub trait MapEngine {
    type Adapter: DrawAdapter;

    fn add_source(&mut self, id: &str, data: SourceData);
    fn set_source_data(&mut self, id: &str, data: geojson::FeatureCollection);
    fn has_source(&self, id: &str) -> bool;
    fn remove_source(&mut self, id: &str);

    fn add_layer(&mut self, layer: LayerSpec);
    fn has_layer(&self, id: &str) -> bool;
    fn remove_layer(&mut self, id: &str);
    fn set_layer_visibility(&mut self, id: &str, visible: bool);
    fn set_layer_opacity(&mut self, id: &str, opacity: f32);

    /// Uses the named raster-dem source as terrain, or flat terrain.
    fn set_terrain(&mut self, source: Option<&str>);

    /// Camera tilt in degrees. Part of the camera, so a style swap keeps it.
    fn set_pitch(&mut self, degrees: f64);

    /// Replaces the whole style. Every source, layer and drawing adapter
    /// built on the old style is gone afterwards. `ready` must be returned
    /// to the host once the new style is loaded.
    fn set_style(&mut self, style: &StyleSource, ready: StyleToken);

    /// Builds a drawing adapter bound to the current style.
    fn draw_adapter(&mut self) -> Self::Adapter;
}

/// Drawing engine that turns pointer input into features.
pub trait DrawAdapter {
    fn start(&mut self);
    /// Stops accepting input. The adapter's own store is discarded.
    fn stop(&mut self);
    fn is_enabled(&self) -> bool;
    fn set_mode(&mut self, mode: GeometryType);
    fn mode(&self) -> Option<GeometryType>;
    fn click(&mut self, coord: LngLat);
    /// Commits the in-progress line or polygon, if it is valid.
    fn finish(&mut self);
    fn snapshot(&self) -> Vec<Feature>;
    fn add_features(&mut self, features: Vec<Feature>);
    fn clear(&mut self);
}

pub fn remove_layer_if_present<E: MapEngine + ?Sized>(engine: &mut E, id: &str) {
    if engine.has_layer(id) {
        engine.remove_layer(id);
    } else {
        debug!("layer {id} not present, nothing to remove");
    }
}

pub fn remove_source_if_present<E: MapEngine + ?Sized>(engine: &mut E, id: &str) {
    if engine.has_source(id) {
        engine.remove_source(id);
    } else {
        debug!("source {id} not present, nothing to remove");
    }
}

/// Adds a GeoJSON source or replaces the data of an existing one.
pub fn upsert_geojson_source<E: MapEngine + ?Sized>(
    engine: &mut E,
    id: &str,
    data: geojson::FeatureCollection,
) {
    if engine.has_source(id) {
        engine.set_source_data(id, data);
    } else {
        engine.add_source(id, SourceData::GeoJson(data));
    }
}

/// Adds `layer` unless a layer with the same id exists.
pub fn ensure_layer<E: MapEngine + ?Sized>(engine: &mut E, layer: LayerSpec) {
    if !engine.has_layer(&layer.id) {
        engine.add_layer(layer);
    }
}
