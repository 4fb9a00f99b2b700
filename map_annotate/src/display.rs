//! Read-only rendering of features while no drawing session is live.

use log::debug;

use crate::engine::{
    ensure_layer, remove_layer_if_present, remove_source_if_present, upsert_geojson_source,
    LayerKind, LayerPaint, LayerSpec, MapEngine,
};
use crate::geometry::GeometryType;
use crate::store::GeometryCollection;

pub const STATIC_SOURCE_ID: &str = "static-drawings";
pub const STATIC_FILL_LAYER_ID: &str = "static-drawings-fill";
pub const STATIC_LINE_LAYER_ID: &str = "static-drawings-line";
pub const STATIC_OUTLINE_LAYER_ID: &str = "static-drawings-outline";
pub const STATIC_POINT_LAYER_ID: &str = "static-drawings-point";

/// Frozen features and whether their layers are on the map.
#[derive(Debug, Default)]
pub struct StaticDisplay {
    features: GeometryCollection,
    rendered: bool,
}

impl StaticDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn features(&self) -> &GeometryCollection {
        &self.features
    }

    pub fn has_features(&self) -> bool {
        !self.features.is_empty()
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Takes ownership of `features` and renders them non-interactively.
    /// An empty collection just hides the display.
    pub fn show<E: MapEngine + ?Sized>(&mut self, engine: &mut E, features: GeometryCollection) {
        if features.is_empty() {
            self.hide(engine);
            return;
        }
        debug!("showing {} frozen features", features.len());
        upsert_geojson_source(engine, STATIC_SOURCE_ID, features.to_feature_collection());
        for layer in layers() {
            ensure_layer(engine, layer);
        }
        self.features = features;
        self.rendered = true;
    }

    /// Removes the layers and hands the features back.
    pub fn take<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> GeometryCollection {
        self.remove_layers(engine);
        std::mem::take(&mut self.features)
    }

    /// Removes the layers and drops the features.
    pub fn hide<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        self.remove_layers(engine);
        self.features.clear();
    }

    /// Hands the features back after the style they were rendered on was
    /// destroyed. Nothing is removed from the engine.
    pub fn detach(&mut self) -> GeometryCollection {
        self.rendered = false;
        std::mem::take(&mut self.features)
    }

    fn remove_layers<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        if self.rendered {
            for layer in layers() {
                remove_layer_if_present(engine, &layer.id);
            }
            remove_source_if_present(engine, STATIC_SOURCE_ID);
        }
        self.rendered = false;
    }
}

/// One layer per geometry type; polygons also get an outline.
fn layers() -> Vec<LayerSpec> {
    vec![
        LayerSpec::new(
            STATIC_FILL_LAYER_ID,
            STATIC_SOURCE_ID,
            LayerKind::Fill,
            LayerPaint::new("#3bb2d0", 0.0).with_opacity(0.3),
        )
        .filtered(GeometryType::Polygon),
        LayerSpec::new(
            STATIC_OUTLINE_LAYER_ID,
            STATIC_SOURCE_ID,
            LayerKind::Line,
            LayerPaint::new("#3bb2d0", 2.0),
        )
        .filtered(GeometryType::Polygon),
        LayerSpec::new(
            STATIC_LINE_LAYER_ID,
            STATIC_SOURCE_ID,
            LayerKind::Line,
            LayerPaint::new("#3bb2d0", 2.0),
        )
        .filtered(GeometryType::LineString),
        LayerSpec::new(
            STATIC_POINT_LAYER_ID,
            STATIC_SOURCE_ID,
            LayerKind::Circle,
            LayerPaint::new("#3bb2d0", 5.0),
        )
        .filtered(GeometryType::Point),
    ]
}
