//! Overlay layers re-added on top of every basemap.

use log::{debug, warn};

use crate::config::SessionConfig;
use crate::engine::{
    ensure_layer, remove_layer_if_present, remove_source_if_present, LayerKind, LayerPaint,
    LayerSpec, MapEngine, SourceData,
};
use crate::geometry::{Feature, Geometry, GeometryType, LngLat};
use crate::store::GeometryCollection;

pub const TERRAIN_SOURCE_ID: &str = "terrain-source";
pub const BUILDINGS_SOURCE_ID: &str = "buildings-source";
pub const BUILDINGS_LAYER_ID: &str = "3d-buildings";
pub const WMS_OVERLAY_ID: &str = "wms";
pub const WMS_LAYER_ID: &str = "wms-layer";
const TERRAIN_TILES_URL: &str = "https://api.maptiler.com/tiles/terrain-rgb-v2/tiles.json";
/// Camera tilt while terrain or buildings are shown.
pub const PITCH_3D: f64 = 60.0;

/// A source with its layers, added hidden or visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: String,
    pub source_id: String,
    pub source: SourceData,
    pub layers: Vec<LayerSpec>,
    pub visible: bool,
}

impl Overlay {
    fn geojson(id: &str, features: Vec<Feature>, kind: LayerKind, paint: LayerPaint) -> Self {
        let source_id = format!("{id}-source");
        let layer = LayerSpec::new(&format!("{id}-layer"), &source_id, kind, paint);
        Self {
            id: id.to_string(),
            source: SourceData::GeoJson(GeometryCollection::from(features).to_feature_collection()),
            source_id,
            layers: vec![layer],
            visible: false,
        }
    }

    fn add_to<E: MapEngine + ?Sized>(&self, engine: &mut E) {
        if !engine.has_source(&self.source_id) {
            engine.add_source(&self.source_id, self.source.clone());
        }
        for layer in &self.layers {
            let mut layer = layer.clone();
            layer.visible = self.visible;
            ensure_layer(engine, layer);
        }
    }
}

#[derive(Debug, Default)]
pub struct OverlaySet {
    overlays: Vec<Overlay>,
    terrain_url: Option<String>,
    terrain: bool,
    buildings: bool,
    warned_missing_key: bool,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo overlays: points of interest, a transport route, a land-use
    /// polygon and a weather radar WMS layer. All start hidden.
    pub fn demo() -> Self {
        let poi = Overlay::geojson(
            "poi",
            vec![
                Feature::new(1, Geometry::Point(LngLat::new(-0.1276, 51.5074)))
                    .with_property("name", "London Eye"),
                Feature::new(2, Geometry::Point(LngLat::new(-0.1406, 51.5007)))
                    .with_property("name", "Westminster"),
            ],
            LayerKind::Circle,
            LayerPaint::new("#FF5722", 8.0),
        );
        let transport = Overlay::geojson(
            "transport",
            vec![Feature::new(
                1,
                Geometry::LineString(vec![
                    LngLat::new(-0.1276, 51.5074),
                    LngLat::new(-0.1406, 51.5007),
                    LngLat::new(-0.1300, 51.4950),
                ]),
            )
            .with_property("name", "Route 1")],
            LayerKind::Line,
            LayerPaint::new("#2196F3", 3.0),
        );
        let landuse = Overlay::geojson(
            "landuse",
            vec![Feature::new(
                1,
                Geometry::polygon(vec![
                    LngLat::new(-0.1400, 51.5100),
                    LngLat::new(-0.1200, 51.5100),
                    LngLat::new(-0.1200, 51.5000),
                    LngLat::new(-0.1400, 51.5000),
                ]),
            )
            .with_property("name", "Park Area")],
            LayerKind::Fill,
            LayerPaint::new("#4CAF50", 0.0).with_opacity(0.4),
        );
        let wms = Overlay {
            id: WMS_OVERLAY_ID.to_string(),
            source_id: "wms-source".to_string(),
            source: SourceData::Raster {
                tiles: vec![concat!(
                    "https://mesonet.agron.iastate.edu/cgi-bin/wms/nexrad/n0r.cgi",
                    "?bbox={bbox-epsg-3857}&format=image/png&service=WMS&version=1.1.1",
                    "&request=GetMap&srs=EPSG:3857&transparent=true&width=256&height=256",
                    "&layers=nexrad-n0r-900913"
                )
                .to_string()],
                tile_size: 256,
            },
            layers: vec![LayerSpec::new(
                WMS_LAYER_ID,
                "wms-source",
                LayerKind::Raster,
                LayerPaint::new("#000000", 0.0).with_opacity(0.7),
            )],
            visible: false,
        };
        Self {
            overlays: vec![poi, transport, landuse, wms],
            ..Self::default()
        }
    }

    /// Demo overlays with visibility and terrain taken from `config`.
    pub fn from_config(config: &SessionConfig) -> Self {
        let mut set = Self::demo();
        for id in &config.visible_overlays {
            if !set.set_visible(id, true) {
                warn!("unknown overlay {id} in configuration");
            }
        }
        set.terrain_url = config
            .terrain_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| format!("{TERRAIN_TILES_URL}?key={key}"));
        if config.terrain {
            set.set_terrain(true);
        }
        set.buildings = config.buildings;
        if let Some(opacity) = config.wms_opacity {
            set.set_wms_opacity(opacity);
        }
        set
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.overlays.iter().map(|o| o.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Returns `false` if no overlay has this id.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.overlays.iter_mut().find(|o| o.id == id) {
            Some(overlay) => {
                overlay.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn terrain_enabled(&self) -> bool {
        self.terrain
    }

    /// Requests terrain on or off. Without a configured credential terrain
    /// stays off and a single warning is logged.
    pub fn set_terrain(&mut self, enabled: bool) -> bool {
        if enabled && self.terrain_url.is_none() {
            if !self.warned_missing_key {
                warn!("terrain requires terrain_api_key in the configuration; terrain disabled");
                self.warned_missing_key = true;
            }
            self.terrain = false;
            return false;
        }
        self.terrain = enabled;
        true
    }

    pub fn buildings_enabled(&self) -> bool {
        self.buildings
    }

    pub fn set_buildings(&mut self, enabled: bool) {
        self.buildings = enabled;
    }

    /// Terrain or buildings are on.
    pub fn is_3d(&self) -> bool {
        self.terrain || self.buildings
    }

    /// Opacity of the WMS raster, `None` without a WMS overlay.
    pub fn wms_opacity(&self) -> Option<f32> {
        self.get(WMS_OVERLAY_ID)
            .and_then(|o| o.layers.first())
            .map(|l| l.paint.opacity)
    }

    /// Sets the WMS raster opacity, clamped to `0.0..=1.0`. The value is kept
    /// in the overlay's layer paint so every later [`OverlaySet::apply`]
    /// re-adds the layer with it.
    pub fn set_wms_opacity(&mut self, opacity: f32) -> bool {
        let Some(wms) = self.overlays.iter_mut().find(|o| o.id == WMS_OVERLAY_ID) else {
            return false;
        };
        let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        for layer in &mut wms.layers {
            layer.paint.opacity = opacity;
        }
        true
    }

    /// Adds every overlay and the 3D settings to a freshly loaded style.
    pub fn apply<E: MapEngine + ?Sized>(&self, engine: &mut E) {
        for overlay in &self.overlays {
            overlay.add_to(engine);
        }
        self.apply_3d(engine);
        debug!("applied {} overlays", self.overlays.len());
    }

    pub fn apply_wms_opacity<E: MapEngine + ?Sized>(&self, engine: &mut E) {
        if let Some(opacity) = self.wms_opacity() {
            engine.set_layer_opacity(WMS_LAYER_ID, opacity);
        }
    }

    /// Pushes terrain, buildings and the matching camera pitch.
    pub fn apply_3d<E: MapEngine + ?Sized>(&self, engine: &mut E) {
        self.apply_terrain(engine);
        self.apply_buildings(engine);
        engine.set_pitch(if self.is_3d() { PITCH_3D } else { 0.0 });
    }

    fn apply_buildings<E: MapEngine + ?Sized>(&self, engine: &mut E) {
        if self.buildings {
            if !engine.has_source(BUILDINGS_SOURCE_ID) {
                engine.add_source(BUILDINGS_SOURCE_ID, buildings_source());
            }
            ensure_layer(
                engine,
                LayerSpec::new(
                    BUILDINGS_LAYER_ID,
                    BUILDINGS_SOURCE_ID,
                    LayerKind::FillExtrusion,
                    LayerPaint::new("#aaaaaa", 0.0).with_opacity(0.6),
                )
                .filtered(GeometryType::Polygon),
            );
        } else {
            remove_layer_if_present(engine, BUILDINGS_LAYER_ID);
            remove_source_if_present(engine, BUILDINGS_SOURCE_ID);
        }
    }

    /// Pushes the visibility of overlay `id` to the engine.
    pub fn apply_visibility<E: MapEngine + ?Sized>(&self, engine: &mut E, id: &str) {
        if let Some(overlay) = self.get(id) {
            for layer in &overlay.layers {
                engine.set_layer_visibility(&layer.id, overlay.visible);
            }
        }
    }

    fn apply_terrain<E: MapEngine + ?Sized>(&self, engine: &mut E) {
        match (&self.terrain_url, self.terrain) {
            (Some(url), true) => {
                if !engine.has_source(TERRAIN_SOURCE_ID) {
                    engine.add_source(
                        TERRAIN_SOURCE_ID,
                        SourceData::RasterDem {
                            url: url.clone(),
                            tile_size: 256,
                        },
                    );
                }
                engine.set_terrain(Some(TERRAIN_SOURCE_ID));
            }
            _ => {
                engine.set_terrain(None);
                remove_source_if_present(engine, TERRAIN_SOURCE_ID);
            }
        }
    }
}

/// Demo building footprints with extrusion heights in metres.
fn buildings_source() -> SourceData {
    let footprint = |id, lng: f64, lat: f64, height: f64| {
        Feature::new(
            id,
            Geometry::polygon(vec![
                LngLat::new(lng, lat),
                LngLat::new(lng + 0.0008, lat),
                LngLat::new(lng + 0.0008, lat + 0.0005),
                LngLat::new(lng, lat + 0.0005),
            ]),
        )
        .with_property("height", height)
        .with_property("min_height", 0.0)
    };
    let features = vec![
        footprint(1, -0.1290, 51.5080, 45.0),
        footprint(2, -0.1250, 51.5060, 96.0),
        footprint(3, -0.1410, 51.4990, 30.0),
    ];
    SourceData::GeoJson(GeometryCollection::from(features).to_feature_collection())
}
