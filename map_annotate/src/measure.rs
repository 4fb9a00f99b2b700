//! Interactive distance measurement.

use log::debug;

use crate::distance::{format_distance, path_length_km};
use crate::engine::{
    ensure_layer, remove_layer_if_present, remove_source_if_present, upsert_geojson_source,
    LayerKind, LayerPaint, LayerSpec, MapEngine,
};
use crate::geometry::{Feature, Geometry, LngLat};
use crate::store::GeometryCollection;

pub const MEASURE_LINE_ID: &str = "measure-line";
pub const MEASURE_POINTS_ID: &str = "measure-points";

const MEASURE_COLOR: &str = "#FF5722";

/// Clicked points of the current measurement and the derived distance.
#[derive(Debug, Default)]
pub struct MeasurementSession {
    points: Vec<LngLat>,
    distance_km: f64,
    active: bool,
}

impl MeasurementSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn points(&self) -> &[LngLat] {
        &self.points
    }

    /// Cumulative great-circle distance in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Formatted distance, available from the second point on.
    pub fn label(&self) -> Option<String> {
        (self.points.len() >= 2).then(|| format_distance(self.distance_km))
    }

    /// Starts a fresh measurement.
    pub fn begin<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        self.remove_rendering(engine);
        self.points.clear();
        self.distance_km = 0.0;
        self.active = true;
        debug!("measurement started");
    }

    /// Appends a point. Ignored unless the session is active.
    pub fn add_point<E: MapEngine + ?Sized>(&mut self, engine: &mut E, coord: LngLat) {
        if !self.active {
            return;
        }
        self.points.push(coord);
        self.distance_km = path_length_km(&self.points);
        self.render(engine);
    }

    /// Removes the points and markers but keeps measuring.
    pub fn clear<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        self.remove_rendering(engine);
        self.points.clear();
        self.distance_km = 0.0;
    }

    /// Ends the measurement and removes the line and markers.
    pub fn end<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        self.clear(engine);
        self.active = false;
        debug!("measurement ended");
    }

    /// Draws the line (from two points on) and the point markers. The last
    /// marker carries the distance label.
    pub fn render<E: MapEngine + ?Sized>(&self, engine: &mut E) {
        if self.points.is_empty() {
            return;
        }
        if self.points.len() >= 2 {
            let line = GeometryCollection::from(vec![Feature::new(
                1,
                Geometry::LineString(self.points.clone()),
            )]);
            upsert_geojson_source(engine, MEASURE_LINE_ID, line.to_feature_collection());
            ensure_layer(
                engine,
                LayerSpec::new(
                    MEASURE_LINE_ID,
                    MEASURE_LINE_ID,
                    LayerKind::Line,
                    LayerPaint::new(MEASURE_COLOR, 3.0).dashed(),
                ),
            );
        }

        let label = self.label();
        let last = self.points.len() - 1;
        let markers: Vec<Feature> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let marker = Feature::new(i as u64 + 1, Geometry::Point(*p));
                match (&label, i == last) {
                    (Some(text), true) => marker.with_property("label", text.as_str()),
                    _ => marker,
                }
            })
            .collect();
        upsert_geojson_source(
            engine,
            MEASURE_POINTS_ID,
            GeometryCollection::from(markers).to_feature_collection(),
        );
        ensure_layer(
            engine,
            LayerSpec::new(
                MEASURE_POINTS_ID,
                MEASURE_POINTS_ID,
                LayerKind::Circle,
                LayerPaint::new(MEASURE_COLOR, 5.0),
            ),
        );
    }

    fn remove_rendering<E: MapEngine + ?Sized>(&self, engine: &mut E) {
        for id in [MEASURE_LINE_ID, MEASURE_POINTS_ID] {
            remove_layer_if_present(engine, id);
            remove_source_if_present(engine, id);
        }
    }
}
