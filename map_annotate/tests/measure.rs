use map_annotate::engine::MapEngine;
use map_annotate::{
    config::SessionConfig,
    distance::{format_distance, haversine_km, path_length_km},
    geometry::LngLat,
    measure::{MeasurementSession, MEASURE_LINE_ID},
    memory::MemoryEngine,
    session::MapSession,
    tools::ToolMode,
};

#[test]
fn one_degree_along_meridian() {
    let d = haversine_km(LngLat::new(0.0, 0.0), LngLat::new(0.0, 1.0));
    assert!((d - 111.19).abs() <= 111.19 * 0.005);
}

#[test]
fn distance_is_monotonic() {
    let mut engine = MemoryEngine::new();
    let mut m = MeasurementSession::new();
    m.begin(&mut engine);
    let points = [
        (-2.5, 51.5),
        (-2.4, 51.5),
        (-2.4, 51.5),
        (-2.3, 51.6),
        (-2.5, 51.5),
    ];
    let mut last = 0.0;
    for (i, (lng, lat)) in points.iter().enumerate() {
        m.add_point(&mut engine, LngLat::new(*lng, *lat));
        assert!(m.distance_km() >= last);
        if i == 2 {
            assert_eq!(m.distance_km(), last, "repeated point adds distance");
        }
        last = m.distance_km();
    }
}

#[test]
fn cumulative_matches_path_length() {
    let pts = vec![
        LngLat::new(0.0, 0.0),
        LngLat::new(0.0, 1.0),
        LngLat::new(1.0, 1.0),
    ];
    let mut engine = MemoryEngine::new();
    let mut m = MeasurementSession::new();
    m.begin(&mut engine);
    for p in &pts {
        m.add_point(&mut engine, *p);
    }
    assert!((m.distance_km() - path_length_km(&pts)).abs() < 1e-9);
    assert_eq!(m.label(), Some(format_distance(path_length_km(&pts))));
}

#[test]
fn display_threshold() {
    assert_eq!(format_distance(0.999), "999 m");
    assert_eq!(format_distance(1.0), "1.00 km");
}

#[test]
fn clear_in_measure_mode_keeps_drawings() {
    let mut session = MapSession::new(MemoryEngine::new(), &SessionConfig::default());
    let token = session.engine_mut().take_ready_token().unwrap();
    session.on_style_ready(token);

    session.activate(ToolMode::DrawLine);
    session.click(LngLat::new(0.0, 0.0));
    session.click(LngLat::new(1.0, 1.0));
    session.finish_shape();
    let drawn = session.features();

    session.activate(ToolMode::Measure);
    session.click(LngLat::new(0.0, 0.0));
    session.click(LngLat::new(0.0, 0.5));
    assert!(session.engine().has_layer(MEASURE_LINE_ID));

    session.clear();
    assert_eq!(session.mode(), ToolMode::Measure);
    assert!(session.measurement().points().is_empty());
    assert!(!session.engine().has_layer(MEASURE_LINE_ID));
    assert_eq!(session.features(), drawn);
    assert!(session.has_static_display());
}

#[test]
fn measurement_redrawn_after_basemap_switch() {
    let mut session = MapSession::new(MemoryEngine::new(), &SessionConfig::default());
    let token = session.engine_mut().take_ready_token().unwrap();
    session.on_style_ready(token);

    session.activate(ToolMode::Measure);
    session.click(LngLat::new(0.0, 0.0));
    session.click(LngLat::new(0.0, 1.0));
    session.select_basemap(map_annotate::basemap::Basemap::Dark);
    assert!(!session.engine().has_layer(MEASURE_LINE_ID));

    let token = session.engine_mut().take_ready_token().unwrap();
    session.on_style_ready(token);
    assert_eq!(session.mode(), ToolMode::Measure);
    assert!(session.engine().has_layer(MEASURE_LINE_ID));
    assert_eq!(session.measure_label().as_deref(), Some("111.19 km"));
}
