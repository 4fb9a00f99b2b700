use map_annotate::engine::MapEngine;
use map_annotate::{
    config::SessionConfig,
    geometry::LngLat,
    measure::{MEASURE_LINE_ID, MEASURE_POINTS_ID},
    memory::MemoryEngine,
    session::MapSession,
    tools::{ToolMode, ToolModeController},
};

fn loaded_session() -> MapSession<MemoryEngine> {
    let mut session = MapSession::new(MemoryEngine::new(), &SessionConfig::default());
    let token = session.engine_mut().take_ready_token().unwrap();
    session.on_style_ready(token);
    session
}

#[test]
fn controller_never_has_two_modes() {
    let sequence = [
        ToolMode::DrawPoint,
        ToolMode::Measure,
        ToolMode::Measure,
        ToolMode::DrawLine,
        ToolMode::DrawPolygon,
        ToolMode::Idle,
        ToolMode::DrawPolygon,
        ToolMode::DrawPolygon,
    ];
    let mut controller = ToolModeController::new();
    let mut previous = controller.current();
    for mode in sequence {
        let t = controller.activate(mode);
        assert_eq!(t.from, previous);
        assert_eq!(controller.current(), t.to);
        previous = t.to;
    }
    assert_eq!(controller.current(), ToolMode::Idle);
}

#[test]
fn only_one_tool_is_live() {
    let mut session = loaded_session();
    for mode in [
        ToolMode::DrawLine,
        ToolMode::Measure,
        ToolMode::DrawPoint,
        ToolMode::Measure,
        ToolMode::Measure,
    ] {
        session.activate(mode);
        let measuring = session.measurement().is_active();
        let drawing = session.is_drawing_live();
        assert!(!(measuring && drawing), "both tools live after {mode}");
        assert_eq!(measuring, session.mode() == ToolMode::Measure);
        assert_eq!(drawing, session.mode().is_drawing());
    }
}

#[test]
fn measure_freezes_drawings() {
    let mut session = loaded_session();
    session.activate(ToolMode::DrawPoint);
    session.click(LngLat::new(0.0, 0.0));
    session.activate(ToolMode::Measure);
    assert!(session.has_static_display());

    // clicks now measure instead of drawing
    session.click(LngLat::new(0.0, 0.0));
    session.click(LngLat::new(0.0, 1.0));
    assert_eq!(session.features().len(), 1);
    assert_eq!(session.measure_label().as_deref(), Some("111.19 km"));

    // leaving measure mode removes the measurement but keeps the frozen display
    session.deactivate_all();
    assert!(session.has_static_display());
    assert!(!session.engine().has_layer(MEASURE_LINE_ID));
    assert!(!session.engine().has_layer(MEASURE_POINTS_ID));
    assert!(session.measure_label().is_none());
}

#[test]
fn clear_in_draw_mode_drops_features() {
    let mut session = loaded_session();
    session.activate(ToolMode::DrawPoint);
    session.click(LngLat::new(0.0, 0.0));
    session.clear();
    assert_eq!(session.mode(), ToolMode::Idle);
    assert!(session.features().is_empty());
    assert!(!session.has_static_display());
}

#[test]
fn idle_clicks_do_nothing() {
    let mut session = loaded_session();
    session.click(LngLat::new(0.0, 0.0));
    assert!(session.features().is_empty());
    assert!(session.measurement().points().is_empty());
}

#[test]
fn double_clicked_vertex_does_not_commit_polygon() {
    let mut session = loaded_session();
    session.activate(ToolMode::DrawPolygon);
    for (lng, lat) in [(0.0, 0.0), (1.0, 1.0), (1.0, 1.0)] {
        session.click(LngLat::new(lng, lat));
    }
    session.finish_shape();
    assert!(session.features().is_empty());
}
