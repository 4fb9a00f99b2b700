//! The map session: one context object owning all annotation state.

use std::collections::VecDeque;

use log::{debug, info};

use crate::basemap::Basemap;
use crate::config::SessionConfig;
use crate::display::StaticDisplay;
use crate::draw::DrawingSession;
use crate::engine::{MapEngine, StyleToken};
use crate::geometry::LngLat;
use crate::measure::MeasurementSession;
use crate::overlays::OverlaySet;
use crate::restyle::{RestyleCoordinator, RestyleSnapshot};
use crate::store::GeometryCollection;
use crate::tools::{ToolCommand, ToolMode, ToolModeController, Transition};

/// Requests received while a style swap is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Tool(ToolCommand),
    Clear,
}

/// Drives drawing, measuring and basemap switching on one map engine.
///
/// Between a style swap and its ready signal nothing touches the engine:
/// map clicks are dropped and tool or clear requests are queued until the
/// replay has run.
pub struct MapSession<E: MapEngine> {
    engine: E,
    basemap: Basemap,
    tools: ToolModeController,
    drawing: Option<DrawingSession<E::Adapter>>,
    measure: MeasurementSession,
    display: StaticDisplay,
    overlays: OverlaySet,
    restyle: RestyleCoordinator,
    deferred: VecDeque<Deferred>,
}

impl<E: MapEngine> MapSession<E> {
    /// Creates the session and starts loading the configured basemap. The
    /// session is usable once the first ready token is delivered.
    pub fn new(engine: E, config: &SessionConfig) -> Self {
        let mut session = Self {
            engine,
            basemap: config.default_basemap,
            tools: ToolModeController::new(),
            drawing: None,
            measure: MeasurementSession::new(),
            display: StaticDisplay::new(),
            overlays: OverlaySet::from_config(config),
            restyle: RestyleCoordinator::new(),
            deferred: VecDeque::new(),
        };
        let token = session.restyle.begin(RestyleSnapshot::empty(ToolMode::Idle));
        session.engine.set_style(&session.basemap.style(), token);
        session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn basemap(&self) -> Basemap {
        self.basemap
    }

    pub fn mode(&self) -> ToolMode {
        self.tools.current()
    }

    /// A style swap is waiting for its ready signal.
    pub fn is_restyling(&self) -> bool {
        self.restyle.is_pending()
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    /// Drawn features: the live session's, the frozen display's, or those
    /// held for replay while a swap is in flight.
    pub fn features(&self) -> GeometryCollection {
        if let Some(pending) = self.restyle.pending_features() {
            return pending.clone();
        }
        match &self.drawing {
            Some(drawing) if drawing.is_live() => drawing.snapshot(),
            _ => self.display.features().clone(),
        }
    }

    /// Features are showing as a read-only display.
    pub fn has_static_display(&self) -> bool {
        self.display.is_rendered()
    }

    pub fn is_drawing_live(&self) -> bool {
        self.drawing.as_ref().is_some_and(|d| d.is_live())
    }

    pub fn measurement(&self) -> &MeasurementSession {
        &self.measure
    }

    pub fn measure_label(&self) -> Option<String> {
        self.measure.label()
    }

    /// Toggles `mode`. Returns the mode active afterwards.
    pub fn activate(&mut self, mode: ToolMode) -> ToolMode {
        self.command(ToolCommand::Activate(mode))
    }

    pub fn deactivate_all(&mut self) -> ToolMode {
        self.command(ToolCommand::DeactivateAll)
    }

    fn command(&mut self, command: ToolCommand) -> ToolMode {
        if self.is_restyling() {
            debug!("deferring {command:?} until the style is ready");
            self.deferred.push_back(Deferred::Tool(command));
            return self.tools.current();
        }
        let transition = self.tools.apply(command);
        self.apply_transition(transition);
        transition.to
    }

    fn apply_transition(&mut self, t: Transition) {
        if t.is_noop() {
            return;
        }
        if t.is_geometry_switch() {
            if let (Some(drawing), Some(geometry_type)) = (&mut self.drawing, t.to.geometry_type()) {
                drawing.set_mode(geometry_type);
            }
            return;
        }

        // leave the outgoing tool
        match t.from {
            ToolMode::Measure => self.measure.end(&mut self.engine),
            mode if mode.is_drawing() => {
                if let Some(drawing) = &mut self.drawing {
                    let features = drawing.stop();
                    self.display.show(&mut self.engine, features);
                }
            }
            _ => {}
        }

        // enter the incoming tool
        match t.to {
            ToolMode::Measure => self.measure.begin(&mut self.engine),
            mode => {
                if let (Some(drawing), Some(geometry_type)) = (&mut self.drawing, mode.geometry_type()) {
                    let frozen = self.display.take(&mut self.engine);
                    drawing.start();
                    drawing.restore(frozen);
                    drawing.set_mode(geometry_type);
                }
            }
        }
    }

    /// Routes a map click to the active tool.
    pub fn click(&mut self, coord: LngLat) {
        if self.is_restyling() {
            debug!("ignoring click while the style is loading");
            return;
        }
        match self.tools.current() {
            ToolMode::Measure => self.measure.add_point(&mut self.engine, coord),
            mode if mode.is_drawing() => {
                if let Some(drawing) = &mut self.drawing {
                    drawing.click(coord);
                }
            }
            _ => {}
        }
    }

    /// Commits the line or polygon being drawn.
    pub fn finish_shape(&mut self) {
        if self.is_restyling() {
            return;
        }
        if let Some(drawing) = &mut self.drawing {
            drawing.finish();
        }
    }

    /// In measure mode, removes the measurement points and keeps measuring.
    /// Otherwise drops every drawn feature and returns to idle.
    pub fn clear(&mut self) {
        if self.is_restyling() {
            self.deferred.push_back(Deferred::Clear);
            return;
        }
        if self.tools.current() == ToolMode::Measure {
            self.measure.clear(&mut self.engine);
            return;
        }
        if let Some(drawing) = &mut self.drawing {
            drawing.clear();
            drawing.stop();
        }
        self.display.hide(&mut self.engine);
        let transition = self.tools.deactivate_all();
        debug!("cleared drawings, tool {} -> {}", transition.from, transition.to);
    }

    /// Switches the basemap. Selecting the current basemap does nothing.
    pub fn select_basemap(&mut self, basemap: Basemap) -> bool {
        if basemap == self.basemap {
            debug!("basemap {basemap} already active");
            return false;
        }
        info!("switching basemap {} -> {}", self.basemap, basemap);
        self.basemap = basemap;

        let snapshot = if self.restyle.is_pending() {
            RestyleSnapshot::empty(self.tools.current())
        } else {
            let snapshot = RestyleSnapshot::capture(
                self.drawing.as_mut(),
                &mut self.display,
                self.tools.current(),
            );
            self.drawing = None;
            snapshot
        };
        let token = self.restyle.begin(snapshot);
        self.engine.set_style(&basemap.style(), token);
        true
    }

    /// Delivers the ready signal of a style swap and replays the snapshot.
    pub fn on_style_ready(&mut self, token: StyleToken) {
        let Some(snapshot) = self.restyle.complete(token) else {
            return;
        };
        self.drawing = Some(RestyleCoordinator::replay(
            &mut self.engine,
            snapshot,
            &mut self.display,
        ));
        self.overlays.apply(&mut self.engine);
        if self.measure.is_active() {
            self.measure.render(&mut self.engine);
        }
        info!("style {} ready", self.basemap);

        while let Some(request) = self.deferred.pop_front() {
            match request {
                Deferred::Tool(command) => {
                    self.command(command);
                }
                Deferred::Clear => self.clear(),
            }
        }
    }

    /// Shows or hides an overlay. Returns `false` for an unknown id.
    pub fn set_overlay_visible(&mut self, id: &str, visible: bool) -> bool {
        if !self.overlays.set_visible(id, visible) {
            return false;
        }
        if !self.is_restyling() {
            self.overlays.apply_visibility(&mut self.engine, id);
        }
        true
    }

    /// Turns terrain on or off. Returns whether the request took effect.
    pub fn set_terrain(&mut self, enabled: bool) -> bool {
        let applied = self.overlays.set_terrain(enabled);
        if applied && !self.is_restyling() {
            self.overlays.apply_3d(&mut self.engine);
        }
        applied
    }

    /// Shows or hides extruded buildings.
    pub fn set_buildings(&mut self, enabled: bool) {
        self.overlays.set_buildings(enabled);
        if !self.is_restyling() {
            self.overlays.apply_3d(&mut self.engine);
        }
    }

    /// Sets the WMS raster opacity. It is kept across basemap switches.
    pub fn set_wms_opacity(&mut self, opacity: f32) -> bool {
        if !self.overlays.set_wms_opacity(opacity) {
            return false;
        }
        if !self.is_restyling() {
            self.overlays.apply_wms_opacity(&mut self.engine);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEngine;

    fn ready(session: &mut MapSession<MemoryEngine>) {
        let token = session.engine_mut().take_ready_token().unwrap();
        session.on_style_ready(token);
    }

    #[test]
    fn first_style_load_gates_input() {
        let mut s = MapSession::new(MemoryEngine::new(), &SessionConfig::default());
        assert!(s.is_restyling());
        assert_eq!(s.activate(ToolMode::DrawPoint), ToolMode::Idle);
        s.click(LngLat::new(0.0, 0.0));
        ready(&mut s);
        assert_eq!(s.mode(), ToolMode::DrawPoint);
        assert!(s.features().is_empty());
        s.click(LngLat::new(0.0, 0.0));
        assert_eq!(s.features().len(), 1);
    }

    #[test]
    fn same_basemap_is_noop() {
        let mut s = MapSession::new(MemoryEngine::new(), &SessionConfig::default());
        ready(&mut s);
        assert!(!s.select_basemap(Basemap::Voyager));
        assert_eq!(s.engine().style_loads(), 1);
    }

    #[test]
    fn overlays_readded_after_swap() {
        let mut s = MapSession::new(MemoryEngine::new(), &SessionConfig::default());
        ready(&mut s);
        assert!(s.set_overlay_visible("transport", true));
        assert!(!s.set_overlay_visible("missing", true));
        s.select_basemap(Basemap::Dark);
        assert!(!s.engine().has_layer("transport-layer"));
        ready(&mut s);
        assert!(s.engine().layer("transport-layer").unwrap().visible);
    }

    #[test]
    fn three_d_settings_survive_swap() {
        use crate::overlays::{BUILDINGS_LAYER_ID, PITCH_3D, WMS_LAYER_ID};

        let mut s = MapSession::new(MemoryEngine::new(), &SessionConfig::default());
        ready(&mut s);
        s.set_buildings(true);
        assert!(s.set_wms_opacity(0.3));
        assert!(s.engine().has_layer(BUILDINGS_LAYER_ID));
        assert_eq!(s.engine().layer(WMS_LAYER_ID).unwrap().paint.opacity, 0.3);
        assert_eq!(s.engine().pitch(), PITCH_3D);

        s.select_basemap(Basemap::Positron);
        assert!(!s.engine().has_layer(BUILDINGS_LAYER_ID));
        ready(&mut s);
        assert!(s.engine().has_layer(BUILDINGS_LAYER_ID));
        assert_eq!(s.engine().layer(WMS_LAYER_ID).unwrap().paint.opacity, 0.3);

        s.set_buildings(false);
        assert!(!s.engine().has_layer(BUILDINGS_LAYER_ID));
        assert_eq!(s.engine().pitch(), 0.0);
    }

    #[test]
    fn wms_opacity_set_during_swap_applies_on_ready() {
        let mut s = MapSession::new(MemoryEngine::new(), &SessionConfig::default());
        ready(&mut s);
        s.select_basemap(Basemap::Dark);
        assert!(s.set_wms_opacity(1.5));
        ready(&mut s);
        assert_eq!(s.engine().layer("wms-layer").unwrap().paint.opacity, 1.0);
    }
}
