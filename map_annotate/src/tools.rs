//! Exclusive tool modes and the state machine arbitrating between them.

use log::debug;

use crate::geometry::GeometryType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolMode {
    /// Pan/idle: no tool accepts map clicks.
    #[default]
    Idle,
    DrawPoint,
    DrawLine,
    DrawPolygon,
    Measure,
}

impl ToolMode {
    pub fn all() -> &'static [ToolMode] {
        &[
            ToolMode::Idle,
            ToolMode::DrawPoint,
            ToolMode::DrawLine,
            ToolMode::DrawPolygon,
            ToolMode::Measure,
        ]
    }

    /// Control name, as used by the toolbar buttons.
    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Idle => "idle",
            ToolMode::DrawPoint => "draw-point",
            ToolMode::DrawLine => "draw-line",
            ToolMode::DrawPolygon => "draw-polygon",
            ToolMode::Measure => "measure",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.name() == name.trim())
    }

    /// Geometry type produced by a drawing mode.
    pub fn geometry_type(&self) -> Option<GeometryType> {
        match self {
            ToolMode::DrawPoint => Some(GeometryType::Point),
            ToolMode::DrawLine => Some(GeometryType::LineString),
            ToolMode::DrawPolygon => Some(GeometryType::Polygon),
            ToolMode::Idle | ToolMode::Measure => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.geometry_type().is_some()
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Commands accepted by [`ToolModeController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCommand {
    /// Toggle `mode`: activating the current mode returns to idle.
    Activate(ToolMode),
    DeactivateAll,
}

/// Result of applying a command. `from` is deactivated before `to` is
/// activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ToolMode,
    pub to: ToolMode,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Drawing stays live, only the geometry type changes.
    pub fn is_geometry_switch(&self) -> bool {
        self.from.is_drawing() && self.to.is_drawing()
    }
}

/// Single source of truth for the active tool.
#[derive(Debug, Default)]
pub struct ToolModeController {
    current: ToolMode,
}

impl ToolModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ToolMode {
        self.current
    }

    pub fn apply(&mut self, command: ToolCommand) -> Transition {
        let from = self.current;
        let to = match command {
            ToolCommand::Activate(mode) if mode == from => ToolMode::Idle,
            ToolCommand::Activate(mode) => mode,
            ToolCommand::DeactivateAll => ToolMode::Idle,
        };
        self.current = to;
        if from != to {
            debug!("tool {from} -> {to}");
        }
        Transition { from, to }
    }

    pub fn activate(&mut self, mode: ToolMode) -> Transition {
        self.apply(ToolCommand::Activate(mode))
    }

    pub fn deactivate_all(&mut self) -> Transition {
        self.apply(ToolCommand::DeactivateAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activating_current_mode_toggles_off() {
        let mut c = ToolModeController::new();
        let t = c.activate(ToolMode::DrawLine);
        assert_eq!(t, Transition { from: ToolMode::Idle, to: ToolMode::DrawLine });
        let t = c.activate(ToolMode::DrawLine);
        assert_eq!(t.to, ToolMode::Idle);
        assert_eq!(c.current(), ToolMode::Idle);
    }

    #[test]
    fn new_mode_replaces_previous() {
        let mut c = ToolModeController::new();
        c.activate(ToolMode::Measure);
        let t = c.activate(ToolMode::DrawPolygon);
        assert_eq!(t.from, ToolMode::Measure);
        assert_eq!(c.current(), ToolMode::DrawPolygon);
        assert!(!t.is_geometry_switch());
        assert!(c.activate(ToolMode::DrawPoint).is_geometry_switch());
    }

    #[test]
    fn deactivate_all_from_idle_is_noop() {
        let mut c = ToolModeController::new();
        assert!(c.deactivate_all().is_noop());
        c.activate(ToolMode::Measure);
        assert_eq!(c.deactivate_all().to, ToolMode::Idle);
    }

    #[test]
    fn names_roundtrip() {
        for mode in ToolMode::all() {
            assert_eq!(ToolMode::from_name(mode.name()), Some(*mode));
        }
        assert_eq!(ToolMode::from_name("lasso"), None);
    }
}
