//! Carrying drawn geometry across a destructive basemap swap.
//!
//! A swap runs in three steps: capture a [`RestyleSnapshot`] while the old
//! style is still alive, ask the engine for the new style, and replay the
//! snapshot once the engine returns the matching [`StyleToken`].

use log::{debug, info};

use crate::display::StaticDisplay;
use crate::draw::DrawingSession;
use crate::engine::{DrawAdapter, MapEngine, StyleToken};
use crate::store::GeometryCollection;
use crate::tools::ToolMode;

/// State captured immediately before a style swap.
#[derive(Debug, Clone, PartialEq)]
pub struct RestyleSnapshot {
    pub features: GeometryCollection,
    pub active_mode: ToolMode,
    pub was_session_active: bool,
}

impl RestyleSnapshot {
    pub fn empty(active_mode: ToolMode) -> Self {
        Self {
            features: GeometryCollection::new(),
            active_mode,
            was_session_active: false,
        }
    }

    /// Captures from a live drawing session if there is one, otherwise from
    /// the static display. The drawing session is stopped and the display
    /// detached; neither is usable once the style goes away.
    pub fn capture<A: DrawAdapter>(
        drawing: Option<&mut DrawingSession<A>>,
        display: &mut StaticDisplay,
        active_mode: ToolMode,
    ) -> Self {
        match drawing {
            Some(session) if session.is_live() => Self {
                features: session.stop(),
                active_mode,
                was_session_active: true,
            },
            _ => Self {
                features: display.detach(),
                active_mode,
                was_session_active: false,
            },
        }
    }
}

#[derive(Debug)]
struct PendingRestyle {
    generation: u64,
    snapshot: RestyleSnapshot,
}

/// Owns the snapshot between the swap request and the ready signal.
#[derive(Debug, Default)]
pub struct RestyleCoordinator {
    generation: u64,
    pending: Option<PendingRestyle>,
}

impl RestyleCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A swap was requested and its ready signal has not arrived.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Features held by the pending snapshot.
    pub fn pending_features(&self) -> Option<&GeometryCollection> {
        self.pending.as_ref().map(|p| &p.snapshot.features)
    }

    /// Stores `snapshot` and issues the token for the new style. If a swap
    /// is already pending its snapshot is kept, since nothing was rebuilt in
    /// between, and `snapshot` is dropped.
    pub fn begin(&mut self, snapshot: RestyleSnapshot) -> StyleToken {
        self.generation += 1;
        match &mut self.pending {
            Some(pending) => {
                debug!("superseding pending style swap {}", pending.generation);
                pending.generation = self.generation;
            }
            None => {
                debug!(
                    "captured {} features (session active: {})",
                    snapshot.features.len(),
                    snapshot.was_session_active
                );
                self.pending = Some(PendingRestyle {
                    generation: self.generation,
                    snapshot,
                });
            }
        }
        StyleToken::new(self.generation)
    }

    /// Consumes the ready token. Returns the snapshot exactly once, for the
    /// latest swap; tokens from superseded swaps yield `None`.
    pub fn complete(&mut self, token: StyleToken) -> Option<RestyleSnapshot> {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == token.generation());
        if current {
            self.pending.take().map(|p| p.snapshot)
        } else {
            debug!("ignoring stale style token {}", token.generation());
            None
        }
    }

    /// Rebuilds drawing state on the freshly loaded style.
    ///
    /// A session that was live is restarted, reseeded and put back in its
    /// geometry mode. Otherwise captured features go to the static display.
    pub fn replay<E: MapEngine>(
        engine: &mut E,
        snapshot: RestyleSnapshot,
        display: &mut StaticDisplay,
    ) -> DrawingSession<E::Adapter> {
        let mut drawing = DrawingSession::new(engine.draw_adapter());
        if snapshot.was_session_active {
            info!("replaying {} features into live session", snapshot.features.len());
            drawing.start();
            drawing.restore(snapshot.features);
            if let Some(geometry_type) = snapshot.active_mode.geometry_type() {
                drawing.set_mode(geometry_type);
            }
        } else if !snapshot.features.is_empty() {
            info!("replaying {} features as static display", snapshot.features.len());
            display.show(engine, snapshot.features);
        }
        drawing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Feature, Geometry, LngLat};

    fn snapshot(n: u64) -> RestyleSnapshot {
        let features = (1..=n)
            .map(|i| Feature::new(i, Geometry::Point(LngLat::new(i as f64, 0.0))))
            .collect::<Vec<_>>();
        RestyleSnapshot {
            features: GeometryCollection::from(features),
            active_mode: ToolMode::DrawPoint,
            was_session_active: true,
        }
    }

    #[test]
    fn snapshot_consumed_once() {
        let mut c = RestyleCoordinator::new();
        let token = c.begin(snapshot(2));
        assert!(c.is_pending());
        let s = c.complete(token).unwrap();
        assert_eq!(s.features.len(), 2);
        assert!(!c.is_pending());
    }

    #[test]
    fn superseded_swap_keeps_first_snapshot() {
        let mut c = RestyleCoordinator::new();
        let stale = c.begin(snapshot(3));
        let fresh = c.begin(RestyleSnapshot::empty(ToolMode::Idle));
        assert!(c.complete(stale).is_none());
        assert!(c.is_pending());
        let s = c.complete(fresh).unwrap();
        assert_eq!(s.features.len(), 3);
        assert!(s.was_session_active);
    }
}
