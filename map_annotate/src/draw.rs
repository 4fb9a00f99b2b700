//! Drawing session wrapping the external drawing adapter.

use log::debug;

use crate::engine::DrawAdapter;
use crate::geometry::{GeometryType, LngLat};
use crate::store::GeometryCollection;

/// Mediates between pointer input and the drawn features.
///
/// A snapshot taken before [`DrawingSession::stop`] and passed to
/// [`DrawingSession::restore`] after a restart reconstructs the same
/// collection, feature for feature and in order.
#[derive(Debug)]
pub struct DrawingSession<A: DrawAdapter> {
    adapter: A,
}

impl<A: DrawAdapter> DrawingSession<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// Whether the session accepts input.
    pub fn is_live(&self) -> bool {
        self.adapter.is_enabled()
    }

    /// Begins accepting input. Does nothing if already started.
    pub fn start(&mut self) {
        if !self.adapter.is_enabled() {
            debug!("starting drawing session");
            self.adapter.start();
        }
    }

    /// Switches the geometry type produced by further input. The shape in
    /// progress is committed first.
    pub fn set_mode(&mut self, mode: GeometryType) {
        if self.adapter.mode() == Some(mode) {
            return;
        }
        self.adapter.finish();
        self.adapter.set_mode(mode);
    }

    pub fn mode(&self) -> Option<GeometryType> {
        self.adapter.mode()
    }

    /// Current features without ending the session.
    pub fn snapshot(&self) -> GeometryCollection {
        GeometryCollection::from(self.adapter.snapshot())
    }

    /// Commits the shape in progress and stops accepting input. Returns the
    /// features held at that moment; the caller decides whether to freeze
    /// them into a static display or drop them.
    pub fn stop(&mut self) -> GeometryCollection {
        if !self.adapter.is_enabled() {
            return GeometryCollection::new();
        }
        self.adapter.finish();
        let features = self.snapshot();
        self.adapter.stop();
        debug!("stopped drawing session with {} features", features.len());
        features
    }

    /// Seeds the session with previously captured features.
    pub fn restore(&mut self, features: GeometryCollection) {
        if features.is_empty() {
            return;
        }
        debug!("restoring {} features", features.len());
        self.adapter.add_features(features.into_vec());
    }

    pub fn click(&mut self, coord: LngLat) {
        if self.adapter.is_enabled() {
            self.adapter.click(coord);
        }
    }

    /// Commits the line or polygon in progress.
    pub fn finish(&mut self) {
        if self.adapter.is_enabled() {
            self.adapter.finish();
        }
    }

    /// Drops every feature, committed or in progress.
    pub fn clear(&mut self) {
        self.adapter.clear();
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}
