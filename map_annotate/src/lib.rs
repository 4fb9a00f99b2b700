//! Core library for annotating and measuring on an interactive map.
//!
//! The rendering engine and the drawing engine are external collaborators
//! reached through the [`engine::MapEngine`] and [`engine::DrawAdapter`]
//! traits. [`session::MapSession`] ties the tool state machine, the drawing
//! and measurement sessions and the restyle coordinator together so that
//! drawn geometry survives a full basemap swap.

pub mod basemap;
pub mod config;
pub mod display;
pub mod distance;
pub mod draw;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod io;
pub mod measure;
pub mod memory;
pub mod overlays;
pub mod restyle;
pub mod script;
pub mod session;
pub mod store;
pub mod tools;

pub use error::{Error, Result};
