//! Line-oriented interaction scripts replayed against the headless engine.
//!
//! ```text
//! # draw a line, switch basemap, keep drawing
//! tool draw-line
//! click -2.50 51.50
//! click -2.40 51.55
//! finish
//! basemap dark
//! ready
//! buildings on
//! wms-opacity 40
//! ```

use log::debug;

use crate::basemap::Basemap;
use crate::error::{Error, Result};
use crate::geometry::LngLat;
use crate::memory::MemoryEngine;
use crate::session::MapSession;
use crate::tools::ToolMode;

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Tool(ToolMode),
    Idle,
    Click(LngLat),
    Finish,
    Clear,
    Basemap(Basemap),
    /// Deliver the ready signal of the style load in flight.
    Ready,
    Overlay { id: String, visible: bool },
    Terrain(bool),
    Buildings(bool),
    /// WMS raster opacity as a fraction; written as a percentage.
    WmsOpacity(f32),
}

impl Step {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> std::result::Result<Option<Step>, String> {
        let line = line.split('#').next().unwrap_or("").trim();
        let words: Vec<&str> = line.split_whitespace().collect();
        let step = match words.as_slice() {
            [] => return Ok(None),
            ["tool", name] => Step::Tool(
                ToolMode::from_name(name).ok_or_else(|| format!("unknown tool '{name}'"))?,
            ),
            ["idle"] => Step::Idle,
            ["click", lng, lat] => Step::Click(LngLat::new(number(lng)?, number(lat)?)),
            ["finish"] => Step::Finish,
            ["clear"] => Step::Clear,
            ["basemap", name] => Step::Basemap(name.parse()?),
            ["ready"] => Step::Ready,
            ["overlay", id, state] => Step::Overlay {
                id: id.to_string(),
                visible: switch(state)?,
            },
            ["terrain", state] => Step::Terrain(switch(state)?),
            ["buildings", state] => Step::Buildings(switch(state)?),
            ["wms-opacity", percent] => Step::WmsOpacity(number(percent)? as f32 / 100.0),
            _ => return Err(format!("unrecognised step '{line}'")),
        };
        Ok(Some(step))
    }
}

fn number(word: &str) -> std::result::Result<f64, String> {
    word.parse::<f64>().map_err(|e| format!("{word}: {e}"))
}

fn switch(word: &str) -> std::result::Result<bool, String> {
    match word {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected on or off but got '{other}'")),
    }
}

/// Parses a whole script, reporting the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        match Step::parse(line) {
            Ok(Some(step)) => steps.push(step),
            Ok(None) => {}
            Err(message) => {
                return Err(Error::InvalidScript {
                    line: idx + 1,
                    message,
                })
            }
        }
    }
    Ok(steps)
}

/// Applies `steps` in order. With `auto_ready` every style load completes
/// right away instead of waiting for a `ready` step.
pub fn run(session: &mut MapSession<MemoryEngine>, steps: &[Step], auto_ready: bool) {
    for step in steps {
        debug!("step {step:?}");
        match step {
            Step::Tool(mode) => {
                session.activate(*mode);
            }
            Step::Idle => {
                session.deactivate_all();
            }
            Step::Click(coord) => session.click(*coord),
            Step::Finish => session.finish_shape(),
            Step::Clear => session.clear(),
            Step::Basemap(basemap) => {
                session.select_basemap(*basemap);
            }
            Step::Ready => deliver_ready(session),
            Step::Overlay { id, visible } => {
                session.set_overlay_visible(id, *visible);
            }
            Step::Terrain(enabled) => {
                session.set_terrain(*enabled);
            }
            Step::Buildings(enabled) => session.set_buildings(*enabled),
            Step::WmsOpacity(opacity) => {
                session.set_wms_opacity(*opacity);
            }
        }
        if auto_ready {
            deliver_ready(session);
        }
    }
}

/// Completes the style load in flight, if any.
pub fn deliver_ready(session: &mut MapSession<MemoryEngine>) {
    if let Some(token) = session.engine_mut().take_ready_token() {
        session.on_style_ready(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_steps() {
        let steps = parse_script(
            "# comment\ntool draw-line\nclick -2.5 51.5 # trailing\n\nbasemap dark\nready\noverlay poi on\n",
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Tool(ToolMode::DrawLine),
                Step::Click(LngLat::new(-2.5, 51.5)),
                Step::Basemap(Basemap::Dark),
                Step::Ready,
                Step::Overlay {
                    id: "poi".into(),
                    visible: true
                },
            ]
        );
    }

    #[test]
    fn bad_line_is_reported() {
        let err = parse_script("tool draw-line\nclick 1.0\n").unwrap_err();
        match err {
            Error::InvalidScript { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn unknown_tool_rejected() {
        assert!(Step::parse("tool lasso").is_err());
        assert!(Step::parse("terrain maybe").is_err());
        assert!(Step::parse("wms-opacity half").is_err());
    }

    #[test]
    fn parse_three_d_steps() {
        assert_eq!(Step::parse("buildings on"), Ok(Some(Step::Buildings(true))));
        assert_eq!(Step::parse("wms-opacity 50"), Ok(Some(Step::WmsOpacity(0.5))));
    }
}
