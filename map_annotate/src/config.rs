//! Session configuration loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::basemap::Basemap;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Basemap loaded at startup.
    pub default_basemap: Basemap,
    /// Credential for the terrain tile service. Terrain stays off without it.
    pub terrain_api_key: Option<String>,
    /// Turn terrain on once the first style has loaded.
    pub terrain: bool,
    /// Overlay ids shown at startup; the others are added hidden.
    pub visible_overlays: Vec<String>,
    /// Show extruded 3D buildings.
    pub buildings: bool,
    /// Opacity of the WMS raster overlay, `0.0..=1.0`.
    pub wms_opacity: Option<f32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_basemap: Basemap::Voyager,
            terrain_api_key: None,
            terrain: false,
            visible_overlays: Vec::new(),
            buildings: false,
            wms_opacity: None,
        }
    }
}

pub fn read_config_json(path: &str) -> Result<SessionConfig> {
    let contents = crate::io::read_to_string(path)?;
    parse_config_json(&contents)
}

pub fn parse_config_json(text: &str) -> Result<SessionConfig> {
    Ok(serde_json::from_str(text)?)
}

pub fn write_config_json(path: &str, config: &SessionConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    crate::io::write_string(path, &json)?;
    Ok(())
}
