//! Basemap catalog and the style documents they load.

use serde::{Deserialize, Serialize};

/// Where the rendering engine fetches a style from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// Remote style document.
    Url(String),
    /// Inline style made of a single raster tile layer.
    Raster {
        tiles: Vec<String>,
        tile_size: u32,
        attribution: String,
        max_zoom: u8,
    },
}

/// Basemaps offered by the basemap selector.
///
/// Selecting a basemap replaces the whole rendering style, which destroys
/// every source and layer added on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basemap {
    #[default]
    Voyager,
    Positron,
    Dark,
    Osm,
}

impl Basemap {
    pub fn all() -> &'static [Basemap] {
        &[Basemap::Voyager, Basemap::Positron, Basemap::Dark, Basemap::Osm]
    }

    /// Selector value.
    pub fn name(&self) -> &'static str {
        match self {
            Basemap::Voyager => "voyager",
            Basemap::Positron => "positron",
            Basemap::Dark => "dark",
            Basemap::Osm => "osm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Basemap::Voyager => "Carto Voyager",
            Basemap::Positron => "Carto Positron",
            Basemap::Dark => "Carto Dark Matter",
            Basemap::Osm => "OpenStreetMap",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Style document for this basemap.
    pub fn style(&self) -> StyleSource {
        match self {
            Basemap::Voyager => carto("voyager-gl-style"),
            Basemap::Positron => carto("positron-gl-style"),
            Basemap::Dark => carto("dark-matter-gl-style"),
            Basemap::Osm => StyleSource::Raster {
                tiles: vec!["https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()],
                tile_size: 256,
                attribution: "\u{00A9} OpenStreetMap contributors".to_string(),
                max_zoom: 19,
            },
        }
    }
}

fn carto(style: &str) -> StyleSource {
    StyleSource::Url(format!(
        "https://basemaps.cartocdn.com/gl/{style}/style.json"
    ))
}

impl std::str::FromStr for Basemap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let names: Vec<&str> = Self::all().iter().map(|b| b.name()).collect();
            format!("unknown basemap '{s}', expected one of {}", names.join(", "))
        })
    }
}

impl std::fmt::Display for Basemap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for b in Basemap::all() {
            assert_eq!(Basemap::from_name(b.name()), Some(*b));
        }
        assert_eq!(Basemap::from_name(" DARK "), Some(Basemap::Dark));
        assert!("satellite".parse::<Basemap>().is_err());
    }

    #[test]
    fn osm_is_inline_raster() {
        match Basemap::Osm.style() {
            StyleSource::Raster { tile_size, max_zoom, .. } => {
                assert_eq!(tile_size, 256);
                assert_eq!(max_zoom, 19);
            }
            other => panic!("unexpected style {other:?}"),
        }
        assert_eq!(
            Basemap::Voyager.style(),
            StyleSource::Url("https://basemaps.cartocdn.com/gl/voyager-gl-style/style.json".into())
        );
    }
}
