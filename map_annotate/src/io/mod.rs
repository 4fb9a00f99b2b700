//! File input and output helpers for annotation data.

use std::fs::File;
use std::io::{self, Read, Write};

use geojson::GeoJson;

use crate::error::{Error, Result};
use crate::store::GeometryCollection;

/// Reads a file to string.
pub fn read_to_string(path: &str) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Writes a string to a file, replacing its contents.
pub fn write_string(path: &str, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())
}

/// Parses a GeoJSON FeatureCollection into annotation features.
pub fn parse_features_geojson(text: &str) -> Result<GeometryCollection> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => Ok(GeometryCollection::from_feature_collection(&fc)),
        _ => Err(Error::NotFeatureCollection),
    }
}

/// Reads annotation features from a GeoJSON FeatureCollection file.
pub fn read_features_geojson(path: &str) -> Result<GeometryCollection> {
    let contents = read_to_string(path)?;
    parse_features_geojson(&contents)
}

/// Writes annotation features as a GeoJSON FeatureCollection.
pub fn write_features_geojson(path: &str, features: &GeometryCollection) -> Result<()> {
    let json = serde_json::to_string_pretty(&features.to_feature_collection())?;
    write_string(path, &json)?;
    Ok(())
}
