//! Errors raised by file and configuration I/O.
//!
//! The interactive session itself never fails; these only surface when
//! reading or writing files.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
    #[error("line {line}: {message}")]
    InvalidScript { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
