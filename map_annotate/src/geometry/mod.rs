//! Geometry primitives for drawn annotations.

mod point;

pub use point::LngLat;

use geojson::Value;

/// Identity of a feature inside a [`crate::store::GeometryCollection`].
pub type FeatureId = u64;

/// Opaque key/value metadata attached to a feature.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Geometry types the drawing tools produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

impl GeometryType {
    pub fn all() -> &'static [GeometryType] {
        &[
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::Polygon,
        ]
    }

    /// GeoJSON type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
        }
    }

    /// Name of the drawing mode that produces this type.
    pub fn mode_name(&self) -> &'static str {
        match self {
            GeometryType::Point => "point",
            GeometryType::LineString => "linestring",
            GeometryType::Polygon => "polygon",
        }
    }
}

/// A drawn geometry in WGS84 degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LngLat),
    LineString(Vec<LngLat>),
    /// Rings; the first ring is the outer boundary and is closed.
    Polygon(Vec<Vec<LngLat>>),
}

impl Geometry {
    /// Builds a single-ring polygon, closing the ring if needed.
    pub fn polygon(mut vertices: Vec<LngLat>) -> Self {
        if let (Some(first), Some(last)) = (vertices.first().copied(), vertices.last()) {
            if first != *last {
                vertices.push(first);
            }
        }
        Geometry::Polygon(vec![vertices])
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
        }
    }

    /// All vertices in drawing order, rings concatenated.
    pub fn coordinates(&self) -> Vec<LngLat> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::LineString(pts) => pts.clone(),
            Geometry::Polygon(rings) => rings.iter().flatten().copied().collect(),
        }
    }

    /// Lines need two vertices; polygons a closed outer ring of at least
    /// three distinct vertices.
    pub fn is_valid(&self) -> bool {
        match self {
            Geometry::Point(_) => true,
            Geometry::LineString(pts) => pts.len() >= 2,
            Geometry::Polygon(rings) => rings.first().is_some_and(|ring| {
                ring.len() >= 4 && ring.first() == ring.last() && distinct_vertices(ring) >= 3
            }),
        }
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        let value = match self {
            Geometry::Point(p) => Value::Point(p.to_position()),
            Geometry::LineString(pts) => {
                Value::LineString(pts.iter().map(|p| p.to_position()).collect())
            }
            Geometry::Polygon(rings) => Value::Polygon(
                rings
                    .iter()
                    .map(|ring| ring.iter().map(|p| p.to_position()).collect())
                    .collect(),
            ),
        };
        geojson::Geometry::new(value)
    }

    /// Converts a GeoJSON geometry. Returns `None` for types the drawing
    /// tools cannot produce or for malformed positions.
    pub fn from_geojson(geometry: &geojson::Geometry) -> Option<Self> {
        fn line(positions: &[Vec<f64>]) -> Option<Vec<LngLat>> {
            positions.iter().map(|p| LngLat::from_position(p)).collect()
        }
        match &geometry.value {
            Value::Point(p) => LngLat::from_position(p).map(Geometry::Point),
            Value::LineString(pts) => line(pts).map(Geometry::LineString),
            Value::Polygon(rings) => rings
                .iter()
                .map(|r| line(r))
                .collect::<Option<Vec<_>>>()
                .map(Geometry::Polygon),
            _ => None,
        }
    }
}

/// Distinct vertices of a closed ring, not counting the closing vertex.
fn distinct_vertices(ring: &[LngLat]) -> usize {
    let open = &ring[..ring.len().saturating_sub(1)];
    let mut seen: Vec<&LngLat> = Vec::with_capacity(open.len());
    for vertex in open {
        if !seen.contains(&vertex) {
            seen.push(vertex);
        }
    }
    seen.len()
}

/// One committed annotation. Edits replace the whole feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub properties: Properties,
}

impl Feature {
    /// Creates a feature with empty properties.
    pub fn new(id: FeatureId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            properties: Properties::new(),
        }
    }

    /// Returns the feature with `key` set to `value`.
    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry.geometry_type()
    }

    pub fn to_geojson(&self) -> geojson::Feature {
        geojson::Feature {
            bbox: None,
            geometry: Some(self.geometry.to_geojson()),
            id: Some(geojson::feature::Id::Number(self.id.into())),
            properties: Some(self.properties.clone()),
            foreign_members: None,
        }
    }
}
