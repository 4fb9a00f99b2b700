//! Ordered in-memory collection of committed annotation features.

use log::warn;

use crate::geometry::{Feature, FeatureId, Geometry, GeometryType};

/// Features in draw order. Ids are unique within a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCollection {
    features: Vec<Feature>,
}

impl GeometryCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    /// Appends `feature`. A feature whose id is already present is rejected
    /// and `false` is returned.
    pub fn push(&mut self, feature: Feature) -> bool {
        if self.get(feature.id).is_some() {
            warn!("rejecting feature {}: id already in collection", feature.id);
            return false;
        }
        self.features.push(feature);
        true
    }

    /// Appends every feature of `other` in order.
    pub fn extend(&mut self, other: GeometryCollection) {
        for feature in other.features {
            self.push(feature);
        }
    }

    /// Replaces the feature with the same id, keeping its position.
    pub fn replace(&mut self, feature: Feature) -> bool {
        match self.features.iter_mut().find(|f| f.id == feature.id) {
            Some(slot) => {
                *slot = feature;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Features of one geometry type, in draw order.
    pub fn of_type(&self, geometry_type: GeometryType) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(move |f| f.geometry_type() == geometry_type)
    }

    /// Smallest id greater than every id in the collection. Once
    /// `FeatureId::MAX` is taken, the lowest unused id instead.
    pub fn next_id(&self) -> FeatureId {
        match self.features.iter().map(|f| f.id).max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .unwrap_or_else(|| self.lowest_free_id()),
        }
    }

    fn lowest_free_id(&self) -> FeatureId {
        (1..FeatureId::MAX)
            .find(|id| self.get(*id).is_none())
            .unwrap_or(0)
    }

    pub fn into_vec(self) -> Vec<Feature> {
        self.features
    }

    /// GeoJSON interchange form consumed by the rendering engine.
    pub fn to_feature_collection(&self) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: self.features.iter().map(Feature::to_geojson).collect(),
            foreign_members: None,
        }
    }

    /// Builds a collection from GeoJSON. Unsupported geometry types are
    /// skipped; missing or duplicate ids are reassigned.
    pub fn from_feature_collection(fc: &geojson::FeatureCollection) -> Self {
        let mut out = Self::new();
        for (idx, f) in fc.features.iter().enumerate() {
            let Some(geometry) = f.geometry.as_ref().and_then(Geometry::from_geojson) else {
                warn!("skipping feature {}: unsupported or missing geometry", idx);
                continue;
            };
            let id = match &f.id {
                Some(geojson::feature::Id::Number(n)) => n.as_u64(),
                _ => None,
            }
            .filter(|id| out.get(*id).is_none())
            .unwrap_or_else(|| out.next_id());
            let mut feature = Feature::new(id, geometry);
            if let Some(props) = &f.properties {
                feature.properties = props.clone();
            }
            out.features.push(feature);
        }
        out
    }
}

impl From<Vec<Feature>> for GeometryCollection {
    fn from(features: Vec<Feature>) -> Self {
        let mut out = Self::new();
        for f in features {
            out.push(f);
        }
        out
    }
}

impl IntoIterator for GeometryCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
