//! Geographic coordinate type used throughout the crate.

/// Longitude/latitude pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns the coordinate as a GeoJSON position (`[lng, lat]`).
    pub fn to_position(self) -> Vec<f64> {
        vec![self.lng, self.lat]
    }

    /// Reads a GeoJSON position. Extra ordinates (elevation) are ignored.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lng, lat, ..] => Some(Self::new(*lng, *lat)),
            _ => None,
        }
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self::new(lng, lat)
    }
}

impl std::str::FromStr for LngLat {
    type Err = String;

    /// Parses `"lng,lat"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lng, lat) = s
            .split_once(',')
            .ok_or_else(|| format!("expected lng,lat but got '{s}'"))?;
        let lng = lng.trim().parse::<f64>().map_err(|e| format!("{lng}: {e}"))?;
        let lat = lat.trim().parse::<f64>().map_err(|e| format!("{lat}: {e}"))?;
        Ok(Self::new(lng, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ignores_elevation() {
        let p = LngLat::from_position(&[1.0, 2.0, 30.0]).unwrap();
        assert_eq!(p, LngLat::new(1.0, 2.0));
        assert!(LngLat::from_position(&[1.0]).is_none());
    }

    #[test]
    fn parse_pair() {
        let p: LngLat = "-2.5, 51.5".parse().unwrap();
        assert_eq!(p, LngLat::new(-2.5, 51.5));
        assert!("12".parse::<LngLat>().is_err());
    }
}
